use std::time::Instant;

use tracing::{debug, debug_span};

use lipi_core::diff::{compute_diff, TypingDiff};
use lipi_core::engine::{render_for_typing, Rendering};

use super::window::safe_cut;
use super::TypingContext;

impl TypingContext {
    /// Feed one key typed at `now`.
    pub fn take_key_input_at(&mut self, key: &str, now: Instant) -> TypingDiff {
        if key.is_empty() {
            return TypingDiff::default();
        }
        let _span = debug_span!("take_key_input", script = self.script.name(), key).entered();

        if let Some(last) = self.last_key_at {
            let idle = now.saturating_duration_since(last);
            if idle > self.settings.auto_clear_timeout() {
                debug!(idle_ms = idle.as_millis() as u64, "context expired");
                self.clear_context();
            }
        }

        self.raw.extend(key.chars());
        let rendering = render_for_typing(&self.keys, &self.script, &self.raw, self.render_options());
        let diff = compute_diff(&self.rendered, &rendering.text);
        self.settle(rendering);
        self.last_key_at = Some(now);

        debug!(
            delete = diff.delete_count,
            insert = %diff.insert_text,
            window = self.raw.len()
        );
        diff
    }

    /// Drop keys whose output can no longer change.
    fn settle(&mut self, rendering: Rendering) {
        let cut = safe_cut(&rendering);
        match rendering.segments.get(cut) {
            Some(seg) => {
                self.raw.drain(..seg.raw_start);
                self.rendered = rendering.text.chars().skip(seg.output_start).collect();
            }
            None => {
                self.raw.clear();
                self.rendered.clear();
            }
        }
    }
}
