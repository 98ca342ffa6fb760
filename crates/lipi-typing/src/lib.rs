//! Incremental typing into a target script.
//!
//! `TypingContext` takes one key at a time and answers with a `TypingDiff`
//! against what it rendered before, instead of a full re-render. Only the
//! trailing keys that a later key could still reinterpret are kept; the
//! rest is final. An idle gap longer than the auto-clear timeout starts a
//! fresh context.

mod key_handlers;
mod settings;
mod window;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Instant;

use lipi_core::diff::TypingDiff;
use lipi_core::engine::RenderOptions;
use lipi_core::script::NORMAL;
use lipi_core::{Result, ScriptDefinition, ScriptRegistry};

pub use settings::{
    TypingContextSettings, DEFAULT_AUTO_CONTEXT_CLEAR_TIME_MS, DEFAULT_INCLUDE_INHERENT_VOWEL,
    DEFAULT_USE_NATIVE_NUMERALS,
};

/// Per-session typing state for one target script.
pub struct TypingContext {
    keys: Arc<ScriptDefinition>,
    script: Arc<ScriptDefinition>,
    settings: TypingContextSettings,

    /// Keys not yet final.
    raw: Vec<char>,
    /// Rendering of `raw`, as last reported to the caller.
    rendered: String,
    last_key_at: Option<Instant>,
}

impl TypingContext {
    /// Context for `script` backed by the global registry. `None` settings
    /// means the process-wide defaults.
    pub fn new(script: &str, settings: Option<TypingContextSettings>) -> Result<Self> {
        Self::with_registry(ScriptRegistry::global(), script, settings)
    }

    pub fn with_registry(
        registry: &ScriptRegistry,
        script: &str,
        settings: Option<TypingContextSettings>,
    ) -> Result<Self> {
        let script = registry.get(script)?;
        let keys = registry.get(NORMAL)?;
        Ok(Self {
            keys,
            script,
            settings: settings.unwrap_or_default(),
            raw: Vec::new(),
            rendered: String::new(),
            last_key_at: None,
        })
    }

    /// Feed one key (one or more chars) typed now.
    pub fn take_key_input(&mut self, key: &str) -> TypingDiff {
        self.take_key_input_at(key, Instant::now())
    }

    /// Drop all pending state. Text already reported stays with the caller.
    pub fn clear_context(&mut self) {
        self.raw.clear();
        self.rendered.clear();
        self.last_key_at = None;
    }

    pub fn script_name(&self) -> &str {
        self.script.name()
    }

    pub fn settings(&self) -> &TypingContextSettings {
        &self.settings
    }

    pub fn update_use_native_numerals(&mut self, enabled: bool) {
        self.settings.use_native_numerals = enabled;
    }

    pub fn get_use_native_numerals(&self) -> bool {
        self.settings.use_native_numerals
    }

    pub fn update_include_inherent_vowel(&mut self, enabled: bool) {
        self.settings.include_inherent_vowel = enabled;
    }

    pub fn get_include_inherent_vowel(&self) -> bool {
        self.settings.include_inherent_vowel
    }

    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            use_native_numerals: self.settings.use_native_numerals,
            include_inherent_vowel: self.settings.include_inherent_vowel,
        }
    }
}

/// Type `text` into `script` one char at a time and return what the
/// caller's buffer would hold afterwards.
pub fn emulate_typing(
    text: &str,
    script: &str,
    settings: Option<TypingContextSettings>,
) -> Result<String> {
    let mut ctx = TypingContext::new(script, settings)?;
    // One instant for every key so a slow run never trips the timeout.
    let now = Instant::now();
    let mut out = String::new();
    let mut buf = [0u8; 4];
    for ch in text.chars() {
        ctx.take_key_input_at(ch.encode_utf8(&mut buf), now)
            .apply(&mut out);
    }
    Ok(out)
}
