mod proptest_fsm;

use std::time::Instant;

use lipi_core::engine::{transliterate_with, RenderOptions};
use lipi_core::options::USE_TYPING_CHARS;
use lipi_core::{ScriptRegistry, TransliterationOptions};

use super::{TypingContext, TypingContextSettings, DEFAULT_AUTO_CONTEXT_CLEAR_TIME_MS};

/// Shipped defaults, independent of any custom settings file.
pub(super) fn fixed_settings() -> TypingContextSettings {
    TypingContextSettings {
        auto_clear_timeout_ms: DEFAULT_AUTO_CONTEXT_CLEAR_TIME_MS,
        use_native_numerals: true,
        include_inherent_vowel: false,
    }
}

pub(super) fn context(script: &str) -> TypingContext {
    TypingContext::new(script, Some(fixed_settings())).unwrap()
}

// Helper: type a string one char at a time and replay the diffs
pub(super) fn type_keys(ctx: &mut TypingContext, keys: &str, now: Instant) -> String {
    let mut out = String::new();
    for ch in keys.chars() {
        ctx.take_key_input_at(&ch.to_string(), now).apply(&mut out);
    }
    out
}

/// Whole-string conversion of typed keys.
pub(super) fn bulk(keys: &str, script: &str, settings: &TypingContextSettings) -> String {
    let mut options = TransliterationOptions::new();
    options.insert(USE_TYPING_CHARS.to_string(), true);
    let render = RenderOptions {
        use_native_numerals: settings.use_native_numerals,
        include_inherent_vowel: settings.include_inherent_vowel,
    };
    transliterate_with(ScriptRegistry::global(), keys, "Normal", script, &options, render).unwrap()
}

/// Upper bound on the pending key buffer.
pub(super) fn window_bound(ctx: &TypingContext) -> usize {
    2 * ctx.script.max_typing_input_chars()
}
