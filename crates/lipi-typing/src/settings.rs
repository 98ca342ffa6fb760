use std::time::Duration;

use lipi_core::settings::settings;

/// Shipped default for [`TypingContextSettings::auto_clear_timeout_ms`].
pub const DEFAULT_AUTO_CONTEXT_CLEAR_TIME_MS: u64 = 4500;
/// Shipped default for [`TypingContextSettings::use_native_numerals`].
pub const DEFAULT_USE_NATIVE_NUMERALS: bool = true;
/// Shipped default for [`TypingContextSettings::include_inherent_vowel`].
pub const DEFAULT_INCLUDE_INHERENT_VOWEL: bool = false;

/// Per-context typing behaviour.
///
/// `Default` reads the process-wide settings, which match the `DEFAULT_*`
/// constants unless a custom settings file was installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingContextSettings {
    /// Idle time after which the next key starts a fresh context.
    pub auto_clear_timeout_ms: u64,
    pub use_native_numerals: bool,
    pub include_inherent_vowel: bool,
}

impl TypingContextSettings {
    pub fn with_auto_clear_timeout_ms(mut self, ms: u64) -> Self {
        self.auto_clear_timeout_ms = ms;
        self
    }

    pub fn with_use_native_numerals(mut self, enabled: bool) -> Self {
        self.use_native_numerals = enabled;
        self
    }

    pub fn with_include_inherent_vowel(mut self, enabled: bool) -> Self {
        self.include_inherent_vowel = enabled;
        self
    }

    pub fn auto_clear_timeout(&self) -> Duration {
        Duration::from_millis(self.auto_clear_timeout_ms)
    }
}

impl Default for TypingContextSettings {
    fn default() -> Self {
        let typing = &settings().typing;
        Self {
            auto_clear_timeout_ms: typing.auto_clear_timeout_ms,
            use_native_numerals: typing.use_native_numerals,
            include_inherent_vowel: typing.include_inherent_vowel,
        }
    }
}
