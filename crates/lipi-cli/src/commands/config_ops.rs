use std::fs;
use std::path::Path;
use std::process;

use lipi::settings::{self, Settings, SettingsError};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub fn settings_export() {
    print!("{}", settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let s = die!(read_settings(Path::new(file)), "Error: {}");
    println!("OK: {}", summary(&s));
}

/// Install `--settings` before any command reads the settings.
pub fn load_settings(file: &str) {
    die!(lipi::settings_load_config(Path::new(file)), "Error: {}");
}

/// Parse a settings file without installing it.
pub fn read_settings(path: &Path) -> Result<Settings, SettingsError> {
    let content = fs::read_to_string(path)
        .map_err(|e| SettingsError::Parse(format!("{}: {e}", path.display())))?;
    settings::parse_settings_toml(&content)
}

fn summary(s: &Settings) -> String {
    format!(
        "typing.auto_clear_timeout_ms={}, typing.use_native_numerals={}, typing.include_inherent_vowel={}",
        s.typing.auto_clear_timeout_ms, s.typing.use_native_numerals, s.typing.include_inherent_vowel
    )
}
