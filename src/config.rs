use std::path::Path;

use lipi_core::settings::{self, SettingsError};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Install a settings file for the process. Must run before anything reads
/// the settings.
pub fn settings_load_config(path: &Path) -> Result<(), ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    settings::init_custom(content)?;
    Ok(())
}

pub fn settings_default_config() -> &'static str {
    settings::default_toml()
}
