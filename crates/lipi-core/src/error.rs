/// Errors surfaced by script resolution, data loading and transliteration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LipiError {
    #[error("script or language not found: {0}")]
    NotFound(String),
    #[error("invalid option `{option}` for {from} -> {to}")]
    InvalidOption {
        option: String,
        from: String,
        to: String,
    },
    #[error("operation not supported for script: {0}")]
    UnsupportedScript(String),
    #[error("malformed data in {source_name}: {reason}")]
    Data { source_name: String, reason: String },
}

impl LipiError {
    pub(crate) fn data(source_name: &str, reason: impl Into<String>) -> Self {
        LipiError::Data {
            source_name: source_name.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LipiError>;
