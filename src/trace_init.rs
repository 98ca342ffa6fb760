//! Opt-in JSON trace output for debugging conversions and typing sessions.
//!
//! Without the `trace` feature every call is a no-op and the `tracing`
//! macros in the library crates compile away.

use std::path::{Path, PathBuf};

/// Environment variable read for the filter directives.
pub const TRACE_FILTER_ENV: &str = "LIPI_TRACE";

const DEFAULT_FILTER: &str = "lipi=debug,lipi_core=debug,lipi_typing=debug";

/// Where trace events go and which of them are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceConfig {
    dir: PathBuf,
    file_name: String,
    filter: Option<String>,
}

impl TraceConfig {
    /// Trace into `dir/lipi-trace.jsonl`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            file_name: "lipi-trace.jsonl".to_string(),
            filter: None,
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    /// Filter directives used when `LIPI_TRACE` is unset or invalid.
    pub fn with_filter(mut self, directives: impl Into<String>) -> Self {
        self.filter = Some(directives.into());
        self
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    pub fn filter(&self) -> &str {
        self.filter.as_deref().unwrap_or(DEFAULT_FILTER)
    }
}

#[cfg(feature = "trace")]
static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

/// Install the JSON file subscriber. Returns false when a subscriber was
/// already installed, by this function or anyone else.
#[cfg(feature = "trace")]
pub fn init_with(config: &TraceConfig) -> bool {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    if GUARD.get().is_some() {
        return false;
    }
    let appender = tracing_appender::rolling::never(&config.dir, &config.file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_env(TRACE_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(config.filter()));
    let installed = tracing_subscriber::fmt()
        .json()
        .with_writer(writer)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(filter)
        .try_init()
        .is_ok();
    if installed {
        // Held until exit so buffered lines are flushed.
        let _ = GUARD.set(guard);
    }
    installed
}

#[cfg(not(feature = "trace"))]
pub fn init_with(_config: &TraceConfig) -> bool {
    false
}

/// Trace into `log_dir/lipi-trace.jsonl` with the default filter.
pub fn init_tracing(log_dir: &Path) -> bool {
    init_with(&TraceConfig::new(log_dir))
}
