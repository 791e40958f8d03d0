//! Logging initialization
//!
//! jroh emits structured events through `tracing`; this module wires up a
//! `tracing-subscriber` pipeline for hosts that do not install their own.
//! Unhandled handler faults are logged here at error level with full detail
//! while the wire carries only a redacted message, so a working subscriber
//! is the difference between a debuggable fault and a silent -32000.
//!
//! Initialization uses `try_init`, so calling it when the host already set
//! a global subscriber (or from several tests) is harmless.

use tracing_subscriber::EnvFilter;

/// Configuration for the built-in logging pipeline
///
/// # Examples
///
/// ```rust
/// use jroh_core::LogConfig;
///
/// let config = LogConfig::new("jroh=debug,info").with_json(true);
/// jroh_core::init_logging(&config);
/// ```
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// EnvFilter directive string, e.g. "info" or "jroh=debug,warn"
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl LogConfig {
    /// Create a config with the given filter directives.
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            json: false,
        }
    }

    /// Toggle JSON output.
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

impl Default for LogConfig {
    /// Defaults to the `RUST_LOG` environment variable, falling back to
    /// "info", with human-readable output.
    fn default() -> Self {
        Self {
            filter: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            json: false,
        }
    }
}

/// Install the global `tracing` subscriber described by `config`.
///
/// Returns `false` when a global subscriber was already installed, which is
/// fine: the existing one keeps receiving jroh's events.
pub fn init_logging(config: &LogConfig) -> bool {
    let filter =
        EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init()
            .is_ok()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
            .is_ok()
    }
}
