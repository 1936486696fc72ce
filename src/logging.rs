//! Logging System
//!
//! Structured logging built on the `tracing` crate. Embedders call
//! [`init_logging`] once at startup; the `LEDGERFS_LOG` environment variable
//! overrides the configured level filter.

use crate::error::FsError;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether logging is enabled (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format: text, json (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Enable colored output (text format only)
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_true() -> bool {
    true
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_level(),
            format: default_format(),
            color: default_true(),
        }
    }
}

/// Initialize the logging system. Does nothing when disabled; fails if a
/// global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), FsError> {
    if !config.enabled {
        return Ok(());
    }

    let filter = match std::env::var("LEDGERFS_LOG") {
        Ok(directive) if !directive.is_empty() => EnvFilter::try_new(directive),
        _ => EnvFilter::try_new(&config.level),
    }
    .map_err(|e| FsError::Config(format!("invalid log filter: {e}")))?;

    match config.format.as_str() {
        "json" => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init(),
        "text" => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(config.color)
            .try_init(),
        other => {
            return Err(FsError::Config(format!("unknown log format: {other:?}")));
        }
    }
    .map_err(|e| FsError::Config(e.to_string()))
}
