//! # Observability
//!
//! Logging setup shared by the slackrpc crates.
//!
//! Library crates are **log producers** only: they use the standard
//! `tracing` macros and never decide where output goes. The binary calls
//! [`init_with_config`] exactly once at startup, which installs:
//!
//! - a compact stderr layer (ANSI colored unless disabled) for the person
//!   at the terminal
//! - an optional JSONL file layer, one structured entry per line, when
//!   `log_path` is set
//!
//! Both layers honor `RUST_LOG` and fall back to `default_level`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! observability::init_with_config(observability::LogConfig {
//!     service_name: "slackrpc".into(),
//!     default_level: "debug".into(),
//!     ..Default::default()
//! })?;
//!
//! tracing::info!("ready");
//! ```

mod file;
mod json_layer;

use std::io;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub use file::LogFileWriter;
pub use json_layer::{JsonLayer, LogEntry};

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Name of the service, written into every JSONL entry.
    pub service_name: String,

    /// Default level filter (e.g., "debug", "info", "warn").
    /// Overridden by `RUST_LOG` when set.
    pub default_level: String,

    /// Append structured JSONL entries to this file as well.
    pub log_path: Option<PathBuf>,

    /// Emit ANSI colors on stderr.
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown".into(),
            default_level: "info".into(),
            log_path: None,
            ansi: true,
        }
    }
}

/// Initialize logging with a custom configuration.
///
/// Fails if the log file cannot be opened or a global subscriber is
/// already installed.
pub fn init_with_config(config: LogConfig) -> io::Result<()> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .with_writer(io::stderr)
        .with_ansi(config.ansi)
        .with_filter(env_filter(&config.default_level));

    let file_layer = match &config.log_path {
        Some(path) => {
            let writer = LogFileWriter::open(path)?;
            Some(
                JsonLayer::new(config.service_name.clone(), writer)
                    .with_filter(env_filter(&config.default_level)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(io::Error::other)?;

    if let Some(path) = &config.log_path {
        tracing::debug!(log_path = %path.display(), "file logging enabled");
    }

    Ok(())
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Re-export tracing macros for convenience.
pub use tracing::{debug, error, info, instrument, trace, warn};

/// Re-export Level for advanced filtering.
pub use tracing::Level;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.service_name, "unknown");
        assert_eq!(config.default_level, "info");
        assert!(config.log_path.is_none());
        assert!(config.ansi);
    }

    #[test]
    fn test_init_fails_for_unwritable_log_path() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as an append-only log file.
        let result = init_with_config(LogConfig {
            service_name: "test".into(),
            log_path: Some(dir.path().to_path_buf()),
            ..Default::default()
        });
        assert!(result.is_err());
    }
}
