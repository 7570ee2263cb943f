//! File system paths for slackrpc.

use crate::{CoreError, CoreResult};
use std::path::PathBuf;

/// Overrides the base directory (default `~/.slackrpc`).
pub const ENV_HOME: &str = "SLACKRPC_HOME";

/// Manages file system paths for slackrpc.
#[derive(Debug, Clone)]
pub struct Paths {
    base_dir: PathBuf,
}

impl Paths {
    /// Resolve the base directory from `SLACKRPC_HOME`, falling back to
    /// `~/.slackrpc`.
    pub fn new() -> CoreResult<Self> {
        if let Some(dir) = std::env::var_os(ENV_HOME).filter(|v| !v.is_empty()) {
            return Ok(Self::with_base_dir(PathBuf::from(dir)));
        }

        let home = dirs::home_dir()
            .ok_or_else(|| CoreError::Path("Could not determine home directory".to_string()))?;

        Ok(Self::with_base_dir(home.join(".slackrpc")))
    }

    /// Create a Paths instance rooted at a custom directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.slackrpc).
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the config file path (~/.slackrpc/config.json).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the logs directory (~/.slackrpc/logs).
    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// Get the default JSONL log file (~/.slackrpc/logs/slackrpc.jsonl).
    pub fn log_file(&self) -> PathBuf {
        self.logs_dir().join("slackrpc.jsonl")
    }

    /// Ensure the base and logs directories exist.
    pub fn ensure_dirs(&self) -> CoreResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}
