//! Runtime configuration.
//!
//! Values are layered: built-in defaults, then `~/.slackrpc/config.json`
//! (if present), then environment variables. The binary applies its
//! command-line flags last.
//!
//! The authentication token is only ever read from the environment or the
//! command line. It is skipped by serde so it never reaches the config file.

use crate::{CoreError, CoreResult, Paths};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Production link service.
pub const DEFAULT_API_URL: &str = "https://slackrpc.nikoo.dev";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Delay between poll attempts. The link service rate-limits its poll
/// route at four requests per minute.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 15_000;

/// Poll attempts before the handshake times out.
pub const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 20;

pub const ENV_AUTH_KEY: &str = "SLACKRPC_AUTH_KEY";
pub const ENV_API_URL: &str = "SLACKRPC_URL";
pub const ENV_USER_AGENT: &str = "SLACKRPC_USER_AGENT";
pub const ENV_POLL_INTERVAL_MS: &str = "SLACKRPC_POLL_INTERVAL_MS";
pub const ENV_POLL_MAX_ATTEMPTS: &str = "SLACKRPC_POLL_MAX_ATTEMPTS";
pub const ENV_LOG_LEVEL: &str = "SLACKRPC_LOG_LEVEL";

/// `User-Agent` sent with every outbound request unless overridden.
pub fn default_user_agent() -> String {
    format!("slackrpc/{}", env!("CARGO_PKG_VERSION"))
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_poll_max_attempts() -> u32 {
    DEFAULT_POLL_MAX_ATTEMPTS
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// slackrpc configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the link service.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Pre-existing authentication token. When set, the link handshake is
    /// skipped entirely.
    #[serde(skip)]
    pub auth_token: Option<String>,

    /// Outbound HTTP `User-Agent`.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Delay between poll attempts, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Maximum number of poll attempts.
    #[serde(default = "default_poll_max_attempts")]
    pub poll_max_attempts: u32,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            auth_token: None,
            user_agent: default_user_agent(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            poll_max_attempts: DEFAULT_POLL_MAX_ATTEMPTS,
            log_level: default_log_level(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("poll_max_attempts", &self.poll_max_attempts)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Config {
    /// Load the config file (if any), then apply overrides from `lookup`
    /// (normally the process environment).
    pub fn load_with<F>(paths: &Paths, lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.apply_overrides(lookup)?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = serde_json::from_str(&content)?;
        config.normalize();
        Ok(config)
    }

    /// Save configuration to the config file. The token is never written.
    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), content)?;
        Ok(())
    }

    /// Override values from an arbitrary key lookup.
    ///
    /// Empty or whitespace-only values are ignored. Numeric values that do
    /// not parse are rejected.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> CoreResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(token) = get(ENV_AUTH_KEY) {
            self.auth_token = Some(token);
        }
        if let Some(url) = get(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(user_agent) = get(ENV_USER_AGENT) {
            self.user_agent = user_agent;
        }
        if let Some(interval) = get(ENV_POLL_INTERVAL_MS) {
            self.poll_interval_ms = parse_number(ENV_POLL_INTERVAL_MS, &interval)?;
        }
        if let Some(attempts) = get(ENV_POLL_MAX_ATTEMPTS) {
            self.poll_max_attempts = parse_number(ENV_POLL_MAX_ATTEMPTS, &attempts)?;
        }
        if let Some(level) = get(ENV_LOG_LEVEL) {
            self.log_level = level;
        }

        self.normalize();
        Ok(())
    }

    /// Check that the configuration can drive a handshake.
    pub fn validate(&self) -> CoreResult<()> {
        let url = self.api_url()?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CoreError::Config(format!(
                "api_url must be http or https, got {}",
                url.scheme()
            )));
        }
        if self.user_agent.trim().is_empty() {
            return Err(CoreError::Config("user_agent must not be empty".to_string()));
        }
        if self.poll_interval_ms == 0 {
            return Err(CoreError::Config(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the link service base URL as a parsed URL.
    pub fn api_url(&self) -> CoreResult<Url> {
        Url::parse(&self.api_url).map_err(CoreError::from)
    }

    /// Delay between poll attempts.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    fn normalize(&mut self) {
        let trimmed = self.api_url.trim().trim_end_matches('/');
        if trimmed.len() != self.api_url.len() {
            self.api_url = trimmed.to_string();
        }
        if self
            .auth_token
            .as_deref()
            .is_some_and(|token| token.trim().is_empty())
        {
            self.auth_token = None;
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> CoreResult<T> {
    value
        .parse()
        .map_err(|_| CoreError::Config(format!("{} must be a non-negative integer, got {:?}", key, value)))
}
