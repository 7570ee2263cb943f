//! Command-line arguments.

use clap::Parser;
use slackrpc_config::{
    Config, CoreResult, Paths, ENV_API_URL, ENV_AUTH_KEY, ENV_LOG_LEVEL, ENV_POLL_INTERVAL_MS,
    ENV_POLL_MAX_ATTEMPTS, ENV_USER_AGENT,
};
use std::path::PathBuf;

/// slackrpc: link this machine to Slack and relay activity to it.
///
/// Activity payloads are read as JSON lines from stdin and written to stdout
/// once the link is established.
///
/// Settings are layered: defaults, then ~/.slackrpc/config.json, then
/// SLACKRPC_* environment variables, then these flags.
#[derive(Parser, Debug)]
#[command(name = "slackrpc", version)]
pub struct Args {
    /// Base URL of the link service [env: SLACKRPC_URL]
    #[arg(long)]
    pub api_url: Option<String>,

    /// Auth token from a previous link. Skips the handshake [env: SLACKRPC_AUTH_KEY]
    #[arg(long)]
    pub auth_key: Option<String>,

    /// User-Agent sent with every request [env: SLACKRPC_USER_AGENT]
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Milliseconds between poll requests [env: SLACKRPC_POLL_INTERVAL_MS]
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Poll requests before giving up on the link [env: SLACKRPC_POLL_MAX_ATTEMPTS]
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Log level (trace, debug, info, warn, error) [env: SLACKRPC_LOG_LEVEL]
    #[arg(long)]
    pub log_level: Option<String>,

    /// Also append structured JSON logs to a file. Without a path, logs go to
    /// ~/.slackrpc/logs/slackrpc.jsonl.
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub log_file: Option<Option<PathBuf>>,

    /// Ignore any configured token and link again.
    #[arg(long)]
    pub reauthenticate: bool,
}

impl Args {
    /// Layer the command-line values over `config`.
    pub fn apply(&self, config: &mut Config) -> CoreResult<()> {
        config.apply_overrides(|key| match key {
            ENV_API_URL => self.api_url.clone(),
            ENV_AUTH_KEY => self.auth_key.clone(),
            ENV_USER_AGENT => self.user_agent.clone(),
            ENV_POLL_INTERVAL_MS => self.poll_interval_ms.map(|v| v.to_string()),
            ENV_POLL_MAX_ATTEMPTS => self.max_attempts.map(|v| v.to_string()),
            ENV_LOG_LEVEL => self.log_level.clone(),
            _ => None,
        })
    }

    /// Where the JSON log file goes, if file logging was asked for.
    pub fn log_path(&self, paths: &Paths) -> Option<PathBuf> {
        match &self.log_file {
            Some(Some(path)) => Some(path.clone()),
            Some(None) => Some(paths.log_file()),
            None => None,
        }
    }

    /// Token the handshake should start from, if any.
    pub fn configured_token(&self, config: &Config) -> Option<String> {
        if self.reauthenticate {
            None
        } else {
            config.auth_token.clone()
        }
    }
}
