//! Configuration, filesystem paths, and shared error types for slackrpc.

mod config;
mod error;
mod paths;

pub use config::{
    default_user_agent, Config, DEFAULT_API_URL, DEFAULT_LOG_LEVEL, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_POLL_MAX_ATTEMPTS, ENV_API_URL, ENV_AUTH_KEY, ENV_LOG_LEVEL, ENV_POLL_INTERVAL_MS,
    ENV_POLL_MAX_ATTEMPTS, ENV_USER_AGENT,
};
pub use error::{CoreError, CoreResult};
pub use paths::{Paths, ENV_HOME};
