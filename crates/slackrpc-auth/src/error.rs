//! Link handshake error types.

use thiserror::Error;

/// Link handshake error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The link service refused to issue another link (HTTP 429)
    #[error("Too many link requests; wait a minute and try again")]
    RateLimited,

    /// The link service rejected the start request
    #[error("Failed to start link (HTTP {status}): {body}")]
    InitiationFailed { status: u16, body: String },

    /// A poll attempt got a non-success status
    #[error("Poll request returned HTTP {0}")]
    PollStatus(u16),

    /// Every poll attempt finished without the link completing
    #[error("Link was not completed after {attempts} poll attempts")]
    PollTimeout { attempts: u32 },

    /// The service reported completion without a token
    #[error("Link completed but the service returned no token")]
    MissingToken,

    /// A correlation code that is not 6 alphanumeric characters
    #[error("Invalid link code: {0:?}")]
    InvalidCode(String),

    /// Credentials already hold a token
    #[error("An authentication token is already set")]
    TokenAlreadySet,

    /// Invalid state transition in the handshake FSM
    #[error("Invalid handshake state transition: {0}")]
    InvalidStateTransition(String),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parse error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AuthError {
    /// Returns true if a poll attempt that failed this way should simply be
    /// retried on the next tick.
    ///
    /// Transient errors include transport failures, undecodable bodies, and
    /// non-success poll statuses (the service rate-limits polling).
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AuthError::Http(_) | AuthError::Json(_) | AuthError::PollStatus(_)
        )
    }

    /// The underlying causes, outermost first, joined with `": "`.
    ///
    /// A cause whose text already appears in the message above it is
    /// skipped, so this is empty when `Display` already says everything.
    pub fn error_chain(&self) -> String {
        let mut causes = Vec::new();
        let mut above = self.to_string();
        let mut source = std::error::Error::source(self);

        while let Some(cause) = source {
            let text = cause.to_string();
            if !above.contains(&text) {
                causes.push(text.clone());
            }
            above = text;
            source = cause.source();
        }

        causes.join(": ")
    }
}

impl From<slackrpc_config::CoreError> for AuthError {
    fn from(error: slackrpc_config::CoreError) -> Self {
        AuthError::Config(error.to_string())
    }
}

/// Result type alias using AuthError.
pub type AuthResult<T> = Result<T, AuthError>;
