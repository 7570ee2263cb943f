//! Error types for the activity relay.

use thiserror::Error;

/// Relay error type.
#[derive(Error, Debug)]
pub enum RelayError {
    /// The relay was built before a token was available
    #[error("Not authenticated; complete the link handshake first")]
    NotAuthenticated,

    /// IO error (reading the source, writing the bridge)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The bridge could not deliver an event
    #[error("Bridge error: {0}")]
    Bridge(String),

    /// The receiving side of a channel source is gone
    #[error("Activity source closed")]
    SourceClosed,

    /// The relay task panicked or was aborted
    #[error("Relay task failed: {0}")]
    Task(String),
}

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;
