//! Authentication token and the process-wide credential slot.

use crate::{AuthError, AuthResult};
use std::fmt;
use std::sync::OnceLock;

/// Opaque bearer token issued by the link service.
///
/// `Debug` and `Display` never show the value.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw token, for building requests.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

impl fmt::Display for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Single-assignment holder for the active token.
///
/// Written once by the orchestrator (or seeded from configuration) before
/// the relay is built; read freely afterwards.
#[derive(Debug, Default)]
pub struct Credentials {
    token: OnceLock<AuthToken>,
}

impl Credentials {
    /// Empty credentials: the handshake must run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credentials seeded from configuration, if a token was supplied.
    pub fn from_configured(token: Option<String>) -> Self {
        let credentials = Self::new();
        if let Some(token) = token {
            let _ = credentials.token.set(AuthToken::new(token));
        }
        credentials
    }

    /// Store the token. Fails if one is already present.
    pub fn set(&self, token: AuthToken) -> AuthResult<()> {
        self.token.set(token).map_err(|_| AuthError::TokenAlreadySet)
    }

    pub fn token(&self) -> Option<&AuthToken> {
        self.token.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.get().is_some()
    }
}
