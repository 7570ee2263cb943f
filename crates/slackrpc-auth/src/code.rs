//! Link codes and authentication attempts.
//!
//! A link code is six characters drawn from `A-Z0-9`. It only correlates a
//! pending link with its completion for a few minutes; it is not a secret.

use crate::{AuthError, AuthResult};
use chrono::{DateTime, Utc};
use rand::RngCore;
use std::fmt;

/// Number of characters in a link code.
pub const CODE_LENGTH: usize = 6;

/// Symbols a generated code is drawn from.
pub const CODE_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A six-character link correlation code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuthCode(String);

impl AuthCode {
    /// Generate a fresh code from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; CODE_LENGTH];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self::from_bytes(bytes)
    }

    /// Map random bytes onto the alphabet, one symbol per byte (`byte % 36`).
    pub fn from_bytes(bytes: [u8; CODE_LENGTH]) -> Self {
        let code = bytes
            .iter()
            .map(|b| CODE_ALPHABET[(*b as usize) % CODE_ALPHABET.len()] as char)
            .collect();
        Self(code)
    }

    /// Accept an existing code. The link service only takes six ASCII
    /// alphanumeric characters.
    pub fn parse(value: &str) -> AuthResult<Self> {
        if value.len() == CODE_LENGTH && value.bytes().all(|b| b.is_ascii_alphanumeric()) {
            Ok(Self(value.to_string()))
        } else {
            Err(AuthError::InvalidCode(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuthCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generate a new link code.
pub fn generate_code() -> AuthCode {
    AuthCode::generate()
}

/// One pending link, created at most once per run.
#[derive(Debug, Clone)]
pub struct AuthenticationAttempt {
    pub code: AuthCode,
    pub hostname: String,
    pub created_at: DateTime<Utc>,
}

impl AuthenticationAttempt {
    pub fn new(code: AuthCode, hostname: impl Into<String>) -> Self {
        Self {
            code,
            hostname: hostname.into(),
            created_at: Utc::now(),
        }
    }

    /// Attempt identified by this machine's hostname.
    pub fn for_local_host(code: AuthCode) -> Self {
        Self::new(code, local_hostname())
    }
}

/// The local hostname, or `"unknown"` when it cannot be read.
pub fn local_hostname() -> String {
    hostname::get()
        .ok()
        .map(|h| h.to_string_lossy().to_string())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
