//! Error taxonomy shared by every codec operation.

use thiserror::Error;

/// Top-level codec error type.
///
/// Each variant carries a stable machine-readable code (see [`TokenError::code`])
/// that is safe to put in log fields:
/// - [`TokenError::Serialization`] → `serialization`
/// - [`TokenError::Key`] → `key`
/// - [`TokenError::Format`] → `format`
/// - [`TokenError::Parse`] → `parse`
/// - [`TokenError::Expired`] → `expired`
/// - [`TokenError::Integrity`] → `integrity`
#[derive(Debug, Error)]
pub enum TokenError {
    /// The payload could not be serialised to JSON.
    #[error("payload serialisation failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The secret key is the wrong length for the configured cipher.
    #[error("invalid secret key: expected {expected} bytes, got {actual}")]
    Key { expected: usize, actual: usize },

    /// The token string does not match the `salt|body[|expiration]` layout.
    #[error("malformed token: {0}")]
    Format(&'static str),

    /// The decrypted bytes are not a valid serialised payload.
    #[error("payload could not be parsed: {0}")]
    Parse(#[source] serde_json::Error),

    /// The token carries a deadline that has already passed.
    #[error("token expired at {deadline}")]
    Expired { deadline: u64 },

    /// Authenticated decryption rejected the ciphertext.
    #[error("token failed integrity check")]
    Integrity,
}

impl TokenError {
    /// Returns the stable code string for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::Serialization(_) => "serialization",
            TokenError::Key { .. } => "key",
            TokenError::Format(_) => "format",
            TokenError::Parse(_) => "parse",
            TokenError::Expired { .. } => "expired",
            TokenError::Integrity => "integrity",
        }
    }
}
