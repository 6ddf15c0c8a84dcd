//! Caller-facing options accepted by `encode`.
//!
//! These types deserialise from the same JSON shape callers of the token
//! format already pass around, e.g. `{"expiresIn": "1h"}` or
//! `{"expiresIn": 3600}`.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Expiration
// ---------------------------------------------------------------------------

/// How long a token should live, relative to the moment it is encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpiresIn {
    /// A plain number of seconds. `0` means "no expiration".
    Seconds(u64),
    /// A duration string of the form `<digits><unit>` with unit one of
    /// `s`, `m`, `h`, `d`. Anything else means "no expiration".
    Duration(String),
}

impl ExpiresIn {
    /// Interpret a textual setting such as an environment variable value.
    ///
    /// An all-digit value is taken as seconds, anything else as a duration
    /// string.
    pub fn from_setting(value: &str) -> Self {
        let value = value.trim();
        match value.parse::<u64>() {
            Ok(secs) if value.bytes().all(|b| b.is_ascii_digit()) => ExpiresIn::Seconds(secs),
            _ => ExpiresIn::Duration(value.to_owned()),
        }
    }
}

impl From<u64> for ExpiresIn {
    fn from(secs: u64) -> Self {
        ExpiresIn::Seconds(secs)
    }
}

impl From<&str> for ExpiresIn {
    fn from(s: &str) -> Self {
        ExpiresIn::Duration(s.to_owned())
    }
}

impl From<String> for ExpiresIn {
    fn from(s: String) -> Self {
        ExpiresIn::Duration(s)
    }
}

// ---------------------------------------------------------------------------
// Encode options
// ---------------------------------------------------------------------------

/// Options for a single `encode` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodeOptions {
    /// Lifetime of the token. Absent means no expiration segment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<ExpiresIn>,
}

impl EncodeOptions {
    /// Options that attach the given lifetime to the token.
    pub fn expires_in(expires_in: impl Into<ExpiresIn>) -> Self {
        Self {
            expires_in: Some(expires_in.into()),
        }
    }
}
