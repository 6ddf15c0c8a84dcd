//! `securify` — symmetric token codec.
//!
//! Packs any serialisable payload into an opaque string that only holders of
//! the 32-byte secret key can open again:
//!
//! ```text
//! <8 random letters> | <hex(iv || ciphertext)> [ | <expiry, epoch seconds> ]
//! ```
//!
//! The free functions [`encode`], [`decode`] and [`verify`] use the default
//! [`Codec`] (AES-256-CTR, deadlines stored but not enforced). Build a
//! [`Codec`] explicitly to pick the authenticated cipher or to enforce
//! expiration.
//!
//! # Security notes
//!
//! - AES-256-CTR has no integrity tag. Ciphertext bits can be flipped
//!   predictably; a wrong key is detected only because the garbage plaintext
//!   almost never parses as JSON.
//! - The default codec never checks the deadline it writes. Use
//!   [`ExpiryPolicy::Enforce`] when expiration must mean something.

pub mod codec;
pub mod config;
pub mod crypto;
pub mod expiry;

use serde::{de::DeserializeOwned, Serialize};

pub use codec::Codec;
pub use config::CodecConfig;
pub use crypto::{Algorithm, KEY_LEN};
pub use expiry::{calculate_expiration_time, ExpiryPolicy};
pub use securify_common::{EncodeOptions, ExpiresIn, TokenError};

/// Encode `payload` with the default codec.
///
/// # Errors
///
/// See [`Codec::encode`].
pub fn encode<T: Serialize + ?Sized>(
    payload: &T,
    secret_key: &[u8],
    options: &EncodeOptions,
) -> Result<String, TokenError> {
    Codec::default().encode(payload, secret_key, options)
}

/// Decode `token` with the default codec.
///
/// # Errors
///
/// See [`Codec::decode`].
pub fn decode<T: DeserializeOwned>(token: &str, secret_key: &[u8]) -> Result<T, TokenError> {
    Codec::default().decode(token, secret_key)
}

/// Verify `token` with the default codec.
pub fn verify(token: &str, secret_key: &[u8]) -> bool {
    Codec::default().verify(token, secret_key)
}
