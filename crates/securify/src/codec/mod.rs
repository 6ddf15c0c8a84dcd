//! [`Codec`]: turns payloads into tokens and tokens back into payloads.
//!
//! A codec is an immutable value. It owns only its configuration (cipher,
//! expiry policy, default lifetime) and never retains key material or
//! payloads between calls, so one instance can be shared freely across
//! threads.

pub mod salt;
pub mod token;

use securify_common::{EncodeOptions, ExpiresIn, TokenError};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::config::CodecConfig;
use crate::crypto::{cipher, Algorithm, CipherError, KEY_LEN};
use crate::expiry::{self, ExpiryPolicy};
use token::TokenParts;

/// Symmetric token encoder/decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Codec {
    algorithm: Algorithm,
    expiry_policy: ExpiryPolicy,
    default_expires_in: Option<ExpiresIn>,
}

impl Codec {
    /// Create a codec for `algorithm` that ignores deadlines on decode.
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    /// Build a codec from loaded configuration.
    pub fn from_config(cfg: &CodecConfig) -> Self {
        Self {
            algorithm: cfg.algorithm,
            expiry_policy: cfg.expiry_policy,
            default_expires_in: cfg.default_expires_in(),
        }
    }

    /// Set whether `decode` enforces token deadlines.
    pub fn with_expiry_policy(mut self, policy: ExpiryPolicy) -> Self {
        self.expiry_policy = policy;
        self
    }

    /// Lifetime applied when an `encode` call does not specify one.
    pub fn with_default_expires_in(mut self, expires_in: impl Into<ExpiresIn>) -> Self {
        self.default_expires_in = Some(expires_in.into());
        self
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn expiry_policy(&self) -> ExpiryPolicy {
        self.expiry_policy
    }

    /// Encrypt `payload` into a token string.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Serialization`] if `payload` cannot be serialised
    /// to JSON, and [`TokenError::Key`] if `secret_key` is not [`KEY_LEN`] bytes.
    pub fn encode<T: Serialize + ?Sized>(
        &self,
        payload: &T,
        secret_key: &[u8],
        options: &EncodeOptions,
    ) -> Result<String, TokenError> {
        let plaintext = serde_json::to_vec(payload).map_err(TokenError::Serialization)?;
        let sealed = cipher::encrypt(self.algorithm, secret_key, plaintext).map_err(key_error)?;

        let deadline = options
            .expires_in
            .as_ref()
            .or(self.default_expires_in.as_ref())
            .map(expiry::calculate_expiration_time)
            .filter(|&deadline| deadline != 0);

        let salt = salt::generate_salt(&mut rand::thread_rng());
        let token = TokenParts::compose(&salt, &sealed.iv, &sealed.ciphertext, deadline);

        debug!(
            algorithm = self.algorithm.name(),
            expires = deadline.is_some(),
            "token encoded"
        );
        Ok(token)
    }

    /// Decrypt `token` and deserialise its payload.
    ///
    /// # Errors
    ///
    /// - [`TokenError::Format`] if the token structure is malformed.
    /// - [`TokenError::Key`] if `secret_key` is not [`KEY_LEN`] bytes.
    /// - [`TokenError::Parse`] if the decrypted bytes are not valid JSON for `T`
    ///   (the usual outcome of decrypting with the wrong key).
    /// - [`TokenError::Integrity`] if the authenticated algorithm rejects the ciphertext.
    /// - [`TokenError::Expired`] if the expiry policy is
    ///   [`ExpiryPolicy::Enforce`] and the deadline has passed.
    pub fn decode<T: DeserializeOwned>(
        &self,
        token: &str,
        secret_key: &[u8],
    ) -> Result<T, TokenError> {
        self.decode_at(token, secret_key, expiry::unix_now())
    }

    /// Returns `true` iff [`Codec::decode`] succeeds for `token`.
    ///
    /// Failures are logged at `warn` and otherwise swallowed. Callers that need
    /// the failure reason must use [`Codec::decode`].
    pub fn verify(&self, token: &str, secret_key: &[u8]) -> bool {
        match self.decode::<serde_json::Value>(token, secret_key) {
            Ok(_) => true,
            Err(e) => {
                warn!(code = e.code(), error = %e, "token verification failed");
                false
            }
        }
    }

    pub(crate) fn decode_at<T: DeserializeOwned>(
        &self,
        token: &str,
        secret_key: &[u8],
        now: u64,
    ) -> Result<T, TokenError> {
        let parts = TokenParts::parse(token, self.algorithm.iv_len())?;
        let deadline = match self.expiry_policy {
            ExpiryPolicy::Enforce => parts.deadline()?,
            ExpiryPolicy::Ignore => None,
        };

        let plaintext = Zeroizing::new(
            cipher::decrypt(self.algorithm, secret_key, &parts.iv, parts.ciphertext)
                .map_err(key_error)?,
        );
        let payload = serde_json::from_slice(&plaintext).map_err(TokenError::Parse)?;

        expiry::check(self.expiry_policy, deadline, now)?;
        Ok(payload)
    }
}

fn key_error(e: CipherError) -> TokenError {
    match e {
        CipherError::InvalidKeyLength(actual) => TokenError::Key {
            expected: KEY_LEN,
            actual,
        },
        CipherError::InvalidIvLength(_) => TokenError::Format("iv has the wrong length"),
        CipherError::AeadFailure => TokenError::Integrity,
    }
}
