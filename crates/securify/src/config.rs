//! Codec configuration loaded from the environment.
//!
//! All variables are optional and prefixed with `SECURIFY_`:
//!
//! | Variable | Values | Default |
//! |----------|--------|---------|
//! | `SECURIFY_ALGORITHM` | `aes-256-ctr`, `aes-256-gcm-siv` | `aes-256-ctr` |
//! | `SECURIFY_EXPIRY_POLICY` | `ignore`, `enforce` | `ignore` |
//! | `SECURIFY_DEFAULT_EXPIRES_IN` | seconds (`3600`) or duration (`1h`) | unset |
//!
//! The secret key is deliberately not part of this configuration. Key storage
//! belongs to the caller.

use anyhow::{Context, Result};
use securify_common::ExpiresIn;
use serde::Deserialize;

use crate::crypto::Algorithm;
use crate::expiry::{self, ExpiryPolicy};

/// Prefix shared by every environment variable this crate reads.
pub const ENV_PREFIX: &str = "SECURIFY";

/// Validated codec configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CodecConfig {
    /// Cipher used to seal token bodies.
    #[serde(default)]
    pub algorithm: Algorithm,

    /// Whether `decode` enforces embedded deadlines.
    #[serde(default)]
    pub expiry_policy: ExpiryPolicy,

    /// Lifetime applied when an `encode` call does not pass one.
    #[serde(default)]
    pub default_expires_in: Option<String>,
}

impl CodecConfig {
    /// Load and validate configuration from `SECURIFY_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an unknown value.
    pub fn from_env() -> Result<Self> {
        Self::load(config::Environment::with_prefix(ENV_PREFIX))
    }

    fn load(source: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(source)
            .build()
            .context("failed to build configuration from environment")?;

        let c: CodecConfig = cfg
            .try_deserialize()
            .context("failed to deserialise codec configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// The configured default lifetime, if any.
    pub fn default_expires_in(&self) -> Option<ExpiresIn> {
        self.default_expires_in
            .as_deref()
            .map(ExpiresIn::from_setting)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if let Some(expires_in) = self.default_expires_in() {
            // A zero offset would silently disable expiration.
            if expiry::deadline_at(&expires_in, 1) == 0 {
                anyhow::bail!(
                    "SECURIFY_DEFAULT_EXPIRES_IN must be a positive number of seconds or <digits><s|m|h|d>"
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = CodecConfig::load(env(&[])).unwrap();
        assert_eq!(cfg, CodecConfig::default());
        assert_eq!(cfg.algorithm, Algorithm::Aes256Ctr);
        assert_eq!(cfg.expiry_policy, ExpiryPolicy::Ignore);
        assert_eq!(cfg.default_expires_in(), None);
    }

    #[test]
    fn reads_all_variables() {
        let cfg = CodecConfig::load(env(&[
            ("SECURIFY_ALGORITHM", "aes-256-gcm-siv"),
            ("SECURIFY_EXPIRY_POLICY", "enforce"),
            ("SECURIFY_DEFAULT_EXPIRES_IN", "2h"),
        ]))
        .unwrap();
        assert_eq!(cfg.algorithm, Algorithm::Aes256GcmSiv);
        assert_eq!(cfg.expiry_policy, ExpiryPolicy::Enforce);
        assert_eq!(
            cfg.default_expires_in(),
            Some(ExpiresIn::Duration("2h".into()))
        );
    }

    #[test]
    fn numeric_default_expires_in_is_seconds() {
        let cfg = CodecConfig::load(env(&[("SECURIFY_DEFAULT_EXPIRES_IN", "900")])).unwrap();
        assert_eq!(cfg.default_expires_in(), Some(ExpiresIn::Seconds(900)));
    }

    #[test]
    fn rejects_unknown_algorithm() {
        assert!(CodecConfig::load(env(&[("SECURIFY_ALGORITHM", "rot13")])).is_err());
    }

    #[test]
    fn rejects_unknown_policy() {
        assert!(CodecConfig::load(env(&[("SECURIFY_EXPIRY_POLICY", "sometimes")])).is_err());
    }

    #[test]
    fn validate_rejects_unusable_default_expires_in() {
        for bad in ["0", "1x", "abc", ""] {
            let cfg = CodecConfig {
                default_expires_in: Some(bad.into()),
                ..CodecConfig::default()
            };
            assert!(cfg.validate().is_err(), "{bad:?}");
        }
    }

    #[test]
    fn codec_from_config() {
        use crate::Codec;
        let cfg = CodecConfig {
            algorithm: Algorithm::Aes256GcmSiv,
            expiry_policy: ExpiryPolicy::Enforce,
            default_expires_in: Some("1d".into()),
        };
        let codec = Codec::from_config(&cfg);
        assert_eq!(codec.algorithm(), Algorithm::Aes256GcmSiv);
        assert_eq!(codec.expiry_policy(), ExpiryPolicy::Enforce);
        assert_eq!(
            codec,
            Codec::new(Algorithm::Aes256GcmSiv)
                .with_expiry_policy(ExpiryPolicy::Enforce)
                .with_default_expires_in("1d")
        );
    }
}
