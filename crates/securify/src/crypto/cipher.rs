//! AES-256 encryption and decryption of serialised token payloads.
//!
//! **Default algorithm:** AES-256-CTR with a 128-bit big-endian counter that
//! spans the whole 16-byte IV (the OpenSSL `aes-256-ctr` construction). CTR is a
//! pure keystream: ciphertext length equals plaintext length and there is no
//! authentication tag, so a wrong key decrypts "successfully" to garbage.
//!
//! **Authenticated variant:** AES-256-GCM-SIV (RFC 8452) with a 96-bit nonce
//! and a 16-byte tag appended to the ciphertext. Only used when a codec is
//! explicitly constructed with [`Algorithm::Aes256GcmSiv`].

use aes::Aes256;
use aes_gcm_siv::{
    aead::{Aead, KeyInit},
    Aes256GcmSiv, Nonce,
};
use ctr::cipher::{KeyIvInit, StreamCipher};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of the AES-CTR initialisation vector (one AES block).
pub const CTR_IV_LEN: usize = 16;

/// Byte length of an AES-GCM-SIV nonce (12 bytes = 96 bits).
pub const GCM_SIV_NONCE_LEN: usize = 12;

/// Cipher used to seal the token body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    /// Unauthenticated AES-256 in counter mode.
    #[default]
    #[serde(rename = "aes-256-ctr")]
    Aes256Ctr,
    /// Authenticated, nonce-misuse-resistant AES-256-GCM-SIV.
    #[serde(rename = "aes-256-gcm-siv")]
    Aes256GcmSiv,
}

impl Algorithm {
    /// Canonical lowercase name, as accepted in configuration.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Aes256Ctr => "aes-256-ctr",
            Algorithm::Aes256GcmSiv => "aes-256-gcm-siv",
        }
    }

    /// Length of the IV (or nonce) that prefixes the ciphertext in a token body.
    pub fn iv_len(self) -> usize {
        match self {
            Algorithm::Aes256Ctr => CTR_IV_LEN,
            Algorithm::Aes256GcmSiv => GCM_SIV_NONCE_LEN,
        }
    }
}

/// IV and ciphertext produced by one [`encrypt`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    /// Fresh random IV (or nonce), [`Algorithm::iv_len`] bytes.
    pub iv: Vec<u8>,
    /// Ciphertext, with the authentication tag appended for GCM-SIV.
    pub ciphertext: Vec<u8>,
}

/// Errors produced by the cipher layer.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The key is the wrong length (must be [`KEY_LEN`] bytes).
    #[error("invalid key length: expected {KEY_LEN} bytes, got {0}")]
    InvalidKeyLength(usize),

    /// The IV does not match [`Algorithm::iv_len`].
    #[error("invalid iv length: got {0} bytes")]
    InvalidIvLength(usize),

    /// AES-GCM-SIV encryption or decryption failed.
    #[error("aead operation failed")]
    AeadFailure,
}

/// Encrypt `plaintext` under `key` with a freshly generated IV.
///
/// The IV comes from the OS CSPRNG on every call and is never reused. For CTR
/// the plaintext buffer is encrypted in place and returned as the ciphertext.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKeyLength`] if `key` is not [`KEY_LEN`] bytes.
/// Returns [`CipherError::AeadFailure`] on an internal AEAD error.
pub fn encrypt(
    algorithm: Algorithm,
    key: &[u8],
    mut plaintext: Vec<u8>,
) -> Result<Sealed, CipherError> {
    check_key(key)?;

    let mut iv = vec![0u8; algorithm.iv_len()];
    OsRng.fill_bytes(&mut iv);

    let ciphertext = match algorithm {
        Algorithm::Aes256Ctr => {
            build_ctr(key, &iv)?.apply_keystream(&mut plaintext);
            plaintext
        }
        Algorithm::Aes256GcmSiv => build_gcm_siv(key)?
            .encrypt(Nonce::from_slice(&iv), plaintext.as_slice())
            .map_err(|_| CipherError::AeadFailure)?,
    };

    Ok(Sealed { iv, ciphertext })
}

/// Decrypt `ciphertext` that was sealed under `key` and `iv`.
///
/// With [`Algorithm::Aes256Ctr`] this never fails for a correctly sized key
/// and IV; a wrong key simply yields garbage bytes.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKeyLength`] if `key` is not [`KEY_LEN`] bytes.
/// Returns [`CipherError::InvalidIvLength`] if `iv` does not match the algorithm.
/// Returns [`CipherError::AeadFailure`] if GCM-SIV authentication fails (wrong key or tampered data).
pub fn decrypt(
    algorithm: Algorithm,
    key: &[u8],
    iv: &[u8],
    mut ciphertext: Vec<u8>,
) -> Result<Vec<u8>, CipherError> {
    check_key(key)?;
    if iv.len() != algorithm.iv_len() {
        return Err(CipherError::InvalidIvLength(iv.len()));
    }

    match algorithm {
        Algorithm::Aes256Ctr => {
            build_ctr(key, iv)?.apply_keystream(&mut ciphertext);
            Ok(ciphertext)
        }
        Algorithm::Aes256GcmSiv => build_gcm_siv(key)?
            .decrypt(Nonce::from_slice(iv), ciphertext.as_slice())
            .map_err(|_| CipherError::AeadFailure),
    }
}

fn check_key(key: &[u8]) -> Result<(), CipherError> {
    if key.len() != KEY_LEN {
        return Err(CipherError::InvalidKeyLength(key.len()));
    }
    Ok(())
}

fn build_ctr(key: &[u8], iv: &[u8]) -> Result<Aes256Ctr, CipherError> {
    Aes256Ctr::new_from_slices(key, iv).map_err(|_| CipherError::InvalidIvLength(iv.len()))
}

fn build_gcm_siv(key: &[u8]) -> Result<Aes256GcmSiv, CipherError> {
    Aes256GcmSiv::new_from_slice(key).map_err(|_| CipherError::InvalidKeyLength(key.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn random_key() -> Vec<u8> {
        let mut key = vec![0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        key
    }

    #[test]
    fn ctr_matches_sp800_38a_vector() {
        // NIST SP 800-38A, F.5.5 CTR-AES256.Encrypt, first two blocks.
        let key = hex::decode("603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4")
            .unwrap();
        let iv = hex::decode("f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff").unwrap();
        let plaintext =
            hex::decode("6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51")
                .unwrap();

        let mut buf = plaintext.clone();
        build_ctr(&key, &iv).unwrap().apply_keystream(&mut buf);
        assert_eq!(
            hex::encode(&buf),
            "601ec313775789a5b7a7f504bbf3d228f443e3ca4d62b59aca84e990cacaf5c5"
        );

        let decrypted = decrypt(Algorithm::Aes256Ctr, &key, &iv, buf).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn ctr_round_trip_preserves_length() {
        let key = random_key();
        let sealed = encrypt(Algorithm::Aes256Ctr, &key, b"{\"userId\":\"1\"}".to_vec()).unwrap();
        assert_eq!(sealed.iv.len(), CTR_IV_LEN);
        assert_eq!(sealed.ciphertext.len(), 14);
        let plaintext =
            decrypt(Algorithm::Aes256Ctr, &key, &sealed.iv, sealed.ciphertext).unwrap();
        assert_eq!(plaintext, b"{\"userId\":\"1\"}");
    }

    #[test]
    fn ctr_wrong_key_yields_garbage() {
        let sealed = encrypt(Algorithm::Aes256Ctr, &random_key(), b"secret".to_vec()).unwrap();
        let garbage =
            decrypt(Algorithm::Aes256Ctr, &random_key(), &sealed.iv, sealed.ciphertext).unwrap();
        assert_ne!(garbage, b"secret");
    }

    #[test]
    fn fresh_iv_per_call() {
        let key = random_key();
        let a = encrypt(Algorithm::Aes256Ctr, &key, b"same".to_vec()).unwrap();
        let b = encrypt(Algorithm::Aes256Ctr, &key, b"same".to_vec()).unwrap();
        assert_ne!(a.iv, b.iv);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn gcm_siv_round_trip() {
        let key = random_key();
        let sealed = encrypt(Algorithm::Aes256GcmSiv, &key, b"hello".to_vec()).unwrap();
        assert_eq!(sealed.iv.len(), GCM_SIV_NONCE_LEN);
        assert_eq!(sealed.ciphertext.len(), 5 + 16);
        let plaintext =
            decrypt(Algorithm::Aes256GcmSiv, &key, &sealed.iv, sealed.ciphertext).unwrap();
        assert_eq!(plaintext, b"hello");
    }

    #[test]
    fn gcm_siv_tampered_ciphertext_fails_auth() {
        let key = random_key();
        let mut sealed = encrypt(Algorithm::Aes256GcmSiv, &key, b"tamper me".to_vec()).unwrap();
        sealed.ciphertext[0] ^= 0xFF;
        assert!(matches!(
            decrypt(Algorithm::Aes256GcmSiv, &key, &sealed.iv, sealed.ciphertext),
            Err(CipherError::AeadFailure)
        ));
    }

    #[test]
    fn invalid_key_length_rejected() {
        for alg in [Algorithm::Aes256Ctr, Algorithm::Aes256GcmSiv] {
            assert!(matches!(
                encrypt(alg, &[0u8; 16], b"x".to_vec()),
                Err(CipherError::InvalidKeyLength(16))
            ));
            assert!(matches!(
                decrypt(alg, &[0u8; 33], &vec![0u8; alg.iv_len()], vec![]),
                Err(CipherError::InvalidKeyLength(33))
            ));
        }
    }

    #[test]
    fn invalid_iv_length_rejected() {
        let key = random_key();
        assert!(matches!(
            decrypt(Algorithm::Aes256Ctr, &key, &[0u8; 12], vec![1, 2, 3]),
            Err(CipherError::InvalidIvLength(12))
        ));
    }

    #[test]
    fn algorithm_names_round_trip_through_serde() {
        for alg in [Algorithm::Aes256Ctr, Algorithm::Aes256GcmSiv] {
            let json = serde_json::to_string(&alg).unwrap();
            assert_eq!(json, format!("\"{}\"", alg.name()));
            let back: Algorithm = serde_json::from_str(&json).unwrap();
            assert_eq!(back, alg);
        }
        assert_eq!(Algorithm::default(), Algorithm::Aes256Ctr);
    }
}
