//! AES-256 primitives used to seal token bodies.
//!
//! This module knows nothing about the token string layout. It turns a
//! plaintext buffer into `(iv, ciphertext)` and back.
//!
//! # Key material
//!
//! Keys are borrowed for the duration of a single call and are never copied
//! into long-lived state or written to logs.

pub mod cipher;

pub use cipher::{Algorithm, CipherError, KEY_LEN};
