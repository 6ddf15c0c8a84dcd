//! Error types and encode options shared across `securify` crates.

pub mod error;
pub mod options;

pub use error::TokenError;
pub use options::{EncodeOptions, ExpiresIn};
