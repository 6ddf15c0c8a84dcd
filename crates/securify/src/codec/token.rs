//! Token string layout.
//!
//! ```text
//! <salt> "|" <hex(iv || ciphertext)> [ "|" <decimal epoch seconds> ]
//! ```
//!
//! The expiration segment is omitted entirely, never left empty, when the
//! token has no deadline.

use securify_common::TokenError;

/// Separator between token segments.
pub const SEPARATOR: char = '|';

/// A token split into its segments, with the body hex-decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenParts<'a> {
    /// Cosmetic prefix; not interpreted.
    pub salt: &'a str,
    /// Raw IV (or nonce) bytes.
    pub iv: Vec<u8>,
    /// Raw ciphertext bytes.
    pub ciphertext: Vec<u8>,
    /// Everything after the second separator, if present. Not validated until
    /// [`TokenParts::deadline`] is called.
    pub expiration: Option<&'a str>,
}

impl<'a> TokenParts<'a> {
    /// Render segments into the canonical token string.
    pub fn compose(salt: &str, iv: &[u8], ciphertext: &[u8], deadline: Option<u64>) -> String {
        let mut token = String::with_capacity(
            salt.len() + 1 + 2 * (iv.len() + ciphertext.len()) + deadline.map_or(0, |_| 21),
        );
        token.push_str(salt);
        token.push(SEPARATOR);
        token.push_str(&hex::encode(iv));
        token.push_str(&hex::encode(ciphertext));
        if let Some(deadline) = deadline {
            token.push(SEPARATOR);
            token.push_str(&deadline.to_string());
        }
        token
    }

    /// Split `token` and decode its body, taking the first `iv_len` bytes as the IV.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Format`] if the body segment is missing, is not
    /// even-length hex, or is too short to contain an IV.
    pub fn parse(token: &'a str, iv_len: usize) -> Result<Self, TokenError> {
        let mut segments = token.splitn(3, SEPARATOR);
        let salt = segments.next().unwrap_or_default();
        let body = segments
            .next()
            .ok_or(TokenError::Format("missing body segment"))?;
        let expiration = segments.next();

        if body.len() < 2 * iv_len {
            return Err(TokenError::Format("body too short to contain an iv"));
        }
        let mut bytes =
            hex::decode(body).map_err(|_| TokenError::Format("body is not valid hex"))?;
        let ciphertext = bytes.split_off(iv_len);

        Ok(Self {
            salt,
            iv: bytes,
            ciphertext,
            expiration,
        })
    }

    /// Parse the expiration segment.
    ///
    /// Returns `None` when the segment is absent or holds `0`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Format`] if the segment is present but is not a
    /// plain decimal integer.
    pub fn deadline(&self) -> Result<Option<u64>, TokenError> {
        let Some(raw) = self.expiration else {
            return Ok(None);
        };
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TokenError::Format("expiration is not a decimal timestamp"));
        }
        let deadline = raw
            .parse::<u64>()
            .map_err(|_| TokenError::Format("expiration is out of range"))?;
        Ok((deadline != 0).then_some(deadline))
    }
}
