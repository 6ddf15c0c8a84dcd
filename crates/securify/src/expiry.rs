//! Expiration deadlines: computed at encode time, optionally checked at decode time.
//!
//! A deadline is a Unix-epoch seconds value. `0` is reserved to mean "no
//! expiration" and is never written into a token.

use std::time::{SystemTime, UNIX_EPOCH};

use securify_common::{ExpiresIn, TokenError};
use serde::{Deserialize, Serialize};

/// Whether `decode` enforces the deadline stored in a token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryPolicy {
    /// The deadline is carried in the token but never checked.
    #[default]
    Ignore,
    /// `decode` fails with [`TokenError::Expired`] once `now > deadline`.
    Enforce,
}

/// Current wall-clock time in whole seconds since the Unix epoch.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Compute the deadline for `expires_in` relative to the current time.
///
/// Returns `0` ("no expiration") for a zero lifetime and for any duration
/// string that is not `<digits><unit>`. Unrecognised formats are not an error.
pub fn calculate_expiration_time(expires_in: &ExpiresIn) -> u64 {
    deadline_at(expires_in, unix_now())
}

/// Same as [`calculate_expiration_time`] with an explicit clock value.
pub fn deadline_at(expires_in: &ExpiresIn, now: u64) -> u64 {
    let offset = match expires_in {
        ExpiresIn::Seconds(secs) => Some(*secs),
        ExpiresIn::Duration(s) => parse_duration(s),
    };
    match offset {
        Some(0) | None => 0,
        Some(secs) => now.checked_add(secs).unwrap_or(0),
    }
}

/// Parse `^[0-9]+[smhd]$` into a number of seconds.
///
/// Counts that overflow `u64` once scaled are treated as unparseable.
pub fn parse_duration(s: &str) -> Option<u64> {
    let unit = s.chars().last()?;
    let multiplier = match unit {
        's' => 1,
        'm' => 60,
        'h' => 3_600,
        'd' => 86_400,
        _ => return None,
    };
    let digits = &s[..s.len() - 1];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u64>().ok()?.checked_mul(multiplier)
}

/// Check a parsed deadline against `now` under `policy`.
///
/// `None` (no expiration segment, or a `0` deadline) always passes.
pub(crate) fn check(
    policy: ExpiryPolicy,
    deadline: Option<u64>,
    now: u64,
) -> Result<(), TokenError> {
    match (policy, deadline) {
        (ExpiryPolicy::Enforce, Some(deadline)) if now > deadline => {
            Err(TokenError::Expired { deadline })
        }
        _ => Ok(()),
    }
}
