//! Cosmetic token prefix.
//!
//! The salt only makes two tokens for the same payload look different at a
//! glance. It is never decoded, never mixed into the key, and carries no
//! uniqueness guarantee.

use rand::Rng;

/// Number of characters in the salt segment.
pub const SALT_LEN: usize = 8;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Draw a [`SALT_LEN`]-character string from `[a-zA-Z]`.
pub fn generate_salt<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..SALT_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn salt_is_eight_ascii_letters() {
        let salt = generate_salt(&mut rand::thread_rng());
        assert_eq!(salt.len(), SALT_LEN);
        assert!(salt.bytes().all(|b| b.is_ascii_alphabetic()));
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let a = generate_salt(&mut StdRng::seed_from_u64(7));
        let b = generate_salt(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn salts_vary() {
        let mut rng = StdRng::seed_from_u64(42);
        let salts: std::collections::HashSet<_> =
            (0..32).map(|_| generate_salt(&mut rng)).collect();
        assert!(salts.len() > 1);
    }
}
