//! Session-stable wrapper names.
//!
//! A unique name is a short hash of the wrapper's scoped name and signature.
//! It only changes when the wrapper itself changes, so a foreign layer can
//! persist it and re-resolve the wrapper in a later session.

use sha1::{Digest, Sha1};

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Hashes `scoped_name` and `signature` into a base-36 identifier.
pub fn wrapper_unique_name(scoped_name: &str, signature: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(scoped_name.as_bytes());
    hasher.update([0]);
    hasher.update(signature.as_bytes());
    let digest = hasher.finalize();

    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    to_base36(u64::from_be_bytes(prefix))
}

fn to_base36(mut value: u64) -> String {
    let mut digits = Vec::with_capacity(13);
    loop {
        digits.push(ALPHABET[(value % 36) as usize]);
        value /= 36;
        if value == 0 {
            break;
        }
    }
    digits.reverse();
    digits.into_iter().map(char::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base36_digits() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn names_are_deterministic_and_signature_sensitive() {
        let a = wrapper_unique_name("Point::set_x", "(this Point *, int) -> void");
        let b = wrapper_unique_name("Point::set_x", "(this Point *, int) -> void");
        let c = wrapper_unique_name("Point::set_x", "(this Point *, double) -> void");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.len() <= 13);
        assert!(a.bytes().all(|byte| byte.is_ascii_alphanumeric()));
    }
}
