//! Salted one-way credential hashing.
//!
//! Verification never compares the raw secret: a fresh random salt is drawn
//! for every registration/change and the stored digest is recomputed from the
//! stored salt at verification time.

use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;

/// Salted SHA-256 credential: `digest = SHA-256(salt ‖ password)`.
///
/// The exact digest function is not load-bearing for callers; only that it is
/// one-way and salted. This type never serializes outside the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordHash {
    salt: [u8; SALT_LEN],
    digest: [u8; 32],
}

impl PasswordHash {
    /// Hash a password under a freshly drawn random salt.
    pub fn new(password: &str) -> Self {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        let digest = Self::digest_with(&salt, password);
        Self { salt, digest }
    }

    /// Recompute the digest with the stored salt and compare.
    pub fn verify(&self, password: &str) -> bool {
        Self::digest_with(&self.salt, password) == self.digest
    }

    fn digest_with(salt: &[u8; SALT_LEN], password: &str) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(password.as_bytes());
        hasher.finalize().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_the_original_password() {
        let hash = PasswordHash::new("s3cret");
        assert!(hash.verify("s3cret"));
    }

    #[test]
    fn verify_rejects_a_wrong_password() {
        let hash = PasswordHash::new("s3cret");
        assert!(!hash.verify("S3cret"));
        assert!(!hash.verify(""));
    }

    #[test]
    fn salts_are_unique_per_hash() {
        let a = PasswordHash::new("same");
        let b = PasswordHash::new("same");
        // Same password, different salt, different digest.
        assert_ne!(a, b);
        assert!(a.verify("same"));
        assert!(b.verify("same"));
    }
}
