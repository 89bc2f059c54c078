//! # Secret Commitment
//!
//! Random secret generation, SHA-256 hashlocks and constant-time
//! verification.

use crate::domain::{EscrowError, Hash, SecureSecret, DEFAULT_SECRET_LEN, MIN_SECRET_LEN};
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// A freshly generated secret and its hashlock.
///
/// `Debug` never prints the secret (see [`SecureSecret`]).
#[derive(Clone, Debug)]
pub struct SecretCommitment {
    /// Preimage. Held only by the coordinator until reveal.
    pub secret: SecureSecret,
    /// SHA-256 of `secret`, safe to publish.
    pub hash: Hash,
}

impl SecretCommitment {
    /// Generate a 32-byte secret from the OS-seeded CSPRNG.
    pub fn generate() -> Self {
        Self::random(DEFAULT_SECRET_LEN)
    }

    /// Generate a secret of `len` bytes.
    ///
    /// Fails with [`EscrowError::InvalidSecret`] below [`MIN_SECRET_LEN`].
    pub fn generate_with_len(len: usize) -> Result<Self, EscrowError> {
        if len < MIN_SECRET_LEN {
            return Err(EscrowError::InvalidSecret);
        }
        Ok(Self::random(len))
    }

    /// Commitment over a caller-supplied secret.
    pub fn from_secret(secret: SecureSecret) -> Self {
        let hash = hash_secret(secret.as_bytes());
        Self { secret, hash }
    }

    /// Check a candidate preimage against this commitment.
    pub fn verify(&self, candidate: &SecureSecret) -> bool {
        verify(candidate, &self.hash)
    }

    fn random(len: usize) -> Self {
        let mut bytes = vec![0u8; len];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self::from_secret(SecureSecret::from_checked(bytes))
    }
}

/// SHA-256 of raw bytes.
pub fn hash_secret(bytes: &[u8]) -> Hash {
    let digest = Sha256::digest(bytes);
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&digest);
    hash
}

/// Recompute the digest of `secret` and compare it to `hash` in constant time.
pub fn verify(secret: &SecureSecret, hash: &Hash) -> bool {
    let computed = hash_secret(secret.as_bytes());
    computed[..].ct_eq(&hash[..]).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_generate_default_length() {
        let c = SecretCommitment::generate();
        assert_eq!(c.secret.len(), DEFAULT_SECRET_LEN);
        assert_eq!(c.hash, hash_secret(c.secret.as_bytes()));
    }

    #[test]
    fn test_generate_unique() {
        let a = SecretCommitment::generate();
        let b = SecretCommitment::generate();
        assert_ne!(a.secret, b.secret);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn test_generate_with_len() {
        assert_eq!(SecretCommitment::generate_with_len(64).unwrap().secret.len(), 64);
        assert!(matches!(
            SecretCommitment::generate_with_len(0),
            Err(EscrowError::InvalidSecret)
        ));
        assert!(matches!(
            SecretCommitment::generate_with_len(MIN_SECRET_LEN - 1),
            Err(EscrowError::InvalidSecret)
        ));
    }

    #[test]
    fn test_known_digest() {
        // SHA-256 of 32 zero bytes
        let hash = hash_secret(&[0u8; 32]);
        assert_eq!(
            hex::encode(hash),
            "66687aadf862bd776c8fc18b8e9f8e20089714856ee233b3902a591d0d5f2925"
        );
    }

    #[test]
    fn test_verify_rejects_wrong_hash() {
        let c = SecretCommitment::generate();
        let mut wrong = c.hash;
        wrong[31] ^= 1;
        assert!(c.verify(&c.secret));
        assert!(!verify(&c.secret, &wrong));
    }

    #[test]
    fn test_debug_does_not_leak() {
        let c = SecretCommitment::from_secret(SecureSecret::new(vec![0x5A; 32]).unwrap());
        let out = format!("{:?}", c);
        assert!(!out.contains(&hex::encode(c.secret.as_bytes())));
        assert!(out.contains("***"));
    }

    proptest! {
        #[test]
        fn prop_verify_own_hash(bytes in proptest::collection::vec(any::<u8>(), 16..96)) {
            let secret = SecureSecret::new(bytes).unwrap();
            prop_assert!(verify(&secret, &hash_secret(secret.as_bytes())));
        }

        #[test]
        fn prop_verify_distinct_secrets(
            a in proptest::collection::vec(any::<u8>(), 16..64),
            b in proptest::collection::vec(any::<u8>(), 16..64),
        ) {
            prop_assume!(a != b);
            let sa = SecureSecret::new(a).unwrap();
            let sb = SecureSecret::new(b).unwrap();
            prop_assert!(!verify(&sa, &hash_secret(sb.as_bytes())));
        }
    }
}
