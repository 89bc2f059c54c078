//! # Secure Secret Type
//!
//! Hashlock preimage that zeroizes memory on drop.
//!
//! The secret is the only value that can unlock both legs of a swap, so it
//! must not linger in memory, show up in `Debug` output, or be logged.

use super::errors::EscrowError;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Minimum secret length in bytes (128 bits).
pub const MIN_SECRET_LEN: usize = 16;

/// Default secret length in bytes.
pub const DEFAULT_SECRET_LEN: usize = 32;

/// A secure secret that zeroizes on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureSecret {
    inner: Vec<u8>,
}

impl SecureSecret {
    /// Create from raw bytes.
    ///
    /// Fails with [`EscrowError::InvalidSecret`] if shorter than
    /// [`MIN_SECRET_LEN`].
    pub fn new(bytes: Vec<u8>) -> Result<Self, EscrowError> {
        if bytes.len() < MIN_SECRET_LEN {
            let mut bytes = bytes;
            bytes.zeroize();
            return Err(EscrowError::InvalidSecret);
        }
        Ok(Self { inner: bytes })
    }

    /// Wrap bytes whose length the caller already checked.
    pub(crate) fn from_checked(bytes: Vec<u8>) -> Self {
        debug_assert!(bytes.len() >= MIN_SECRET_LEN);
        Self { inner: bytes }
    }

    /// Create from a slice (copies).
    pub fn from_slice(slice: &[u8]) -> Result<Self, EscrowError> {
        Self::new(slice.to_vec())
    }

    /// Get the secret bytes (use carefully!).
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Always false for a constructed secret; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl std::fmt::Debug for SecureSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the actual secret
        f.write_str("SecureSecret(***)")
    }
}

// Hex on the wire; only ever serialized inside a withdrawal event, after the
// secret is already public on the destination ledger.
impl Serialize for SecureSecret {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&hex::encode(&self.inner))
    }
}

impl<'de> Deserialize<'de> for SecureSecret {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        Self::new(bytes).map_err(|_| serde::de::Error::custom("secret too short"))
    }
}
