//! Zeroizing cryptographic key types
//!
//! Key material is wrapped so that memory is cleared on drop, on every exit
//! path including early returns through `?`.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// AES-128 key (16 bytes) that zeroizes on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey(pub(crate) [u8; 16]);

impl SymmetricKey {
    /// Create a new AES-128 key from a 16-byte slice
    pub fn from_slice(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != 16 {
            return Err(KeyError::InvalidLength {
                expected: 16,
                got: bytes.len(),
            });
        }
        let mut key = [0u8; 16];
        key.copy_from_slice(bytes);
        Ok(SymmetricKey(key))
    }

    /// Get a reference to the key bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SymmetricKey([REDACTED])")
    }
}

/// CBC initialization vector (one AES block)
///
/// Not secret, but must never repeat under the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Iv(pub(crate) [u8; 16]);

impl Iv {
    /// Create an IV from a 16-byte slice
    pub fn from_slice(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != 16 {
            return Err(KeyError::InvalidLength {
                expected: 16,
                got: bytes.len(),
            });
        }
        let mut iv = [0u8; 16];
        iv.copy_from_slice(bytes);
        Ok(Iv(iv))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn to_array(&self) -> [u8; 16] {
        self.0
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl From<[u8; 16]> for Iv {
    fn from(bytes: [u8; 16]) -> Self {
        Iv(bytes)
    }
}

/// Key-related errors
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("Invalid key length: expected {expected}, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("Key parse failed: {0}")]
    Parse(String),
}
