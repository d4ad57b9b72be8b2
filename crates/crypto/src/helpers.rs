//! Cryptographic helper functions
//!
//! IV generation, digests, and the shared error type for cipher operations.

use crate::types::Iv;
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid length: {0}")]
    InvalidLength(String),

    #[error("Invalid padding in decrypted payload")]
    Unpad,
}

/// Generate a fresh random IV from the operating system RNG
pub fn generate_iv() -> Iv {
    let mut iv = Iv::default();
    OsRng.fill_bytes(iv.as_mut_slice());
    iv
}

/// SHA-256 over the concatenation of `parts`
pub fn sha256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}
