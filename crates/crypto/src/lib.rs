//! Firmware Protection Cryptographic Operations
//!
//! This crate provides the primitives used to seal a firmware update blob:
//! - Zeroizing symmetric key type that clears memory on drop
//! - AES-128-CBC encryption with PKCS#7 padding
//! - SHA-256 digests over the signed region of a blob
//! - RSA PKCS#1 v1.5 signing behind the [`FirmwareSigner`] trait
//!
//! # Example
//!
//! ```
//! use fwprotect_crypto::{decrypt_cbc, encrypt_cbc, generate_iv, SymmetricKey};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let key = SymmetricKey::from_slice(&[0x42; 16])?;
//! let iv = generate_iv();
//!
//! let ciphertext = encrypt_cbc(&key, &iv, b"firmware image")?;
//! assert_eq!(ciphertext.len() % 16, 0);
//!
//! let plaintext = decrypt_cbc(&key, &iv, &ciphertext)?;
//! assert_eq!(plaintext.as_slice(), b"firmware image");
//! # Ok(())
//! # }
//! ```

pub mod cipher;
pub mod helpers;
pub mod sign;
pub mod types;

// Re-export commonly used types
pub use cipher::{decrypt_cbc, encrypt_cbc};
pub use helpers::{generate_iv, sha256, CryptoError};
pub use sign::{FirmwareSigner, RsaSigner, RsaVerifier, SignError, VerifyError};
pub use types::{Iv, KeyError, SymmetricKey};

/// Re-exported so callers can hold secret buffers the same way this crate does
pub use zeroize::Zeroizing;
