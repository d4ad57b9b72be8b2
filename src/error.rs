//! Unified error type for the fwprotect public API
//!
//! Lower crates keep their domain-specific errors. This type gathers them so
//! a packaging call has a single failure type to report.
//!
//! # Example
//!
//! ```no_run
//! use fwprotect::FwProtectError;
//!
//! fn build_release() -> Result<(), FwProtectError> {
//!     // All packaging operations return FwProtectError
//!     Ok(())
//! }
//! ```

use fwprotect_crypto::{CryptoError, KeyError, SignError};
use fwprotect_protocol::BlobFormatError;
use thiserror::Error;

/// Unified error type for all packaging operations
///
/// Every variant is fatal to the invocation that raised it: no partial blob
/// is ever returned alongside an error.
///
/// # Error Categories
///
/// - **CapacityExceeded**: payload does not fit the 16-bit length fields
/// - **KeyMaterialCorrupt**: key file missing, truncated, or unparseable
/// - **SigningError**: the signature operation rejected the key or digest
/// - **Io**: reading firmware or writing the blob failed
#[derive(Debug, Error)]
pub enum FwProtectError {
    /// Firmware plus release message is too large for the wire format
    #[error("Payload of {len} bytes exceeds capacity of {max} bytes")]
    CapacityExceeded { len: usize, max: usize },

    /// Key material could not be read or parsed
    #[error("Key material corrupt: {0}")]
    KeyMaterialCorrupt(String),

    /// Signature operation failed
    #[error("Signing error: {0}")]
    SigningError(#[from] SignError),

    /// Firmware or blob file I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A length did not match what the cipher or padding requires
    #[error("Invalid length: {0}")]
    InvalidLength(String),

    /// Version number does not fit the 16-bit version field
    #[error("Version {0} out of range 0..=65535")]
    VersionOutOfRange(i64),

    /// Signature over the blob did not verify
    #[error("Blob signature verification failed")]
    VerificationFailed,

    /// Blob bytes do not follow the expected layout
    #[error("Blob format error: {0}")]
    BlobFormat(#[from] BlobFormatError),

    /// Cipher operation failed
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

impl From<KeyError> for FwProtectError {
    fn from(e: KeyError) -> Self {
        FwProtectError::KeyMaterialCorrupt(e.to_string())
    }
}

impl FwProtectError {
    /// Returns a suggestion for resolving this error
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::CapacityExceeded { .. } => {
                Some("Shrink the firmware image or shorten the release message")
            }
            Self::KeyMaterialCorrupt(_) => {
                Some("Re-run key provisioning to regenerate the secrets file")
            }
            Self::VersionOutOfRange(_) => Some("Use a version between 0 (debug) and 65535"),
            Self::VerificationFailed => {
                Some("The blob was modified or was signed with a different key")
            }
            _ => None,
        }
    }

    /// Returns true if the error concerns key material or signing
    pub fn is_key_error(&self) -> bool {
        matches!(self, Self::KeyMaterialCorrupt(_) | Self::SigningError(_))
    }

    /// Returns true if the payload was too large for the wire format
    pub fn is_capacity_error(&self) -> bool {
        matches!(self, Self::CapacityExceeded { .. })
    }
}
