//! fwprotect Prelude
//!
//! Brings the commonly used types and traits into scope.
//!
//! # Example
//!
//! ```rust
//! use fwprotect::prelude::*;
//!
//! let payload = compose_payload(b"ABC", "v1");
//! assert_eq!(payload.len(), 6);
//! assert_eq!(padded_len(payload.len()), BLOCK_SIZE);
//! ```

pub use crate::error::FwProtectError;
pub use crate::keys::{KeyMaterial, DEFAULT_SECRETS_FILE};
pub use crate::package::{compose_payload, package, package_checked_version, Packager};
pub use crate::verify::{open, open_with, ReleasedFirmware};

// Re-export protocol types
pub use fwprotect_protocol::{
    padded_len, BinaryRead, BinaryWrite, BlobFormatError, FirmwareBlob, Metadata,
    PartialMetadata, BLOCK_SIZE, DEBUG_VERSION, IV_SIZE, MAX_PAYLOAD_LEN, METADATA_SIZE,
};

// Re-export crypto types
pub use fwprotect_crypto::{FirmwareSigner, RsaSigner, RsaVerifier, SymmetricKey};
