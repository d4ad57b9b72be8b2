//! Firmware Blob Protocol Types
//!
//! This crate describes the on-disk layout of a protected firmware update:
//!
//! ```text
//! signature ‖ metadata ‖ iv ‖ ciphertext
//! metadata = u16le(version) ‖ u16le(plaintext_length) ‖ u16le(ciphertext_length)
//! ```
//!
//! Field widths are protocol constants shared out-of-band with the bootloader;
//! none of them is stored in the blob itself.
//!
//! This crate contains NO cryptographic operations and NO file I/O.

pub mod binary;
pub mod blob;
pub mod metadata;

pub use binary::{BinaryRead, BinaryWrite};
pub use blob::{BlobFormatError, FirmwareBlob};
pub use metadata::{Metadata, PartialMetadata};

/// Cipher block size in bytes (AES)
pub const BLOCK_SIZE: usize = 16;

/// Initialization vector size in bytes (one cipher block)
pub const IV_SIZE: usize = BLOCK_SIZE;

/// Symmetric key size in bytes (AES-128)
pub const SYMMETRIC_KEY_SIZE: usize = 16;

/// Serialized metadata size: three little-endian `u16` fields
pub const METADATA_SIZE: usize = 6;

/// Largest value either 16-bit length field can hold
pub const MAX_FIELD_LEN: usize = u16::MAX as usize;

/// Largest payload (firmware ‖ message ‖ NUL) whose padded ciphertext still
/// fits the 16-bit `ciphertext_length` field
pub const MAX_PAYLOAD_LEN: usize = padded_len(MAX_FIELD_LEN) - BLOCK_SIZE - 1;

/// Version number reserved for debug builds
pub const DEBUG_VERSION: u16 = 0;

/// SHA-256 digest size in bytes
pub const DIGEST_SIZE: usize = 32;

/// Ciphertext length produced by PKCS#7 padding a payload of `len` bytes
///
/// Padding always adds between 1 and `BLOCK_SIZE` bytes.
pub const fn padded_len(len: usize) -> usize {
    (len / BLOCK_SIZE + 1) * BLOCK_SIZE
}
