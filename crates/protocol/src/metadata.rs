//! Firmware metadata record
//!
//! The metadata is built in two stages. Before encryption only the version
//! and the unpadded payload length are known ([`PartialMetadata`]); the
//! ciphertext length is appended once encryption has run, producing the
//! final [`Metadata`] that enters the digest and the blob.

use crate::binary::{read_u16_le, write_u16_le, BinaryRead, BinaryWrite};
use crate::blob::BlobFormatError;
use crate::{BLOCK_SIZE, DEBUG_VERSION, METADATA_SIZE};
use std::io::{self, Read, Write};

/// Metadata known before encryption
///
/// Has no byte representation of its own: it must be extended with the
/// ciphertext length before anything can be hashed or written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialMetadata {
    version: u16,
    plaintext_length: u16,
}

impl PartialMetadata {
    pub fn new(version: u16, plaintext_length: u16) -> Self {
        Self {
            version,
            plaintext_length,
        }
    }

    pub fn version(&self) -> u16 {
        self.version
    }

    pub fn plaintext_length(&self) -> u16 {
        self.plaintext_length
    }

    /// Complete the record with the length of the encrypted payload
    pub fn extend(self, ciphertext_length: u16) -> Metadata {
        Metadata {
            version: self.version,
            plaintext_length: self.plaintext_length,
            ciphertext_length,
        }
    }
}

/// Complete metadata record as it appears in the blob
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    /// Firmware version, 0 for debug builds
    pub version: u16,
    /// Payload length before padding
    pub plaintext_length: u16,
    /// Number of ciphertext bytes following the IV
    pub ciphertext_length: u16,
}

impl Metadata {
    /// Whether this blob carries a debug build
    pub fn is_debug(&self) -> bool {
        self.version == DEBUG_VERSION
    }

    /// Serialize to the fixed 6-byte wire representation
    pub fn to_bytes(&self) -> [u8; METADATA_SIZE] {
        let mut out = [0u8; METADATA_SIZE];
        out[0..2].copy_from_slice(&self.version.to_le_bytes());
        out[2..4].copy_from_slice(&self.plaintext_length.to_le_bytes());
        out[4..6].copy_from_slice(&self.ciphertext_length.to_le_bytes());
        out
    }

    /// Check the length fields are consistent with PKCS#7 padded CBC output
    ///
    /// The ciphertext must be a positive multiple of the block size, and
    /// padding always adds between 1 and `BLOCK_SIZE` bytes.
    pub fn validate(&self) -> Result<(), BlobFormatError> {
        let ct = self.ciphertext_length as usize;
        let pt = self.plaintext_length as usize;
        if ct == 0 || ct % BLOCK_SIZE != 0 {
            return Err(BlobFormatError::InvalidMetadata(format!(
                "ciphertext length {} is not a positive multiple of {}",
                ct, BLOCK_SIZE
            )));
        }
        if pt >= ct || ct - pt > BLOCK_SIZE {
            return Err(BlobFormatError::InvalidMetadata(format!(
                "plaintext length {} cannot pad to ciphertext length {}",
                pt, ct
            )));
        }
        Ok(())
    }
}

impl BinaryRead for Metadata {
    fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        let version = read_u16_le(reader)?;
        let plaintext_length = read_u16_le(reader)?;
        let ciphertext_length = read_u16_le(reader)?;
        Ok(Self {
            version,
            plaintext_length,
            ciphertext_length,
        })
    }
}

impl BinaryWrite for Metadata {
    fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write_u16_le(writer, self.version)?;
        write_u16_le(writer, self.plaintext_length)?;
        write_u16_le(writer, self.ciphertext_length)
    }

    fn serialized_size(&self) -> usize {
        METADATA_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_extend_keeps_partial_fields() {
        let partial = PartialMetadata::new(7, 6);
        let meta = partial.extend(16);
        assert_eq!(meta.version, 7);
        assert_eq!(meta.plaintext_length, 6);
        assert_eq!(meta.ciphertext_length, 16);
    }

    #[test]
    fn test_wire_layout() {
        let meta = PartialMetadata::new(0x0102, 0x0304).extend(0x0506);
        assert_eq!(meta.to_bytes(), [0x02, 0x01, 0x04, 0x03, 0x06, 0x05]);

        let mut buf = Vec::new();
        meta.write_to(&mut buf).unwrap();
        assert_eq!(buf.as_slice(), meta.to_bytes().as_slice());
        assert_eq!(buf.len(), meta.serialized_size());

        let parsed = Metadata::read_from(&mut Cursor::new(buf)).unwrap();
        assert_eq!(parsed, meta);
    }

    #[test]
    fn test_debug_version() {
        assert!(PartialMetadata::new(0, 1).extend(16).is_debug());
        assert!(!PartialMetadata::new(1, 1).extend(16).is_debug());
    }

    #[test]
    fn test_validate_lengths() {
        assert!(PartialMetadata::new(1, 6).extend(16).validate().is_ok());
        assert!(PartialMetadata::new(1, 16).extend(32).validate().is_ok());
        assert!(PartialMetadata::new(1, 65535).extend(65535).validate().is_err());

        // Zero-length ciphertext
        assert!(PartialMetadata::new(1, 0).extend(0).validate().is_err());
        // Not block aligned
        assert!(PartialMetadata::new(1, 6).extend(15).validate().is_err());
        // Plaintext as long as ciphertext leaves no room for padding
        assert!(PartialMetadata::new(1, 16).extend(16).validate().is_err());
        // More than one block of padding
        assert!(PartialMetadata::new(1, 6).extend(32).validate().is_err());
    }
}
