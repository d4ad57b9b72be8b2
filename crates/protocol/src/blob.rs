//! Protected firmware blob layout
//!
//! ```text
//! | signature (key dependent) | metadata (6) | iv (16) | ciphertext (ciphertext_length) |
//! ```
//!
//! The signature width depends on the signing key's modulus and is not
//! recorded in the blob; readers must be told it out-of-band.

use crate::binary::{read_bytes, write_bytes, BinaryRead, BinaryWrite};
use crate::metadata::Metadata;
use crate::{IV_SIZE, METADATA_SIZE};
use std::io::{self, Cursor, Write};
use thiserror::Error;

/// Errors raised while decoding a blob
#[derive(Debug, Error)]
pub enum BlobFormatError {
    #[error("Blob truncated: need at least {needed} bytes, got {got}")]
    Truncated { needed: usize, got: usize },

    #[error("Ciphertext length mismatch: metadata records {recorded}, blob carries {actual}")]
    LengthMismatch { recorded: usize, actual: usize },

    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    #[error("Blob I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A complete protected firmware blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareBlob {
    pub signature: Vec<u8>,
    pub metadata: Metadata,
    pub iv: [u8; IV_SIZE],
    pub ciphertext: Vec<u8>,
}

impl FirmwareBlob {
    /// Decode a blob whose signature occupies the first `signature_len` bytes
    pub fn parse(bytes: &[u8], signature_len: usize) -> Result<Self, BlobFormatError> {
        let header_len = match signature_len.checked_add(METADATA_SIZE + IV_SIZE) {
            Some(len) => len,
            None => {
                return Err(BlobFormatError::InvalidMetadata(format!(
                    "signature length {} is out of range",
                    signature_len
                )))
            }
        };
        if bytes.len() < header_len {
            return Err(BlobFormatError::Truncated {
                needed: header_len,
                got: bytes.len(),
            });
        }

        let mut reader = Cursor::new(bytes);
        let signature = read_bytes(&mut reader, signature_len)?;
        let metadata = Metadata::read_from(&mut reader)?;
        let mut iv = [0u8; IV_SIZE];
        io::Read::read_exact(&mut reader, &mut iv)?;

        let ciphertext = &bytes[header_len..];
        let recorded = metadata.ciphertext_length as usize;
        if ciphertext.len() != recorded {
            return Err(BlobFormatError::LengthMismatch {
                recorded,
                actual: ciphertext.len(),
            });
        }
        metadata.validate()?;

        Ok(Self {
            signature,
            metadata,
            iv,
            ciphertext: ciphertext.to_vec(),
        })
    }

    /// The exact bytes covered by the signature: `metadata ‖ iv ‖ ciphertext`
    pub fn signed_region(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(METADATA_SIZE + IV_SIZE + self.ciphertext.len());
        out.extend_from_slice(&self.metadata.to_bytes());
        out.extend_from_slice(&self.iv);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Serialize to `signature ‖ metadata ‖ iv ‖ ciphertext`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.serialized_size());
        out.extend_from_slice(&self.signature);
        out.extend_from_slice(&self.signed_region());
        out
    }
}

impl BinaryWrite for FirmwareBlob {
    fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write_bytes(writer, &self.signature)?;
        self.metadata.write_to(writer)?;
        write_bytes(writer, &self.iv)?;
        write_bytes(writer, &self.ciphertext)
    }

    fn serialized_size(&self) -> usize {
        self.signature.len() + METADATA_SIZE + IV_SIZE + self.ciphertext.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::PartialMetadata;

    fn sample_blob() -> FirmwareBlob {
        FirmwareBlob {
            signature: vec![0xAA; 128],
            metadata: PartialMetadata::new(1, 6).extend(16),
            iv: [0x11; IV_SIZE],
            ciphertext: vec![0x22; 16],
        }
    }

    #[test]
    fn test_layout_offsets() {
        let blob = sample_blob();
        let bytes = blob.to_bytes();
        assert_eq!(bytes.len(), 128 + 6 + 16 + 16);
        assert_eq!(&bytes[..128], blob.signature.as_slice());
        // version = 1, plaintext_length = 6, ciphertext_length = 16
        assert_eq!(&bytes[128..134], &[1, 0, 6, 0, 16, 0]);
        assert_eq!(&bytes[134..150], &blob.iv);
        assert_eq!(&bytes[150..], blob.ciphertext.as_slice());
    }

    #[test]
    fn test_write_to_matches_to_bytes() {
        let blob = sample_blob();
        let mut buf = Vec::new();
        blob.write_to(&mut buf).unwrap();
        assert_eq!(buf, blob.to_bytes());
        assert_eq!(buf.len(), blob.serialized_size());
    }

    #[test]
    fn test_signed_region_excludes_signature() {
        let blob = sample_blob();
        let region = blob.signed_region();
        assert_eq!(region.len(), 6 + 16 + 16);
        assert_eq!(&blob.to_bytes()[128..], region.as_slice());
    }

    #[test]
    fn test_parse() {
        let blob = sample_blob();
        let parsed = FirmwareBlob::parse(&blob.to_bytes(), 128).unwrap();
        assert_eq!(parsed, blob);
    }

    #[test]
    fn test_parse_truncated() {
        let bytes = sample_blob().to_bytes();
        let result = FirmwareBlob::parse(&bytes[..100], 128);
        assert!(matches!(
            result,
            Err(BlobFormatError::Truncated { needed: 150, got: 100 })
        ));
    }

    #[test]
    fn test_parse_length_mismatch() {
        let mut bytes = sample_blob().to_bytes();
        bytes.extend_from_slice(&[0u8; 16]);
        let result = FirmwareBlob::parse(&bytes, 128);
        assert!(matches!(
            result,
            Err(BlobFormatError::LengthMismatch {
                recorded: 16,
                actual: 32
            })
        ));
    }

    #[test]
    fn test_parse_oversized_signature_len() {
        let bytes = [0u8; 200];
        assert!(matches!(
            FirmwareBlob::parse(&bytes, usize::MAX - 4),
            Err(BlobFormatError::InvalidMetadata(_))
        ));
        assert!(matches!(
            FirmwareBlob::parse(&bytes, usize::MAX - METADATA_SIZE - IV_SIZE),
            Err(BlobFormatError::Truncated { .. })
        ));
    }

    #[test]
    fn test_parse_wrong_signature_width() {
        // Reading with the wrong signature width shifts every field
        let bytes = sample_blob().to_bytes();
        assert!(FirmwareBlob::parse(&bytes, 256).is_err());
        assert!(FirmwareBlob::parse(&bytes, 64).is_err());
    }
}
