//! Host-side blob verification
//!
//! Performs the same checks a bootloader does, so a build can confirm the
//! blob it just wrote is sound: recompute the digest over
//! `metadata ‖ iv ‖ ciphertext`, verify the signature, decrypt, strip the
//! padding, and truncate to `plaintext_length`.

use crate::error::FwProtectError;
use crate::keys::KeyMaterial;
use fwprotect_crypto::{decrypt_cbc, sha256, Iv, RsaVerifier, SymmetricKey, Zeroizing};
use fwprotect_protocol::{BlobFormatError, FirmwareBlob};
use tracing::debug;

/// Payload recovered from a verified blob
pub struct ReleasedFirmware {
    version: u16,
    payload: Zeroizing<Vec<u8>>,
}

impl ReleasedFirmware {
    pub fn version(&self) -> u16 {
        self.version
    }

    pub fn is_debug(&self) -> bool {
        self.version == fwprotect_protocol::DEBUG_VERSION
    }

    /// The full payload `firmware ‖ message ‖ 0x00`
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Split the payload into firmware and release message
    ///
    /// Firmware may itself contain NUL bytes, so the boundary has to be
    /// supplied. Returns `None` if `firmware_len` is out of range or the
    /// message is not valid UTF-8.
    pub fn split_message(&self, firmware_len: usize) -> Option<(&[u8], &str)> {
        let body = &self.payload[..self.payload.len() - 1];
        if firmware_len > body.len() {
            return None;
        }
        let (firmware, message) = body.split_at(firmware_len);
        std::str::from_utf8(message)
            .ok()
            .map(|message| (firmware, message))
    }
}

/// Verify and decrypt a blob with the keys from a secrets file
pub fn open(bytes: &[u8], keys: &KeyMaterial) -> Result<ReleasedFirmware, FwProtectError> {
    open_with(bytes, keys.symmetric(), &keys.signer().verifier())
}

/// Verify and decrypt a blob with an explicit key and public key
pub fn open_with(
    bytes: &[u8],
    key: &SymmetricKey,
    verifier: &RsaVerifier,
) -> Result<ReleasedFirmware, FwProtectError> {
    let blob = FirmwareBlob::parse(bytes, verifier.signature_len())?;
    let digest = sha256(&[blob.signed_region().as_slice()]);
    verifier
        .verify_digest(&digest, &blob.signature)
        .map_err(|_| FwProtectError::VerificationFailed)?;
    debug!(
        version = blob.metadata.version,
        ciphertext_length = blob.metadata.ciphertext_length,
        "Blob signature verified"
    );

    let mut payload = decrypt_cbc(key, &Iv::from(blob.iv), &blob.ciphertext)?;
    let plaintext_length = blob.metadata.plaintext_length as usize;
    if payload.len() < plaintext_length {
        return Err(BlobFormatError::InvalidMetadata(format!(
            "decrypted {} bytes, metadata records {}",
            payload.len(),
            plaintext_length
        ))
        .into());
    }
    payload.truncate(plaintext_length);
    if payload.last() != Some(&0) {
        return Err(
            BlobFormatError::InvalidMetadata("payload is not NUL-terminated".to_string()).into(),
        );
    }

    Ok(ReleasedFirmware {
        version: blob.metadata.version,
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::package;
    use crate::testing::key_material;
    use fwprotect_crypto::FirmwareSigner;

    #[test]
    fn test_open_recovers_payload() {
        let keys = key_material();
        let blob = package(b"ABC", 1, "v1", &keys).unwrap();

        let released = open(&blob, &keys).unwrap();
        assert_eq!(released.version(), 1);
        assert!(!released.is_debug());
        assert_eq!(released.payload(), b"ABCv1\0");
        assert_eq!(released.split_message(3), Some((&b"ABC"[..], "v1")));
    }

    #[test]
    fn test_split_message_bounds() {
        let keys = key_material();
        let blob = package(b"A\0C", 0, "", &keys).unwrap();
        let released = open(&blob, &keys).unwrap();

        assert!(released.is_debug());
        assert_eq!(released.split_message(3), Some((&b"A\0C"[..], "")));
        assert_eq!(released.split_message(4), None);
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let keys = key_material();
        let mut blob = package(b"ABC", 1, "v1", &keys).unwrap();
        blob[0] ^= 0x01;
        assert!(matches!(
            open(&blob, &keys),
            Err(FwProtectError::VerificationFailed)
        ));
    }

    #[test]
    fn test_tampered_version_rejected() {
        let keys = key_material();
        let mut blob = package(b"ABC", 1, "v1", &keys).unwrap();
        let offset = keys.signer().signature_len();
        blob[offset] = 2;
        assert!(matches!(
            open(&blob, &keys),
            Err(FwProtectError::VerificationFailed)
        ));
    }

    #[test]
    fn test_truncated_blob_rejected() {
        let keys = key_material();
        let blob = package(b"ABC", 1, "v1", &keys).unwrap();
        assert!(matches!(
            open(&blob[..blob.len() - 1], &keys),
            Err(FwProtectError::BlobFormat(_))
        ));
        assert!(matches!(
            open(&blob[..10], &keys),
            Err(FwProtectError::BlobFormat(BlobFormatError::Truncated { .. }))
        ));
    }
}
