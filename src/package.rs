//! Firmware packaging
//!
//! Turns a plaintext firmware image and release message into a signed,
//! encrypted blob:
//!
//! ```text
//! payload   = firmware ‖ message ‖ 0x00
//! metadata  = u16le(version) ‖ u16le(len(payload)) ‖ u16le(len(ciphertext))
//! blob      = sign(sha256(metadata ‖ iv ‖ ciphertext)) ‖ metadata ‖ iv ‖ ciphertext
//! ```

use crate::error::FwProtectError;
use crate::keys::KeyMaterial;
use fwprotect_crypto::{
    encrypt_cbc, generate_iv, sha256, FirmwareSigner, Iv, SignError, SymmetricKey, Zeroizing,
};
use fwprotect_protocol::{padded_len, FirmwareBlob, PartialMetadata, MAX_PAYLOAD_LEN};
use tracing::debug;

/// Build `firmware ‖ utf8(message) ‖ 0x00`
pub fn compose_payload(firmware: &[u8], message: &str) -> Zeroizing<Vec<u8>> {
    let mut payload = Zeroizing::new(Vec::with_capacity(firmware.len() + message.len() + 1));
    payload.extend_from_slice(firmware);
    payload.extend_from_slice(message.as_bytes());
    payload.push(0);
    payload
}

/// Packaging context over borrowed key material
///
/// Holds no mutable state, so one `Packager` (or several sharing the same
/// keys) can package different firmware versions concurrently. Each call
/// draws its own IV.
pub struct Packager<'a, S: FirmwareSigner> {
    key: &'a SymmetricKey,
    signer: &'a S,
}

impl<'a, S: FirmwareSigner> Packager<'a, S> {
    pub fn new(key: &'a SymmetricKey, signer: &'a S) -> Self {
        Packager { key, signer }
    }

    /// Encrypt and sign `firmware` with its release `message`
    pub fn package(
        &self,
        firmware: &[u8],
        version: u16,
        message: &str,
    ) -> Result<FirmwareBlob, FwProtectError> {
        let payload = compose_payload(firmware, message);
        self.seal(&payload, version, generate_iv())
    }

    fn seal(&self, payload: &[u8], version: u16, iv: Iv) -> Result<FirmwareBlob, FwProtectError> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(FwProtectError::CapacityExceeded {
                len: payload.len(),
                max: MAX_PAYLOAD_LEN,
            });
        }
        // Bounded by MAX_PAYLOAD_LEN above
        let plaintext_length = payload.len() as u16;
        let partial = PartialMetadata::new(version, plaintext_length);
        debug!(
            version,
            plaintext_length,
            padded_length = padded_len(payload.len()),
            "Encrypting firmware payload"
        );

        let ciphertext = encrypt_cbc(self.key, &iv, payload)?;
        let ciphertext_length = u16::try_from(ciphertext.len()).map_err(|_| {
            FwProtectError::InvalidLength(format!(
                "ciphertext of {} bytes does not fit the length field",
                ciphertext.len()
            ))
        })?;

        // Only the extended record is ever hashed
        let metadata = partial.extend(ciphertext_length);
        let digest = sha256(&[
            metadata.to_bytes().as_slice(),
            iv.as_slice(),
            ciphertext.as_slice(),
        ]);

        let signature = self.signer.sign_digest(&digest)?;
        if signature.len() != self.signer.signature_len() {
            return Err(FwProtectError::SigningError(SignError::Rejected(format!(
                "signature is {} bytes, expected {}",
                signature.len(),
                self.signer.signature_len()
            ))));
        }
        debug!(
            ciphertext_length,
            signature_length = signature.len(),
            "Signed firmware blob"
        );

        Ok(FirmwareBlob {
            signature,
            metadata,
            iv: iv.to_array(),
            ciphertext,
        })
    }
}

/// Package firmware into the serialized blob using loaded key material
///
/// # Example
///
/// ```no_run
/// use fwprotect::{package, KeyMaterial};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let keys = KeyMaterial::load("secret_build_output.txt")?;
/// let firmware = std::fs::read("firmware.bin")?;
/// let blob = package(&firmware, 2, "release 2", &keys)?;
/// std::fs::write("firmware_protected.bin", blob)?;
/// # Ok(())
/// # }
/// ```
pub fn package(
    firmware: &[u8],
    version: u16,
    message: &str,
    keys: &KeyMaterial,
) -> Result<Vec<u8>, FwProtectError> {
    let packager = Packager::new(keys.symmetric(), keys.signer());
    Ok(packager.package(firmware, version, message)?.to_bytes())
}

/// [`package`] for callers holding a version in a wider integer type
pub fn package_checked_version(
    firmware: &[u8],
    version: i64,
    message: &str,
    keys: &KeyMaterial,
) -> Result<Vec<u8>, FwProtectError> {
    let version = u16::try_from(version).map_err(|_| FwProtectError::VersionOutOfRange(version))?;
    package(firmware, version, message, keys)
}
