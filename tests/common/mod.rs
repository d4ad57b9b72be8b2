//! Common test utilities for fwprotect integration tests

use fwprotect::crypto::{decrypt_cbc, sha256, Iv, RsaSigner, SymmetricKey, Zeroizing};
use fwprotect::protocol::FirmwareBlob;
use fwprotect::KeyMaterial;
use rand::rngs::OsRng;
use rsa::RsaPrivateKey;
use std::sync::OnceLock;

/// Release message used by the reference scenario
pub const TEST_MESSAGE: &str = "v1";

/// Firmware bytes used by the reference scenario
pub const TEST_FIRMWARE: &[u8] = b"ABC";

/// Key material shared by all tests in one binary (1024-bit RSA, 128-byte signatures)
pub fn key_material() -> KeyMaterial {
    static KEYS: OnceLock<KeyMaterial> = OnceLock::new();
    KEYS.get_or_init(|| {
        let private = RsaPrivateKey::new(&mut OsRng, 1024).unwrap();
        KeyMaterial::new(
            SymmetricKey::from_slice(b"0123456789abcdef").unwrap(),
            RsaSigner::new(private),
        )
    })
    .clone()
}

/// Parse a blob produced with [`key_material`]
pub fn parse(bytes: &[u8]) -> FirmwareBlob {
    FirmwareBlob::parse(bytes, 128).unwrap()
}

/// Decrypt a parsed blob without checking its signature
pub fn decrypt(blob: &FirmwareBlob, keys: &KeyMaterial) -> Zeroizing<Vec<u8>> {
    let mut payload = decrypt_cbc(keys.symmetric(), &Iv::from(blob.iv), &blob.ciphertext).unwrap();
    payload.truncate(blob.metadata.plaintext_length as usize);
    payload
}

/// Whether the blob's signature verifies over `metadata ‖ iv ‖ ciphertext`
pub fn signature_verifies(bytes: &[u8], keys: &KeyMaterial) -> bool {
    let sig_len = 128;
    if bytes.len() < sig_len {
        return false;
    }
    let (signature, signed) = bytes.split_at(sig_len);
    keys.signer()
        .verifier()
        .verify_digest(&sha256(&[signed]), signature)
        .is_ok()
}
