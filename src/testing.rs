//! Shared fixtures for unit tests

use crate::keys::KeyMaterial;
use fwprotect_crypto::{RsaSigner, SymmetricKey};
use rand::rngs::OsRng;
use rsa::RsaPrivateKey;
use std::sync::OnceLock;

/// 1024-bit RSA key material, generated once per test binary
pub(crate) fn key_material() -> KeyMaterial {
    static KEYS: OnceLock<KeyMaterial> = OnceLock::new();
    KEYS.get_or_init(|| {
        let private = RsaPrivateKey::new(&mut OsRng, 1024).expect("RSA key generation");
        let symmetric = SymmetricKey::from_slice(&[0x42; 16]).expect("16-byte key");
        KeyMaterial::new(symmetric, RsaSigner::new(private))
    })
    .clone()
}
