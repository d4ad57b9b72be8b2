//! Key material loading
//!
//! The key provisioning tool writes a single secrets file: the raw 16-byte
//! AES key followed immediately by the RSA private key (PEM or DER). This
//! module reads that file once and hands the parsed keys to the caller,
//! whose scope bounds their lifetime. Both keys zeroize on drop.

use crate::error::FwProtectError;
use fwprotect_crypto::{RsaSigner, SymmetricKey, Zeroizing};
use fwprotect_protocol::SYMMETRIC_KEY_SIZE;
use std::path::Path;
use tracing::debug;

/// Conventional file name written by the key provisioning tool
pub const DEFAULT_SECRETS_FILE: &str = "secret_build_output.txt";

/// Symmetric key and signing key for one packaging session
#[derive(Debug, Clone)]
pub struct KeyMaterial {
    symmetric: SymmetricKey,
    signer: RsaSigner,
}

impl KeyMaterial {
    pub fn new(symmetric: SymmetricKey, signer: RsaSigner) -> Self {
        KeyMaterial { symmetric, signer }
    }

    /// Parse `aes_key(16) ‖ private_key` as written by key provisioning
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FwProtectError> {
        if bytes.len() < SYMMETRIC_KEY_SIZE {
            return Err(FwProtectError::KeyMaterialCorrupt(format!(
                "expected at least {} bytes of key material, got {}",
                SYMMETRIC_KEY_SIZE,
                bytes.len()
            )));
        }
        let (aes, private) = bytes.split_at(SYMMETRIC_KEY_SIZE);
        let symmetric = SymmetricKey::from_slice(aes)?;
        let signer = RsaSigner::from_key_bytes(private)?;
        Ok(KeyMaterial { symmetric, signer })
    }

    /// Read and parse a secrets file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FwProtectError> {
        let path = path.as_ref();
        debug!("Loading key material from {}", path.display());
        let bytes = std::fs::read(path).map(Zeroizing::new).map_err(|e| {
            FwProtectError::KeyMaterialCorrupt(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_bytes(&bytes)
    }

    /// Serialize back to the secrets file layout, private key as PKCS#8 PEM
    pub fn to_bytes(&self) -> Result<Zeroizing<Vec<u8>>, FwProtectError> {
        let pem = self.signer.to_pkcs8_pem()?;
        let mut out = Zeroizing::new(Vec::with_capacity(SYMMETRIC_KEY_SIZE + pem.len()));
        out.extend_from_slice(self.symmetric.as_slice());
        out.extend_from_slice(pem.as_bytes());
        Ok(out)
    }

    pub fn symmetric(&self) -> &SymmetricKey {
        &self.symmetric
    }

    pub fn signer(&self) -> &RsaSigner {
        &self.signer
    }
}
