//! AES-128-CBC with PKCS#7 padding

use crate::helpers::CryptoError;
use crate::types::{Iv, SymmetricKey};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use zeroize::Zeroizing;

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

const BLOCK_SIZE: usize = 16;

/// Pad `plaintext` with PKCS#7 and encrypt it in CBC mode
///
/// The output length is always a positive multiple of the block size.
pub fn encrypt_cbc(key: &SymmetricKey, iv: &Iv, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes128CbcEnc::new_from_slices(key.as_slice(), iv.as_slice())
        .map_err(|e| CryptoError::InvalidLength(e.to_string()))?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

/// Decrypt CBC ciphertext and strip PKCS#7 padding
pub fn decrypt_cbc(
    key: &SymmetricKey,
    iv: &Iv,
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(CryptoError::InvalidLength(format!(
            "ciphertext length {} is not a positive multiple of {}",
            ciphertext.len(),
            BLOCK_SIZE
        )));
    }
    let cipher = Aes128CbcDec::new_from_slices(key.as_slice(), iv.as_slice())
        .map_err(|e| CryptoError::InvalidLength(e.to_string()))?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| CryptoError::Unpad)
}
