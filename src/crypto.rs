use aes::Aes128;
use cbc::cipher::{BlockDecryptMut, KeyIvInit, block_padding::NoPadding};

use crate::error::VkdlError;

type Aes128CbcDec = cbc::Decryptor<Aes128>;

/// Decrypts one media segment with AES-128-CBC without padding removal.
///
/// The provider reuses the 16 key bytes as the IV. This is a quirk of this
/// one remote service, not a general CBC convention.
pub fn decrypt_segment(data: &[u8], key: &[u8; 16]) -> Result<Vec<u8>, VkdlError> {
    Aes128CbcDec::new(key.into(), key.into())
        .decrypt_padded_vec_mut::<NoPadding>(data)
        .map_err(|e| VkdlError::DecryptionError {
            message: e.to_string(),
        })
}

/// Inverse of [`decrypt_segment`], with the same key-as-IV convention.
/// Panics if `data` is not a whole number of blocks.
#[cfg(test)]
pub(crate) fn encrypt_segment(data: &[u8], key: &[u8; 16]) -> Vec<u8> {
    use cbc::cipher::BlockEncryptMut;
    type Aes128CbcEnc = cbc::Encryptor<Aes128>;
    Aes128CbcEnc::new(key.into(), key.into()).encrypt_padded_vec_mut::<NoPadding>(data)
}
