//! AES-256-GCM encryption capability

use crate::CipherError;
use crate::nonce::{self, NONCE_LEN};
use aes_gcm::{
    Aes256Gcm, KeyInit, Tag,
    aead::{AeadInPlace, generic_array::GenericArray},
};
use tanktrust_common::{Direction, StageError, StageKind, TAG_LEN, TransformStage};
use zeroize::Zeroizing;

/// AES-256 key width
pub const KEY_LEN: usize = 32;
/// GCM authentication tag width
pub const GCM_TAG_LEN: usize = 16;
/// Bytes a commit adds around the ciphertext
pub const FRAME_OVERHEAD: usize = NONCE_LEN + GCM_TAG_LEN;

const ASSOCIATED_DATA: &[u8] = b"tanktrust:cipher:v1";

/// Encryption stage holding a 256-bit key
pub struct AesGcmStage {
    key: Zeroizing<[u8; KEY_LEN]>,
}

impl core::fmt::Debug for AesGcmStage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("AesGcmStage(REDACTED)")
    }
}

impl AesGcmStage {
    /// Build a stage from 32 bytes of key material
    ///
    /// # Errors
    ///
    /// Returns `CipherError::InvalidKeyLength` if `key` is not 32 bytes.
    pub fn new(key: &[u8]) -> crate::Result<Self> {
        let key: [u8; KEY_LEN] = key.try_into().map_err(|_| CipherError::InvalidKeyLength {
            expected: KEY_LEN,
            actual: key.len(),
        })?;
        Ok(Self {
            key: Zeroizing::new(key),
        })
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(GenericArray::from_slice(&self.key[..]))
    }

    fn seal(&self, length: &mut usize, buffer: &mut [u8]) -> tanktrust_common::Result<()> {
        let plain_len = *length;
        let sealed_len = plain_len + FRAME_OVERHEAD;
        StageError::check_capacity(sealed_len, buffer.len())?;

        let nonce_bytes = nonce::generate();
        buffer.copy_within(..plain_len, NONCE_LEN);
        buffer[..NONCE_LEN].copy_from_slice(&nonce_bytes);

        let body_end = NONCE_LEN + plain_len;
        let tag = self
            .cipher()
            .encrypt_in_place_detached(
                GenericArray::from_slice(&nonce_bytes),
                ASSOCIATED_DATA,
                &mut buffer[NONCE_LEN..body_end],
            )
            .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;
        buffer[body_end..sealed_len].copy_from_slice(&tag);

        *length = sealed_len;
        Ok(())
    }

    fn open(&self, length: &mut usize, buffer: &mut [u8]) -> tanktrust_common::Result<()> {
        let sealed_len = *length;
        if sealed_len < FRAME_OVERHEAD {
            return Err(StageError::Truncated {
                length: sealed_len,
                minimum: FRAME_OVERHEAD,
            });
        }
        StageError::check_capacity(sealed_len, buffer.len())?;

        let body_end = sealed_len - GCM_TAG_LEN;
        let mut nonce_bytes = [0u8; NONCE_LEN];
        nonce_bytes.copy_from_slice(&buffer[..NONCE_LEN]);
        let tag = Tag::clone_from_slice(&buffer[body_end..sealed_len]);

        self.cipher()
            .decrypt_in_place_detached(
                GenericArray::from_slice(&nonce_bytes),
                ASSOCIATED_DATA,
                &mut buffer[NONCE_LEN..body_end],
                &tag,
            )
            .map_err(|e| CipherError::DecryptionFailed(e.to_string()))?;

        let plain_len = body_end - NONCE_LEN;
        buffer.copy_within(NONCE_LEN..body_end, 0);
        *length = plain_len;
        Ok(())
    }
}

impl TransformStage for AesGcmStage {
    fn kind(&self) -> StageKind {
        StageKind::Encryption
    }

    fn apply(
        &self,
        direction: Direction,
        length: &mut usize,
        buffer: &mut [u8],
        _tag: &mut [u8; TAG_LEN],
    ) -> tanktrust_common::Result<()> {
        let input = *length;
        match direction {
            Direction::Commit => self.seal(length, buffer)?,
            Direction::Retrieve => self.open(length, buffer)?,
        }
        tracing::debug!(%direction, input, output = *length, "aes-gcm stage complete");
        Ok(())
    }
}
