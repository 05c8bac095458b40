//! Authentication capability: encrypt-then-MAC over the channel buffer

use crate::HashError;
use crate::hmac_sha256::{self, HMAC_LEN};
use tanktrust_common::{
    Direction, LoggingTransformer, StageError, StageKind, TAG_LEN, TransformStage,
};
use zeroize::Zeroizing;

/// Shortest MAC key accepted
pub const MIN_KEY_LEN: usize = 32;

const _: () = assert!(HMAC_LEN == TAG_LEN);

/// HMAC-SHA256 stage holding its MAC key
pub struct HmacStage {
    key: Zeroizing<Vec<u8>>,
}

impl core::fmt::Debug for HmacStage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("HmacStage(REDACTED)")
    }
}

impl HmacStage {
    /// Build a stage from at least 32 bytes of key material
    ///
    /// # Errors
    ///
    /// Returns `HashError::InvalidMacKeyLength` for shorter keys.
    pub fn new(key: &[u8]) -> crate::Result<Self> {
        if key.len() < MIN_KEY_LEN {
            return Err(HashError::InvalidMacKeyLength {
                expected: MIN_KEY_LEN,
                actual: key.len(),
            });
        }
        Ok(Self {
            key: Zeroizing::new(key.to_vec()),
        })
    }
}

impl TransformStage for HmacStage {
    fn kind(&self) -> StageKind {
        StageKind::Authentication
    }

    fn apply(
        &self,
        direction: Direction,
        length: &mut usize,
        buffer: &mut [u8],
        tag: &mut [u8; TAG_LEN],
    ) -> tanktrust_common::Result<()> {
        StageError::check_capacity(*length, buffer.len())?;
        let data = &buffer[..*length];

        match direction {
            Direction::Commit => {
                *tag = hmac_sha256::sign(&self.key, data)?;
                tracing::debug!(
                    length = *length,
                    tag = %LoggingTransformer::tag_fingerprint(tag),
                    "tag produced"
                );
            }
            Direction::Retrieve => {
                hmac_sha256::verify(&self.key, data, tag)?;
                tracing::debug!(length = *length, "tag verified");
            }
        }
        Ok(())
    }
}
