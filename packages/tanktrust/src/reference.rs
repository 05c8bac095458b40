//! The reference record and its fixed wire layout
//!
//! | field    | offset | width | encoding          |
//! |----------|--------|-------|-------------------|
//! | `start`  | 0      | 8     | `u64` big-endian  |
//! | `length` | 8      | 4     | `u32` big-endian  |
//! | `hmac`   | 12     | 32    | raw tag bytes     |

use crate::{PipelineError, Result};
use tanktrust_common::TAG_LEN;
use zeroize::Zeroize;

/// Offset of the `start` marker
pub const START_OFFSET: usize = 0;
/// Offset of the declared payload length
pub const LENGTH_OFFSET: usize = START_OFFSET + 8;
/// Offset of the authentication tag
pub const HMAC_OFFSET: usize = LENGTH_OFFSET + 4;
/// Encoded size of a reference record
pub const REFERENCE_RECORD_LEN: usize = HMAC_OFFSET + TAG_LEN;

/// Encoded reference record as it crosses the trust boundary
pub type ReferenceBytes = [u8; REFERENCE_RECORD_LEN];

/// Metadata carried alongside a channel's payload
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Zeroize)]
pub struct ReferenceRecord {
    /// Opaque marker, round-tripped unchanged by the orchestrator
    pub start: u64,
    /// Number of valid payload bytes
    pub length: u32,
    /// Authentication tag over the committed payload
    pub hmac: [u8; TAG_LEN],
}

impl ReferenceRecord {
    /// A record declaring `length` payload bytes with an empty tag
    #[must_use]
    pub fn new(start: u64, length: u32) -> Self {
        Self {
            start,
            length,
            hmac: [0u8; TAG_LEN],
        }
    }

    /// Decode a record from its wire layout
    #[must_use]
    pub fn decode(bytes: &ReferenceBytes) -> Self {
        let mut start = [0u8; 8];
        start.copy_from_slice(&bytes[START_OFFSET..LENGTH_OFFSET]);
        let mut length = [0u8; 4];
        length.copy_from_slice(&bytes[LENGTH_OFFSET..HMAC_OFFSET]);
        let mut hmac = [0u8; TAG_LEN];
        hmac.copy_from_slice(&bytes[HMAC_OFFSET..REFERENCE_RECORD_LEN]);

        Self {
            start: u64::from_be_bytes(start),
            length: u32::from_be_bytes(length),
            hmac,
        }
    }

    /// Encode the record into its wire layout
    #[must_use]
    pub fn encode(&self) -> ReferenceBytes {
        let mut bytes = [0u8; REFERENCE_RECORD_LEN];
        bytes[START_OFFSET..LENGTH_OFFSET].copy_from_slice(&self.start.to_be_bytes());
        bytes[LENGTH_OFFSET..HMAC_OFFSET].copy_from_slice(&self.length.to_be_bytes());
        bytes[HMAC_OFFSET..].copy_from_slice(&self.hmac);
        bytes
    }

    /// Admission control: the declared length must satisfy `0 < length <= limit`
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::InvalidLength` otherwise.
    pub fn validated_length(&self, limit: usize) -> Result<usize> {
        let declared = usize::try_from(self.length).unwrap_or(usize::MAX);
        if declared == 0 || declared > limit {
            return Err(PipelineError::InvalidLength {
                declared: self.length,
                limit,
            });
        }
        Ok(declared)
    }
}

impl From<&ReferenceBytes> for ReferenceRecord {
    fn from(bytes: &ReferenceBytes) -> Self {
        Self::decode(bytes)
    }
}

impl From<ReferenceRecord> for ReferenceBytes {
    fn from(record: ReferenceRecord) -> Self {
        record.encode()
    }
}
