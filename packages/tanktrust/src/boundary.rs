//! Trust-boundary copy primitives and the external frame
//!
//! Everything on the far side of a [`TrustBoundary`] is untrusted. The
//! orchestrator copies across it exactly twice per call: once inward before
//! any transform, once outward after every stage succeeded.

use crate::reference::{ReferenceBytes, ReferenceRecord};
use std::fmt;
use thiserror::Error;

/// Direction of a boundary copy, for fault reporting
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyDirection {
    /// External to trusted
    In,
    /// Trusted to external
    Out,
}

impl fmt::Display for CopyDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::In => f.write_str("copy-in"),
            Self::Out => f.write_str("copy-out"),
        }
    }
}

/// A copy across the boundary could not complete
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoundaryFault {
    /// Source and destination regions differ in size
    #[error("{direction} of {source_len} bytes into a {destination_len}-byte region")]
    SizeMismatch {
        /// Which copy faulted
        direction: CopyDirection,
        /// Bytes offered
        source_len: usize,
        /// Bytes available at the destination
        destination_len: usize,
    },

    /// The boundary refused the copy
    #[error("{direction} denied: {reason}")]
    Denied {
        /// Which copy faulted
        direction: CopyDirection,
        /// Boundary-specific reason
        reason: String,
    },
}

/// Copy primitives between untrusted and trusted memory
///
/// Both operations copy a whole region; a size mismatch is a fault, never a
/// truncation.
pub trait TrustBoundary: Send + Sync {
    /// Copy `external` into the trusted region `trusted`
    ///
    /// # Errors
    ///
    /// Returns a `BoundaryFault` if the copy cannot be completed.
    fn copy_in(&self, external: &[u8], trusted: &mut [u8]) -> Result<(), BoundaryFault>;

    /// Copy the trusted region `trusted` out into `external`
    ///
    /// # Errors
    ///
    /// Returns a `BoundaryFault` if the copy cannot be completed.
    fn copy_out(&self, trusted: &[u8], external: &mut [u8]) -> Result<(), BoundaryFault>;
}

/// In-process boundary: a checked memory copy
#[derive(Clone, Copy, Debug, Default)]
pub struct DirectCopy;

impl DirectCopy {
    fn copy(direction: CopyDirection, from: &[u8], to: &mut [u8]) -> Result<(), BoundaryFault> {
        if from.len() != to.len() {
            return Err(BoundaryFault::SizeMismatch {
                direction,
                source_len: from.len(),
                destination_len: to.len(),
            });
        }
        to.copy_from_slice(from);
        Ok(())
    }
}

impl TrustBoundary for DirectCopy {
    fn copy_in(&self, external: &[u8], trusted: &mut [u8]) -> Result<(), BoundaryFault> {
        Self::copy(CopyDirection::In, external, trusted)
    }

    fn copy_out(&self, trusted: &[u8], external: &mut [u8]) -> Result<(), BoundaryFault> {
        Self::copy(CopyDirection::Out, trusted, external)
    }
}

/// Caller-owned representation of one channel's record and payload
///
/// `payload` may hold more bytes than the record declares; only the declared
/// prefix is read. On success both fields are replaced; on failure neither is
/// touched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternalFrame {
    /// Encoded reference record
    pub reference: ReferenceBytes,
    /// Payload bytes
    pub payload: Vec<u8>,
}

impl ExternalFrame {
    /// A frame whose record declares exactly `payload.len()` bytes
    ///
    /// Payloads longer than `u32::MAX` bytes declare `u32::MAX`.
    #[must_use]
    pub fn new(start: u64, payload: Vec<u8>) -> Self {
        let length = u32::try_from(payload.len()).unwrap_or(u32::MAX);
        Self {
            reference: ReferenceRecord::new(start, length).encode(),
            payload,
        }
    }

    /// A frame from raw parts, exactly as an untrusted caller supplied them
    #[must_use]
    pub fn from_parts(reference: ReferenceBytes, payload: Vec<u8>) -> Self {
        Self { reference, payload }
    }

    /// Decoded view of the reference record
    #[must_use]
    pub fn record(&self) -> ReferenceRecord {
        ReferenceRecord::decode(&self.reference)
    }

    /// The bytes the record declares meaningful, clamped to what is present
    #[must_use]
    pub fn declared_payload(&self) -> &[u8] {
        let declared = usize::try_from(self.record().length).unwrap_or(usize::MAX);
        &self.payload[..declared.min(self.payload.len())]
    }
}
