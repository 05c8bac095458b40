//! The transform capability contract
//!
//! Compression, encryption and authentication all implement
//! [`TransformStage`]. A stage works in place on the channel buffer: it reads
//! `*length` valid bytes, rewrites the buffer, and stores the new valid byte
//! count back into `length`. The slice it is handed spans the whole channel
//! buffer, so `buffer.len()` is the capacity a stage may grow into.

use crate::{Direction, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width in bytes of the authentication tag carried in the reference record
pub const TAG_LEN: usize = 32;

/// The three stage roles the pipeline sequences
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageKind {
    /// Size reduction, applied to plaintext
    #[serde(rename = "compression")]
    Compression,
    /// Confidentiality, applied after compression
    #[serde(rename = "encryption")]
    Encryption,
    /// Integrity, computed over ciphertext
    #[serde(rename = "authentication")]
    Authentication,
}

impl StageKind {
    /// Human-readable stage name used in logs
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Compression => "compression",
            Self::Encryption => "encryption",
            Self::Authentication => "authentication",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An in-place forward/inverse transform over a channel buffer
pub trait TransformStage: Send + Sync {
    /// Which role this stage plays in the pipeline
    fn kind(&self) -> StageKind;

    /// Apply the forward (`Commit`) or inverse (`Retrieve`) transform
    ///
    /// On `Ok`, `buffer[..*length]` holds the result. Only the
    /// authentication stage reads or writes `tag`.
    ///
    /// # Errors
    ///
    /// Returns a `StageError` when the transform cannot complete; the buffer
    /// contents are then unspecified.
    fn apply(
        &self,
        direction: Direction,
        length: &mut usize,
        buffer: &mut [u8],
        tag: &mut [u8; TAG_LEN],
    ) -> Result<()>;
}

impl<T: TransformStage + ?Sized> TransformStage for std::sync::Arc<T> {
    fn kind(&self) -> StageKind {
        (**self).kind()
    }

    fn apply(
        &self,
        direction: Direction,
        length: &mut usize,
        buffer: &mut [u8],
        tag: &mut [u8; TAG_LEN],
    ) -> Result<()> {
        (**self).apply(direction, length, buffer, tag)
    }
}
