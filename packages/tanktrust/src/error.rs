//! Error handling for the pipeline orchestrator

use crate::boundary::BoundaryFault;
use tanktrust_common::{StageError, StageKind};
use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Why an invocation was rejected or aborted
///
/// Every variant is terminal for the invocation and leaves the caller's
/// frame exactly as it was supplied.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Channel index does not address a channel
    #[error("Invalid channel: {index} (registry has {count} channels)")]
    InvalidChannel {
        /// Requested index
        index: usize,
        /// Number of channels in the registry
        count: usize,
    },

    /// Declared length is zero, over capacity, or longer than the payload supplied
    #[error("Invalid length: declared {declared}, accepted range is 1..={limit}")]
    InvalidLength {
        /// Length field of the reference record
        declared: u32,
        /// Largest length this invocation could accept
        limit: usize,
    },

    /// Compression stage failed
    #[error("Could not perform compression: {0}")]
    CompressionFailed(StageError),

    /// Encryption stage failed
    #[error("Could not perform encryption: {0}")]
    EncryptionFailed(StageError),

    /// Authentication stage failed, including tag mismatch on retrieve
    #[error("Could not perform authentication: {0}")]
    AuthenticationFailed(StageError),

    /// Dispatch opcode names no direction
    #[error("Invalid operation code: {0}")]
    InvalidOperation(u8),

    /// Copy across the trust boundary faulted
    #[error("Boundary fault: {0}")]
    BoundaryFault(#[from] BoundaryFault),
}

impl PipelineError {
    /// Attribute a stage failure to the stage that produced it
    #[must_use]
    pub fn stage_failed(kind: StageKind, err: StageError) -> Self {
        match kind {
            StageKind::Compression => Self::CompressionFailed(err),
            StageKind::Encryption => Self::EncryptionFailed(err),
            StageKind::Authentication => Self::AuthenticationFailed(err),
        }
    }

    /// The stage that failed, if this is a stage failure
    #[must_use]
    pub fn failed_stage(&self) -> Option<StageKind> {
        match self {
            Self::CompressionFailed(_) => Some(StageKind::Compression),
            Self::EncryptionFailed(_) => Some(StageKind::Encryption),
            Self::AuthenticationFailed(_) => Some(StageKind::Authentication),
            _ => None,
        }
    }

    /// Stable integer status for callers that speak integers; `0` is success
    #[must_use]
    pub fn status_code(&self) -> i32 {
        match self {
            Self::InvalidChannel { .. } => 1,
            Self::InvalidLength { .. } => 2,
            Self::CompressionFailed(_) => 3,
            Self::EncryptionFailed(_) => 4,
            Self::AuthenticationFailed(_) => 5,
            Self::InvalidOperation(_) => 6,
            Self::BoundaryFault(_) => 7,
        }
    }
}
