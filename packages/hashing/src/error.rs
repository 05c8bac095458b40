//! Error handling for the authentication stage

use tanktrust_common::StageError;
use thiserror::Error;

/// Hashing-specific errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HashError {
    /// MAC key shorter than the accepted minimum
    #[error("Invalid key length for MAC: expected at least {expected}, got {actual}")]
    InvalidMacKeyLength {
        /// Minimum key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// MAC could not be keyed
    #[error("MAC initialization error: {0}")]
    MacInitialization(String),

    /// Recomputed tag differs from the supplied one
    #[error("Hash verification failed")]
    VerificationFailed,
}

impl From<HashError> for StageError {
    fn from(err: HashError) -> Self {
        match err {
            HashError::VerificationFailed => StageError::TagMismatch,
            HashError::InvalidMacKeyLength { .. } | HashError::MacInitialization(_) => {
                StageError::invalid_key(err)
            }
        }
    }
}

/// Result type for hashing operations
pub type Result<T> = std::result::Result<T, HashError>;
