//! Error handling for the cipher stage

use tanktrust_common::StageError;
use thiserror::Error;

/// Cipher-specific errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CipherError {
    /// Invalid key length provided
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Encryption operation failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption operation failed
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),
}

impl From<CipherError> for StageError {
    fn from(err: CipherError) -> Self {
        match err {
            CipherError::InvalidKeyLength { .. } => StageError::invalid_key(err),
            CipherError::EncryptionFailed(_) | CipherError::DecryptionFailed(_) => {
                StageError::cipher(err)
            }
        }
    }
}

/// Result type for cipher operations
pub type Result<T> = std::result::Result<T, CipherError>;
