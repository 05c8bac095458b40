//! Error types for the compression crate

use std::fmt;
use tanktrust_common::StageError;
use thiserror::Error;

/// Result type alias for compression operations
pub type Result<T> = std::result::Result<T, CompressionError>;

/// Main error type for all compression operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompressionError {
    /// Compression operation failed
    #[error("Compression failed: {0}")]
    CompressionFailed(String),

    /// Decompression operation failed
    #[error("Decompression failed: {0}")]
    DecompressionFailed(String),

    /// Invalid compression level
    #[error("Invalid compression level: {0}")]
    InvalidLevel(i32),
}

impl CompressionError {
    /// Create a `CompressionFailed` error with a formatted message
    #[must_use]
    pub fn compression_failed(msg: impl fmt::Display) -> Self {
        Self::CompressionFailed(msg.to_string())
    }

    /// Create a `DecompressionFailed` error with a formatted message
    #[must_use]
    pub fn decompression_failed(msg: impl fmt::Display) -> Self {
        Self::DecompressionFailed(msg.to_string())
    }
}

impl From<CompressionError> for StageError {
    fn from(err: CompressionError) -> Self {
        StageError::compression(err)
    }
}
