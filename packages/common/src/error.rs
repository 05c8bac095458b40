//! Error type reported by transform stages

use std::fmt;
use thiserror::Error;

/// Result type alias for stage operations
pub type Result<T> = std::result::Result<T, StageError>;

/// Failure reported by a single transform stage
///
/// Whatever a stage left in the buffer when it returns one of these is
/// untrusted; the orchestrator discards it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    /// Output would not fit the channel buffer
    #[error("Capacity exceeded: needed {needed} bytes, capacity is {capacity}")]
    CapacityExceeded {
        /// Bytes the stage needed to write
        needed: usize,
        /// Bytes the buffer can hold
        capacity: usize,
    },

    /// Input is shorter than the stage's framing requires
    #[error("Truncated input: {length} bytes, at least {minimum} required")]
    Truncated {
        /// Bytes supplied
        length: usize,
        /// Minimum bytes the stage accepts
        minimum: usize,
    },

    /// Authentication tag did not match the data
    #[error("Authentication tag mismatch")]
    TagMismatch,

    /// Compression or decompression failed
    #[error("Compression error: {0}")]
    Compression(String),

    /// Encryption or decryption failed
    #[error("Cipher error: {0}")]
    Cipher(String),

    /// Key material was rejected
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Failure forced by an instrumented stage
    #[error("Injected failure: {0}")]
    Injected(String),
}

impl StageError {
    /// Create a `Compression` error with a formatted message
    #[must_use]
    pub fn compression(msg: impl fmt::Display) -> Self {
        Self::Compression(msg.to_string())
    }

    /// Create a `Cipher` error with a formatted message
    #[must_use]
    pub fn cipher(msg: impl fmt::Display) -> Self {
        Self::Cipher(msg.to_string())
    }

    /// Create an `InvalidKey` error with a formatted message
    #[must_use]
    pub fn invalid_key(msg: impl fmt::Display) -> Self {
        Self::InvalidKey(msg.to_string())
    }

    /// Create an `Injected` error with a formatted message
    #[must_use]
    pub fn injected(msg: impl fmt::Display) -> Self {
        Self::Injected(msg.to_string())
    }

    /// Fail with `CapacityExceeded` unless `needed` fits in `capacity`
    ///
    /// # Errors
    ///
    /// Returns `StageError::CapacityExceeded` when `needed > capacity`.
    pub fn check_capacity(needed: usize, capacity: usize) -> Result<()> {
        if needed > capacity {
            return Err(Self::CapacityExceeded { needed, capacity });
        }
        Ok(())
    }
}
