//! Zstd compression stage
//!
//! Compresses the channel buffer on `Commit` and decompresses it on
//! `Retrieve`, never writing past the buffer's capacity.

#![forbid(unsafe_code)]

pub mod error;
pub mod stage;
pub mod zstd;

// Re-export error types
pub use error::{CompressionError, Result};

pub use stage::{DEFAULT_LEVEL, ZstdStage};
