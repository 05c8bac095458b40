//! Zstd compression implementation

use crate::{CompressionError, Result};
use ::zstd::bulk::{Compressor, Decompressor};
use zeroize::Zeroize;

/// Lowest accepted compression level
pub const MIN_LEVEL: i32 = 1;
/// Highest accepted compression level
pub const MAX_LEVEL: i32 = 22;

/// Check that a compression level is within 1-22
///
/// # Errors
/// Returns `CompressionError::InvalidLevel` for out-of-range levels
pub fn validate_level(level: i32) -> Result<i32> {
    if (MIN_LEVEL..=MAX_LEVEL).contains(&level) {
        Ok(level)
    } else {
        Err(CompressionError::InvalidLevel(level))
    }
}

/// Reusable zstd contexts plus an output buffer
///
/// The output buffer only grows, so a warmed-up workspace compresses and
/// decompresses without allocating.
pub struct Workspace {
    compressor: Compressor<'static>,
    decompressor: Decompressor<'static>,
    output: Vec<u8>,
}

impl core::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Workspace")
            .field("output_capacity", &self.output.len())
            .finish_non_exhaustive()
    }
}

impl Workspace {
    /// Create contexts compressing at `level`
    ///
    /// # Errors
    /// Returns `CompressionError` if zstd cannot allocate a context
    pub fn new(level: i32) -> Result<Self> {
        let compressor = Compressor::new(level).map_err(|e| {
            CompressionError::compression_failed(format!("Zstd context creation failed: {e}"))
        })?;
        let decompressor = Decompressor::new().map_err(|e| {
            CompressionError::decompression_failed(format!("Zstd context creation failed: {e}"))
        })?;
        Ok(Self {
            compressor,
            decompressor,
            output: Vec::new(),
        })
    }

    /// Bytes currently reserved for output
    #[must_use]
    pub fn output_capacity(&self) -> usize {
        self.output.len()
    }

    /// Compress `data` into the workspace buffer
    ///
    /// # Errors
    /// Returns `CompressionError` if Zstd compression fails
    pub fn compress(&mut self, data: &[u8]) -> Result<&[u8]> {
        let bound = ::zstd::zstd_safe::compress_bound(data.len());
        self.reserve(bound);
        let written = self
            .compressor
            .compress_to_buffer(data, &mut self.output[..bound])
            .map_err(|e| {
                CompressionError::compression_failed(format!("Zstd compression failed: {e}"))
            })?;
        Ok(&self.output[..written])
    }

    /// Decompress `data`, refusing to produce more than `limit` bytes
    ///
    /// # Errors
    /// Returns `CompressionError` if the frame is malformed or its content
    /// exceeds `limit`
    pub fn decompress_bounded(&mut self, data: &[u8], limit: usize) -> Result<&[u8]> {
        self.reserve(limit);
        let written = self
            .decompressor
            .decompress_to_buffer(data, &mut self.output[..limit])
            .map_err(|e| {
                CompressionError::decompression_failed(format!("Zstd decompression failed: {e}"))
            })?;
        Ok(&self.output[..written])
    }

    /// Zero the output buffer, keeping its reservation
    pub fn wipe(&mut self) {
        // A failed call may have written anywhere in the reserved region
        self.output.as_mut_slice().zeroize();
    }

    fn reserve(&mut self, needed: usize) {
        if self.output.len() < needed {
            self.output.resize(needed, 0);
        }
    }
}
