//! Deploy-time pipeline configuration
//!
//! Channel count and buffer capacity are fixed when the registry is built;
//! nothing here can be renegotiated by a caller at runtime.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tanktrust_common::{StageError, StageKind};
use thiserror::Error;

/// Default number of channels (`TT_CORE_COUNT`)
pub const TT_CORE_COUNT: usize = 4;
/// Default per-channel buffer capacity in bytes (`TT_BUFFER_LENGTH`)
pub const TT_BUFFER_LENGTH: usize = 65_535;
/// Largest channel count a `u8` channel id can address
pub const MAX_CHANNEL_COUNT: usize = 256;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value is outside its accepted range
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// A stage slot was left empty
    #[error("Missing {0} stage")]
    MissingStage(StageKind),

    /// A stage was installed in the wrong slot
    #[error("Stage installed as {slot} reports itself as {actual}")]
    StageKindMismatch {
        /// Slot the stage was installed in
        slot: StageKind,
        /// Kind the stage reports
        actual: StageKind,
    },

    /// A stage could not be constructed
    #[error("Stage construction failed: {0}")]
    Stage(#[from] StageError),

    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for this schema
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Sizing and stage tuning for a pipeline
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Number of independent channels
    #[serde(default = "default_channel_count")]
    pub channel_count: usize,
    /// Capacity of each channel buffer in bytes
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,
    /// Zstd level used by the standard compression stage
    #[serde(default = "default_compression_level")]
    pub compression_level: i32,
}

fn default_channel_count() -> usize {
    TT_CORE_COUNT
}

fn default_buffer_capacity() -> usize {
    TT_BUFFER_LENGTH
}

fn default_compression_level() -> i32 {
    3
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            channel_count: default_channel_count(),
            buffer_capacity: default_buffer_capacity(),
            compression_level: default_compression_level(),
        }
    }
}

impl PipelineConfig {
    /// Parse a configuration from JSON, filling omitted fields with defaults
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Serialization` for malformed JSON and
    /// `ConfigError::Invalid` for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, otherwise as
    /// [`PipelineConfig::from_json`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded pipeline configuration");
        Self::from_json(&json)
    }

    /// Check every value is within range
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_count == 0 || self.channel_count > MAX_CHANNEL_COUNT {
            return Err(ConfigError::Invalid(format!(
                "channel_count must be in 1..={MAX_CHANNEL_COUNT}, got {}",
                self.channel_count
            )));
        }
        if self.buffer_capacity == 0 || u32::try_from(self.buffer_capacity).is_err() {
            return Err(ConfigError::Invalid(format!(
                "buffer_capacity must be in 1..={}, got {}",
                u32::MAX,
                self.buffer_capacity
            )));
        }
        if !(1..=22).contains(&self.compression_level) {
            return Err(ConfigError::Invalid(format!(
                "compression_level must be in 1..=22, got {}",
                self.compression_level
            )));
        }
        Ok(())
    }

    /// Upper bound on channel storage: `channel_count × (capacity + record)`
    #[must_use]
    pub fn storage_bytes(&self) -> usize {
        self.channel_count
            .saturating_mul(
                self.buffer_capacity
                    .saturating_add(crate::reference::REFERENCE_RECORD_LEN),
            )
    }
}
