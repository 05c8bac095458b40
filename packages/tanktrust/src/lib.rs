//! # Tanktrust
//!
//! Per-channel secure buffer pipeline. Data leaving the trust boundary is
//! compressed, encrypted and authenticated (encrypt-then-MAC); data coming
//! back is verified, decrypted and decompressed, in that order.
//!
//! ## Features
//!
//! - `zstd` - zstd compression stage
//! - `aes` - AES-256-GCM encryption stage
//! - `hmac` - HMAC-SHA256 authentication stage
//! - `standard-stages` (default) - all three
//!
//! ## Example
//!
//! ```rust,no_run
//! use tanktrust::{Direction, ExternalFrame, Pipeline, PipelineConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cipher_key = [7u8; 32]; // supplied by your key management
//! let mac_key = [9u8; 32];
//!
//! let pipeline = Pipeline::builder(PipelineConfig::default())
//!     .with_standard_stages(&cipher_key, &mac_key)?
//!     .build()?;
//!
//! let mut frame = ExternalFrame::new(1, b"hello across the boundary".to_vec());
//! pipeline.process_channel(0, Direction::Commit, &mut frame)?;
//! pipeline.process_channel(0, Direction::Retrieve, &mut frame)?;
//! assert_eq!(frame.payload, b"hello across the boundary");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod boundary;
pub mod channel;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod reference;
#[cfg(any(feature = "zstd", feature = "aes", feature = "hmac"))]
mod stages;

// Re-export core types
pub use boundary::{BoundaryFault, CopyDirection, DirectCopy, ExternalFrame, TrustBoundary};
pub use channel::{ChannelRegistry, ChannelSnapshot};
pub use config::{ConfigError, PipelineConfig, TT_BUFFER_LENGTH, TT_CORE_COUNT};
pub use error::{PipelineError, Result};
pub use pipeline::{COMMIT_ORDER, Pipeline, PipelineBuilder, RETRIEVE_ORDER, stage_order};
pub use reference::{REFERENCE_RECORD_LEN, ReferenceBytes, ReferenceRecord};

// Re-export the stage contract so stage authors need only this crate
pub use tanktrust_common::{
    Direction, LoggingTransformer, StageError, StageKind, TAG_LEN, TT_READ, TT_WRITE,
    TransformStage,
};
