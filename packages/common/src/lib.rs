//! Common infrastructure shared by the tanktrust crates
//!
//! This crate provides the pieces every stage and the orchestrator agree on:
//! - The `TransformStage` capability contract
//! - Pipeline `Direction` and its dispatch opcodes
//! - `StageError`, the failure type every stage reports
//! - Logging initialisation and redaction helpers

#![forbid(unsafe_code)]

pub mod direction;
pub mod error;
pub mod logging;
pub mod stage;

pub use direction::{Direction, TT_READ, TT_WRITE};
pub use error::{Result, StageError};
pub use logging::LoggingTransformer;
pub use stage::{StageKind, TAG_LEN, TransformStage};
