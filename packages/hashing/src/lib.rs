//! HMAC-SHA256 authentication stage
//!
//! Produces the reference record tag on `Commit` and verifies it on
//! `Retrieve`, before any decryption is attempted.

#![forbid(unsafe_code)]

pub mod error;
pub mod hmac_sha256;
pub mod stage;

// Re-export error types
pub use error::{HashError, Result};

pub use stage::{HmacStage, MIN_KEY_LEN};
