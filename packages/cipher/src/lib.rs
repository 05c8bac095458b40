//! # Tanktrust Cipher
//!
//! AES-256-GCM encryption stage. Ciphertext is framed inside the channel
//! buffer as `[nonce 12][ciphertext][gcm tag 16]`.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod nonce;
pub mod stage;

// Re-export core types
pub use error::{CipherError, Result};
pub use nonce::NONCE_LEN;
pub use stage::{AesGcmStage, FRAME_OVERHEAD, GCM_TAG_LEN, KEY_LEN};
