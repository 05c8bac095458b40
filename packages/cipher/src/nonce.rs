//! Nonce generation for AES-GCM framing

use rand::{RngCore, rng};

/// AES-GCM nonce width (96 bits)
pub const NONCE_LEN: usize = 12;

/// Generate a fresh random nonce from the OS-seeded CSPRNG
#[must_use]
pub fn generate() -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    rng().fill_bytes(&mut nonce);
    nonce
}
