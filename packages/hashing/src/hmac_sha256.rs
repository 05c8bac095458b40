//! HMAC-SHA256 over a length-prefixed buffer

use crate::{HashError, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 output width
pub const HMAC_LEN: usize = 32;

/// Compute the tag over `u64_be(data.len()) || data`
///
/// # Errors
///
/// Returns `HashError::MacInitialization` if the key is rejected.
pub fn sign(key: &[u8], data: &[u8]) -> Result<[u8; HMAC_LEN]> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| HashError::MacInitialization(format!("HMAC key error: {e}")))?;
    mac.update(&(data.len() as u64).to_be_bytes());
    mac.update(data);
    let mut tag = [0u8; HMAC_LEN];
    tag.copy_from_slice(&mac.finalize().into_bytes());
    Ok(tag)
}

/// Recompute the tag and compare it with `expected` in constant time
///
/// # Errors
///
/// Returns `HashError::VerificationFailed` on mismatch.
pub fn verify(key: &[u8], data: &[u8], expected: &[u8; HMAC_LEN]) -> Result<()> {
    let computed = sign(key, data)?;
    if bool::from(computed.ct_eq(expected)) {
        Ok(())
    } else {
        Err(HashError::VerificationFailed)
    }
}
