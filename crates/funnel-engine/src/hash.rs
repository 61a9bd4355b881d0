use funnel_core::errors::FunnelError;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::serde::to_canonical_json_bytes;

/// Computes a stable SHA256 hex digest of the canonical JSON encoding.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, FunnelError> {
    let bytes = to_canonical_json_bytes(value)?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}
