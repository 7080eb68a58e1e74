//! SHA-256 digests of written datasets.
//!
//! The digest covers the exact bytes on disk, so it changes with any edit,
//! including whitespace.

use std::path::Path;

use sha2::{Digest, Sha256};

use rxsynth_contracts::error::{SynthError, SynthResult};

/// Lowercase 64-character hex SHA-256 of `bytes`.
pub fn digest_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Digest of the file at `path`.
pub fn digest_file(path: &Path) -> SynthResult<String> {
    let bytes = std::fs::read(path).map_err(|e| SynthError::InputReadFailed {
        reason: format!("failed to read '{}': {}", path.display(), e),
    })?;
    Ok(digest_bytes(&bytes))
}
