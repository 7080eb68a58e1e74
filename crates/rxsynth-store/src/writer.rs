//! Atomic dataset writer.
//!
//! The dataset is encoded fully in memory, written to a hidden temporary
//! sibling of the target, flushed to disk, and renamed over the target.
//! A failed run therefore leaves either the previous file or nothing at the
//! target path, never a truncated one.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::{info, warn};
use uuid::Uuid;

use rxsynth_contracts::{
    error::{SynthError, SynthResult},
    record::UserRecord,
};

use crate::{digest::digest_bytes, manifest::DatasetManifest};

/// Writes user datasets as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct DatasetWriter {
    indent: Vec<u8>,
}

impl DatasetWriter {
    /// Four-space indentation.
    pub const DEFAULT_INDENT: &'static [u8] = b"    ";

    pub fn new() -> Self {
        Self {
            indent: Self::DEFAULT_INDENT.to_vec(),
        }
    }

    /// Use `indent` for each nesting level instead of four spaces.
    pub fn with_indent(indent: &[u8]) -> Self {
        Self {
            indent: indent.to_vec(),
        }
    }

    /// Encode `value` as pretty-printed JSON with a trailing newline.
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> SynthResult<Vec<u8>> {
        let mut buf = Vec::new();
        let mut serializer =
            Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&self.indent));
        value
            .serialize(&mut serializer)
            .map_err(|e| SynthError::SerializationFailed {
                reason: e.to_string(),
            })?;
        buf.push(b'\n');
        Ok(buf)
    }

    /// Write `users` to `path` atomically and describe the result.
    pub fn write(&self, path: &Path, users: &[UserRecord]) -> SynthResult<DatasetManifest> {
        let bytes = self.encode(users)?;
        write_atomically(path, &bytes)?;

        let manifest = DatasetManifest {
            run_id: Uuid::new_v4(),
            path: path.to_path_buf(),
            user_count: users.len(),
            bytes: bytes.len() as u64,
            sha256: digest_bytes(&bytes),
            written_at: Utc::now(),
            seed: None,
        };

        info!(
            run_id = %manifest.run_id,
            path = %path.display(),
            users = manifest.user_count,
            bytes = manifest.bytes,
            sha256 = %manifest.sha256,
            "dataset written"
        );
        Ok(manifest)
    }

    /// Write `manifest` next to its dataset and return the sidecar path.
    pub fn write_manifest(&self, manifest: &DatasetManifest) -> SynthResult<PathBuf> {
        let sidecar = DatasetManifest::sidecar_path(&manifest.path);
        write_atomically(&sidecar, &self.encode(manifest)?)?;
        Ok(sidecar)
    }
}

impl Default for DatasetWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a dataset file as untyped JSON.
pub fn read_dataset(path: &Path) -> SynthResult<serde_json::Value> {
    let contents = fs::read(path).map_err(|e| SynthError::InputReadFailed {
        reason: format!("failed to read dataset '{}': {}", path.display(), e),
    })?;
    serde_json::from_slice(&contents).map_err(|e| SynthError::SerializationFailed {
        reason: format!("'{}' is not valid JSON: {}", path.display(), e),
    })
}

/// Replace `path` with `bytes` via a temporary sibling and a rename.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> SynthResult<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| SynthError::OutputWriteFailed {
            reason: format!("'{}' does not name a file", path.display()),
        })?
        .to_string_lossy();
    let tmp = path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));

    let result = File::create(&tmp)
        .and_then(|mut f| {
            f.write_all(bytes)?;
            f.sync_all()
        })
        .and_then(|()| fs::rename(&tmp, path));

    result.map_err(|e| {
        if tmp.exists() {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                warn!(tmp = %tmp.display(), error = %cleanup, "could not remove temporary file");
            }
        }
        SynthError::OutputWriteFailed {
            reason: format!("failed to write '{}': {}", path.display(), e),
        }
    })
}
