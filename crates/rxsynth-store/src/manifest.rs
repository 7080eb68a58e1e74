//! Run manifest: what was written, where, and its digest.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Describes one dataset file produced by `DatasetWriter::write`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetManifest {
    /// Fresh v4 UUID per written dataset.
    pub run_id: Uuid,

    /// Final location of the dataset.
    pub path: PathBuf,

    /// Number of user records in the file.
    pub user_count: usize,

    /// Size of the file in bytes.
    pub bytes: u64,

    /// SHA-256 (hex) of the file contents.
    pub sha256: String,

    /// Wall-clock time (UTC) the file was moved into place.
    pub written_at: DateTime<Utc>,

    /// Seed the run was generated from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl DatasetManifest {
    /// Conventional sidecar location: `<dataset>.manifest.json`.
    pub fn sidecar_path(dataset: &Path) -> PathBuf {
        let mut name = dataset
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".manifest.json");
        dataset.with_file_name(name)
    }
}
