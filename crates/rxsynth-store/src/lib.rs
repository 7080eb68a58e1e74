//! # rxsynth-store
//!
//! Dataset persistence for rxsynth.
//!
//! ## Overview
//!
//! `DatasetWriter` serializes a generated population to pretty-printed JSON
//! and moves it into place atomically. Each write yields a `DatasetManifest`
//! carrying a run ID, the record count and a SHA-256 digest of the bytes on
//! disk, which `digest_file` can later recompute to detect edits.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rxsynth_store::DatasetWriter;
//!
//! let manifest = DatasetWriter::new().write(Path::new("users.json"), &users)?;
//! println!("{} users, sha256 {}", manifest.user_count, manifest.sha256);
//! ```

pub mod digest;
pub mod manifest;
pub mod writer;

pub use digest::{digest_bytes, digest_file};
pub use manifest::DatasetManifest;
pub use writer::{read_dataset, write_atomically, DatasetWriter};

// ── Tests ─────────────────────────────────────────────────────────────────────
