//! Error types for the rxsynth workspace.
//!
//! All fallible operations return `SynthResult<T>`. Variants carry enough
//! context to tell the operator what failed and where.

use thiserror::Error;

/// The unified error type for rxsynth.
#[derive(Debug, Error)]
pub enum SynthError {
    /// A configuration value (catalog file, CLI argument) is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// Static catalog or vocabulary data violates a generator precondition,
    /// e.g. a sample size larger than the vocabulary it is drawn from.
    #[error("internal consistency error: {reason}")]
    InternalConsistency { reason: String },

    /// A dataset could not be encoded to or decoded from JSON.
    #[error("serialization failed: {reason}")]
    SerializationFailed { reason: String },

    /// The dataset file could not be written or moved into place.
    ///
    /// Fatal: the run aborts and no partial output is left at the target path.
    #[error("output write failed: {reason}")]
    OutputWriteFailed { reason: String },

    /// An input file (dataset, digest target) could not be read.
    #[error("input read failed: {reason}")]
    InputReadFailed { reason: String },

    /// The dataset schema document itself could not be compiled.
    #[error("schema validation error: {reason}")]
    SchemaValidation { reason: String },

    /// A dataset was checked and broke one or more rules.
    #[error("verification failed: {reason}")]
    VerificationFailed { reason: String },

    /// A page could not be fetched.
    #[error("failed to fetch '{url}': {reason}")]
    FetchFailed { url: String, reason: String },

    /// A page could not be rendered to PDF.
    #[error("failed to render '{url}': {reason}")]
    RenderFailed { url: String, reason: String },
}

/// Convenience alias used throughout the rxsynth crates.
pub type SynthResult<T> = Result<T, SynthError>;
