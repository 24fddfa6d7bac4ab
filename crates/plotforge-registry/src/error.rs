//! Error types for the artifact registry

use std::path::PathBuf;

/// Errors raised by registry operations
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Artifact type not in the caller-supplied allow-list
    #[error("artifact type '{artifact_type}' not allowed (allowed: {allowed:?})")]
    DisallowedType {
        artifact_type: String,
        allowed: Vec<String>,
    },

    /// Artifact file does not exist at registration time
    #[error("artifact file not found: {0}")]
    ArtifactFileNotFound(PathBuf),

    /// No entry with the given name
    #[error("unknown artifact: {0}")]
    UnknownArtifact(String),

    /// Registry document could not be read or written
    #[error("registry I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Registry document is not valid JSON for the current schema
    #[error("registry document corrupt at {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Persisted document carries an unsupported format version
    #[error("unsupported registry version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// A discovery glob pattern failed to compile
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}
