//! Error types for module discovery, loading, and execution

use std::path::PathBuf;

/// Errors raised by the module subsystem
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    /// Module root directory does not exist
    #[error("module root not found: {0}")]
    RootNotFound(PathBuf),

    /// Filesystem access failed while scanning
    #[error("module scan failed at {path}: {source}")]
    ScanFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No factory registered for a backend key
    #[error("no factory registered for backend '{0}'")]
    UnknownBackend(String),

    /// Factory failed to construct the module
    #[error("module construction failed for '{name}': {reason}")]
    ConstructionFailed { name: String, reason: String },

    /// Requested catalog item does not exist
    #[error("unknown item id '{item_id}' in module '{module}'")]
    UnknownItem { module: String, item_id: String },

    /// Rendering failed inside the module
    #[error("render failed for item '{item_id}': {reason}")]
    RenderFailed { item_id: String, reason: String },

    /// Operation not supported by a minimal-contract module
    #[error("capability '{capability}' not supported by module '{module}'")]
    Unsupported { module: String, capability: String },
}
