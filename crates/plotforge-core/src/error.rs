//! Error types for orchestration
//!
//! The taxonomy follows one rule set: configuration errors are `Err` returns
//! the caller must handle and are never retried; I/O failures with an
//! in-memory fallback degrade the result instead of failing it; validation
//! mismatches travel as structured reports, not errors.

use plotforge_module::ModuleError;
use plotforge_registry::RegistryError;

/// Main orchestration error type
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Module failed interface validation and may not be executed
    #[error("module '{module}' is not executable: missing {missing:?}")]
    ModuleNotExecutable {
        module: String,
        missing: Vec<String>,
    },

    /// Full-catalog batch requested from a module that publishes no catalog
    #[error("module '{0}' publishes no catalog; item ids must be given explicitly")]
    CatalogUnavailable(String),

    /// First failure under `continue_on_error = false`
    #[error("batch aborted at item '{item_id}': {message}")]
    ItemFailed { item_id: String, message: String },

    /// Module subsystem error
    #[error("module error: {0}")]
    Module(#[from] ModuleError),

    /// Registry error
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Report rendering failed
    #[error("report rendering failed: {0}")]
    ReportFailed(String),
}
