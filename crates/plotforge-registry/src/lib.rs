//! Plotforge Artifact Registry
//!
//! Persisted, content-addressed provenance store with idempotent
//! upsert-by-name, lineage edges, and discovery queries.
//!
//! # Core Concepts
//!
//! - [`PlotRegistry`]: explicit registry handle; read-modify-write-persist
//!   happens wholly inside each [`PlotRegistry::register`] call
//! - [`ContentHash`]: Blake3 digest of artifact file bytes
//! - [`ArtifactRecord`]: one provenance entry, keyed by name
//! - [`ValidationReport`]: structured health check for report gating
//! - [`discover_latest_by_pattern`]: degraded-mode lookup when no registry
//!   entry exists yet
//!
//! # Example
//!
//! ```rust,no_run
//! use plotforge_registry::{PlotRegistry, RegisterRequest};
//!
//! # fn main() -> Result<(), plotforge_registry::RegistryError> {
//! let mut registry = PlotRegistry::init(
//!     "artifacts/registry.json",
//!     "1.0.0",
//!     ["raw_data", "plot", "report"],
//! )?;
//! registry.register(
//!     RegisterRequest::new("scatter_main", "plot", "daily", "out/scatter.png")
//!         .with_inputs(vec!["raw_main".to_string()]),
//! )?;
//! assert!(registry.verify("scatter_main")?.is_verified());
//! # Ok(())
//! # }
//! ```

mod error;
mod hash;
mod record;
mod registry;
mod validate;

pub use error::RegistryError;
pub use hash::{ContentHash, HashParseError};
pub use record::{ArtifactRecord, RegistryDocument, REGISTRY_VERSION};
pub use registry::{PlotRegistry, RegisterRequest, VerifyOutcome};
pub use validate::{discover_latest_by_pattern, PatternDiscovery, ValidationReport};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
