//! Module interface and capability validation
//!
//! Plot modules are objects implementing [`PlotModule`]. Each module
//! self-reports its capability set; [`validate_interface`] compares that set
//! against the requirement for the module's declared type and classifies the
//! module as full-contract or minimal-contract.
//!
//! The minimal contract (single-item generator only) is a
//! backward-compatibility seam: the orchestrator can still drive such a
//! module with a degraded convention instead of requiring every module to be
//! rewritten at once.

use crate::error::ModuleError;
use crate::spec::{PlotConfig, PlotSpec};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// A single capability a module can expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Provides descriptive metadata about itself
    Metadata,
    /// Publishes a catalog of producible items
    Catalog,
    /// Generates a single item on demand
    GenerateSingle,
    /// Generates a batch of items in one call
    GenerateBatch,
}

impl Capability {
    /// Stable string tag, matching the manifest vocabulary
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Metadata => "metadata",
            Capability::Catalog => "catalog",
            Capability::GenerateSingle => "generate_single",
            Capability::GenerateBatch => "generate_batch",
        }
    }
}

/// Set of capabilities exposed by a module
pub type CapabilitySet = BTreeSet<Capability>;

/// Required capability set for a module type tag
///
/// Unknown type tags require only the single-item generator, the floor any
/// executable module must meet.
#[must_use]
pub fn required_capabilities(module_type: &str) -> CapabilitySet {
    match module_type {
        "plot" => [
            Capability::Metadata,
            Capability::Catalog,
            Capability::GenerateSingle,
            Capability::GenerateBatch,
        ]
        .into_iter()
        .collect(),
        _ => [Capability::GenerateSingle].into_iter().collect(),
    }
}

/// Descriptive metadata a full-contract module publishes about itself
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleMetadata {
    /// Module name
    pub name: String,
    /// Module version string
    pub version: String,
    /// One-line description
    pub description: String,
}

/// Tabular dataset handed to generators
///
/// Deliberately narrow: the orchestration layer never inspects cell values,
/// only shape and column names. Loading and schema validation live behind
/// the data-loader collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// Dataset name (usually the source file stem)
    pub name: String,
    /// Column names
    pub columns: Vec<String>,
    /// Row count
    pub rows: usize,
    /// Loader-supplied metadata
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Dataset {
    /// Create a dataset handle
    #[must_use]
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: usize) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
            metadata: BTreeMap::new(),
        }
    }
}

/// Output of a single generator call
#[derive(Debug, Clone)]
pub struct RenderedPlot {
    /// Catalog item id this plot was produced from
    pub item_id: String,
    /// Encoded image bytes
    pub bytes: Vec<u8>,
    /// Image format tag (e.g. `"png"`)
    pub format: String,
    /// Where the plot was durably saved, if it was
    pub saved_path: Option<PathBuf>,
}

impl RenderedPlot {
    /// Create an in-memory rendered plot
    #[must_use]
    pub fn new(item_id: impl Into<String>, bytes: Vec<u8>, format: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            bytes,
            format: format.into(),
            saved_path: None,
        }
    }
}

/// Interface every plot module implements
///
/// `render_item` and `capabilities` are the floor; `metadata`, `catalog`,
/// and `render_batch` have defaults so a minimal-contract module only
/// implements the generator. A module must not report a capability its
/// implementation does not back.
pub trait PlotModule: Send + Sync {
    /// Capability self-report, compared against the declared manifest set
    fn capabilities(&self) -> CapabilitySet;

    /// Module metadata; `None` for minimal-contract modules
    fn metadata(&self) -> Option<ModuleMetadata> {
        None
    }

    /// Catalog of producible items; empty for minimal-contract modules
    fn catalog(&self) -> Vec<PlotSpec> {
        Vec::new()
    }

    /// Generate a single item
    ///
    /// `config` is the already-merged effective configuration.
    ///
    /// # Errors
    /// Returns [`ModuleError::RenderFailed`] when the underlying renderer
    /// cannot produce the item.
    fn render_item(
        &self,
        data: &Dataset,
        spec: &PlotSpec,
        config: &PlotConfig,
    ) -> Result<RenderedPlot, ModuleError>;

    /// Generate several items in one call
    ///
    /// Default implementation loops [`PlotModule::render_item`]; modules
    /// with a cheaper batch path override it.
    fn render_batch(
        &self,
        data: &Dataset,
        specs: &[PlotSpec],
        config: &PlotConfig,
    ) -> Vec<(String, Result<RenderedPlot, ModuleError>)> {
        specs
            .iter()
            .map(|spec| (spec.id.clone(), self.render_item(data, spec, config)))
            .collect()
    }
}

/// Contract style classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStyle {
    /// All capabilities required for the type are present
    Full,
    /// Only the single-item generator is present
    Minimal,
}

/// Result of validating a module against its type's required capabilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterfaceReport {
    /// Type tag the module was validated against
    pub module_type: String,
    /// Capabilities the module reports
    pub present: CapabilitySet,
    /// Required capabilities the module lacks
    pub missing: CapabilitySet,
    /// Contract classification; `None` when the module is not executable
    pub contract: Option<ContractStyle>,
}

impl InterfaceReport {
    /// Whether the orchestrator may execute this module
    ///
    /// A module failing validation stays loaded for introspection but must
    /// be excluded from orchestrated execution.
    #[inline]
    #[must_use]
    pub fn is_executable(&self) -> bool {
        self.contract.is_some()
    }
}

/// Validate a module's capability set against its declared type
///
/// Read-only: the module is never mutated or unloaded. Classification:
/// - every required capability present → [`ContractStyle::Full`]
/// - single-item generator present but others missing → [`ContractStyle::Minimal`]
/// - no single-item generator → not executable
#[must_use]
pub fn validate_interface(module: &dyn PlotModule, module_type: &str) -> InterfaceReport {
    let required = required_capabilities(module_type);
    let present = module.capabilities();
    let missing: CapabilitySet = required.difference(&present).copied().collect();

    let contract = if missing.is_empty() {
        Some(ContractStyle::Full)
    } else if present.contains(&Capability::GenerateSingle) {
        Some(ContractStyle::Minimal)
    } else {
        None
    };

    InterfaceReport {
        module_type: module_type.to_string(),
        present,
        missing,
        contract,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FullModule;

    impl PlotModule for FullModule {
        fn capabilities(&self) -> CapabilitySet {
            required_capabilities("plot")
        }

        fn metadata(&self) -> Option<ModuleMetadata> {
            Some(ModuleMetadata {
                name: "full".to_string(),
                version: "1.0.0".to_string(),
                description: "test module".to_string(),
            })
        }

        fn catalog(&self) -> Vec<PlotSpec> {
            vec![PlotSpec::bare("a"), PlotSpec::bare("b")]
        }

        fn render_item(
            &self,
            _data: &Dataset,
            spec: &PlotSpec,
            _config: &PlotConfig,
        ) -> Result<RenderedPlot, ModuleError> {
            Ok(RenderedPlot::new(&spec.id, vec![1, 2, 3], "png"))
        }
    }

    struct MinimalModule;

    impl PlotModule for MinimalModule {
        fn capabilities(&self) -> CapabilitySet {
            [Capability::GenerateSingle].into_iter().collect()
        }

        fn render_item(
            &self,
            _data: &Dataset,
            spec: &PlotSpec,
            _config: &PlotConfig,
        ) -> Result<RenderedPlot, ModuleError> {
            Ok(RenderedPlot::new(&spec.id, vec![0], "png"))
        }
    }

    struct BrokenModule;

    impl PlotModule for BrokenModule {
        fn capabilities(&self) -> CapabilitySet {
            [Capability::Metadata].into_iter().collect()
        }

        fn render_item(
            &self,
            _data: &Dataset,
            spec: &PlotSpec,
            _config: &PlotConfig,
        ) -> Result<RenderedPlot, ModuleError> {
            Err(ModuleError::RenderFailed {
                item_id: spec.id.clone(),
                reason: "not implemented".to_string(),
            })
        }
    }

    fn dataset() -> Dataset {
        Dataset::new("test", vec!["x".to_string(), "y".to_string()], 10)
    }

    #[test]
    fn full_module_classified_full() {
        let report = validate_interface(&FullModule, "plot");
        assert_eq!(report.contract, Some(ContractStyle::Full));
        assert!(report.missing.is_empty());
        assert!(report.is_executable());
    }

    #[test]
    fn minimal_module_classified_minimal() {
        let report = validate_interface(&MinimalModule, "plot");
        assert_eq!(report.contract, Some(ContractStyle::Minimal));
        assert!(report.missing.contains(&Capability::Catalog));
        assert!(report.is_executable());
    }

    #[test]
    fn module_without_generator_not_executable() {
        let report = validate_interface(&BrokenModule, "plot");
        assert_eq!(report.contract, None);
        assert!(!report.is_executable());
    }

    #[test]
    fn unknown_type_requires_only_generator() {
        let report = validate_interface(&MinimalModule, "domain");
        assert_eq!(report.contract, Some(ContractStyle::Full));
    }

    #[test]
    fn default_batch_loops_single_generator() {
        let specs = vec![PlotSpec::bare("a"), PlotSpec::bare("b")];
        let results = FullModule.render_batch(&dataset(), &specs, &PlotConfig::new());
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|(_, r)| r.is_ok()));
    }
}
