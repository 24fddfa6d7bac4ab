//! Testing utilities for the plotforge workspace
//!
//! Shared fixtures: deterministic renderers, canned plot modules, on-disk
//! module trees, and registry helpers.

#![allow(missing_docs)]

use plotforge_module::{
    required_capabilities, Capability, CapabilitySet, Dataset, ModuleDescriptor, ModuleError,
    ModuleFactoryRegistry, ModuleMetadata, PlotConfig, PlotModule, PlotSpec, RenderError,
    RenderedPlot, Renderer, MANIFEST_FILE,
};
use plotforge_registry::PlotRegistry;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Artifact type vocabulary used across workspace tests
pub const TEST_TYPES: [&str; 3] = ["raw_data", "plot", "report"];

/// Renderer producing deterministic bytes derived from the item id
#[derive(Debug, Default)]
pub struct SequenceRenderer;

impl Renderer for SequenceRenderer {
    fn render(
        &self,
        _data: &Dataset,
        spec: &PlotSpec,
        _config: &PlotConfig,
    ) -> Result<Vec<u8>, RenderError> {
        Ok(spec.id.bytes().rev().collect())
    }
}

/// Renderer that always fails, for hard-failure paths
#[derive(Debug, Default)]
pub struct FailingRenderer;

impl Renderer for FailingRenderer {
    fn render(
        &self,
        _data: &Dataset,
        spec: &PlotSpec,
        _config: &PlotConfig,
    ) -> Result<Vec<u8>, RenderError> {
        Err(RenderError::new(format!("cannot render '{}'", spec.id)))
    }
}

/// Full-contract module over a fixed catalog, delegating to a renderer
pub struct CatalogTestModule {
    name: String,
    specs: Vec<PlotSpec>,
    renderer: Box<dyn Renderer>,
}

impl CatalogTestModule {
    pub fn new(name: impl Into<String>, specs: Vec<PlotSpec>, renderer: Box<dyn Renderer>) -> Self {
        Self {
            name: name.into(),
            specs,
            renderer,
        }
    }

    /// Two-item catalog over a deterministic renderer
    pub fn standard() -> Self {
        Self::new(
            "standard",
            vec![PlotSpec::bare("scatter"), PlotSpec::bare("histogram")],
            Box::new(SequenceRenderer),
        )
    }
}

impl PlotModule for CatalogTestModule {
    fn capabilities(&self) -> CapabilitySet {
        required_capabilities("plot")
    }

    fn metadata(&self) -> Option<ModuleMetadata> {
        Some(ModuleMetadata {
            name: self.name.clone(),
            version: "0.0.0".to_string(),
            description: "test catalog module".to_string(),
        })
    }

    fn catalog(&self) -> Vec<PlotSpec> {
        self.specs.clone()
    }

    fn render_item(
        &self,
        data: &Dataset,
        spec: &PlotSpec,
        config: &PlotConfig,
    ) -> Result<RenderedPlot, ModuleError> {
        let bytes = self
            .renderer
            .render(data, spec, config)
            .map_err(|err| ModuleError::RenderFailed {
                item_id: spec.id.clone(),
                reason: err.reason,
            })?;
        Ok(RenderedPlot::new(&spec.id, bytes, self.renderer.format()))
    }
}

/// Minimal-contract module: generator only, no catalog or metadata
#[derive(Debug, Default)]
pub struct LegacyTestModule;

impl PlotModule for LegacyTestModule {
    fn capabilities(&self) -> CapabilitySet {
        [Capability::GenerateSingle].into_iter().collect()
    }

    fn render_item(
        &self,
        _data: &Dataset,
        spec: &PlotSpec,
        _config: &PlotConfig,
    ) -> Result<RenderedPlot, ModuleError> {
        Ok(RenderedPlot::new(&spec.id, vec![0x1F], "png"))
    }
}

/// Factory registry wired with the test backends
pub fn test_factories() -> ModuleFactoryRegistry {
    let mut registry = ModuleFactoryRegistry::new();
    registry.register("test.standard", |_d: &ModuleDescriptor| {
        Ok(Arc::new(CatalogTestModule::standard()) as Arc<dyn PlotModule>)
    });
    registry.register("test.legacy", |_d: &ModuleDescriptor| {
        Ok(Arc::new(LegacyTestModule) as Arc<dyn PlotModule>)
    });
    registry
}

/// Write one module directory with the given manifest body
pub fn write_module_dir(root: &Path, dir: &str, manifest: &str) {
    let module_dir = root.join(dir);
    fs::create_dir_all(&module_dir).unwrap();
    fs::write(module_dir.join(MANIFEST_FILE), manifest).unwrap();
}

/// A module tree with one full-contract and one minimal-contract module
pub fn standard_module_tree() -> TempDir {
    let root = TempDir::new().unwrap();
    write_module_dir(
        root.path(),
        "standard",
        r#"
        type = "plot"
        backend = "test.standard"
        capabilities = ["metadata", "catalog", "generate_single", "generate_batch"]
        "#,
    );
    write_module_dir(
        root.path(),
        "legacy",
        r#"
        type = "plot"
        backend = "test.legacy"
        capabilities = ["generate_single"]
        "#,
    );
    root
}

/// Fresh registry under `dir` with the standard test vocabulary
pub fn fresh_registry(dir: &Path) -> PlotRegistry {
    PlotRegistry::init(dir.join("registry.json"), "0.0.0-test", TEST_TYPES).unwrap()
}

/// Small four-row dataset with x/y columns
pub fn xy_dataset() -> Dataset {
    Dataset::new("sample", vec!["x".to_string(), "y".to_string()], 4)
}
