//! Item specifications and plot configuration
//!
//! A [`PlotSpec`] describes one producible item in a module's catalog: its
//! identity, numeric parameters, color specification, and grouping tags.
//! [`PlotConfig`] is the caller-side configuration merged against a spec
//! before invoking the generator.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Color specification for a plot item
///
/// Either a named palette resolved by the renderer, or an explicit ordered
/// color list. An explicit list always overrides a named palette on merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSpec {
    /// Named palette (e.g. `"viridis"`)
    Palette(String),
    /// Explicit ordered color list (e.g. hex strings)
    Explicit(Vec<String>),
}

impl ColorSpec {
    /// Resolve the stronger of two color specifications
    ///
    /// An explicit list beats a named palette regardless of which side it
    /// came from; when both sides are the same kind, `override_spec` wins.
    #[must_use]
    pub fn resolve(base: Option<&ColorSpec>, override_spec: Option<&ColorSpec>) -> Option<ColorSpec> {
        match (base, override_spec) {
            (Some(ColorSpec::Explicit(list)), Some(ColorSpec::Palette(_))) => {
                Some(ColorSpec::Explicit(list.clone()))
            }
            (_, Some(spec)) => Some(spec.clone()),
            (Some(spec), None) => Some(spec.clone()),
            (None, None) => None,
        }
    }
}

/// One producible item in a module's catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotSpec {
    /// Identifier, unique within the owning module
    pub id: String,
    /// Display label for reports
    pub label: String,
    /// Numeric parameters consumed by the renderer
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
    /// Color specification
    #[serde(default)]
    pub colors: Option<ColorSpec>,
    /// Grouping tags used by reporting
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PlotSpec {
    /// Create a bare spec with only an id and matching label
    ///
    /// Used when calling a minimal-contract module that publishes no catalog.
    #[must_use]
    pub fn bare(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            params: BTreeMap::new(),
            colors: None,
            tags: Vec::new(),
        }
    }
}

/// Caller-side plot configuration
///
/// Merged against a catalog [`PlotSpec`] by the orchestrator before a
/// generator call. Spec parameters fill gaps; config parameters win on
/// conflict. Color resolution follows [`ColorSpec::resolve`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Renderer parameters; override spec params on key conflict
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
    /// Caller color override
    #[serde(default)]
    pub colors: Option<ColorSpec>,
    /// Output directory for durable persistence; `None` keeps output in memory
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl PlotConfig {
    /// Create an empty configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With an output directory
    #[inline]
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// With a color specification
    #[inline]
    #[must_use]
    pub fn with_colors(mut self, colors: ColorSpec) -> Self {
        self.colors = Some(colors);
        self
    }

    /// With a single parameter
    #[inline]
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: f64) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    /// Merge a catalog spec into this configuration
    ///
    /// Returns the effective configuration for a generator call: spec params
    /// fill missing keys, config params win on conflict, and color
    /// resolution applies the explicit-beats-palette rule.
    #[must_use]
    pub fn merged_with(&self, spec: &PlotSpec) -> PlotConfig {
        let mut params = spec.params.clone();
        for (key, value) in &self.params {
            params.insert(key.clone(), *value);
        }
        PlotConfig {
            params,
            colors: ColorSpec::resolve(spec.colors.as_ref(), self.colors.as_ref()),
            output_dir: self.output_dir.clone(),
        }
    }
}
