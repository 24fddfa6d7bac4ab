//! Module manifests and descriptors
//!
//! Each module directory carries a `module.toml` manifest declaring its
//! identity, type tag, backend factory key, and capability set. Discovery
//! parses the manifest into a [`ModuleDescriptor`]; descriptors are rebuilt
//! on every discovery pass and never persisted.

use crate::interface::{Capability, CapabilitySet};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Designated manifest file name inside each module directory
pub const MANIFEST_FILE: &str = "module.toml";

/// Parsed `module.toml` contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleManifest {
    /// Module name; defaults to the directory name when absent
    #[serde(default)]
    pub name: Option<String>,
    /// Type tag (e.g. `"plot"`, `"domain"`)
    #[serde(rename = "type")]
    pub module_type: String,
    /// Factory key resolved by the loader
    pub backend: String,
    /// Declared capability set
    #[serde(default)]
    pub capabilities: Vec<Capability>,
}

/// A discovered module
#[derive(Debug, Clone)]
pub struct ModuleDescriptor {
    /// Module name (manifest name or directory name)
    pub name: String,
    /// Declared type tag
    pub module_type: String,
    /// Factory key for the loader
    pub backend: String,
    /// Module directory
    pub path: PathBuf,
    /// Manifest file path
    pub manifest_path: PathBuf,
    /// Capabilities declared in the manifest
    pub declared_capabilities: CapabilitySet,
}

impl ModuleDescriptor {
    /// Build a descriptor from a parsed manifest and its directory
    #[must_use]
    pub fn from_manifest(manifest: ModuleManifest, dir: &Path) -> Self {
        let dir_name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name: manifest.name.unwrap_or(dir_name),
            module_type: manifest.module_type,
            backend: manifest.backend,
            path: dir.to_path_buf(),
            manifest_path: dir.join(MANIFEST_FILE),
            declared_capabilities: manifest.capabilities.into_iter().collect(),
        }
    }
}
