//! Artifact records and the persisted registry document
//!
//! The registry persists as one versioned, pretty-printed JSON document so
//! it stays human-diffable across pipeline runs. Entries live in a
//! `BTreeMap` keyed by artifact name, which both enforces the upsert-by-name
//! invariant and keeps serialization order stable.

use crate::hash::ContentHash;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Current registry document format version
pub const REGISTRY_VERSION: u32 = 1;

/// Provenance record for one pipeline-produced file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactRecord {
    /// Registry-unique name
    pub name: String,
    /// Artifact type tag (validated against the domain allow-list)
    pub artifact_type: String,
    /// Workflow label that produced this artifact
    pub workflow: String,
    /// Location of the artifact file
    pub file_path: PathBuf,
    /// Blake3 hash of the file bytes at registration time
    pub file_hash: ContentHash,
    /// File size in bytes at registration time
    pub file_size: u64,
    /// Registration timestamp
    pub created_at: DateTime<Utc>,
    /// Pipeline version that produced this artifact
    pub pipeline_version: String,
    /// Lineage edges: names of registry entries this artifact was built from
    #[serde(default)]
    pub input_artifacts: Vec<String>,
    /// Free-form metadata
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
    /// Hash of the logical data, independent of file encoding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_hash: Option<ContentHash>,
}

/// The persisted registry document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryDocument {
    /// Document format version
    pub registry_version: u32,
    /// When this registry was first created
    pub created_utc: DateTime<Utc>,
    /// Pipeline version that owns this registry
    pub pipeline_version: String,
    /// Entries keyed by artifact name
    pub artifacts: BTreeMap<String, ArtifactRecord>,
}

impl RegistryDocument {
    /// Create an empty document for the current format version
    #[must_use]
    pub fn empty(pipeline_version: impl Into<String>) -> Self {
        Self {
            registry_version: REGISTRY_VERSION,
            created_utc: Utc::now(),
            pipeline_version: pipeline_version.into(),
            artifacts: BTreeMap::new(),
        }
    }
}
