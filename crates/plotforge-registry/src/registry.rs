//! The registry handle
//!
//! [`PlotRegistry`] owns the registry document, its on-disk path, and the
//! domain's artifact-type vocabulary. Every mutation follows the same
//! discipline: read state, modify in memory, persist synchronously before
//! returning. The design assumes a single writer process; concurrent
//! writers are unsupported.

use crate::error::RegistryError;
use crate::hash::ContentHash;
use crate::record::{ArtifactRecord, RegistryDocument, REGISTRY_VERSION};
use chrono::Utc;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Parameters for one registration
///
/// Built with the usual builder methods; only identity, type, workflow, and
/// file path are mandatory.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    /// Registry-unique artifact name
    pub name: String,
    /// Artifact type tag
    pub artifact_type: String,
    /// Workflow label
    pub workflow: String,
    /// File to register
    pub file_path: PathBuf,
    /// Lineage edges by registry name
    pub input_artifacts: Vec<String>,
    /// Free-form metadata
    pub metadata: BTreeMap<String, Value>,
    /// Optional encoding-independent data hash
    pub data_hash: Option<ContentHash>,
}

impl RegisterRequest {
    /// Create a request with the mandatory fields
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        artifact_type: impl Into<String>,
        workflow: impl Into<String>,
        file_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            artifact_type: artifact_type.into(),
            workflow: workflow.into(),
            file_path: file_path.into(),
            input_artifacts: Vec::new(),
            metadata: BTreeMap::new(),
            data_hash: None,
        }
    }

    /// With lineage inputs
    #[inline]
    #[must_use]
    pub fn with_inputs(mut self, inputs: Vec<String>) -> Self {
        self.input_artifacts = inputs;
        self
    }

    /// With a metadata entry
    #[inline]
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// With an encoding-independent data hash
    #[inline]
    #[must_use]
    pub fn with_data_hash(mut self, hash: ContentHash) -> Self {
        self.data_hash = Some(hash);
        self
    }
}

/// Outcome of verifying a registered artifact against its on-disk bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// File exists and its hash matches the record
    Verified,
    /// File has been moved or deleted
    MissingFile,
    /// File exists but its bytes changed since registration
    HashMismatch,
}

impl VerifyOutcome {
    /// True only for [`VerifyOutcome::Verified`]
    #[inline]
    #[must_use]
    pub fn is_verified(&self) -> bool {
        matches!(self, VerifyOutcome::Verified)
    }
}

/// Persistent, content-addressed artifact registry
///
/// Always passed as an explicit handle; never a process-global.
#[derive(Debug)]
pub struct PlotRegistry {
    path: PathBuf,
    allowed_types: BTreeSet<String>,
    doc: RegistryDocument,
}

impl PlotRegistry {
    /// Open or create the registry at `path`
    ///
    /// An existing document is loaded, never overwritten; otherwise an
    /// empty versioned document is created and persisted immediately.
    /// Idempotent across repeated calls against the same path.
    ///
    /// The artifact-type vocabulary is caller-supplied so different domains
    /// can define their own; it is configuration, not persisted state.
    ///
    /// # Errors
    /// Fails on unreadable/corrupt documents, unsupported format versions,
    /// or when the initial persist of a fresh registry fails.
    pub fn init(
        path: impl Into<PathBuf>,
        pipeline_version: impl Into<String>,
        allowed_types: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, RegistryError> {
        let path = path.into();
        let allowed_types: BTreeSet<String> =
            allowed_types.into_iter().map(Into::into).collect();

        if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|source| RegistryError::Io {
                path: path.clone(),
                source,
            })?;
            let doc: RegistryDocument =
                serde_json::from_str(&raw).map_err(|source| RegistryError::Corrupt {
                    path: path.clone(),
                    source,
                })?;
            if doc.registry_version != REGISTRY_VERSION {
                return Err(RegistryError::UnsupportedVersion {
                    found: doc.registry_version,
                    supported: REGISTRY_VERSION,
                });
            }
            debug!(path = %path.display(), entries = doc.artifacts.len(), "loaded existing registry");
            return Ok(Self {
                path,
                allowed_types,
                doc,
            });
        }

        let registry = Self {
            doc: RegistryDocument::empty(pipeline_version),
            path,
            allowed_types,
        };
        registry.persist()?;
        info!(path = %registry.path.display(), "created empty registry");
        Ok(registry)
    }

    /// Registry file path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of registered artifacts
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.doc.artifacts.len()
    }

    /// Whether the registry has no entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.doc.artifacts.is_empty()
    }

    /// Look up an entry by name
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ArtifactRecord> {
        self.doc.artifacts.get(name)
    }

    /// All entries, keyed by name
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &BTreeMap<String, ArtifactRecord> {
        &self.doc.artifacts
    }

    /// Register an artifact, replacing any prior entry with the same name
    ///
    /// The upsert-by-name semantics are what keep the registry from growing
    /// without bound across repeated pipeline runs. The file hash is always
    /// recomputed from the current on-disk bytes, and the full document is
    /// persisted synchronously before returning.
    ///
    /// # Errors
    /// - [`RegistryError::DisallowedType`] when the type is outside the vocabulary
    /// - [`RegistryError::ArtifactFileNotFound`] when the file does not exist
    /// - I/O errors from hashing or persisting
    pub fn register(&mut self, request: RegisterRequest) -> Result<&ArtifactRecord, RegistryError> {
        if !self.allowed_types.contains(&request.artifact_type) {
            return Err(RegistryError::DisallowedType {
                artifact_type: request.artifact_type,
                allowed: self.allowed_types.iter().cloned().collect(),
            });
        }
        if !request.file_path.is_file() {
            return Err(RegistryError::ArtifactFileNotFound(request.file_path));
        }

        let file_hash =
            ContentHash::compute_file(&request.file_path).map_err(|source| RegistryError::Io {
                path: request.file_path.clone(),
                source,
            })?;
        let file_size = fs::metadata(&request.file_path)
            .map_err(|source| RegistryError::Io {
                path: request.file_path.clone(),
                source,
            })?
            .len();

        let record = ArtifactRecord {
            name: request.name.clone(),
            artifact_type: request.artifact_type,
            workflow: request.workflow,
            file_path: request.file_path,
            file_hash,
            file_size,
            created_at: Utc::now(),
            pipeline_version: self.doc.pipeline_version.clone(),
            input_artifacts: request.input_artifacts,
            metadata: request.metadata,
            data_hash: request.data_hash,
        };

        let replaced = self
            .doc
            .artifacts
            .insert(request.name.clone(), record)
            .is_some();
        self.persist()?;

        debug!(
            name = %request.name,
            hash = %file_hash.short(),
            replaced,
            "registered artifact"
        );
        // Entry was just inserted under this key
        Ok(&self.doc.artifacts[&request.name])
    }

    /// Verify a registered artifact against its current on-disk bytes
    ///
    /// Mismatches come back as values, never errors, distinguishing a
    /// moved/deleted file from changed content. Both cases log a warning.
    ///
    /// # Errors
    /// Only [`RegistryError::UnknownArtifact`] when no entry has this name.
    pub fn verify(&self, name: &str) -> Result<VerifyOutcome, RegistryError> {
        let record = self
            .get(name)
            .ok_or_else(|| RegistryError::UnknownArtifact(name.to_string()))?;

        if !record.file_path.is_file() {
            warn!(name, path = %record.file_path.display(), "artifact file moved or deleted");
            return Ok(VerifyOutcome::MissingFile);
        }
        let current =
            ContentHash::compute_file(&record.file_path).map_err(|source| RegistryError::Io {
                path: record.file_path.clone(),
                source,
            })?;
        if current != record.file_hash {
            warn!(
                name,
                expected = %record.file_hash.short(),
                actual = %current.short(),
                "artifact content changed since registration"
            );
            return Ok(VerifyOutcome::HashMismatch);
        }
        Ok(VerifyOutcome::Verified)
    }

    /// Latest entry of a given type, by registration timestamp
    ///
    /// Ties on identical timestamps break deterministically toward the
    /// lexicographically greatest name.
    #[must_use]
    pub fn get_latest(&self, artifact_type: &str) -> Option<&ArtifactRecord> {
        self.doc
            .artifacts
            .values()
            .filter(|r| r.artifact_type == artifact_type)
            .max_by(|a, b| {
                a.created_at
                    .cmp(&b.created_at)
                    .then_with(|| a.name.cmp(&b.name))
            })
    }

    /// Persist the full document synchronously
    fn persist(&self) -> Result<(), RegistryError> {
        let json = serde_json::to_string_pretty(&self.doc).map_err(|source| {
            RegistryError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, json).map_err(|source| RegistryError::Io {
            path: self.path.clone(),
            source,
        })
    }

    #[cfg(test)]
    pub(crate) fn document_mut(&mut self) -> &mut RegistryDocument {
        &mut self.doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::TempDir;

    const TYPES: [&str; 3] = ["raw_data", "plot", "report"];

    fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    fn fresh_registry(dir: &Path) -> PlotRegistry {
        PlotRegistry::init(dir.join("registry.json"), "1.0.0", TYPES).unwrap()
    }

    #[test]
    fn init_is_idempotent_and_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let file = write_file(dir.path(), "x.csv", b"data");

        let mut registry = fresh_registry(dir.path());
        registry
            .register(RegisterRequest::new("raw1", "raw_data", "ingest", &file))
            .unwrap();
        drop(registry);

        // Re-init against the same path must load, not recreate
        let reopened = fresh_registry(dir.path());
        assert_eq!(reopened.len(), 1);
        assert!(reopened.get("raw1").is_some());
    }

    #[test]
    fn disallowed_type_is_rejected() {
        let dir = TempDir::new().unwrap();
        let file = write_file(dir.path(), "x.csv", b"data");
        let mut registry = fresh_registry(dir.path());

        let result = registry.register(RegisterRequest::new("x", "model", "train", &file));
        assert!(matches!(result, Err(RegistryError::DisallowedType { .. })));
        assert!(registry.is_empty());
    }

    #[test]
    fn missing_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut registry = fresh_registry(dir.path());

        let result = registry.register(RegisterRequest::new(
            "x",
            "plot",
            "plots",
            dir.path().join("ghost.png"),
        ));
        assert!(matches!(
            result,
            Err(RegistryError::ArtifactFileNotFound(_))
        ));
    }

    #[test]
    fn upsert_replaces_prior_entry() {
        let dir = TempDir::new().unwrap();
        let first = write_file(dir.path(), "v1.csv", b"version one");
        let second = write_file(dir.path(), "v2.csv", b"version two");
        let mut registry = fresh_registry(dir.path());

        registry
            .register(RegisterRequest::new("raw1", "raw_data", "ingest", &first))
            .unwrap();
        registry
            .register(RegisterRequest::new("raw1", "raw_data", "ingest", &second))
            .unwrap();

        assert_eq!(registry.len(), 1);
        let record = registry.get("raw1").unwrap();
        assert_eq!(record.file_hash, ContentHash::compute(b"version two"));
        assert_eq!(record.file_size, 11);
    }

    #[test]
    fn verify_distinguishes_missing_from_changed() {
        let dir = TempDir::new().unwrap();
        let file = write_file(dir.path(), "a.png", b"original");
        let mut registry = fresh_registry(dir.path());
        registry
            .register(RegisterRequest::new("a", "plot", "plots", &file))
            .unwrap();

        assert_eq!(registry.verify("a").unwrap(), VerifyOutcome::Verified);

        fs::write(&file, b"tampered").unwrap();
        assert_eq!(registry.verify("a").unwrap(), VerifyOutcome::HashMismatch);

        fs::remove_file(&file).unwrap();
        assert_eq!(registry.verify("a").unwrap(), VerifyOutcome::MissingFile);
    }

    #[test]
    fn verify_unknown_name_is_an_error() {
        let dir = TempDir::new().unwrap();
        let registry = fresh_registry(dir.path());
        assert!(matches!(
            registry.verify("nobody"),
            Err(RegistryError::UnknownArtifact(_))
        ));
    }

    #[test]
    fn get_latest_by_timestamp() {
        let dir = TempDir::new().unwrap();
        let file = write_file(dir.path(), "a.csv", b"data");
        let mut registry = fresh_registry(dir.path());

        registry
            .register(RegisterRequest::new("old", "raw_data", "ingest", &file))
            .unwrap();
        registry
            .register(RegisterRequest::new("new", "raw_data", "ingest", &file))
            .unwrap();

        // Force distinct, known timestamps
        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        registry.document_mut().artifacts.get_mut("old").unwrap().created_at = t0;
        registry.document_mut().artifacts.get_mut("new").unwrap().created_at = t1;

        assert_eq!(registry.get_latest("raw_data").unwrap().name, "new");
        assert!(registry.get_latest("report").is_none());
    }

    #[test]
    fn get_latest_tie_breaks_on_name() {
        let dir = TempDir::new().unwrap();
        let file = write_file(dir.path(), "a.csv", b"data");
        let mut registry = fresh_registry(dir.path());

        registry
            .register(RegisterRequest::new("alpha", "raw_data", "ingest", &file))
            .unwrap();
        registry
            .register(RegisterRequest::new("beta", "raw_data", "ingest", &file))
            .unwrap();

        let tied = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        for record in registry.document_mut().artifacts.values_mut() {
            record.created_at = tied;
        }

        assert_eq!(registry.get_latest("raw_data").unwrap().name, "beta");
    }

    #[test]
    fn register_persists_synchronously() {
        let dir = TempDir::new().unwrap();
        let file = write_file(dir.path(), "a.csv", b"data");
        let registry_path = dir.path().join("registry.json");
        let mut registry =
            PlotRegistry::init(&registry_path, "1.0.0", TYPES).unwrap();

        registry
            .register(
                RegisterRequest::new("raw1", "raw_data", "ingest", &file)
                    .with_inputs(vec!["upstream".to_string()])
                    .with_metadata("rows", serde_json::json!(128))
                    .with_data_hash(ContentHash::compute(b"logical")),
            )
            .unwrap();

        let on_disk: RegistryDocument =
            serde_json::from_str(&fs::read_to_string(&registry_path).unwrap()).unwrap();
        let record = &on_disk.artifacts["raw1"];
        assert_eq!(record.input_artifacts, vec!["upstream"]);
        assert_eq!(record.metadata["rows"], serde_json::json!(128));
        assert!(record.data_hash.is_some());
        assert_eq!(record.pipeline_version, "1.0.0");
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let dir = TempDir::new().unwrap();
        let registry_path = dir.path().join("registry.json");
        let doc = serde_json::json!({
            "registry_version": 99,
            "created_utc": "2026-01-01T00:00:00Z",
            "pipeline_version": "1.0.0",
            "artifacts": {}
        });
        fs::write(&registry_path, doc.to_string()).unwrap();

        let result = PlotRegistry::init(&registry_path, "1.0.0", TYPES);
        assert!(matches!(
            result,
            Err(RegistryError::UnsupportedVersion { found: 99, .. })
        ));
    }
}
