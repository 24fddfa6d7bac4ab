//! Registry health checks and degraded-mode discovery
//!
//! Validation mismatches come back as structured reports, never errors, so
//! batch and report flows can choose to proceed with a logged caveat.

use crate::error::RegistryError;
use crate::hash::ContentHash;
use crate::registry::PlotRegistry;
use globset::Glob;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{info, warn};
use walkdir::WalkDir;

/// Composite registry health report
///
/// Missing required types and missing files are hard errors; hash
/// mismatches are warnings only, so a pipeline is not aborted over
/// artifacts that legitimately change between regenerated runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Overall verdict: no hard errors
    pub valid: bool,
    /// Hard errors
    pub errors: Vec<String>,
    /// Soft findings
    pub warnings: Vec<String>,
    /// Required types with no entry
    pub missing_types: Vec<String>,
    /// Entries whose files are gone
    pub missing_files: Vec<String>,
    /// Entries whose bytes changed since registration
    pub hash_mismatches: Vec<String>,
}

/// Result of pattern-based degraded-mode discovery
#[derive(Debug, Clone)]
pub struct PatternDiscovery {
    /// Most-recently-modified match per category
    pub found: BTreeMap<String, PathBuf>,
    /// Categories with zero matches
    pub errors: Vec<String>,
}

impl PatternDiscovery {
    /// Whether every category matched at least one file
    #[inline]
    #[must_use]
    pub fn complete(&self) -> bool {
        self.errors.is_empty()
    }
}

impl PlotRegistry {
    /// Composite health check over the whole registry
    ///
    /// - every type in `required_types` must have at least one entry
    /// - every entry's file must still exist
    /// - with `check_hashes`, every file's bytes are rehashed and compared
    /// - lineage references to absent entries are reported as warnings
    ///   (referential integrity is checked here, not at write time)
    ///
    /// `verbose` logs each entry as it is checked.
    #[must_use]
    pub fn validate(
        &self,
        required_types: &[&str],
        check_hashes: bool,
        verbose: bool,
    ) -> ValidationReport {
        let mut report = ValidationReport {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            missing_types: Vec::new(),
            missing_files: Vec::new(),
            hash_mismatches: Vec::new(),
        };

        for required in required_types {
            let present = self
                .entries()
                .values()
                .any(|r| r.artifact_type == *required);
            if !present {
                report.missing_types.push((*required).to_string());
                report
                    .errors
                    .push(format!("no artifact of required type '{required}'"));
            }
        }

        for (name, record) in self.entries() {
            if verbose {
                info!(name, artifact_type = %record.artifact_type, "checking artifact");
            }

            if !record.file_path.is_file() {
                report.missing_files.push(name.clone());
                report.errors.push(format!(
                    "artifact '{}' file missing: {}",
                    name,
                    record.file_path.display()
                ));
                continue;
            }

            if check_hashes {
                match ContentHash::compute_file(&record.file_path) {
                    Ok(current) if current != record.file_hash => {
                        report.hash_mismatches.push(name.clone());
                        report.warnings.push(format!(
                            "artifact '{name}' content changed since registration"
                        ));
                    }
                    Ok(_) => {}
                    Err(err) => {
                        report
                            .warnings
                            .push(format!("artifact '{name}' unreadable for hashing: {err}"));
                    }
                }
            }

            for input in &record.input_artifacts {
                if !self.entries().contains_key(input) {
                    report.warnings.push(format!(
                        "artifact '{name}' references unknown input '{input}'"
                    ));
                }
            }
        }

        report.valid = report.errors.is_empty();
        if !report.valid {
            warn!(
                errors = report.errors.len(),
                warnings = report.warnings.len(),
                "registry validation failed"
            );
        }
        report
    }
}

/// Find the most-recently-modified file per naming-pattern category
///
/// A degraded-mode lookup for when no registry entry exists yet: each
/// category maps to a filename glob, and the newest match under `dir` wins.
/// Categories with zero matches are reported as errors in the result.
///
/// # Errors
/// Returns [`RegistryError::InvalidPattern`] when a glob fails to compile;
/// a bad pattern is a configuration error, not a degraded outcome.
pub fn discover_latest_by_pattern(
    dir: &Path,
    patterns: &BTreeMap<String, String>,
) -> Result<PatternDiscovery, RegistryError> {
    let mut discovery = PatternDiscovery {
        found: BTreeMap::new(),
        errors: Vec::new(),
    };

    for (category, pattern) in patterns {
        let matcher = Glob::new(pattern)
            .map_err(|source| RegistryError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?
            .compile_matcher();

        let mut newest: Option<(SystemTime, PathBuf)> = None;
        for entry in WalkDir::new(dir).into_iter().filter_map(Result::ok) {
            if !entry.file_type().is_file() || !matcher.is_match(entry.file_name()) {
                continue;
            }
            let modified = match entry.metadata().ok().and_then(|m| m.modified().ok()) {
                Some(modified) => modified,
                None => continue,
            };
            let is_newer = newest
                .as_ref()
                .map_or(true, |(best, _)| modified > *best);
            if is_newer {
                newest = Some((modified, entry.into_path()));
            }
        }

        match newest {
            Some((_, path)) => {
                discovery.found.insert(category.clone(), path);
            }
            None => {
                discovery
                    .errors
                    .push(format!("no file matching '{pattern}' for category '{category}'"));
            }
        }
    }

    Ok(discovery)
}
