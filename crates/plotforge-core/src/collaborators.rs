//! Data-loader and report-renderer collaborator seams
//!
//! Both collaborators sit outside this system and are consumed through
//! narrow traits. The loader returns a structured report rather than an
//! error for schema mismatches, so pipeline flows can proceed with a logged
//! caveat; the report renderer is invoked only after the registry validates.

use crate::error::CoreError;
use plotforge_module::Dataset;
use plotforge_registry::ArtifactRecord;
use std::path::{Path, PathBuf};

/// Expected shape of a tabular input
#[derive(Debug, Clone, Default)]
pub struct DataSchema {
    /// Columns the dataset must contain
    pub required_columns: Vec<String>,
}

impl DataSchema {
    /// Schema requiring the given columns
    #[must_use]
    pub fn with_columns(columns: &[&str]) -> Self {
        Self {
            required_columns: columns.iter().map(|c| (*c).to_string()).collect(),
        }
    }
}

/// Structured outcome of a load-and-validate call
///
/// Schema mismatches are data in this report, never an `Err`: the caller
/// decides whether a missing column is fatal for its flow.
#[derive(Debug, Clone)]
pub struct DataLoadReport {
    /// The dataset, when loading produced one
    pub dataset: Option<Dataset>,
    /// Required columns absent from the data
    pub missing_columns: Vec<String>,
    /// Load failures (unreadable file, unparsable content)
    pub errors: Vec<String>,
}

impl DataLoadReport {
    /// Whether the dataset loaded and matched the schema
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.dataset.is_some() && self.missing_columns.is_empty() && self.errors.is_empty()
    }
}

/// External tabular data loader and schema validator
pub trait DataLoader {
    /// Load a dataset and check it against `schema`
    fn load_and_validate(&self, path: &Path, schema: &DataSchema) -> DataLoadReport;
}

/// External document renderer
///
/// Receives pre-computed artifact references, never raw data, and only
/// after the registry reports valid for the required artifact types.
pub trait ReportRenderer {
    /// Render the report and return where it was written
    ///
    /// # Errors
    /// Returns [`CoreError::ReportFailed`] when the document cannot be
    /// produced.
    fn render(&self, artifacts: &[&ArtifactRecord]) -> Result<PathBuf, CoreError>;
}
