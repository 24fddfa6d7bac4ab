//! Full pipeline runs: load, generate, register, validate, report.
//!
//! Each scenario drives the phase runner end to end with stub collaborators
//! and asserts on the structured summary rather than on side effects alone:
//! whatever happens mid-run, the caller must get back every phase that
//! executed and every item that was requested.

use plotforge_core::{
    DataLoadReport, DataLoader, DataSchema, Pipeline, PipelineConfig, PlotOrchestrator,
    ReportRenderer,
};
use plotforge_core::CoreError;
use plotforge_module::{Dataset, PlotConfig, PlotSpec};
use plotforge_outcome::OpStatus;
use plotforge_registry::ArtifactRecord;
use plotforge_test_utils::{fresh_registry, CatalogTestModule, FailingRenderer};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

struct StubLoader {
    columns: Vec<String>,
    unreadable: bool,
}

impl StubLoader {
    fn with_columns(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            unreadable: false,
        }
    }
}

impl DataLoader for StubLoader {
    fn load_and_validate(&self, path: &Path, schema: &DataSchema) -> DataLoadReport {
        if self.unreadable {
            return DataLoadReport {
                dataset: None,
                missing_columns: Vec::new(),
                errors: vec![format!("cannot read {}", path.display())],
            };
        }
        let missing: Vec<String> = schema
            .required_columns
            .iter()
            .filter(|c| !self.columns.contains(c))
            .cloned()
            .collect();
        let dataset = if missing.is_empty() {
            Some(Dataset::new("sample", self.columns.clone(), 4))
        } else {
            None
        };
        DataLoadReport {
            dataset,
            missing_columns: missing,
            errors: Vec::new(),
        }
    }
}

struct StubReporter {
    out: PathBuf,
}

impl ReportRenderer for StubReporter {
    fn render(&self, artifacts: &[&ArtifactRecord]) -> Result<PathBuf, CoreError> {
        let body: Vec<String> = artifacts.iter().map(|a| a.name.clone()).collect();
        fs::write(&self.out, body.join("\n"))
            .map_err(|err| CoreError::ReportFailed(err.to_string()))?;
        Ok(self.out.clone())
    }
}

fn config(out_dir: &Path, item_ids: Option<Vec<String>>) -> PipelineConfig {
    PipelineConfig {
        data_path: PathBuf::from("sample.csv"),
        schema: DataSchema::with_columns(&["x", "y"]),
        item_ids,
        plot_config: PlotConfig::new().with_output_dir(out_dir),
        required_types: vec!["plot".to_string()],
        workflow: "nightly".to_string(),
    }
}

fn standard_orchestrator() -> PlotOrchestrator {
    PlotOrchestrator::new("standard", Arc::new(CatalogTestModule::standard()), "plot").unwrap()
}

#[test]
fn clean_run_reports_success_and_registers_lineage() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("plots");
    let orchestrator = standard_orchestrator();
    let mut registry = fresh_registry(dir.path());
    let loader = StubLoader::with_columns(&["x", "y"]);
    let reporter = StubReporter {
        out: dir.path().join("report.html"),
    };

    let summary = Pipeline::new(&orchestrator, &mut registry, &loader, &reporter)
        .run(&config(&out, None));

    assert_eq!(summary.status, OpStatus::Success);
    assert_eq!(summary.items.len(), 2);
    assert!((summary.success_rate() - 1.0).abs() < 1e-9);
    assert!(summary.report_path.as_ref().unwrap().is_file());

    // Every phase ran and succeeded.
    for phase in ["load_data", "generate_plots", "register_artifacts", "validate_registry", "render_report"] {
        assert!(summary.phase(phase).unwrap().is_success(), "phase {phase}");
    }

    // Both plots are registered with lineage back to the dataset.
    assert_eq!(registry.len(), 2);
    assert_eq!(
        registry.get("scatter").unwrap().input_artifacts,
        vec!["sample"]
    );
    assert!(registry.verify("histogram").unwrap().is_verified());
}

#[test]
fn schema_mismatch_fails_run_before_generation() {
    let dir = TempDir::new().unwrap();
    let orchestrator = standard_orchestrator();
    let mut registry = fresh_registry(dir.path());
    let loader = StubLoader::with_columns(&["x"]); // no "y"
    let reporter = StubReporter {
        out: dir.path().join("report.html"),
    };

    let summary = Pipeline::new(&orchestrator, &mut registry, &loader, &reporter)
        .run(&config(&dir.path().join("plots"), None));

    assert_eq!(summary.status, OpStatus::Failed);
    assert_eq!(summary.phases.len(), 1, "later phases must not run");
    let load = summary.phase("load_data").unwrap();
    assert_eq!(load.status, OpStatus::Failed);
    assert!(load.errors.iter().any(|e| e.contains("'y'")));
    assert!(summary.items.is_empty());
    assert!(registry.is_empty());
}

#[test]
fn unreadable_input_fails_run() {
    let dir = TempDir::new().unwrap();
    let orchestrator = standard_orchestrator();
    let mut registry = fresh_registry(dir.path());
    let loader = StubLoader {
        columns: Vec::new(),
        unreadable: true,
    };
    let reporter = StubReporter {
        out: dir.path().join("report.html"),
    };

    let summary = Pipeline::new(&orchestrator, &mut registry, &loader, &reporter)
        .run(&config(&dir.path().join("plots"), None));

    assert_eq!(summary.status, OpStatus::Failed);
    assert!(summary.report_path.is_none());
}

#[test]
fn bad_item_degrades_run_without_sinking_the_batch() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("plots");
    let orchestrator = standard_orchestrator();
    let mut registry = fresh_registry(dir.path());
    let loader = StubLoader::with_columns(&["x", "y"]);
    let reporter = StubReporter {
        out: dir.path().join("report.html"),
    };

    let ids = vec![
        "scatter".to_string(),
        "does_not_exist".to_string(),
        "histogram".to_string(),
    ];
    let summary = Pipeline::new(&orchestrator, &mut registry, &loader, &reporter)
        .run(&config(&out, Some(ids)));

    assert_eq!(summary.status, OpStatus::Partial);
    assert_eq!(summary.items.len(), 3);
    assert_eq!(summary.items["does_not_exist"].result.status, OpStatus::Failed);
    assert!((summary.success_rate() - 2.0 / 3.0).abs() < 1e-9);

    // The two good plots still made it into provenance, and the report
    // still rendered because the required types are present.
    assert_eq!(registry.len(), 2);
    assert!(summary.report_path.is_some());
}

#[test]
fn report_gated_on_registry_validity() {
    let dir = TempDir::new().unwrap();
    let orchestrator =
        PlotOrchestrator::new("failing", Arc::new(CatalogTestModule::new(
            "failing",
            vec![PlotSpec::bare("scatter")],
            Box::new(FailingRenderer),
        )), "plot")
        .unwrap();
    let mut registry = fresh_registry(dir.path());
    let loader = StubLoader::with_columns(&["x", "y"]);
    let reporter = StubReporter {
        out: dir.path().join("report.html"),
    };

    // Every item fails, so no plot artifact exists and the required type
    // "plot" is missing: the report phase must be skipped.
    let summary = Pipeline::new(&orchestrator, &mut registry, &loader, &reporter)
        .run(&config(&dir.path().join("plots"), None));

    assert_eq!(summary.status, OpStatus::Partial);
    assert!(summary.report_path.is_none());
    let gate = summary.phase("render_report").unwrap();
    assert_eq!(gate.status, OpStatus::Partial);
    assert!(gate.warnings[0].contains("skipped"));
    assert!(!summary.phase("validate_registry").unwrap().is_success());
}

#[test]
fn in_memory_run_without_output_dir_registers_nothing() {
    let dir = TempDir::new().unwrap();
    let orchestrator = standard_orchestrator();
    let mut registry = fresh_registry(dir.path());
    let loader = StubLoader::with_columns(&["x", "y"]);
    let reporter = StubReporter {
        out: dir.path().join("report.html"),
    };

    let mut cfg = config(&dir.path().join("plots"), None);
    cfg.plot_config = PlotConfig::new(); // no output dir: in-memory only

    let summary = Pipeline::new(&orchestrator, &mut registry, &loader, &reporter).run(&cfg);

    // Plots exist in memory as partial results, but provenance only tracks
    // durable files, so validation fails the required "plot" type.
    assert!(summary.items.values().all(|i| i.result.status == OpStatus::Partial));
    assert!(registry.is_empty());
    assert!(summary.report_path.is_none());
    assert_eq!(summary.status, OpStatus::Partial);
}

#[test]
fn renderer_bytes_round_trip_to_disk() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("plots");
    let orchestrator = standard_orchestrator();
    let mut registry = fresh_registry(dir.path());
    let loader = StubLoader::with_columns(&["x", "y"]);
    let reporter = StubReporter {
        out: dir.path().join("report.html"),
    };

    let summary = Pipeline::new(&orchestrator, &mut registry, &loader, &reporter)
        .run(&config(&out, Some(vec!["scatter".to_string()])));

    assert_eq!(summary.status, OpStatus::Success);
    let saved = summary.items["scatter"].plot.as_ref().unwrap().saved_path.clone().unwrap();
    // SequenceRenderer writes the reversed item id.
    assert_eq!(fs::read(saved).unwrap(), b"rettacs".to_vec());
}
