//! Top-level pipeline runner
//!
//! Runs the pipeline phases in order (load data, generate plots, register
//! artifacts, validate registry, render report) and always hands back a
//! structured [`PipelineSummary`] instead of letting a failure terminate the
//! process before accumulated state is persisted. The report phase only
//! runs once the registry validates for the required artifact types.

use crate::collaborators::{DataLoader, DataSchema, ReportRenderer};
use crate::error::CoreError;
use crate::orchestrator::{success_rate, GeneratedItem, PlotOrchestrator};
use plotforge_module::PlotConfig;
use plotforge_outcome::{OpStatus, OperationResult};
use plotforge_registry::{PlotRegistry, RegisterRequest};
use serde_json::json;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

/// Static configuration for one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Tabular input file
    pub data_path: PathBuf,
    /// Schema the input must satisfy
    pub schema: DataSchema,
    /// Items to generate; `None` means the module's full catalog
    pub item_ids: Option<Vec<String>>,
    /// Plot configuration applied to every item
    pub plot_config: PlotConfig,
    /// Artifact types the registry must hold before reporting
    pub required_types: Vec<String>,
    /// Workflow label recorded on registered artifacts
    pub workflow: String,
}

/// Structured outcome of a full pipeline run
#[derive(Debug)]
pub struct PipelineSummary {
    /// Overall verdict across phases
    pub status: OpStatus,
    /// Per-phase results, in execution order
    pub phases: Vec<OperationResult>,
    /// Per-item generation results
    pub items: BTreeMap<String, GeneratedItem>,
    /// Report location, when the report phase ran and succeeded
    pub report_path: Option<PathBuf>,
}

impl PipelineSummary {
    /// Result for a named phase, when that phase ran
    #[must_use]
    pub fn phase(&self, name: &str) -> Option<&OperationResult> {
        self.phases.iter().find(|r| r.operation == name)
    }

    /// Usable items / requested items over the generation phase
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        success_rate(&self.items)
    }
}

/// The pipeline: orchestrator, registry handle, and collaborators
///
/// The registry handle is passed in by the caller and threaded through
/// explicitly; there is no process-global registry.
pub struct Pipeline<'a> {
    orchestrator: &'a PlotOrchestrator,
    registry: &'a mut PlotRegistry,
    loader: &'a dyn DataLoader,
    reporter: &'a dyn ReportRenderer,
}

impl<'a> Pipeline<'a> {
    /// Assemble a pipeline from its parts
    pub fn new(
        orchestrator: &'a PlotOrchestrator,
        registry: &'a mut PlotRegistry,
        loader: &'a dyn DataLoader,
        reporter: &'a dyn ReportRenderer,
    ) -> Self {
        Self {
            orchestrator,
            registry,
            loader,
            reporter,
        }
    }

    /// Run all phases and summarize
    ///
    /// Per-item generation failures are isolated by the batch policy; a
    /// phase that cannot run (no data, invalid registry) is recorded as
    /// failed or skipped and later phases that depend on it are skipped,
    /// but the summary always comes back with everything that did happen.
    #[must_use]
    pub fn run(&mut self, config: &PipelineConfig) -> PipelineSummary {
        let mut phases = Vec::new();

        // Phase: load data
        let mut load = OperationResult::new("load_data");
        let started = OperationResult::start_timer();
        let report = self.loader.load_and_validate(&config.data_path, &config.schema);
        for err in &report.errors {
            load.add_error(err.clone());
        }
        for col in &report.missing_columns {
            load.add_error(format!("missing required column '{col}'"));
        }
        let dataset = match (report.dataset, load.status == OpStatus::Failed) {
            (Some(dataset), false) => {
                load.set_status(
                    OpStatus::Success,
                    format!("loaded {} rows x {} columns", dataset.rows, dataset.columns.len()),
                );
                Some(dataset)
            }
            _ => None,
        };
        load.stop_timer(started);
        phases.push(load);

        let Some(dataset) = dataset else {
            // Nothing downstream can run without data.
            return PipelineSummary {
                status: OpStatus::Failed,
                phases,
                items: BTreeMap::new(),
                report_path: None,
            };
        };

        // Phase: generate plots (continue-on-error: one bad item must not
        // sink the batch)
        let mut generate = OperationResult::new("generate_plots");
        let started = OperationResult::start_timer();
        let items = match self.orchestrator.generate_batch(
            &dataset,
            config.item_ids.as_deref(),
            &config.plot_config,
            true,
        ) {
            Ok(items) => items,
            Err(err) => {
                generate.add_error(err.to_string());
                generate.stop_timer(started);
                phases.push(generate);
                return PipelineSummary {
                    status: OpStatus::Failed,
                    phases,
                    items: BTreeMap::new(),
                    report_path: None,
                };
            }
        };
        let failed = items
            .values()
            .filter(|i| i.result.status == OpStatus::Failed)
            .count();
        for item in items.values() {
            if item.result.status == OpStatus::Failed {
                generate.add_warning(format!(
                    "item '{}' failed: {}",
                    item.result.operation,
                    item.result.errors.join("; ")
                ));
            }
        }
        generate.insert_metadata("requested", json!(items.len()));
        generate.insert_metadata("failed", json!(failed));
        generate.insert_metadata("success_rate", json!(success_rate(&items)));
        if failed == items.len() && !items.is_empty() {
            generate.add_error("every requested item failed".to_string());
        } else {
            generate.set_status(
                OpStatus::Success,
                format!("{} of {} items generated", items.len() - failed, items.len()),
            );
        }
        generate.stop_timer(started);
        phases.push(generate);

        // Phase: register artifacts (only durably saved plots are provenance)
        let mut register = OperationResult::new("register_artifacts");
        let started = OperationResult::start_timer();
        let mut registered = 0usize;
        for (item_id, item) in &items {
            let Some(saved) = item.plot.as_ref().and_then(|p| p.saved_path.clone()) else {
                continue;
            };
            let request = RegisterRequest::new(item_id, "plot", &config.workflow, saved)
                .with_inputs(vec![dataset.name.clone()])
                .with_metadata("quality_score", json!(item.result.quality_score));
            match self.registry.register(request) {
                Ok(_) => registered += 1,
                Err(err) => register.add_warning(format!("could not register '{item_id}': {err}")),
            }
        }
        register.insert_metadata("registered", json!(registered));
        register.set_status(OpStatus::Success, format!("{registered} artifacts registered"));
        register.stop_timer(started);
        phases.push(register);

        // Phase: validate registry
        let required: Vec<&str> = config.required_types.iter().map(String::as_str).collect();
        let mut validate = OperationResult::new("validate_registry");
        let started = OperationResult::start_timer();
        let health = self.registry.validate(&required, true, false);
        for err in &health.errors {
            validate.add_error(err.clone());
        }
        for warning in &health.warnings {
            validate.add_warning(warning.clone());
        }
        if health.valid {
            validate.set_status(OpStatus::Success, "registry valid");
        }
        validate.stop_timer(started);
        let registry_valid = health.valid;
        phases.push(validate);

        // Phase: render report, gated on registry validity
        let mut report_path = None;
        let mut report_phase = OperationResult::new("render_report");
        let started = OperationResult::start_timer();
        if registry_valid {
            let artifacts: Vec<_> = self.registry.entries().values().collect();
            match self.reporter.render(&artifacts) {
                Ok(path) => {
                    info!(path = %path.display(), "report rendered");
                    report_phase.set_status(OpStatus::Success, "report rendered");
                    report_path = Some(path);
                }
                Err(err) => report_phase.add_error(err.to_string()),
            }
        } else {
            report_phase.add_warning("skipped: registry validation failed".to_string());
            report_phase.set_status(OpStatus::Partial, "report skipped");
        }
        report_phase.stop_timer(started);
        phases.push(report_phase);

        let status = overall_status(&phases);
        PipelineSummary {
            status,
            phases,
            items,
            report_path,
        }
    }
}

/// Fold per-phase results into an overall verdict
///
/// Any failed phase downgrades the run to partial as long as some phase
/// produced usable output; all-success stays success.
fn overall_status(phases: &[OperationResult]) -> OpStatus {
    let any_failed = phases.iter().any(|p| p.status == OpStatus::Failed);
    let any_partial = phases.iter().any(|p| p.status == OpStatus::Partial);
    let any_usable = phases.iter().any(OperationResult::is_success);
    match (any_failed, any_partial, any_usable) {
        (false, false, _) => OpStatus::Success,
        (false, true, _) => OpStatus::Partial,
        (true, _, true) => OpStatus::Partial,
        (true, _, false) => OpStatus::Failed,
    }
}
