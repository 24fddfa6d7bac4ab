//! Plot orchestration
//!
//! [`PlotOrchestrator`] drives one validated module: it resolves item ids
//! against the module's catalog, merges configuration, invokes the
//! generator, and wraps every outcome as an [`OperationResult`]. Batches
//! run under a continue-on-error policy that isolates per-item failures.

use crate::error::CoreError;
use plotforge_module::{
    validate_interface, ContractStyle, Dataset, PlotConfig, PlotModule, PlotSpec, RenderedPlot,
};
use plotforge_outcome::{OpStatus, OperationResult};
use std::collections::BTreeMap;
use std::fs;
use std::sync::Arc;
use tracing::{debug, warn};

/// Score deduction per recorded error
const ERROR_PENALTY: f64 = 10.0;
/// Score deduction per recorded warning
const WARNING_PENALTY: f64 = 5.0;
/// Score deduction for output that never reached durable storage
const UNPERSISTED_PENALTY: f64 = 20.0;

/// One generated item: its result plus the plot, when one was produced
#[derive(Debug)]
pub struct GeneratedItem {
    /// Structured outcome for this item
    pub result: OperationResult,
    /// The rendered plot; `None` when generation failed outright
    pub plot: Option<RenderedPlot>,
}

impl GeneratedItem {
    /// Whether this item produced usable output
    #[inline]
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.result.is_success() && self.plot.is_some()
    }
}

/// Orchestrator bound to one executable module
pub struct PlotOrchestrator {
    module_name: String,
    module: Arc<dyn PlotModule>,
    contract: ContractStyle,
}

impl PlotOrchestrator {
    /// Bind an orchestrator to a loaded module
    ///
    /// Validates the module's interface for `module_type` first; a module
    /// that fails validation stays loaded for introspection elsewhere but
    /// is refused here.
    ///
    /// # Errors
    /// Returns [`CoreError::ModuleNotExecutable`] when the module lacks the
    /// single-item generator capability.
    pub fn new(
        module_name: impl Into<String>,
        module: Arc<dyn PlotModule>,
        module_type: &str,
    ) -> Result<Self, CoreError> {
        let module_name = module_name.into();
        let report = validate_interface(module.as_ref(), module_type);
        let contract = report.contract.ok_or_else(|| CoreError::ModuleNotExecutable {
            module: module_name.clone(),
            missing: report.missing.iter().map(|c| c.as_str().to_string()).collect(),
        })?;
        debug!(module = %module_name, ?contract, "orchestrator bound");
        Ok(Self {
            module_name,
            module,
            contract,
        })
    }

    /// Name of the bound module
    #[inline]
    #[must_use]
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// Contract style of the bound module
    #[inline]
    #[must_use]
    pub fn contract(&self) -> ContractStyle {
        self.contract
    }

    /// Generate a single item
    ///
    /// An unknown item id is a hard failure: catalog resolution is exact
    /// match only, no fuzzy fallback. Minimal-contract modules publish no
    /// catalog, so for them the id is passed through as a bare spec, the
    /// degraded calling convention for older modules.
    ///
    /// A failed durable save does not fail the call: the in-memory plot is
    /// kept, the result degrades to partial, and the I/O failure is a
    /// warning. "Could not render" is a hard failure; "rendered but could
    /// not save" is a soft one.
    #[must_use]
    pub fn generate_one(
        &self,
        data: &Dataset,
        item_id: &str,
        config: &PlotConfig,
    ) -> GeneratedItem {
        let mut result = OperationResult::new(format!("generate:{item_id}"));
        let started = OperationResult::start_timer();

        let spec = match self.resolve_item(item_id) {
            Some(spec) => spec,
            None => {
                result.add_error(format!(
                    "unknown item id '{}' in module '{}'",
                    item_id, self.module_name
                ));
                result.stop_timer(started);
                return GeneratedItem { result, plot: None };
            }
        };
        let effective = config.merged_with(&spec);

        let mut plot = match self.module.render_item(data, &spec, &effective) {
            Ok(plot) => plot,
            Err(err) => {
                result.add_error(err.to_string());
                result.stop_timer(started);
                return GeneratedItem { result, plot: None };
            }
        };

        if let Some(dir) = &effective.output_dir {
            let target = dir.join(format!("{}.{}", item_id, plot.format));
            let write = fs::create_dir_all(dir).and_then(|()| fs::write(&target, &plot.bytes));
            match write {
                Ok(()) => {
                    plot.saved_path = Some(target);
                }
                Err(err) => {
                    warn!(item_id, error = %err, "plot rendered but could not be saved");
                    result.add_warning(format!("save failed for '{item_id}': {err}"));
                }
            }
        }

        let persisted = plot.saved_path.is_some();
        if persisted {
            result.set_status(OpStatus::Success, format!("generated '{item_id}'"));
        } else {
            result.set_status(
                OpStatus::Partial,
                format!("generated '{item_id}' in memory only"),
            );
        }
        self.score(&mut result, persisted);
        result.stop_timer(started);
        GeneratedItem {
            result,
            plot: Some(plot),
        }
    }

    /// Generate a batch of items
    ///
    /// `item_ids = None` means the module's full catalog. With
    /// `continue_on_error`, each item's failure becomes a failed result for
    /// that item alone; without it, the first failure aborts the remainder.
    /// The returned map contains every requested id either way the batch
    /// completes, so the aggregate success rate is always computable.
    ///
    /// # Errors
    /// - [`CoreError::CatalogUnavailable`] for a full-catalog request
    ///   against a minimal-contract module
    /// - [`CoreError::ItemFailed`] for the first failure when
    ///   `continue_on_error` is false
    pub fn generate_batch(
        &self,
        data: &Dataset,
        item_ids: Option<&[String]>,
        config: &PlotConfig,
        continue_on_error: bool,
    ) -> Result<BTreeMap<String, GeneratedItem>, CoreError> {
        let ids: Vec<String> = match item_ids {
            Some(ids) => ids.to_vec(),
            None => {
                if self.contract == ContractStyle::Minimal {
                    return Err(CoreError::CatalogUnavailable(self.module_name.clone()));
                }
                self.module.catalog().into_iter().map(|s| s.id).collect()
            }
        };

        let mut results = BTreeMap::new();
        for item_id in ids {
            let item = self.generate_one(data, &item_id, config);
            if !continue_on_error && item.result.status == OpStatus::Failed {
                return Err(CoreError::ItemFailed {
                    message: item
                        .result
                        .errors
                        .first()
                        .cloned()
                        .unwrap_or_else(|| "unknown failure".to_string()),
                    item_id,
                });
            }
            results.insert(item_id, item);
        }
        Ok(results)
    }

    fn resolve_item(&self, item_id: &str) -> Option<PlotSpec> {
        match self.contract {
            ContractStyle::Full => self.module.catalog().into_iter().find(|s| s.id == item_id),
            ContractStyle::Minimal => Some(PlotSpec::bare(item_id)),
        }
    }

    fn score(&self, result: &mut OperationResult, persisted: bool) {
        if result.status == OpStatus::Failed {
            result.quality_score = Some(0.0);
            return;
        }
        let mut score = 100.0;
        score -= ERROR_PENALTY * result.errors.len() as f64;
        score -= WARNING_PENALTY * result.warnings.len() as f64;
        if !persisted {
            score -= UNPERSISTED_PENALTY;
        }
        result.quality_score = Some(score.clamp(0.0, 100.0));
    }
}

/// Aggregate success rate over a batch: usable / total
///
/// Failed items stay in the denominator; an empty batch rates 0.
#[must_use]
pub fn success_rate(results: &BTreeMap<String, GeneratedItem>) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let usable = results.values().filter(|i| i.result.is_success()).count();
    usable as f64 / results.len() as f64
}
