//! Structured operation results
//!
//! [`OperationResult`] is the mutable outcome object threaded through every
//! pipeline stage. It accumulates errors, warnings, quality metrics, and
//! timing, then is handed back to the caller and treated as immutable.

use crate::status::OpStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::debug;

/// Outcome of a single pipeline operation
///
/// # Invariants
/// - `quality_score`, when set, lies in `[0, 100]`
/// - `status == Failed` implies `quality_score == Some(0.0)` once scored
/// - Failure is sticky: once an error is recorded, no later `set_status`
///   call can move the result off `Failed`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult {
    /// Operation identifier (e.g. `"generate_plot:scatter_main"`)
    pub operation: String,
    /// Current status
    pub status: OpStatus,
    /// Human-readable summary message
    pub message: String,
    /// Accumulated error messages
    pub errors: Vec<String>,
    /// Accumulated warning messages
    pub warnings: Vec<String>,
    /// Weighted quality score in `[0, 100]`, unset until scored
    pub quality_score: Option<f64>,
    /// Wall-clock duration in seconds, unset until timed
    pub duration_secs: Option<f64>,
    /// Creation timestamp
    pub timestamp: DateTime<Utc>,
    /// Free-form metadata attached by the operation
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl OperationResult {
    /// Create a fresh result for `operation`
    ///
    /// Status starts at `Unknown` with empty error/warning lists and no score.
    #[must_use]
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: OpStatus::Unknown,
            message: String::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
            quality_score: None,
            duration_secs: None,
            timestamp: Utc::now(),
            metadata: BTreeMap::new(),
        }
    }

    /// Record an error and force `Failed`
    ///
    /// Failure is sticky from this point on; a failed result always scores 0.
    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
        self.status = OpStatus::Failed;
        self.quality_score = Some(0.0);
    }

    /// Record a warning
    ///
    /// Downgrades `Success` to `Partial`; leaves `Failed` untouched.
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
        self.status = self.status.downgraded_by_warning();
    }

    /// Explicit status transition
    ///
    /// Used by operations to declare `Success` when no errors occurred.
    /// Once an error is recorded, every transition off `Failed` is refused:
    /// the result stays `Failed` and the refusal is logged at debug level.
    pub fn set_status(&mut self, status: OpStatus, message: impl Into<String>) {
        if status != OpStatus::Failed && !self.errors.is_empty() {
            debug!(
                operation = %self.operation,
                ?status,
                "refusing transition off failed on result with recorded errors"
            );
            self.message = message.into();
            return;
        }
        // Declaring success with warnings already present lands on Partial
        self.status = if status == OpStatus::Success {
            if self.warnings.is_empty() {
                OpStatus::Success
            } else {
                OpStatus::Partial
            }
        } else {
            status
        };
        self.message = message.into();
        if self.status == OpStatus::Failed {
            self.quality_score = Some(0.0);
        }
    }

    /// Compute a weighted quality score and store it
    ///
    /// `score = Σ values[k] * weights[k]` over the keys of `weights`; a
    /// missing or NaN component contributes 0. Weights are not normalized:
    /// the caller supplies comparably scaled weights. The final score clamps
    /// to `[0, 100]`, and a failed result always pins to 0 regardless of
    /// the supplied metrics.
    pub fn add_quality_metrics(
        &mut self,
        values: &BTreeMap<String, f64>,
        weights: &BTreeMap<String, f64>,
    ) {
        if self.status.is_failed() {
            self.quality_score = Some(0.0);
            return;
        }
        let mut score = 0.0;
        for (key, weight) in weights {
            let component = values.get(key).copied().unwrap_or(0.0);
            let component = if component.is_nan() { 0.0 } else { component };
            score += component * weight;
        }
        self.quality_score = Some(score.clamp(0.0, 100.0));
    }

    /// Check whether the operation produced usable output
    ///
    /// True for `Success` and `Partial`; false only for `Failed` (and the
    /// never-declared `Unknown`). This drives whether the orchestrator
    /// proceeds to persist or consume partial output.
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_usable()
    }

    /// Attach a metadata entry
    pub fn insert_metadata(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.metadata.insert(key.into(), value);
    }

    /// Start a wall-clock timer for this operation
    ///
    /// Pair with [`OperationResult::stop_timer`]. Precision is whatever the
    /// platform monotonic clock provides; nothing finer than ~100ms is
    /// promised or relied upon.
    #[inline]
    #[must_use]
    pub fn start_timer() -> Instant {
        Instant::now()
    }

    /// Stop a timer and record the elapsed seconds
    pub fn stop_timer(&mut self, started: Instant) {
        self.duration_secs = Some(started.elapsed().as_secs_f64());
    }
}
