//! Plotforge Core Orchestration
//!
//! Resolves catalog items, merges configuration, drives module generators,
//! and runs the full pipeline with partial-failure semantics.
//!
//! # Core Concepts
//!
//! - [`PlotOrchestrator`]: single- and batch-item generation against one
//!   validated module, with continue-on-error isolation
//! - [`Pipeline`]: the phase runner producing a [`PipelineSummary`]
//! - [`DataLoader`] / [`ReportRenderer`]: narrow collaborator seams
//!
//! # Example
//!
//! ```rust,ignore
//! use plotforge_core::{Pipeline, PipelineConfig, PlotOrchestrator};
//!
//! let orchestrator = PlotOrchestrator::new("standard", module, "plot")?;
//! let mut pipeline = Pipeline::new(&orchestrator, &mut registry, &loader, &reporter);
//! let summary = pipeline.run(&config);
//! println!("{}: {:.0}%", summary.status, summary.success_rate() * 100.0);
//! ```

mod collaborators;
mod error;
mod orchestrator;
mod pipeline;

pub use collaborators::{DataLoadReport, DataLoader, DataSchema, ReportRenderer};
pub use error::CoreError;
pub use orchestrator::{success_rate, GeneratedItem, PlotOrchestrator};
pub use pipeline::{Pipeline, PipelineConfig, PipelineSummary};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
