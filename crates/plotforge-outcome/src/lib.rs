//! Plotforge Outcome Model
//!
//! Structured, mutable operation results with a worsening-only status state
//! machine and weighted quality scoring.
//!
//! # Core Concepts
//!
//! - [`OperationResult`]: per-operation outcome accumulator
//! - [`OpStatus`]: {unknown, success, partial, failed} state machine
//!
//! # Example
//!
//! ```rust
//! use plotforge_outcome::{OperationResult, OpStatus};
//!
//! let mut result = OperationResult::new("generate_plot:histogram");
//! let started = OperationResult::start_timer();
//! result.add_warning("legend truncated");
//! result.set_status(OpStatus::Success, "generated with caveats");
//! result.stop_timer(started);
//!
//! assert_eq!(result.status, OpStatus::Partial);
//! assert!(result.is_success());
//! ```

mod result;
mod status;

pub use result::OperationResult;
pub use status::OpStatus;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
