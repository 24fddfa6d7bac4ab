//! Plotforge Module System
//!
//! Discovery, loading, and capability validation for plot modules.
//!
//! # Core Concepts
//!
//! - [`PlotModule`]: the interface every module implements
//! - [`discover`]: filesystem scan for `module.toml`-bearing directories
//! - [`ModuleFactoryRegistry`]: startup-registered factories binding
//!   descriptors to module instances
//! - [`validate_interface`]: capability check classifying modules as
//!   full-contract or minimal-contract
//!
//! # Example
//!
//! ```rust,ignore
//! use plotforge_module::{discover, ModuleFactoryRegistry, validate_interface};
//!
//! let descriptors = discover(modules_root, Some("plot"))?;
//! let mut factories = ModuleFactoryRegistry::new();
//! factories.register("builtin.standard", make_standard_module);
//!
//! for descriptor in descriptors.values() {
//!     let outcome = factories.load(descriptor);
//!     if let Some(module) = outcome.module {
//!         let report = validate_interface(module.as_ref(), &descriptor.module_type);
//!         println!("{}: executable={}", descriptor.name, report.is_executable());
//!     }
//! }
//! ```

mod descriptor;
mod discovery;
mod error;
mod interface;
mod loader;
mod renderer;
mod spec;

pub use descriptor::{ModuleDescriptor, ModuleManifest, MANIFEST_FILE};
pub use discovery::discover;
pub use error::ModuleError;
pub use interface::{
    required_capabilities, validate_interface, Capability, CapabilitySet, ContractStyle, Dataset,
    InterfaceReport, ModuleMetadata, PlotModule, RenderedPlot,
};
pub use loader::{LoadOutcome, ModuleFactory, ModuleFactoryRegistry};
pub use renderer::{RenderError, Renderer};
pub use spec::{ColorSpec, PlotConfig, PlotSpec};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
