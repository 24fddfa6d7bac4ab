//! Module loading through registered factories
//!
//! Discovered descriptors are bound to concrete [`PlotModule`] instances by
//! factories registered at startup, keyed by the manifest's `backend` field.
//! Loading never propagates an error: failures are captured inside the
//! returned [`LoadOutcome`] so the caller decides whether to abort or skip.

use crate::descriptor::ModuleDescriptor;
use crate::error::ModuleError;
use crate::interface::PlotModule;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Factory constructing a module instance from its descriptor
pub type ModuleFactory =
    Box<dyn Fn(&ModuleDescriptor) -> Result<Arc<dyn PlotModule>, ModuleError> + Send + Sync>;

/// Outcome of a load attempt
///
/// `module` is present when construction succeeded; `errors` collects
/// everything that went wrong along the way. A module that constructed but
/// misreports its declared capabilities is still returned, with the
/// mismatch recorded.
pub struct LoadOutcome {
    /// Whether a module instance was constructed
    pub loaded: bool,
    /// The constructed module, when loading succeeded
    pub module: Option<Arc<dyn PlotModule>>,
    /// Captured load errors and capability mismatches
    pub errors: Vec<String>,
}

impl LoadOutcome {
    fn failed(error: impl Into<String>) -> Self {
        Self {
            loaded: false,
            module: None,
            errors: vec![error.into()],
        }
    }
}

impl std::fmt::Debug for LoadOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadOutcome")
            .field("loaded", &self.loaded)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

/// Registry of module factories, keyed by backend name
///
/// Populated once at startup; passed by reference wherever modules are
/// loaded. Intentionally not a process-global.
#[derive(Default)]
pub struct ModuleFactoryRegistry {
    factories: BTreeMap<String, ModuleFactory>,
}

impl ModuleFactoryRegistry {
    /// Create an empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `backend`
    ///
    /// A later registration under the same key replaces the earlier one.
    pub fn register<F>(&mut self, backend: impl Into<String>, factory: F)
    where
        F: Fn(&ModuleDescriptor) -> Result<Arc<dyn PlotModule>, ModuleError> + Send + Sync + 'static,
    {
        self.factories.insert(backend.into(), Box::new(factory));
    }

    /// Check whether a backend is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, backend: &str) -> bool {
        self.factories.contains_key(backend)
    }

    /// Registered backend names
    #[must_use]
    pub fn backends(&self) -> Vec<&str> {
        self.factories.keys().map(|k| k.as_str()).collect()
    }

    /// Load a module from its descriptor
    ///
    /// Failures (unknown backend, factory error) are captured in the
    /// returned outcome rather than propagated. A constructed module whose
    /// capability self-report lacks a manifest-declared capability is still
    /// returned loaded, with the discrepancy recorded as an error for
    /// interface validation to act on.
    #[must_use]
    pub fn load(&self, descriptor: &ModuleDescriptor) -> LoadOutcome {
        let factory = match self.factories.get(&descriptor.backend) {
            Some(factory) => factory,
            None => {
                warn!(
                    module = %descriptor.name,
                    backend = %descriptor.backend,
                    "no factory registered for backend"
                );
                return LoadOutcome::failed(
                    ModuleError::UnknownBackend(descriptor.backend.clone()).to_string(),
                );
            }
        };

        let module = match factory(descriptor) {
            Ok(module) => module,
            Err(err) => {
                warn!(module = %descriptor.name, error = %err, "module construction failed");
                return LoadOutcome::failed(err.to_string());
            }
        };

        let mut errors = Vec::new();
        let reported = module.capabilities();
        for declared in &descriptor.declared_capabilities {
            if !reported.contains(declared) {
                errors.push(format!(
                    "module '{}' declares capability '{}' but does not report it",
                    descriptor.name,
                    declared.as_str()
                ));
            }
        }

        debug!(module = %descriptor.name, backend = %descriptor.backend, "module loaded");
        LoadOutcome {
            loaded: true,
            module: Some(module),
            errors,
        }
    }
}
