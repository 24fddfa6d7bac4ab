//! Renderer collaborator seam
//!
//! The numeric rendering logic that turns a data table and style parameters
//! into image bytes lives outside this system. Module implementations
//! consume it through this one narrow trait and never inspect its internals.

use crate::interface::Dataset;
use crate::spec::{PlotConfig, PlotSpec};

/// Failure reported by a renderer
#[derive(Debug, thiserror::Error)]
#[error("render error: {reason}")]
pub struct RenderError {
    /// What the renderer reported
    pub reason: String,
}

impl RenderError {
    /// Create a render error
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// External plot renderer
pub trait Renderer: Send + Sync {
    /// Render one item to encoded image bytes
    ///
    /// # Errors
    /// Returns [`RenderError`] when the item cannot be rendered.
    fn render(
        &self,
        data: &Dataset,
        spec: &PlotSpec,
        config: &PlotConfig,
    ) -> Result<Vec<u8>, RenderError>;

    /// Output image format tag (e.g. `"png"`)
    fn format(&self) -> &str {
        "png"
    }
}
