//! Chart output behind a capability trait.
//!
//! Which implementation is used is fixed at build time by the `chart` cargo
//! feature; nothing is probed at runtime.

#[cfg(feature = "chart")]
mod svg;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::chart::LatencyChart;
use crate::error::{AnalyzerError, Result};

#[cfg(feature = "chart")]
pub use svg::SvgRenderer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Written(PathBuf),
    Skipped,
}

/// Charts are only written as SVG. Any other extension is rejected before
/// any input is read.
pub fn check_chart_path(path: &Path) -> Result<()> {
    let is_svg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    match is_svg {
        true => Ok(()),
        false => Err(AnalyzerError::RenderingUnavailable(format!(
            "only SVG output is supported, got {}",
            path.display()
        ))),
    }
}

pub trait Renderer {
    /// Draws `chart` to `output`, or to an implementation default when `None`.
    fn render(&self, chart: &LatencyChart, output: Option<&Path>) -> Result<RenderOutcome>;
}

/// Text-only fallback. Tells the user once how to get charts.
#[derive(Debug, Default)]
pub struct NoopRenderer {
    notice: OnceLock<()>,
}

impl NoopRenderer {
    pub fn new() -> Self { Self::default() }
}

impl Renderer for NoopRenderer {
    fn render(&self, _chart: &LatencyChart, _output: Option<&Path>) -> Result<RenderOutcome> {
        self.notice.get_or_init(|| {
            eprintln!("\nChart rendering is not available in this build. Rebuild with:");
            eprintln!("  cargo build --features chart");
            eprintln!("\nSkipping graphical visualization.");
        });
        Ok(RenderOutcome::Skipped)
    }
}

#[cfg(feature = "chart")]
pub fn select_renderer() -> Box<dyn Renderer> { Box::new(SvgRenderer::default()) }

#[cfg(not(feature = "chart"))]
pub fn select_renderer() -> Box<dyn Renderer> { Box::new(NoopRenderer::new()) }
