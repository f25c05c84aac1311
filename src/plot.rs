//! Pipeline orchestration: parse → build tree → layout → render.
//!
//! Holds no algorithmic logic; each stage is swappable through its own
//! narrow contract.

use std::path::Path;

use crate::color::ColorScale;
use crate::error::Result;
use crate::layout::SizeMetric;
use crate::parsers::cobertura::CoberturaParser;
use crate::parsers::Parser;
use crate::render::OutputFormat;
use crate::{layout, tree};

/// Configuration for one plot invocation.
#[derive(Debug, Clone, Copy)]
pub struct PlotOptions {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    pub colorscale: ColorScale,
    pub size_metric: SizeMetric,
    pub format: OutputFormat,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            colorscale: ColorScale::Spectral,
            size_metric: SizeMetric::default(),
            format: OutputFormat::default(),
        }
    }
}

/// Run the full pipeline over raw Cobertura XML, returning the rendered
/// artifact as a string.
pub fn plot(input: &[u8], options: &PlotOptions) -> Result<String> {
    let records = CoberturaParser.parse(input)?;
    let root = tree::build(records)?;
    let laid_out = layout::layout(
        &root,
        f64::from(options.width),
        f64::from(options.height),
        options.size_metric,
        options.colorscale,
    )?;
    options.format.renderer().render(&laid_out)
}

/// Read a coverage file from disk and run the full pipeline.
pub fn plot_file(path: &Path, options: &PlotOptions) -> Result<String> {
    let content = std::fs::read(path)?;
    plot(&content, options)
}
