//! Command handler for the covmap CLI.
//!
//! The handler returns its output as a `String`, making it easy to test
//! without capturing stdout.

use std::path::Path;

use anyhow::Result;

use crate::plot::{self, PlotOptions};

pub fn cmd_plot(coverage_file: &Path, output: &Path, options: &PlotOptions) -> Result<String> {
    let artifact = plot::plot_file(coverage_file, options)?;
    std::fs::write(output, &artifact)?;
    Ok(format!(
        "Coverage treemap written to {} ({} format, {}x{})\n",
        output.display(),
        options.format,
        options.width,
        options.height,
    ))
}
