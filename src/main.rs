use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use covmap::cli;
use covmap::color::ColorScale;
use covmap::layout::SizeMetric;
use covmap::plot::PlotOptions;
use covmap::render::OutputFormat;

/// covmap — Squarified coverage treemaps from Cobertura reports.
#[derive(Parser)]
#[command(name = "covmap", version, about)]
struct Cli {
    /// Path to the Cobertura XML coverage file.
    coverage_file: PathBuf,

    /// Output file path.
    #[arg(long, short = 'o', default_value = "coverage.html")]
    output: PathBuf,

    /// Canvas width in pixels.
    #[arg(long, short = 'w', default_value_t = 1200)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, short = 'H', default_value_t = 800)]
    height: u32,

    /// Colorscale for coverage ratios.
    #[arg(long, default_value = "Spectral")]
    colorscale: ColorScale,

    /// Aggregate field that drives rectangle areas.
    #[arg(long, default_value = "lines-valid")]
    size_metric: SizeMetric,

    /// Output format.
    #[arg(long, default_value = "html")]
    format: OutputFormat,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let options = PlotOptions {
        width: cli.width,
        height: cli.height,
        colorscale: cli.colorscale,
        size_metric: cli.size_metric,
        format: cli.format,
    };

    let message = cli::cmd_plot(&cli.coverage_file, &cli.output, &options)?;
    print!("{message}");
    Ok(())
}
