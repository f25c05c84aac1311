//! Output rendering for computed layouts.
//!
//! The layout engine only computes geometry and colors; everything visual
//! lives here. Renderers are deliberately static: one `<rect>` per laid-out
//! rectangle, no scripting, no interactivity.

use std::fmt::Write;

use crate::error::{CovmapError, Result};
use crate::layout::{Layout, Rectangle};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Html,
    Svg,
    Json,
}

impl OutputFormat {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Svg => "svg",
            OutputFormat::Json => "json",
        }
    }

    #[must_use]
    pub fn renderer(&self) -> Box<dyn Renderer> {
        match self {
            OutputFormat::Html => Box::new(HtmlRenderer),
            OutputFormat::Svg => Box::new(SvgRenderer),
            OutputFormat::Json => Box::new(JsonRenderer),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = CovmapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "html" => Ok(OutputFormat::Html),
            "svg" => Ok(OutputFormat::Svg),
            "json" => Ok(OutputFormat::Json),
            _ => Err(CovmapError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for rendering a layout to a string artifact.
pub trait Renderer {
    fn render(&self, layout: &Layout) -> Result<String>;
}

/// Standalone SVG document, one `<rect>` per rectangle with a `<title>`
/// tooltip carrying the label and coverage percentage.
pub struct SvgRenderer;

impl Renderer for SvgRenderer {
    fn render(&self, layout: &Layout) -> Result<String> {
        let mut out = String::new();
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
            w = layout.canvas_width,
            h = layout.canvas_height,
        )
        .expect("writing to a String cannot fail");

        for rect in &layout.rectangles {
            // Zero-area rectangles are kept in the layout for traceability
            // but have nothing to draw.
            if rect.width <= 0.0 || rect.height <= 0.0 {
                continue;
            }
            writeln!(
                out,
                r#"  <rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="{fill}" stroke="white" stroke-width="1"><title>{title}</title></rect>"#,
                x = rect.x,
                y = rect.y,
                w = rect.width,
                h = rect.height,
                fill = rect.color.to_hex(),
                title = xml_escape(&tooltip(rect)),
            )
            .expect("writing to a String cannot fail");
        }

        out.push_str("</svg>\n");
        Ok(out)
    }
}

/// Standalone HTML page wrapping the SVG, with a title and a timestamp.
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, layout: &Layout) -> Result<String> {
        let svg = SvgRenderer.render(layout)?;
        let generated = chrono::Utc::now().format("%Y-%m-%d %H:%M UTC");

        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        out.push_str("<meta charset=\"utf-8\">\n");
        out.push_str("<title>Coverage Treemap</title>\n");
        out.push_str(
            "<style>body { font-family: sans-serif; margin: 20px; } footer { color: #888; font-size: 12px; margin-top: 8px; }</style>\n",
        );
        out.push_str("</head>\n<body>\n");
        out.push_str("<h1>Coverage Treemap</h1>\n");
        out.push_str(&svg);
        writeln!(out, "<footer>Generated {generated} by covmap</footer>")
            .expect("writing to a String cannot fail");
        out.push_str("</body>\n</html>\n");
        Ok(out)
    }
}

/// Machine-readable dump of the full layout for external renderers.
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, layout: &Layout) -> Result<String> {
        let mut out = serde_json::to_string_pretty(layout)?;
        out.push('\n');
        Ok(out)
    }
}

fn tooltip(rect: &Rectangle) -> String {
    match rect.line_ratio {
        Some(ratio) => format!(
            "{}\nCoverage: {:.1}%\nSize: {}",
            rect.label,
            ratio * 100.0,
            rect.value
        ),
        None => format!("{}\nNo coverage data", rect.label),
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
