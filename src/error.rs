use thiserror::Error;

#[derive(Error, Debug)]
pub enum CovmapError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Duplicate file path in coverage data: {0}")]
    DuplicatePath(String),

    #[error("Path used as both a file and a directory: {0}")]
    ConflictingPath(String),

    #[error("Invalid coverage record for '{path}': {reason}")]
    InvalidRecord { path: String, reason: String },

    #[error("Unknown colorscale: '{0}'")]
    UnknownColorScale(String),

    #[error("Canvas dimensions must be positive, got {width}x{height}")]
    InvalidCanvasSize { width: f64, height: f64 },

    #[error("Unsupported output format: '{0}'. Supported: html, svg, json")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, CovmapError>;
