pub mod cobertura;

use crate::error::Result;
use crate::model::CoverageRecord;

/// Every report-format parser implements this trait.
pub trait Parser {
    /// Parse the input bytes into flat per-file coverage records.
    fn parse(&self, input: &[u8]) -> Result<Vec<CoverageRecord>>;
}
