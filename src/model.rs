//! Uniform in-memory representation of coverage data, independent of any
//! specific report format. Parsers produce `CoverageRecord`s which the tree
//! builder then groups into a directory hierarchy.

use crate::error::{CovmapError, Result};

/// Compute a coverage ratio, returning `None` when the total is zero.
///
/// A zero denominator means "no measurable units", which is distinct from
/// zero coverage and is rendered with a sentinel color downstream.
#[must_use]
pub fn ratio(covered: u64, total: u64) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(covered as f64 / total as f64)
    }
}

/// Coverage counts for a single source file, as produced by a parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageRecord {
    /// Forward-slash-delimited path, relative to the report root.
    pub path: String,
    pub lines_covered: u64,
    pub lines_valid: u64,
    pub branches_covered: u64,
    pub branches_valid: u64,
}

impl CoverageRecord {
    pub fn new(path: impl Into<String>, lines_covered: u64, lines_valid: u64) -> Self {
        Self {
            path: path.into(),
            lines_covered,
            lines_valid,
            branches_covered: 0,
            branches_valid: 0,
        }
    }

    /// Check the count invariants (covered <= valid for lines and branches).
    pub fn validate(&self) -> Result<()> {
        if self.lines_covered > self.lines_valid {
            return Err(CovmapError::InvalidRecord {
                path: self.path.clone(),
                reason: format!(
                    "lines_covered ({}) exceeds lines_valid ({})",
                    self.lines_covered, self.lines_valid
                ),
            });
        }
        if self.branches_covered > self.branches_valid {
            return Err(CovmapError::InvalidRecord {
                path: self.path.clone(),
                reason: format!(
                    "branches_covered ({}) exceeds branches_valid ({})",
                    self.branches_covered, self.branches_valid
                ),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn line_ratio(&self) -> Option<f64> {
        ratio(self.lines_covered, self.lines_valid)
    }

    #[must_use]
    pub fn branch_ratio(&self) -> Option<f64> {
        ratio(self.branches_covered, self.branches_valid)
    }
}

/// Rolled-up raw coverage counts across a subtree.
///
/// Counts are summed before any division so that small files do not skew
/// the ratio of their parent directories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Aggregate {
    pub lines_covered: u64,
    pub lines_valid: u64,
    pub branches_covered: u64,
    pub branches_valid: u64,
}

impl Aggregate {
    pub fn add(&mut self, other: &Aggregate) {
        self.lines_covered += other.lines_covered;
        self.lines_valid += other.lines_valid;
        self.branches_covered += other.branches_covered;
        self.branches_valid += other.branches_valid;
    }

    #[must_use]
    pub fn line_ratio(&self) -> Option<f64> {
        ratio(self.lines_covered, self.lines_valid)
    }

    #[must_use]
    pub fn branch_ratio(&self) -> Option<f64> {
        ratio(self.branches_covered, self.branches_valid)
    }
}

impl From<&CoverageRecord> for Aggregate {
    fn from(record: &CoverageRecord) -> Self {
        Self {
            lines_covered: record.lines_covered,
            lines_valid: record.lines_valid,
            branches_covered: record.branches_covered,
            branches_valid: record.branches_valid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio() {
        assert_eq!(ratio(1, 2), Some(0.5));
        assert_eq!(ratio(0, 4), Some(0.0));
        assert_eq!(ratio(0, 0), None);
    }

    #[test]
    fn test_validate_ok() {
        let record = CoverageRecord::new("src/lib.rs", 5, 10);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_validate_lines_exceed() {
        let record = CoverageRecord::new("src/lib.rs", 11, 10);
        let err = record.validate().unwrap_err();
        assert!(matches!(err, CovmapError::InvalidRecord { .. }));
        assert!(err.to_string().contains("src/lib.rs"));
    }

    #[test]
    fn test_validate_branches_exceed() {
        let mut record = CoverageRecord::new("src/lib.rs", 5, 10);
        record.branches_covered = 3;
        record.branches_valid = 2;
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_undefined_ratios() {
        let record = CoverageRecord::new("empty.rs", 0, 0);
        assert_eq!(record.line_ratio(), None);
        assert_eq!(record.branch_ratio(), None);
    }

    #[test]
    fn test_aggregate_add() {
        let mut a = Aggregate::from(&CoverageRecord::new("a", 8, 10));
        a.add(&Aggregate::from(&CoverageRecord::new("b", 2, 10)));
        assert_eq!(a.lines_covered, 10);
        assert_eq!(a.lines_valid, 20);
        assert_eq!(a.line_ratio(), Some(0.5));
    }
}
