//! Batch statistics
//!
//! Display: "N files: X complete, Y resolved, Z lookup failed, W write failures"

use super::pipeline::{FileOutcome, Resolution};

/// Counts over one batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Files processed
    pub total: usize,
    /// Files whose tags needed no lookup
    pub complete: usize,
    /// Files identified through AcoustID
    pub resolved: usize,
    /// Files whose lookup was abandoned
    pub lookup_failed: usize,
    /// Files whose final write failed (any path)
    pub write_failures: usize,
}

impl BatchSummary {
    /// Count one finished file
    pub fn record(&mut self, outcome: &FileOutcome) {
        self.total += 1;

        match outcome.resolution {
            Resolution::Complete => self.complete += 1,
            Resolution::Resolved { .. } => self.resolved += 1,
            Resolution::LookupFailed(_) => self.lookup_failed += 1,
        }

        if outcome.write_error.is_some() {
            self.write_failures += 1;
        }
    }

    pub fn display_string(&self) -> String {
        format!(
            "{} files: {} complete, {} resolved, {} lookup failed, {} write failures",
            self.total, self.complete, self.resolved, self.lookup_failed, self.write_failures
        )
    }
}
