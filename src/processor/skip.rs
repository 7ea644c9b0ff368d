//! Tolerated-failure ceiling for a run
//!
//! Rejected lines are logged and skipped until the ceiling is reached; the
//! next rejection aborts the run. Only [`LineError`]s are ever offered to the
//! policy. I/O and sink failures are always fatal.

use crate::constants::DEFAULT_MAX_SKIPPED_LINES;
use crate::error::LineError;
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipPolicy {
    pub max_skipped_lines: usize,
}

impl Default for SkipPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SKIPPED_LINES)
    }
}

impl SkipPolicy {
    pub fn new(max_skipped_lines: usize) -> Self {
        Self { max_skipped_lines }
    }

    /// Decide whether `failure` may be skipped, given how many lines were already skipped
    ///
    /// Logs the failure with the raw line when it is skipped, or the fatal
    /// message when the ceiling has been reached.
    pub fn should_skip(&self, failure: &LineError, raw_line: &str, skipped_so_far: usize) -> bool {
        if skipped_so_far < self.max_skipped_lines {
            error!(
                "[ {} ]\t{}\t\t|| {}",
                failure.line_number(),
                failure,
                raw_line
            );
            true
        } else {
            error!(
                "Exceeded skip count of {} - fatal failure!",
                self.max_skipped_lines
            );
            false
        }
    }
}
