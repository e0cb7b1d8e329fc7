//! Batch outcomes and run-level accounting.

use std::fmt;

/// Terminal state of one submitted batch. There is no retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    Succeeded(usize),
    Failed(usize),
}

/// Aggregate result of one statement load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub prepared_outgoing: usize,
    pub prepared_incoming: usize,
    pub batches_succeeded: usize,
    pub batches_failed: usize,
    /// Rows in batches the ledger accepted.
    pub succeeded: usize,
    /// Rows in batches that were rejected or never reached the ledger, plus
    /// rows dropped before submission.
    pub failed: usize,
    /// Rows submitted without a date.
    pub date_errors: usize,
    /// Rows dropped before submission (amount out of range).
    pub rejected: usize,
}

impl LoadSummary {
    pub fn record(&mut self, outcome: BatchOutcome) {
        match outcome {
            BatchOutcome::Succeeded(n) => {
                self.batches_succeeded += 1;
                self.succeeded += n;
            }
            BatchOutcome::Failed(n) => {
                self.batches_failed += 1;
                self.failed += n;
            }
        }
    }

    pub fn prepared(&self) -> usize {
        self.prepared_outgoing + self.prepared_incoming
    }

    /// Every statement row, whether submitted or dropped.
    pub fn rows(&self) -> usize {
        self.prepared() + self.rejected
    }
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "succeeded={} failed={} (batches: {} ok, {} failed; rows without date: {}; rows dropped: {})",
            self.succeeded,
            self.failed,
            self.batches_succeeded,
            self.batches_failed,
            self.date_errors,
            self.rejected
        )
    }
}

/// Number of batches `len` items split into.
pub fn batch_count(len: usize, batch_size: usize) -> usize {
    len.div_ceil(batch_size.max(1))
}
