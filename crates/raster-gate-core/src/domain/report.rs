//! Records under audit and the batch report built from them.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::Failure;

/// Reference to one stored image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Monotonic identifier assigned by the record source.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Path as known to the record source, before resolution.
    pub path: PathBuf,
}

impl ImageRecord {
    /// Creates a record.
    pub fn new(id: u64, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id,
            name: name.into(),
            path: path.into(),
        }
    }
}

/// What happened to one record during a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordStatus {
    /// The image was inspected; `failures` is empty when every rule passed.
    Checked {
        /// Every rule that failed, in rule order.
        failures: Vec<Failure>,
    },
    /// The image could not be inspected.
    ExtractionFailed {
        /// Why inspection failed.
        failure: Failure,
    },
    /// The record's file does not exist on disk.
    FileMissing,
}

/// Outcome for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordReport {
    /// The record.
    pub record: ImageRecord,
    /// What happened to it.
    #[serde(flatten)]
    pub status: RecordStatus,
}

impl RecordReport {
    /// Number of failing checks this record contributes to the error count.
    #[must_use]
    pub fn error_count(&self) -> usize {
        match &self.status {
            RecordStatus::Checked { failures } => failures.len(),
            RecordStatus::ExtractionFailed { .. } => 1,
            RecordStatus::FileMissing => 0,
        }
    }

    /// Returns true if the record was inspected and every rule passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        matches!(&self.status, RecordStatus::Checked { failures } if failures.is_empty())
    }
}

/// Aggregate result of one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Candidate count reported by the source at the start of the run.
    pub total: usize,
    /// Records that reached the inspector.
    pub checked: usize,
    /// Failing checks, up to two per record.
    pub errors: usize,
    /// Records whose file was missing.
    pub missing: usize,
    /// Per-record outcomes in processing order.
    pub outcomes: Vec<RecordReport>,
}

impl BatchReport {
    /// Starts an empty report for `total` candidates.
    #[must_use]
    pub const fn new(total: usize) -> Self {
        Self {
            total,
            checked: 0,
            errors: 0,
            missing: 0,
            outcomes: Vec::new(),
        }
    }

    /// Adds a record outcome and updates the counters.
    pub fn record(&mut self, report: RecordReport) {
        if matches!(report.status, RecordStatus::FileMissing) {
            self.missing += 1;
        } else {
            self.checked += 1;
            self.errors += report.error_count();
        }
        self.outcomes.push(report);
    }

    /// Returns true if any check failed.
    #[must_use]
    pub const fn has_errors(&self) -> bool {
        self.errors > 0
    }
}
