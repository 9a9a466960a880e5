//! Notification port for reporting batch progress and failures.

use crate::domain::{Failure, ImageRecord};

/// Notices emitted while a batch runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The run started.
    Started {
        /// Candidate count reported by the source.
        total: usize,
    },
    /// A page of records was fetched.
    PageFetched {
        /// Offset the page was fetched at.
        offset: usize,
        /// Records in the page.
        count: usize,
    },
    /// A check failed for a record. Emitted once per failing check.
    RuleFailed {
        /// The record.
        record: ImageRecord,
        /// The failing check.
        failure: Failure,
    },
    /// A record's file does not exist.
    FileMissing {
        /// The record.
        record: ImageRecord,
    },
    /// A record finished processing.
    Completed {
        /// The record.
        record: ImageRecord,
        /// Whether every check passed.
        passed: bool,
    },
    /// The run finished.
    Summary {
        /// Records inspected.
        checked: usize,
        /// Failing checks.
        errors: usize,
        /// Records whose file was missing.
        missing: usize,
    },
}

impl Notice {
    /// Renders the plain-text line shown to operators, if this notice has one.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Self::RuleFailed { record, failure } => Some(format!(
                "{} (#{}): {}",
                record.name, record.id, failure.message
            )),
            Self::FileMissing { record } => Some(format!(
                "{} (#{}): file not found at {}",
                record.name,
                record.id,
                record.path.display()
            )),
            Self::Summary {
                checked,
                errors,
                missing,
            } => Some(if *missing > 0 {
                format!("Checked {checked} images, found {errors} errors, {missing} files missing")
            } else {
                format!("Checked {checked} images, found {errors} errors")
            }),
            Self::Started { .. } | Self::PageFetched { .. } | Self::Completed { .. } => None,
        }
    }
}

/// Port for receiving notices.
pub trait NotificationSink: Send + Sync {
    /// Called when a notice is emitted.
    fn on_notice(&self, notice: Notice);
}
