//! Batch audit over a record source.

use std::num::NonZeroUsize;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::domain::{BatchReport, ImageRecord, RecordReport, RecordStatus};
use crate::inspector::ImageInspector;
use crate::policy::ValidationPolicy;
use crate::ports::{Notice, NotificationSink, RecordSource};

/// Records fetched per page when none is configured.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(size) => size,
    None => unreachable!(),
};

/// Pages through a record source and checks every record against every rule.
///
/// Unlike the upload gate, both rules run for every record so a record can
/// report two failures.
pub struct BatchRunner<'a> {
    source: &'a dyn RecordSource,
    inspector: ImageInspector<'a>,
    policy: &'a ValidationPolicy,
    page_size: NonZeroUsize,
}

impl<'a> BatchRunner<'a> {
    /// Creates a runner.
    #[must_use]
    pub const fn new(
        source: &'a dyn RecordSource,
        inspector: ImageInspector<'a>,
        policy: &'a ValidationPolicy,
        page_size: NonZeroUsize,
    ) -> Self {
        Self {
            source,
            inspector,
            policy,
            page_size,
        }
    }

    /// Runs the audit.
    ///
    /// Per-record failures are recorded and never stop the run. The loop
    /// ends when the offset reaches the candidate count or a page comes back
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns an error only if the record source cannot be queried.
    pub fn run(&self, sink: &dyn NotificationSink) -> Result<BatchReport> {
        let total = self
            .source
            .count_candidates()
            .context("Failed to count candidate records")?;
        info!("Auditing {total} records, {} per page", self.page_size);
        sink.on_notice(Notice::Started { total });

        let mut report = BatchReport::new(total);
        let mut offset = 0usize;

        while offset < total {
            let page = self
                .source
                .fetch_page(self.page_size.get(), offset)
                .with_context(|| format!("Failed to fetch records at offset {offset}"))?;

            if page.is_empty() {
                debug!("Empty page at offset {offset}, stopping early");
                break;
            }

            sink.on_notice(Notice::PageFetched {
                offset,
                count: page.len(),
            });

            for record in page {
                let outcome = self.process(record);
                emit(sink, &outcome);
                report.record(outcome);
            }

            offset += self.page_size.get();
        }

        sink.on_notice(Notice::Summary {
            checked: report.checked,
            errors: report.errors,
            missing: report.missing,
        });
        info!(
            "Audit finished: {} checked, {} errors, {} missing",
            report.checked, report.errors, report.missing
        );

        Ok(report)
    }

    fn process(&self, record: ImageRecord) -> RecordReport {
        let Some(path) = self.source.resolve_path(&record).filter(|p| p.is_file()) else {
            warn!(
                "File missing for record {} ({}): {}",
                record.id,
                record.name,
                record.path.display()
            );
            return RecordReport {
                record,
                status: RecordStatus::FileMissing,
            };
        };

        let status = match self.inspector.extract(&path) {
            Ok(metadata) => RecordStatus::Checked {
                failures: self.policy.evaluate_all(&metadata),
            },
            Err(e) => {
                warn!("Skipping checks for record {} ({}): {e}", record.id, record.name);
                RecordStatus::ExtractionFailed {
                    failure: ValidationPolicy::extraction_failure(&e),
                }
            }
        };

        RecordReport { record, status }
    }
}

fn emit(sink: &dyn NotificationSink, outcome: &RecordReport) {
    match &outcome.status {
        RecordStatus::Checked { failures } => {
            for failure in failures {
                sink.on_notice(Notice::RuleFailed {
                    record: outcome.record.clone(),
                    failure: failure.clone(),
                });
            }
        }
        RecordStatus::ExtractionFailed { failure } => {
            sink.on_notice(Notice::RuleFailed {
                record: outcome.record.clone(),
                failure: failure.clone(),
            });
        }
        RecordStatus::FileMissing => {
            sink.on_notice(Notice::FileMissing {
                record: outcome.record.clone(),
            });
        }
    }

    sink.on_notice(Notice::Completed {
        record: outcome.record.clone(),
        passed: outcome.passed(),
    });
}
