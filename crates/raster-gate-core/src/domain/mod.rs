//! Core domain types for raster validation.

mod metadata;
mod outcome;
mod report;
mod rule;

pub use metadata::{ColorSpace, ImageMetadata};
pub use outcome::{Failure, FailureKind, ValidationOutcome, PASSED_MESSAGE};
pub use report::{BatchReport, ImageRecord, RecordReport, RecordStatus};
pub use rule::Rule;
