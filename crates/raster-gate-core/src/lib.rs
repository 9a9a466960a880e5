//! Raster Gate Core - Domain logic for raster upload validation
//!
//! This crate contains the domain types, ports, and the two acceptance rules
//! (maximum DPI, RGB-only color space), together with the single-upload gate
//! and the paged batch audit built on them.

pub mod batch;
pub mod domain;
pub mod error;
pub mod gate;
pub mod inspector;
pub mod policy;
pub mod ports;
pub mod rules;

pub use batch::{BatchRunner, DEFAULT_PAGE_SIZE};
pub use domain::{
    BatchReport, ColorSpace, Failure, FailureKind, ImageMetadata, ImageRecord, RecordReport,
    RecordStatus, Rule, ValidationOutcome,
};
pub use error::InspectError;
pub use gate::{Rejection, Upload, UploadGate};
pub use inspector::{parse_resolution, ImageInspector};
pub use policy::{ValidationPolicy, EXTRACTION_UNAVAILABLE_MESSAGE};
pub use ports::{DecodedImage, DecodingBackend, Notice, NotificationSink, RecordSource};
pub use rules::DEFAULT_DPI_THRESHOLD;
