//! Test support utilities for raster-gate.
//!
//! Provides mocks of the core ports and fixture builders that write real
//! image files for exercising the decoding backends end to end.
//!
//! # Example
//!
//! ```
//! use raster_gate_core::{ImageInspector, ValidationPolicy, UploadGate};
//! use raster_gate_test_support::MockDecodingBackend;
//! use std::path::Path;
//!
//! let backend = MockDecodingBackend::uniform(Some("72x72"), Some("sRGB"));
//! let policy = ValidationPolicy::default();
//! let gate = UploadGate::new(ImageInspector::new(&backend), &policy);
//!
//! assert!(gate.evaluate(Path::new("upload.jpg")).passed());
//! ```

mod builders;
mod mocks;

pub use builders::{
    FixtureBuilder, PHOTOMETRIC_CMYK, PHOTOMETRIC_GRAY, PHOTOMETRIC_RGB,
    RESOLUTION_UNIT_CENTIMETRE, RESOLUTION_UNIT_INCH,
};
pub use mocks::{MockDecodingBackend, MockNotificationSink, MockRecordSource};
