//! Raster Gate Adapters - Concrete decoding backends and record sources.
//!
//! This crate provides adapters for:
//! - Decoding with the pure-Rust `image` stack ([`NativeBackend`])
//! - Decoding with an external `identify` program ([`MagickBackend`])
//! - Listing images from a media directory ([`FsRecordSource`])
//! - Listing images from an exported attachment manifest ([`ManifestRecordSource`])

pub mod fs;
pub mod headers;
pub mod magick;
pub mod manifest;
pub mod native;

pub use fs::FsRecordSource;
pub use magick::{MagickBackend, DEFAULT_PROGRAM};
pub use manifest::{ManifestEntry, ManifestRecordSource};
pub use native::NativeBackend;
