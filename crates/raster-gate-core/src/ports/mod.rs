//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the domain core and external adapters.

mod decoding;
mod notifications;
mod record_source;

pub use decoding::{DecodedImage, DecodingBackend};
pub use notifications::{Notice, NotificationSink};
pub use record_source::RecordSource;
