//! Errors raised while inspecting an image.

use std::path::PathBuf;

use thiserror::Error;

/// Why metadata could not be extracted from an image.
#[derive(Debug, Error)]
pub enum InspectError {
    /// The decoding backend is not present in this environment.
    #[error("image decoding backend `{backend}` is not available")]
    Unavailable {
        /// Name of the missing backend.
        backend: &'static str,
    },
    /// The file exists but could not be opened or parsed.
    #[error("failed to decode {}: {reason}", path.display())]
    Decode {
        /// File that failed to decode.
        path: PathBuf,
        /// Backend error, including its context chain.
        reason: String,
    },
}
