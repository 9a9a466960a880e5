//! Upload gate: the synchronous single-file check.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::{Failure, FailureKind, ValidationOutcome};
use crate::inspector::ImageInspector;
use crate::policy::ValidationPolicy;

/// A freshly uploaded file awaiting acceptance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upload {
    /// Original file name.
    pub name: String,
    /// Where the upload is stored until accepted.
    pub path: PathBuf,
}

impl Upload {
    /// Creates an upload record.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// An upload rejected by the gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", failure.message)]
pub struct Rejection {
    /// The rejected upload.
    pub upload: Upload,
    /// The first check that failed.
    pub failure: Failure,
}

impl Rejection {
    /// Returns the failure kind.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        self.failure.kind
    }
}

/// Runs the inspector and policy on one file, stopping at the first failure.
#[derive(Clone, Copy)]
pub struct UploadGate<'a> {
    inspector: ImageInspector<'a>,
    policy: &'a ValidationPolicy,
}

impl<'a> UploadGate<'a> {
    /// Creates a gate.
    #[must_use]
    pub const fn new(inspector: ImageInspector<'a>, policy: &'a ValidationPolicy) -> Self {
        Self { inspector, policy }
    }

    /// Evaluates the image at `path`.
    ///
    /// An image that cannot be inspected is rejected.
    #[must_use]
    pub fn evaluate(&self, path: &Path) -> ValidationOutcome {
        match self.inspector.extract(path) {
            Ok(metadata) => self.policy.evaluate(&metadata),
            Err(e) => {
                warn!("Inspection failed for {}: {e}", path.display());
                ValidationOutcome::Rejected(ValidationPolicy::extraction_failure(&e))
            }
        }
    }

    /// Accepts or rejects an upload.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] carrying the first failing check.
    pub fn check(&self, upload: Upload) -> Result<Upload, Rejection> {
        match self.evaluate(&upload.path) {
            ValidationOutcome::Passed => {
                info!("Accepted upload {}", upload.name);
                Ok(upload)
            }
            ValidationOutcome::Rejected(failure) => {
                info!("Rejected upload {}: {}", upload.name, failure.kind);
                Err(Rejection { upload, failure })
            }
        }
    }
}
