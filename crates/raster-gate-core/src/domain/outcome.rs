//! Validation outcome types.

use serde::{Deserialize, Serialize};

/// Why an image was rejected.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The decoding backend is not available in this environment.
    ExtractionUnavailable,
    /// The file could not be opened or parsed as an image.
    DecodeFailed,
    /// Horizontal or vertical resolution is above the threshold.
    DpiTooHigh,
    /// The image is not encoded in RGB.
    NonRgbColorSpace,
}

impl FailureKind {
    /// Stable snake-case identifier, matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExtractionUnavailable => "extraction_unavailable",
            Self::DecodeFailed => "decode_failed",
            Self::DpiTooHigh => "dpi_too_high",
            Self::NonRgbColorSpace => "non_rgb_color_space",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single failed check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Kind of failure.
    pub kind: FailureKind,
    /// Human-readable explanation.
    pub message: String,
}

impl Failure {
    /// Creates a failure of the given kind.
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of applying the policy to one image.
///
/// A failure kind exists exactly when the outcome is a rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationOutcome {
    /// Every rule passed.
    Passed,
    /// The first rule that failed.
    Rejected(Failure),
}

/// Message attached to passing outcomes.
pub const PASSED_MESSAGE: &str = "Image meets the resolution and color space requirements.";

impl ValidationOutcome {
    /// Returns true if every rule passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Returns the failure kind of a rejection.
    #[must_use]
    pub const fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Passed => None,
            Self::Rejected(failure) => Some(failure.kind),
        }
    }

    /// Returns the human-readable message for this outcome.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Passed => PASSED_MESSAGE,
            Self::Rejected(failure) => &failure.message,
        }
    }
}

impl From<Option<Failure>> for ValidationOutcome {
    fn from(failure: Option<Failure>) -> Self {
        failure.map_or(Self::Passed, Self::Rejected)
    }
}
