//! Resolution check.
//!
//! Rejects images whose horizontal or vertical DPI is strictly above the
//! threshold. Images without resolution metadata report 0 DPI and pass.

use crate::domain::{Failure, FailureKind, ImageMetadata, Rule};

/// Maximum accepted DPI when none is configured.
pub const DEFAULT_DPI_THRESHOLD: u32 = 96;

/// DPI threshold rule.
#[derive(Debug, Clone, Copy)]
pub struct DpiRule {
    threshold: u32,
}

impl DpiRule {
    /// Creates a rule rejecting either axis above `threshold`.
    #[must_use]
    pub const fn new(threshold: u32) -> Self {
        Self { threshold }
    }

    /// Returns the configured threshold.
    #[must_use]
    pub const fn threshold(&self) -> u32 {
        self.threshold
    }
}

impl Default for DpiRule {
    fn default() -> Self {
        Self::new(DEFAULT_DPI_THRESHOLD)
    }
}

impl Rule for DpiRule {
    fn name(&self) -> &'static str {
        "dpi"
    }

    fn check(&self, metadata: &ImageMetadata) -> Option<Failure> {
        if metadata.horizontal_dpi <= self.threshold && metadata.vertical_dpi <= self.threshold {
            return None;
        }

        Some(Failure::new(
            FailureKind::DpiTooHigh,
            format!(
                "Image resolution is {}x{} DPI; the maximum allowed is {} DPI.",
                metadata.horizontal_dpi, metadata.vertical_dpi, self.threshold
            ),
        ))
    }
}
