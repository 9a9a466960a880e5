//! Validation policy: ordered rules applied to extracted metadata.

use crate::domain::{Failure, FailureKind, ImageMetadata, Rule, ValidationOutcome};
use crate::error::InspectError;
use crate::rules::{ColorSpaceRule, DpiRule, DEFAULT_DPI_THRESHOLD};

/// Message reported when no decoding backend is available.
pub const EXTRACTION_UNAVAILABLE_MESSAGE: &str =
    "Image could not be inspected because no image decoding backend is available.";

/// Applies the DPI and color space rules, in that order.
pub struct ValidationPolicy {
    rules: Vec<Box<dyn Rule>>,
    dpi_threshold: u32,
}

impl ValidationPolicy {
    /// Creates a policy rejecting DPI above `dpi_threshold` and any non-RGB
    /// color space.
    #[must_use]
    pub fn new(dpi_threshold: u32) -> Self {
        Self {
            rules: vec![
                Box::new(DpiRule::new(dpi_threshold)),
                Box::new(ColorSpaceRule::new()),
            ],
            dpi_threshold,
        }
    }

    /// Returns the DPI threshold.
    #[must_use]
    pub const fn dpi_threshold(&self) -> u32 {
        self.dpi_threshold
    }

    /// Returns the rule names in evaluation order.
    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.name())
    }

    /// Evaluates rules in order and stops at the first failure.
    #[must_use]
    pub fn evaluate(&self, metadata: &ImageMetadata) -> ValidationOutcome {
        self.rules
            .iter()
            .find_map(|rule| rule.check(metadata))
            .into()
    }

    /// Evaluates every rule independently and returns all failures.
    #[must_use]
    pub fn evaluate_all(&self, metadata: &ImageMetadata) -> Vec<Failure> {
        self.rules
            .iter()
            .filter_map(|rule| rule.check(metadata))
            .collect()
    }

    /// Maps an inspection error to the failure it is reported as.
    ///
    /// Images that cannot be inspected are rejected.
    #[must_use]
    pub fn extraction_failure(error: &InspectError) -> Failure {
        match error {
            InspectError::Unavailable { .. } => Failure::new(
                FailureKind::ExtractionUnavailable,
                EXTRACTION_UNAVAILABLE_MESSAGE,
            ),
            InspectError::Decode { .. } => Failure::new(
                FailureKind::DecodeFailed,
                format!("Image could not be read: {error}"),
            ),
        }
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_DPI_THRESHOLD)
    }
}

impl std::fmt::Debug for ValidationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationPolicy")
            .field("rules", &self.rule_names().collect::<Vec<_>>())
            .field("dpi_threshold", &self.dpi_threshold)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ColorSpace;
    use std::path::PathBuf;

    #[test]
    fn test_rule_order() {
        let policy = ValidationPolicy::default();
        assert_eq!(
            policy.rule_names().collect::<Vec<_>>(),
            vec!["dpi", "color_space"]
        );
        assert_eq!(policy.dpi_threshold(), 96);
    }

    #[test]
    fn test_evaluate_passes() {
        let policy = ValidationPolicy::default();
        let outcome = policy.evaluate(&ImageMetadata::new(72, 72, ColorSpace::Rgb));
        assert!(outcome.passed());
    }

    #[test]
    fn test_evaluate_short_circuits_on_dpi() {
        let policy = ValidationPolicy::default();
        let outcome = policy.evaluate(&ImageMetadata::new(300, 300, ColorSpace::Cmyk));
        assert_eq!(outcome.failure_kind(), Some(FailureKind::DpiTooHigh));
    }

    #[test]
    fn test_evaluate_color_space_when_dpi_ok() {
        let policy = ValidationPolicy::default();
        let outcome = policy.evaluate(&ImageMetadata::new(72, 72, ColorSpace::Cmyk));
        assert_eq!(outcome.failure_kind(), Some(FailureKind::NonRgbColorSpace));
    }

    #[test]
    fn test_evaluate_all_reports_both() {
        let policy = ValidationPolicy::default();
        let failures = policy.evaluate_all(&ImageMetadata::new(300, 300, ColorSpace::Cmyk));
        let kinds: Vec<_> = failures.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![FailureKind::DpiTooHigh, FailureKind::NonRgbColorSpace]
        );
    }

    #[test]
    fn test_missing_metadata_passes_dpi_rule() {
        let policy = ValidationPolicy::default();
        let metadata = ImageMetadata {
            color_space: ColorSpace::Rgb,
            ..ImageMetadata::default()
        };
        assert!(policy.evaluate(&metadata).passed());
    }

    #[test]
    fn test_extraction_failure_unavailable_is_stable() {
        let first = ValidationPolicy::extraction_failure(&InspectError::Unavailable {
            backend: "magick",
        });
        let second = ValidationPolicy::extraction_failure(&InspectError::Unavailable {
            backend: "native",
        });
        assert_eq!(first.kind, FailureKind::ExtractionUnavailable);
        assert_eq!(first.message, second.message);
        assert!(!first.message.is_empty());
    }

    #[test]
    fn test_extraction_failure_decode() {
        let failure = ValidationPolicy::extraction_failure(&InspectError::Decode {
            path: PathBuf::from("/tmp/broken.jpg"),
            reason: "truncated header".into(),
        });
        assert_eq!(failure.kind, FailureKind::DecodeFailed);
        assert!(failure.message.contains("truncated header"));
    }
}
