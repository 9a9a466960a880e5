//! Color space check.
//!
//! Allow-list of exactly one color space: anything that is not RGB fails,
//! including grayscale and unknown.

use crate::domain::{ColorSpace, Failure, FailureKind, ImageMetadata, Rule};

/// RGB-only color space rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorSpaceRule;

impl ColorSpaceRule {
    /// Creates the rule.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Rule for ColorSpaceRule {
    fn name(&self) -> &'static str {
        "color_space"
    }

    fn check(&self, metadata: &ImageMetadata) -> Option<Failure> {
        if metadata.color_space == ColorSpace::Rgb {
            return None;
        }

        Some(Failure::new(
            FailureKind::NonRgbColorSpace,
            format!(
                "Image uses {}; only RGB images are accepted.",
                metadata.color_space
            ),
        ))
    }
}
