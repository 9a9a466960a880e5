//! Rule trait for validation checks.

use super::{Failure, ImageMetadata};

/// Trait for implementing a single acceptance check.
///
/// Each rule inspects extracted metadata for one property and reports a
/// failure when the property is out of policy.
pub trait Rule: Send + Sync {
    /// Returns the name of this rule.
    fn name(&self) -> &'static str;

    /// Checks metadata against this rule.
    ///
    /// # Arguments
    ///
    /// * `metadata` - Metadata extracted from the image
    ///
    /// # Returns
    ///
    /// `None` if the rule passes, otherwise the failure to report.
    fn check(&self, metadata: &ImageMetadata) -> Option<Failure>;
}
