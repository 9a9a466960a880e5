//! Decoding backend port for reading image properties.

use std::path::Path;

/// Properties read from an opened image.
///
/// Values are the backend's raw reports; the inspector interprets them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedImage {
    resolution: Option<String>,
    color_space: Option<String>,
}

impl DecodedImage {
    /// Creates a decoded image from its raw properties.
    ///
    /// * `resolution` - density formatted as `"<x>x<y>"`, if the file carries one
    /// * `color_space` - the backend's color-space code, if it reports one
    #[must_use]
    pub const fn new(resolution: Option<String>, color_space: Option<String>) -> Self {
        Self {
            resolution,
            color_space,
        }
    }

    /// Returns the resolution property, e.g. `"300x300"`.
    #[must_use]
    pub fn resolution_property(&self) -> Option<&str> {
        self.resolution.as_deref()
    }

    /// Returns the platform color-space code, e.g. `"sRGB"` or `"CMYK"`.
    #[must_use]
    pub fn color_space_code(&self) -> Option<&str> {
        self.color_space.as_deref()
    }
}

/// Port for an image decoding capability.
pub trait DecodingBackend: Send + Sync {
    /// Returns the name of this backend.
    fn name(&self) -> &'static str;

    /// Returns whether the capability is present in this environment.
    ///
    /// Called before every extraction; implementations must not cache a
    /// negative answer.
    fn is_available(&self) -> bool;

    /// Opens an image read-only and reads its properties.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed as an image.
    fn open(&self, path: &Path) -> anyhow::Result<DecodedImage>;
}
