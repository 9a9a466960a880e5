//! Metadata extraction on top of a decoding backend.

use std::path::Path;

use tracing::debug;

use crate::domain::{ColorSpace, ImageMetadata};
use crate::error::InspectError;
use crate::ports::DecodingBackend;

/// Extracts DPI and color space from image files.
#[derive(Clone, Copy)]
pub struct ImageInspector<'a> {
    backend: &'a dyn DecodingBackend,
}

impl<'a> ImageInspector<'a> {
    /// Creates an inspector reading through `backend`.
    #[must_use]
    pub const fn new(backend: &'a dyn DecodingBackend) -> Self {
        Self { backend }
    }

    /// Returns the backend name.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Extracts metadata from the image at `path`.
    ///
    /// Availability of the backend is checked on every call.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::Unavailable`] if the backend is missing, and
    /// [`InspectError::Decode`] if the file cannot be opened or parsed.
    pub fn extract(&self, path: &Path) -> Result<ImageMetadata, InspectError> {
        if !self.backend.is_available() {
            return Err(InspectError::Unavailable {
                backend: self.backend.name(),
            });
        }

        let decoded = self
            .backend
            .open(path)
            .map_err(|e| InspectError::Decode {
                path: path.to_path_buf(),
                reason: format!("{e:#}"),
            })?;

        let (horizontal_dpi, vertical_dpi) = parse_resolution(decoded.resolution_property());
        let color_space = ColorSpace::from_code(decoded.color_space_code());

        debug!(
            "{}: {horizontal_dpi}x{vertical_dpi} DPI, {color_space:?} (resolution {:?}, color space {:?})",
            path.display(),
            decoded.resolution_property(),
            decoded.color_space_code()
        );

        Ok(ImageMetadata::new(horizontal_dpi, vertical_dpi, color_space))
    }
}

/// Parses a `"<x>x<y>"` resolution property into per-axis DPI.
///
/// Each axis is parsed on its own from its leading digits; an absent or
/// unparseable axis is 0. A digit run too large for `u32` saturates to
/// `u32::MAX` so absurd densities still fail the threshold.
#[must_use]
pub fn parse_resolution(property: Option<&str>) -> (u32, u32) {
    let Some(property) = property else {
        return (0, 0);
    };

    match property.split_once(['x', 'X']) {
        Some((x, y)) => (parse_axis(x), parse_axis(y)),
        None => (parse_axis(property), 0),
    }
}

fn parse_axis(value: &str) -> u32 {
    let value = value.trim();
    let digits = value
        .find(|c: char| !c.is_ascii_digit())
        .map_or(value, |end| &value[..end]);
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolution_square() {
        assert_eq!(parse_resolution(Some("300x300")), (300, 300));
        assert_eq!(parse_resolution(Some("72X72")), (72, 72));
    }

    #[test]
    fn test_parse_resolution_with_spaces_and_fractions() {
        assert_eq!(parse_resolution(Some(" 72 x 96 ")), (72, 96));
        assert_eq!(parse_resolution(Some("71.9836x71.9836")), (71, 71));
    }

    #[test]
    fn test_parse_resolution_absent() {
        assert_eq!(parse_resolution(None), (0, 0));
        assert_eq!(parse_resolution(Some("")), (0, 0));
    }

    #[test]
    fn test_parse_resolution_axes_independent() {
        assert_eq!(parse_resolution(Some("abcx150")), (0, 150));
        assert_eq!(parse_resolution(Some("150x")), (150, 0));
        assert_eq!(parse_resolution(Some("150")), (150, 0));
        assert_eq!(parse_resolution(Some("-5x20")), (0, 20));
    }

    #[test]
    fn test_parse_resolution_overflow_saturates() {
        assert_eq!(parse_resolution(Some("99999999999x72")), (u32::MAX, 72));
        assert_eq!(
            parse_resolution(Some("10000000000x10000000000")),
            (u32::MAX, u32::MAX)
        );
    }
}
