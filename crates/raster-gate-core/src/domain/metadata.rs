//! Image metadata extracted by the inspector.

use serde::{Deserialize, Serialize};

/// Resolution and color facts about one decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// Horizontal resolution in DPI, 0 when undeterminable.
    pub horizontal_dpi: u32,
    /// Vertical resolution in DPI, 0 when undeterminable.
    pub vertical_dpi: u32,
    /// Color model the image is encoded in.
    pub color_space: ColorSpace,
}

impl ImageMetadata {
    /// Creates metadata from both DPI axes and a color space.
    #[must_use]
    pub const fn new(horizontal_dpi: u32, vertical_dpi: u32, color_space: ColorSpace) -> Self {
        Self {
            horizontal_dpi,
            vertical_dpi,
            color_space,
        }
    }
}

/// Color model reported by a decoding backend.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSpace {
    /// Red/green/blue, including sRGB.
    Rgb,
    /// Cyan/magenta/yellow/black print separations.
    Cmyk,
    /// Single luminance channel.
    Grayscale,
    /// A recognised code outside the named set (Lab, YCbCr, ...).
    Other,
    /// The backend reported nothing usable.
    #[default]
    Unknown,
}

impl ColorSpace {
    /// Maps a backend's platform color-space code onto the fixed set.
    ///
    /// Matching is case-insensitive. Unrecognised codes map to
    /// [`ColorSpace::Other`]; a missing or undefined code maps to
    /// [`ColorSpace::Unknown`].
    #[must_use]
    pub fn from_code(code: Option<&str>) -> Self {
        let Some(code) = code.map(str::trim) else {
            return Self::Unknown;
        };

        match code.to_ascii_lowercase().as_str() {
            "" | "undefined" | "unknown" => Self::Unknown,
            "rgb" | "srgb" | "scrgb" | "linearrgb" => Self::Rgb,
            "cmyk" | "cmy" => Self::Cmyk,
            "gray" | "grey" | "grayscale" | "lineargray" => Self::Grayscale,
            _ => Self::Other,
        }
    }

    /// Display label used in messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rgb => "RGB",
            Self::Cmyk => "CMYK",
            Self::Grayscale => "grayscale",
            Self::Other => "an unsupported color space",
            Self::Unknown => "an unknown color space",
        }
    }
}

impl std::fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
