//! Native decoding backend built on the `image` and `exif` crates.

use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use image::{ColorType, ImageDecoder, ImageFormat, ImageReader};
use raster_gate_core::{DecodedImage, DecodingBackend};
use tracing::debug;

use crate::headers::{sniff_jpeg, sniff_png_density};

/// Color-space codes reported by this backend.
mod codes {
    pub const RGB: &str = "sRGB";
    pub const CMYK: &str = "CMYK";
    pub const GRAY: &str = "Gray";
    pub const YCBCR: &str = "YCbCr";
    pub const LAB: &str = "Lab";
}

const EXIF_UNIT_CENTIMETRE: u32 = 3;

/// Pure-Rust backend. Always available.
///
/// Resolution comes from EXIF `XResolution`/`YResolution`, falling back to
/// the JPEG JFIF density or the PNG `pHYs` chunk. Color space comes from the
/// JPEG frame header, the TIFF photometric interpretation, or the decoder's
/// color type, in that order of preference.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBackend;

impl NativeBackend {
    /// Creates the backend.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DecodingBackend for NativeBackend {
    fn name(&self) -> &'static str {
        "native"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn open(&self, path: &Path) -> Result<DecodedImage> {
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let format = image::guess_format(&bytes)
            .with_context(|| format!("Unrecognised image format: {}", path.display()))?;

        let exif = exif::Reader::new()
            .read_from_container(&mut Cursor::new(&bytes))
            .ok();

        let color_space = match format {
            ImageFormat::Tiff => {
                // Header-only inspection: the IFD is the source of truth and
                // CMYK TIFFs are not decodable by `image`.
                let exif = exif
                    .as_ref()
                    .with_context(|| format!("Failed to parse TIFF: {}", path.display()))?;
                tiff_color_space(exif)
            }
            _ => {
                let decoder = ImageReader::new(Cursor::new(&bytes))
                    .with_guessed_format()
                    .with_context(|| format!("Failed to open image: {}", path.display()))?
                    .into_decoder()
                    .with_context(|| format!("Failed to decode image: {}", path.display()))?;
                let color_type = decoder.color_type();

                match format {
                    ImageFormat::Jpeg => sniff_jpeg(&bytes)
                        .and_then(|h| h.components)
                        .and_then(jpeg_color_space)
                        .or_else(|| color_type_space(color_type)),
                    _ => color_type_space(color_type),
                }
            }
        };

        let density = exif.as_ref().and_then(exif_density).or_else(|| match format {
            ImageFormat::Jpeg => sniff_jpeg(&bytes).and_then(|h| h.density),
            ImageFormat::Png => sniff_png_density(&bytes),
            _ => None,
        });

        debug!(
            "{}: {format:?}, density {density:?}, color space {color_space:?}",
            path.display()
        );

        Ok(DecodedImage::new(
            density.map(format_density),
            color_space.map(str::to_string),
        ))
    }
}

fn format_density((x, y): (f64, f64)) -> String {
    format!("{}x{}", x.round(), y.round())
}

fn jpeg_color_space(components: u8) -> Option<&'static str> {
    match components {
        1 => Some(codes::GRAY),
        3 => Some(codes::RGB),
        4 => Some(codes::CMYK),
        _ => None,
    }
}

fn color_type_space(color_type: ColorType) -> Option<&'static str> {
    match color_type {
        ColorType::L8 | ColorType::La8 | ColorType::L16 | ColorType::La16 => Some(codes::GRAY),
        ColorType::Rgb8
        | ColorType::Rgba8
        | ColorType::Rgb16
        | ColorType::Rgba16
        | ColorType::Rgb32F
        | ColorType::Rgba32F => Some(codes::RGB),
        _ => None,
    }
}

fn tiff_color_space(exif: &exif::Exif) -> Option<&'static str> {
    let photometric = exif
        .get_field(exif::Tag::PhotometricInterpretation, exif::In::PRIMARY)?
        .value
        .get_uint(0)?;

    match photometric {
        0 | 1 => Some(codes::GRAY),
        2 => Some(codes::RGB),
        5 => Some(codes::CMYK),
        6 => Some(codes::YCBCR),
        8..=10 => Some(codes::LAB),
        _ => Some("Undefined"),
    }
}

fn exif_density(exif: &exif::Exif) -> Option<(f64, f64)> {
    let x = exif_rational(exif, exif::Tag::XResolution);
    let y = exif_rational(exif, exif::Tag::YResolution);
    if x.is_none() && y.is_none() {
        return None;
    }

    let unit = exif
        .get_field(exif::Tag::ResolutionUnit, exif::In::PRIMARY)
        .and_then(|f| f.value.get_uint(0));
    let scale = if unit == Some(EXIF_UNIT_CENTIMETRE) {
        2.54
    } else {
        1.0
    };

    Some((x.unwrap_or(0.0) * scale, y.unwrap_or(0.0) * scale))
}

fn exif_rational(exif: &exif::Exif, tag: exif::Tag) -> Option<f64> {
    let field = exif.get_field(tag, exif::In::PRIMARY)?;
    match &field.value {
        exif::Value::Rational(values) => values
            .first()
            .filter(|r| r.denom != 0)
            .map(exif::Rational::to_f64),
        _ => None,
    }
}
