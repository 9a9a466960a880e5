//! Fixture builders that write real image files for testing.

use std::fs::{self, File};
use std::io::{BufWriter, Cursor};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::codecs::jpeg::{JpegEncoder, PixelDensity, PixelDensityUnit};
use image::{ExtendedColorType, GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use img_parts::png::{Png, PngChunk};
use img_parts::Bytes;
use raster_gate_core::domain::ImageRecord;

/// TIFF `PhotometricInterpretation` for separated (CMYK) images.
pub const PHOTOMETRIC_CMYK: u16 = 5;
/// TIFF `PhotometricInterpretation` for RGB images.
pub const PHOTOMETRIC_RGB: u16 = 2;
/// TIFF `PhotometricInterpretation` for black-is-zero grayscale.
pub const PHOTOMETRIC_GRAY: u16 = 1;
/// TIFF `ResolutionUnit` for inches.
pub const RESOLUTION_UNIT_INCH: u16 = 2;
/// TIFF `ResolutionUnit` for centimetres.
pub const RESOLUTION_UNIT_CENTIMETRE: u16 = 3;

/// Builder for writing fixture images into a directory.
///
/// Images are small (8x8) and carry exactly the density and color model
/// asked for.
pub struct FixtureBuilder;

impl FixtureBuilder {
    /// Writes an RGB JPEG, with a JFIF density in dots per inch if given.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn rgb_jpeg(dir: &Path, name: &str, dpi: Option<(u16, u16)>) -> Result<PathBuf> {
        let img = RgbImage::from_fn(8, 8, |x, y| {
            #[allow(clippy::cast_possible_truncation)]
            let v = ((x + y) * 16) as u8;
            Rgb([v, 255 - v, 128])
        });
        write_jpeg(dir, name, img.as_raw(), ExtendedColorType::Rgb8, dpi)
    }

    /// Writes a single-channel JPEG, with a JFIF density if given.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn gray_jpeg(dir: &Path, name: &str, dpi: Option<(u16, u16)>) -> Result<PathBuf> {
        let img = GrayImage::from_fn(8, 8, |x, _| {
            #[allow(clippy::cast_possible_truncation)]
            let v = (x * 32) as u8;
            Luma([v])
        });
        write_jpeg(dir, name, img.as_raw(), ExtendedColorType::L8, dpi)
    }

    /// Writes an RGB PNG without density metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn rgb_png(dir: &Path, name: &str) -> Result<PathBuf> {
        let path = dir.join(name);
        RgbImage::from_pixel(8, 8, Rgb([200, 100, 50]))
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Writes an RGB PNG with a `pHYs` chunk in pixels per metre.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be encoded or written.
    pub fn rgb_png_with_density(dir: &Path, name: &str, pixels_per_metre: u32) -> Result<PathBuf> {
        let path = dir.join(name);
        let mut encoded = Cursor::new(Vec::new());
        RgbImage::from_pixel(8, 8, Rgb([200, 100, 50]))
            .write_to(&mut encoded, ImageFormat::Png)
            .context("Failed to encode PNG")?;

        let mut png = Png::from_bytes(encoded.into_inner().into()).context("Failed to parse PNG")?;
        let mut phys = pixels_per_metre.to_be_bytes().to_vec();
        phys.extend_from_slice(&pixels_per_metre.to_be_bytes());
        phys.push(1); // unit: metre
        // pHYs must precede IDAT; IHDR is always first.
        png.chunks_mut()
            .insert(1, PngChunk::new(*b"pHYs", Bytes::from(phys)));

        let file =
            File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
        png.encoder()
            .write_to(&mut BufWriter::new(file))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Writes a grayscale PNG without density metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn gray_png(dir: &Path, name: &str) -> Result<PathBuf> {
        let path = dir.join(name);
        GrayImage::from_pixel(8, 8, Luma([90]))
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Writes a header-only little-endian TIFF with the given photometric
    /// interpretation and a square resolution in dots per inch.
    ///
    /// The file has no pixel data; it is enough for metadata inspection.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn tiff_header(dir: &Path, name: &str, photometric: u16, dpi: u32) -> Result<PathBuf> {
        Self::tiff_header_with_unit(dir, name, photometric, dpi, RESOLUTION_UNIT_INCH)
    }

    /// Writes a header-only TIFF whose square resolution is `density` per
    /// `unit` (see [`RESOLUTION_UNIT_INCH`] and [`RESOLUTION_UNIT_CENTIMETRE`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn tiff_header_with_unit(
        dir: &Path,
        name: &str,
        photometric: u16,
        density: u32,
        unit: u16,
    ) -> Result<PathBuf> {
        let path = dir.join(name);
        fs::write(&path, tiff_bytes(photometric, density, unit))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Writes a file with an image extension but no image content.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn corrupt(dir: &Path, name: &str) -> Result<PathBuf> {
        let path = dir.join(name);
        fs::write(&path, b"this is not an image")
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Creates `count` placeholder files and returns records for them,
    /// with ids ascending from 1.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be written.
    pub fn placeholder_records(dir: &Path, count: u64) -> Result<Vec<ImageRecord>> {
        (1..=count)
            .map(|id| {
                let name = format!("image-{id:04}.jpg");
                let path = dir.join(&name);
                fs::write(&path, b"placeholder")
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                Ok(ImageRecord::new(id, name, path))
            })
            .collect()
    }
}

fn write_jpeg(
    dir: &Path,
    name: &str,
    pixels: &[u8],
    color: ExtendedColorType,
    dpi: Option<(u16, u16)>,
) -> Result<PathBuf> {
    let path = dir.join(name);
    let file =
        File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut encoder = JpegEncoder::new_with_quality(BufWriter::new(file), 90);
    if let Some(density) = dpi {
        encoder.set_pixel_density(PixelDensity {
            density,
            unit: PixelDensityUnit::Inches,
        });
    }
    encoder
        .encode(pixels, 8, 8, color)
        .with_context(|| format!("Failed to encode {}", path.display()))?;
    Ok(path)
}

/// Builds a minimal TIFF: one IFD with dimensions, photometric
/// interpretation and resolution tags.
fn tiff_bytes(photometric: u16, density: u32, unit: u16) -> Vec<u8> {
    const SHORT: u16 = 3;
    const RATIONAL: u16 = 5;
    const ENTRIES: u16 = 6;
    // header (8) + entry count (2) + entries (12 each) + next IFD offset (4)
    const DATA_OFFSET: u32 = 8 + 2 + 12 * ENTRIES as u32 + 4;

    let mut out = Vec::new();
    out.extend_from_slice(b"II");
    out.extend_from_slice(&42u16.to_le_bytes());
    out.extend_from_slice(&8u32.to_le_bytes());
    out.extend_from_slice(&ENTRIES.to_le_bytes());

    let short_entry = |out: &mut Vec<u8>, tag: u16, value: u16| {
        out.extend_from_slice(&tag.to_le_bytes());
        out.extend_from_slice(&SHORT.to_le_bytes());
        out.extend_from_slice(&1u32.to_le_bytes());
        out.extend_from_slice(&value.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
    };
    short_entry(&mut out, 0x0100, 8); // ImageWidth
    short_entry(&mut out, 0x0101, 8); // ImageLength
    short_entry(&mut out, 0x0106, photometric);

    for (tag, offset) in [(0x011A_u16, DATA_OFFSET), (0x011B, DATA_OFFSET + 8)] {
        out.extend_from_slice(&tag.to_le_bytes());
        out.extend_from_slice(&RATIONAL.to_le_bytes());
        out.extend_from_slice(&1u32.to_le_bytes());
        out.extend_from_slice(&offset.to_le_bytes());
    }
    short_entry(&mut out, 0x0128, unit); // ResolutionUnit

    out.extend_from_slice(&0u32.to_le_bytes());
    for _ in 0..2 {
        out.extend_from_slice(&density.to_le_bytes());
        out.extend_from_slice(&1u32.to_le_bytes());
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tiff_bytes_layout() {
        let bytes = tiff_bytes(PHOTOMETRIC_CMYK, 72, RESOLUTION_UNIT_INCH);
        assert_eq!(&bytes[..4], b"II*\0");
        // 8 header + 78 IFD + 16 rational data
        assert_eq!(bytes.len(), 102);
    }

    #[test]
    fn test_rgb_jpeg_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = FixtureBuilder::rgb_jpeg(dir.path(), "a.jpg", Some((72, 72))).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_png_density_chunk_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = FixtureBuilder::rgb_png_with_density(dir.path(), "a.png", 11811).unwrap();
        let png = Png::from_bytes(fs::read(&path).unwrap().into()).unwrap();
        let phys = png.chunk_by_type(*b"pHYs").unwrap();
        assert_eq!(&phys.contents()[..4], &11811u32.to_be_bytes());
        assert!(image::open(&path).is_ok());
    }

    #[test]
    fn test_placeholder_records() {
        let dir = tempfile::tempdir().unwrap();
        let records = FixtureBuilder::placeholder_records(dir.path(), 3).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id, 1);
        assert!(records[2].path.is_file());
    }
}
