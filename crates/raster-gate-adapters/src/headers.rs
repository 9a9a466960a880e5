//! Container fields the `image` crate does not expose, read with `img-parts`.

use img_parts::jpeg::Jpeg;
use img_parts::png::Png;
use img_parts::Bytes;

/// Facts read from JPEG marker segments.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JpegHeader {
    /// Component count from the first frame header (1 gray, 3 YCbCr/RGB, 4 CMYK/YCCK).
    pub components: Option<u8>,
    /// JFIF density converted to dots per inch.
    pub density: Option<(f64, f64)>,
}

const APP0: u8 = 0xE0;
const METRES_PER_INCH: f64 = 0.0254;

/// Reads the frame header and JFIF segment of a JPEG.
///
/// Returns `None` if `bytes` is not a parseable JPEG.
#[must_use]
pub fn sniff_jpeg(bytes: &[u8]) -> Option<JpegHeader> {
    let jpeg = Jpeg::from_bytes(Bytes::copy_from_slice(bytes)).ok()?;

    let mut header = JpegHeader::default();
    for segment in jpeg.segments() {
        let marker = segment.marker();
        if is_frame_header(marker) && header.components.is_none() {
            // precision(1) height(2) width(2) components(1)
            header.components = segment.contents().get(5).copied();
        } else if marker == APP0 && header.density.is_none() {
            header.density = jfif_density(segment.contents());
        }
    }

    Some(header)
}

const fn is_frame_header(marker: u8) -> bool {
    matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF)
}

fn jfif_density(contents: &[u8]) -> Option<(f64, f64)> {
    // "JFIF\0" version(2) units(1) xdensity(2) ydensity(2)
    if contents.len() < 12 || &contents[..5] != b"JFIF\0" {
        return None;
    }
    let x = f64::from(u16::from_be_bytes([contents[8], contents[9]]));
    let y = f64::from(u16::from_be_bytes([contents[10], contents[11]]));
    match contents[7] {
        1 => Some((x, y)),
        2 => Some((x * 2.54, y * 2.54)),
        _ => None,
    }
}

/// Reads the `pHYs` chunk of a PNG as dots per inch.
///
/// Aspect-ratio-only densities yield `None`.
#[must_use]
pub fn sniff_png_density(bytes: &[u8]) -> Option<(f64, f64)> {
    let png = Png::from_bytes(Bytes::copy_from_slice(bytes)).ok()?;
    let data = png.chunk_by_type(*b"pHYs")?.contents();

    // x ppu(4) y ppu(4) unit(1), unit 1 is metres
    if data.len() < 9 || data[8] != 1 {
        return None;
    }
    let x = f64::from(u32::from_be_bytes([data[0], data[1], data[2], data[3]]));
    let y = f64::from(u32::from_be_bytes([data[4], data[5], data[6], data[7]]));
    Some((x * METRES_PER_INCH, y * METRES_PER_INCH))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Cursor;

    use image::codecs::jpeg::{JpegEncoder, PixelDensity, PixelDensityUnit};
    use image::{ExtendedColorType, ImageFormat, RgbImage};
    use img_parts::png::PngChunk;

    use super::*;

    fn encode_jpeg(color: ExtendedColorType, channels: usize, density: PixelDensity) -> Vec<u8> {
        let mut out = Vec::new();
        let mut encoder = JpegEncoder::new(&mut out);
        encoder.set_pixel_density(density);
        encoder.encode(&vec![128; 8 * 8 * channels], 8, 8, color).unwrap();
        out
    }

    fn segment(marker: u8, payload: &[u8]) -> Vec<u8> {
        let mut out = vec![0xFF, marker];
        #[allow(clippy::cast_possible_truncation)]
        out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
        out.extend_from_slice(payload);
        out
    }

    /// A CMYK frame header, which the `image` encoder cannot produce.
    fn cmyk_jpeg() -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xD8];
        bytes.extend(segment(
            0xC0,
            &[8, 0, 8, 0, 8, 4, 1, 0x11, 0, 2, 0x11, 0, 3, 0x11, 0, 4, 0x11, 0],
        ));
        bytes.extend(segment(0xDA, &[1, 1, 0, 0, 63, 0]));
        bytes.extend_from_slice(&[0x00, 0xFF, 0xD9]);
        bytes
    }

    #[test]
    fn test_sniff_jpeg_rgb_density() {
        let bytes = encode_jpeg(
            ExtendedColorType::Rgb8,
            3,
            PixelDensity {
                density: (300, 150),
                unit: PixelDensityUnit::Inches,
            },
        );
        let header = sniff_jpeg(&bytes).unwrap();
        assert_eq!(header.components, Some(3));
        assert_eq!(header.density, Some((300.0, 150.0)));
    }

    #[test]
    fn test_sniff_jpeg_gray_components() {
        let bytes = encode_jpeg(ExtendedColorType::L8, 1, PixelDensity::dpi(72));
        let header = sniff_jpeg(&bytes).unwrap();
        assert_eq!(header.components, Some(1));
    }

    #[test]
    fn test_sniff_jpeg_centimetre_density() {
        let bytes = encode_jpeg(
            ExtendedColorType::Rgb8,
            3,
            PixelDensity {
                density: (100, 100),
                unit: PixelDensityUnit::Centimeters,
            },
        );
        let (x, y) = sniff_jpeg(&bytes).unwrap().density.unwrap();
        assert!((x - 254.0).abs() < 1e-9);
        assert!((y - 254.0).abs() < 1e-9);
    }

    #[test]
    fn test_sniff_jpeg_aspect_ratio_only() {
        let bytes = encode_jpeg(
            ExtendedColorType::Rgb8,
            3,
            PixelDensity {
                density: (1, 1),
                unit: PixelDensityUnit::PixelAspectRatio,
            },
        );
        let header = sniff_jpeg(&bytes).unwrap();
        assert_eq!(header.density, None);
        assert_eq!(header.components, Some(3));
    }

    #[test]
    fn test_sniff_jpeg_cmyk_components() {
        let header = sniff_jpeg(&cmyk_jpeg()).unwrap();
        assert_eq!(header.components, Some(4));
        assert_eq!(header.density, None);
    }

    #[test]
    fn test_sniff_jpeg_rejects_non_jpeg() {
        assert!(sniff_jpeg(b"GIF89a....").is_none());
        assert!(sniff_jpeg(&[]).is_none());
    }

    fn encode_png() -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        RgbImage::new(8, 8)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn png_with_phys(ppm: u32, unit: u8) -> Vec<u8> {
        let mut png = Png::from_bytes(encode_png().into()).unwrap();
        let mut phys = ppm.to_be_bytes().to_vec();
        phys.extend_from_slice(&ppm.to_be_bytes());
        phys.push(unit);
        png.chunks_mut()
            .insert(1, PngChunk::new(*b"pHYs", Bytes::from(phys)));

        let mut out = Vec::new();
        png.encoder().write_to(&mut out).unwrap();
        out
    }

    #[test]
    fn test_sniff_png_density() {
        // 11811 px/m ~ 300 dpi
        let (x, y) = sniff_png_density(&png_with_phys(11811, 1)).unwrap();
        assert!((x - 300.0).abs() < 0.1);
        assert!((y - 300.0).abs() < 0.1);
    }

    #[test]
    fn test_sniff_png_unitless() {
        assert_eq!(sniff_png_density(&png_with_phys(1, 0)), None);
    }

    #[test]
    fn test_sniff_png_without_phys() {
        assert_eq!(sniff_png_density(&encode_png()), None);
    }
}
