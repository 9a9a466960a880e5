//! ImageMagick decoding backend.
//!
//! Shells out to `identify`. The program may be missing from the host, so
//! availability is probed on every call.

use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use raster_gate_core::{DecodedImage, DecodingBackend};
use tracing::debug;

/// Program used when none is configured.
pub const DEFAULT_PROGRAM: &str = "identify";

/// `identify` format string: x density, y density, units, colorspace.
const FORMAT: &str = "%x|%y|%U|%[colorspace]\n";

/// Backend delegating to ImageMagick's `identify`.
#[derive(Debug, Clone)]
pub struct MagickBackend {
    program: OsString,
}

impl MagickBackend {
    /// Creates a backend running `program`.
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for MagickBackend {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl DecodingBackend for MagickBackend {
    fn name(&self) -> &'static str {
        "magick"
    }

    fn is_available(&self) -> bool {
        let available = Command::new(&self.program)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|status| status.success());
        debug!(
            "{} available: {available}",
            self.program.to_string_lossy()
        );
        available
    }

    fn open(&self, path: &Path) -> Result<DecodedImage> {
        // Only the first frame of multi-frame files is inspected.
        let mut target = path.as_os_str().to_owned();
        target.push("[0]");

        let output = Command::new(&self.program)
            .arg("-format")
            .arg(FORMAT)
            .arg(&target)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to run {}", self.program.to_string_lossy()))?;

        if !output.status.success() {
            anyhow::bail!(
                "identify failed for {}: {}",
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let line = stdout.lines().next().unwrap_or_default();
        parse_identify(line)
            .with_context(|| format!("Unexpected identify output for {}: {line:?}", path.display()))
    }
}

/// Parses one line of `identify -format "%x|%y|%U|%[colorspace]"` output.
fn parse_identify(line: &str) -> Option<DecodedImage> {
    let mut fields = line.trim().split('|');
    let x = fields.next()?;
    let y = fields.next()?;
    let units = fields.next()?;
    let color_space = fields.next()?.trim();

    // Each axis is kept on its own so a garbled one only zeroes itself.
    let axis = |value: &str| density_to_dpi(value, units).map(|dpi| dpi.round().to_string());
    let resolution = match (axis(x), axis(y)) {
        (None, None) => None,
        (x, y) => Some(format!("{}x{}", x.unwrap_or_default(), y.unwrap_or_default())),
    };

    Some(DecodedImage::new(
        resolution,
        (!color_space.is_empty()).then(|| color_space.to_string()),
    ))
}

/// Converts an `identify` density value to dots per inch.
///
/// Older ImageMagick versions append the unit name to `%x`/`%y`, so only the
/// leading number is read. Undefined units are taken as inches.
fn density_to_dpi(value: &str, units: &str) -> Option<f64> {
    let number: f64 = value.split_whitespace().next()?.parse().ok()?;
    let per_centimetre =
        units.contains("Centimeter") || value.contains("Centimeter");
    Some(if per_centimetre { number * 2.54 } else { number })
}
