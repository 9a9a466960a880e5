//! CLI command definitions and handlers.

pub mod audit;
pub mod backends;
pub mod check;

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use raster_gate_adapters::{MagickBackend, NativeBackend, DEFAULT_PROGRAM};
use raster_gate_core::{DecodingBackend, ValidationPolicy, DEFAULT_DPI_THRESHOLD};
use tracing::debug;

use crate::config::AppConfig;

/// Raster Gate - Reject high-DPI and non-RGB raster images
#[derive(Parser)]
#[command(name = "raster-gate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Gate freshly uploaded files, stopping at the first failed check
    Check(check::CheckArgs),
    /// Audit an existing media library page by page
    Audit(audit::AuditArgs),
    /// List decoding backends and whether they are available
    Backends(backends::BackendsArgs),
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Every image passed.
    Success = 0,
    /// At least one image failed a check.
    IssuesFound = 1,
    /// Usage or runtime error.
    Error = 2,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one JSON object per line)
    #[default]
    Jsonl,
    /// Single JSON document
    Json,
}

impl OutputFormat {
    /// Parses a config file value.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "jsonl" => Some(Self::Jsonl),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Decoding backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// Pure-Rust decoder
    #[default]
    Native,
    /// ImageMagick `identify`
    Magick,
}

impl BackendKind {
    /// Parses a config file value.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "native" => Some(Self::Native),
            "magick" => Some(Self::Magick),
            _ => None,
        }
    }
}

/// Parse and validate a DPI threshold (positive integer).
fn parse_dpi_threshold(s: &str) -> Result<u32, String> {
    let value: u32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value == 0 {
        Err("DPI threshold must be positive".to_string())
    } else {
        Ok(value)
    }
}

/// Policy and decoder arguments shared by `check` and `audit`.
#[derive(Args, Clone, Debug, Default)]
pub struct PolicyArgs {
    /// Maximum accepted DPI on either axis [default: 96]
    #[arg(long, value_name = "DPI", value_parser = parse_dpi_threshold)]
    pub dpi_threshold: Option<u32>,

    /// Decoding backend [default: native]
    #[arg(long, value_enum)]
    pub backend: Option<BackendKind>,

    /// Program used by the magick backend [default: identify]
    #[arg(long, value_name = "PROGRAM")]
    pub magick_program: Option<PathBuf>,
}

impl PolicyArgs {
    /// Apply configuration file values, respecting CLI precedence.
    #[must_use]
    pub fn with_config(mut self, config: &AppConfig) -> Self {
        self.dpi_threshold = self
            .dpi_threshold
            .or(config.policy.dpi_threshold.filter(|t| *t > 0));
        if self.backend.is_none() {
            self.backend = config
                .decoder
                .backend
                .as_deref()
                .and_then(BackendKind::from_name);
        }
        if self.magick_program.is_none() {
            self.magick_program.clone_from(&config.decoder.magick_program);
        }
        self
    }

    /// Get DPI threshold with fallback to the built-in default.
    pub fn dpi_threshold(&self) -> u32 {
        self.dpi_threshold.unwrap_or(DEFAULT_DPI_THRESHOLD)
    }

    /// Builds the validation policy.
    pub fn policy(&self) -> ValidationPolicy {
        ValidationPolicy::new(self.dpi_threshold())
    }

    /// Builds the selected decoding backend.
    pub fn backend(&self) -> Box<dyn DecodingBackend> {
        let kind = self.backend.unwrap_or_default();
        debug!("Using {kind:?} decoding backend");
        match kind {
            BackendKind::Native => Box::new(NativeBackend::new()),
            BackendKind::Magick => Box::new(MagickBackend::new(self.magick_program())),
        }
    }

    /// Get the magick program with fallback to `identify`.
    pub fn magick_program(&self) -> OsString {
        self.magick_program
            .as_ref()
            .map_or_else(|| OsString::from(DEFAULT_PROGRAM), |p| p.as_os_str().to_owned())
    }
}
