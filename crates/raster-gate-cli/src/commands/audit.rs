//! Audit command - sweep an existing media library.

use std::io::IsTerminal;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use raster_gate_adapters::{FsRecordSource, ManifestRecordSource};
use raster_gate_core::{BatchRunner, ImageInspector, RecordSource, DEFAULT_PAGE_SIZE};
use tracing::info;

use super::{ExitCode, OutputFormat, PolicyArgs};
use crate::config::AppConfig;
use crate::output::{JsonOutput, ProgressReporter};

/// Arguments for the audit command.
#[derive(Args, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct AuditArgs {
    /// Media directory to scan [default: current directory]
    #[arg(conflicts_with = "manifest")]
    pub dir: Option<PathBuf>,

    /// JSON manifest of attachment records to audit instead of a directory
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Directory relative manifest paths resolve against [default: manifest's directory]
    #[arg(long, value_name = "DIR", requires = "manifest")]
    pub base_dir: Option<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Records fetched per page [default: 100]
    #[arg(long, value_name = "N")]
    pub page_size: Option<NonZeroUsize>,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress and per-record lines
    #[arg(short, long)]
    pub quiet: bool,
}

impl AuditArgs {
    /// Apply configuration file values, respecting CLI precedence.
    #[must_use]
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        args.policy = args.policy.with_config(config);
        if !args.recursive {
            args.recursive = config.audit.recursive.unwrap_or(false);
        }
        args.page_size = args
            .page_size
            .or_else(|| config.audit.page_size.and_then(NonZeroUsize::new));
        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_deref()
                .and_then(OutputFormat::from_name);
        }
        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }
        args
    }

    /// Get page size with fallback to the built-in default.
    fn page_size(&self) -> NonZeroUsize {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Get output format with fallback to JSONL.
    fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    fn source(&self) -> Result<Box<dyn RecordSource>> {
        if let Some(manifest) = &self.manifest {
            let source = ManifestRecordSource::load(manifest, self.base_dir.as_deref())?;
            return Ok(Box::new(source));
        }

        let dir = self.dir.clone().unwrap_or_else(|| PathBuf::from("."));
        if !dir.exists() {
            anyhow::bail!("Path does not exist: {}", dir.display());
        }
        Ok(Box::new(FsRecordSource::scan(&dir, self.recursive)))
    }
}

/// Run the audit command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &AuditArgs) -> Result<ExitCode> {
    let source = args.source()?;
    let backend = args.policy.backend();
    let policy = args.policy.policy();
    info!(
        "Running audit with the {} backend, threshold {} DPI",
        backend.name(),
        policy.dpi_threshold()
    );

    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let reporter = ProgressReporter::new(args.quiet, show_progress);

    let runner = BatchRunner::new(
        source.as_ref(),
        ImageInspector::new(backend.as_ref()),
        &policy,
        args.page_size(),
    );
    let report = runner.run(&reporter).context("Audit aborted")?;

    let output = JsonOutput::stdout();
    match args.format() {
        OutputFormat::Jsonl => {
            for outcome in &report.outcomes {
                output.write_line(outcome)?;
            }
        }
        OutputFormat::Json => output.write_document(&report, args.pretty)?,
    }
    output.flush()?;

    Ok(if report.has_errors() {
        ExitCode::IssuesFound
    } else {
        ExitCode::Success
    })
}
