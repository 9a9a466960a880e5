//! Check command - gate freshly uploaded files.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use raster_gate_core::{FailureKind, ImageInspector, Upload, UploadGate, ValidationOutcome};
use serde::Serialize;
use tracing::{debug, info};

use super::{ExitCode, OutputFormat, PolicyArgs};
use crate::config::AppConfig;
use crate::output::JsonOutput;

/// Arguments for the check command.
#[derive(Args, Clone)]
pub struct CheckArgs {
    /// Image files to check
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,
}

impl CheckArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    #[must_use]
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        args.policy = args.policy.with_config(config);
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
        args
    }

    /// Get output format with fallback to JSONL.
    fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }
}

/// One file's outcome as written to stdout.
#[derive(Debug, Serialize)]
struct CheckReport {
    file: String,
    name: String,
    timestamp: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<FailureKind>,
    message: String,
}

impl CheckReport {
    fn new(upload: &Upload, outcome: &ValidationOutcome) -> Self {
        Self {
            file: upload.path.display().to_string(),
            name: upload.name.clone(),
            timestamp: iso_timestamp(),
            status: if outcome.passed() { "passed" } else { "rejected" },
            kind: outcome.failure_kind(),
            message: outcome.message().to_string(),
        }
    }
}

/// Run the check command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &CheckArgs) -> Result<ExitCode> {
    info!("Running check command on {} files", args.files.len());

    if args.files.is_empty() {
        anyhow::bail!("No files specified");
    }

    let backend = args.policy.backend();
    let policy = args.policy.policy();
    let gate = UploadGate::new(ImageInspector::new(backend.as_ref()), &policy);
    debug!("Policy: {policy:?}");

    let output = JsonOutput::stdout();
    let mut reports = Vec::with_capacity(args.files.len());
    let mut rejected = 0usize;

    for path in &args.files {
        let upload = Upload::new(display_name(path), path.clone());

        let outcome = match gate.check(upload.clone()) {
            Ok(_) => ValidationOutcome::Passed,
            Err(rejection) => {
                eprintln!("rejected {}: {rejection}", rejection.upload.name);
                rejected += 1;
                ValidationOutcome::Rejected(rejection.failure)
            }
        };

        let report = CheckReport::new(&upload, &outcome);
        match args.format() {
            OutputFormat::Jsonl => output.write_line(&report)?,
            OutputFormat::Json => reports.push(report),
        }
    }

    if args.format() == OutputFormat::Json {
        output.write_document(&reports, args.pretty)?;
    }
    output.flush()?;

    info!("{rejected} of {} files rejected", args.files.len());
    Ok(if rejected > 0 {
        ExitCode::IssuesFound
    } else {
        ExitCode::Success
    })
}

fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    )
}

/// Generate ISO 8601 UTC timestamp (RFC 3339 format).
fn iso_timestamp() -> String {
    match time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339) {
        Ok(ts) => ts,
        Err(e) => {
            debug!("Timestamp format failed: {e}");
            String::from("1970-01-01T00:00:00Z")
        }
    }
}
