//! Backends command - report decoding backend availability.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use raster_gate_adapters::{MagickBackend, NativeBackend};
use raster_gate_core::DecodingBackend;

use super::{BackendKind, PolicyArgs};
use crate::config::AppConfig;

/// Arguments for the backends command
#[derive(Args, Clone)]
pub struct BackendsArgs {
    /// Program used by the magick backend [default: identify]
    #[arg(long, value_name = "PROGRAM")]
    pub magick_program: Option<PathBuf>,
}

/// Run the backends command.
pub fn run(args: &BackendsArgs, config: &AppConfig) -> Result<()> {
    let policy = PolicyArgs {
        magick_program: args.magick_program.clone(),
        ..PolicyArgs::default()
    }
    .with_config(config);
    let selected = policy.backend.unwrap_or_default();

    let backends: [(Box<dyn DecodingBackend>, BackendKind); 2] = [
        (Box::new(NativeBackend::new()), BackendKind::Native),
        (Box::new(MagickBackend::new(policy.magick_program())), BackendKind::Magick),
    ];

    for (backend, kind) in &backends {
        let status = if backend.is_available() {
            "available"
        } else {
            "unavailable"
        };
        let marker = if *kind == selected { "*" } else { " " };
        println!("{marker} {:<8} {status}", backend.name());
    }

    Ok(())
}
