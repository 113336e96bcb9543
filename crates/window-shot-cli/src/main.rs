//! screenshot: capture a single window to a PNG file
//!
//! Selects a window by exact title, process id or window id, and writes it
//! as a PNG. Run without arguments for usage and the current window list.
//!
//! stdout carries only `Wrote <path>` and window listings; errors and logs
//! go to stderr. Every failure exits with status 1.

mod args;
mod commands;

use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use tracing_subscriber::EnvFilter;
use window_shot_core::{capture::create_default_backend, error::CaptureError};

use crate::args::Cli;

const DEFAULT_FILTER: &str = "window_shot_core=warn,screenshot=warn";
const VERBOSE_FILTER: &str = "window_shot_core=debug,screenshot=debug";

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return report_usage_error(e),
    };

    init_logging(cli.verbose);

    let result = commands::validate(&cli).and_then(|()| {
        if commands::is_usage_mode(&cli) {
            commands::print_usage()?;
        }
        let backend = create_default_backend()?;
        commands::run(&cli, &backend)
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Prints help and version normally; anything else becomes one error line
fn report_usage_error(e: clap::Error) -> ExitCode {
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        let _ = e.print();
        return ExitCode::SUCCESS;
    }

    let rendered = e.to_string();
    let first_line = rendered.lines().next().unwrap_or_default();
    let message = first_line.strip_prefix("error: ").unwrap_or(first_line);
    eprintln!("Error: {message}");
    ExitCode::FAILURE
}

fn report_error(e: &anyhow::Error) {
    eprintln!("Error: {e}");

    if let Some(capture_error) = e.downcast_ref::<CaptureError>() {
        tracing::info!(
            category = ?capture_error.category(),
            "{}",
            capture_error.remediation_hint()
        );
    }
}
