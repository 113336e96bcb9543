//! Command implementations

use std::io::{self, Write};

use anyhow::{Context, Result};
use window_shot_core::{
    capture::{CaptureHost, WindowEnumerator, take_screenshot},
    model::{WindowRecord, WindowSelector},
    util::output_path::OutputPathResolver,
};

use crate::args::{Cli, USAGE};

/// Header printed above the window list in usage mode
pub const WINDOW_LIST_HEADER: &str = "Currently open windows (id,pid,title):";

/// Error for an output argument given without a selector
pub const MISSING_SELECTOR: &str = "Must specify --title, --pid, or --id";

/// Rejects usage errors before any host access
///
/// Covers an output argument without a selector and malformed process ids
/// or window ids.
pub fn validate(cli: &Cli) -> Result<()> {
    match cli.selector() {
        Some(selector) => {
            selector.target()?;
        }
        None if cli.output.is_some() => anyhow::bail!(MISSING_SELECTOR),
        None => {}
    }
    Ok(())
}

/// True when the invocation only asks for usage and the window list
pub fn is_usage_mode(cli: &Cli) -> bool {
    !cli.list && cli.selector().is_none()
}

/// Prints the usage text and the window list header
///
/// Needs no backend, so it is printed even where capture is unavailable.
pub fn print_usage() -> Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{USAGE}\n").context("Failed to write to stdout")?;
    writeln!(stdout, "{WINDOW_LIST_HEADER}").context("Failed to write to stdout")?;
    stdout.flush().context("Failed to write to stdout")?;
    Ok(())
}

/// Runs a validated command line against `backend`
///
/// In usage mode only the window list is printed here; the usage text comes
/// from [`print_usage`].
pub fn run<B>(cli: &Cli, backend: &B) -> Result<()>
where
    B: WindowEnumerator + CaptureHost,
{
    match cli.selector() {
        Some(selector) => capture(cli, backend, &selector),
        None => list_windows(backend, cli.json),
    }
}

fn capture<B>(cli: &Cli, backend: &B, selector: &WindowSelector) -> Result<()>
where
    B: WindowEnumerator + CaptureHost,
{
    let report = take_screenshot(
        backend,
        selector,
        cli.output.as_deref(),
        &cli.capture_options(),
        &OutputPathResolver::default(),
    )?;

    tracing::debug!(
        strategy = %report.strategy,
        width = report.width,
        height = report.height,
        "Capture complete"
    );

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "Wrote {}", report.path.display()).context("Failed to write to stdout")?;
    Ok(())
}

fn list_windows<B: WindowEnumerator>(backend: &B, json: bool) -> Result<()> {
    let windows = sorted_by_title(backend.list_windows()?);

    let mut stdout = io::stdout().lock();
    if json {
        let text = serde_json::to_string_pretty(&windows).context("Failed to serialize window list")?;
        writeln!(stdout, "{text}").context("Failed to write to stdout")?;
    } else {
        for window in &windows {
            writeln!(stdout, "{}", format_window_line(window)).context("Failed to write to stdout")?;
        }
    }

    Ok(())
}

/// Orders windows by title, ignoring case; ties keep enumeration order
pub fn sorted_by_title(mut windows: Vec<WindowRecord>) -> Vec<WindowRecord> {
    windows.sort_by_cached_key(|w| w.title.to_lowercase());
    windows
}

/// Formats a window as `<HEX>\t<pid>\t"<title>"`
pub fn format_window_line(window: &WindowRecord) -> String {
    format!("{}\t{}\t\"{}\"", window.handle, window.pid, window.title)
}
