//! Command-line arguments

use clap::{ArgGroup, Parser};
use window_shot_core::{
    capture::constants::SETTLE_DELAY_MS,
    model::{CaptureOptions, WindowSelector},
};

/// Usage text printed when run without a selector
pub const USAGE: &str = "\
Usage:
  screenshot --title \"window title\" [output.png|directory|]
  screenshot --pid <process id> [output.png|directory|]
  screenshot --id <window id> [output.png|directory|]
  screenshot --list [--json]

Output path is optional:
  - Specify .png file: saves to that exact location
  - Specify directory: saves with timestamped filename (YYYY-MM-DD-HH-MM-SS-microseconds_screenshot.png)
  - Omit output: saves to current directory with timestamped filename

Run without arguments to see list of windows with IDs and PIDs.";

#[derive(Debug, Parser)]
#[command(name = "screenshot", version)]
#[command(about = "Capture a single window to a PNG file")]
#[command(after_help = USAGE)]
#[command(group(ArgGroup::new("selector").args(["title", "pid", "id"])))]
pub struct Cli {
    /// Exact window title; an "Administrator: " prefix is also matched
    #[arg(long, allow_hyphen_values = true)]
    pub title: Option<String>,

    /// Decimal id of the process owning the window
    #[arg(long, allow_hyphen_values = true)]
    pub pid: Option<String>,

    /// Hexadecimal window id as printed in the window list
    #[arg(long, allow_hyphen_values = true)]
    pub id: Option<String>,

    /// Output .png file or directory
    pub output: Option<String>,

    /// Print the window list only
    #[arg(long, conflicts_with_all = ["selector", "output"])]
    pub list: bool,

    /// Print the window list as JSON
    #[arg(long, requires = "list")]
    pub json: bool,

    /// Do not restore and foreground the window before capturing
    #[arg(long)]
    pub no_foreground: bool,

    /// Wait after foregrounding the window, in milliseconds
    #[arg(long, value_name = "MS", env = "SCREENSHOT_SETTLE_DELAY_MS", default_value_t = SETTLE_DELAY_MS)]
    pub settle_ms: u64,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The window selector, if one was given
    pub fn selector(&self) -> Option<WindowSelector> {
        if let Some(title) = &self.title {
            return Some(WindowSelector::by_title(title.clone()));
        }
        if let Some(pid) = &self.pid {
            return Some(WindowSelector::by_pid(pid.clone()));
        }
        self.id.as_ref().map(|id| WindowSelector::by_handle(id.clone()))
    }

    pub fn capture_options(&self) -> CaptureOptions {
        CaptureOptions::builder()
            .prepare_window(!self.no_foreground)
            .settle_delay(std::time::Duration::from_millis(self.settle_ms))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("screenshot").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_title_with_output() {
        let cli = parse(&["--title", "Untitled - Notepad", "shots/"]).unwrap();
        assert_eq!(cli.selector(), Some(WindowSelector::by_title("Untitled - Notepad")));
        assert_eq!(cli.output.as_deref(), Some("shots/"));
    }

    #[test]
    fn test_pid_keeps_raw_text() {
        let cli = parse(&["--pid", "-5"]).unwrap();
        assert_eq!(cli.selector(), Some(WindowSelector::by_pid("-5")));
    }

    #[test]
    fn test_selectors_are_exclusive() {
        assert!(parse(&["--title", "a", "--pid", "1"]).is_err());
        assert!(parse(&["--pid", "1", "--id", "1A"]).is_err());
    }

    #[test]
    fn test_list_conflicts_with_selector() {
        assert!(parse(&["--list", "--title", "a"]).is_err());
        assert!(parse(&["--json"]).is_err());
        assert!(parse(&["--list", "--json"]).is_ok());
    }

    #[test]
    fn test_no_arguments() {
        let cli = parse(&[]).unwrap();
        assert!(cli.selector().is_none());
        assert!(cli.output.is_none());
        assert!(!cli.list);
    }

    #[test]
    fn test_capture_options_from_flags() {
        let cli = parse(&["--id", "1A", "--no-foreground", "--settle-ms", "250"]).unwrap();
        let opts = cli.capture_options();
        assert!(!opts.prepare_window);
        assert_eq!(opts.settle_delay, Duration::from_millis(250));
    }

    #[test]
    fn test_usage_lists_output_modes() {
        assert!(USAGE.contains("Specify .png file"));
        assert!(USAGE.contains("Specify directory"));
        assert!(USAGE.contains("Omit output"));
    }
}
