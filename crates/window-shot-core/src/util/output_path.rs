//! Output path resolution
//!
//! Turns the optional output argument into a concrete [`OutputTarget`]:
//!
//! | Argument                               | Result                                   |
//! |----------------------------------------|------------------------------------------|
//! | absent or blank                        | `<current dir>/<timestamp>_screenshot.png` |
//! | existing directory, or ends in `/`     | `<arg>/<timestamp>_screenshot.png`       |
//! | ends in `.png` (any case)              | `<arg>` verbatim                         |
//! | anything else                          | `<arg>/<timestamp>_screenshot.png`       |
//!
//! Directories are not created here; [`write_png`](super::encode::write_png)
//! creates them once there is something to write.
//!
//! Generated names embed local time to the microsecond. A resolver never
//! hands out the same timestamp twice: if the clock has not advanced since
//! the previous name, the new one is bumped one microsecond past it.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime, SubsecRound, TimeDelta};
use parking_lot::Mutex;

use crate::{
    capture::constants::{SCREENSHOT_SUFFIX, TIMESTAMP_FORMAT},
    error::CaptureResult,
    model::OutputTarget,
};

/// Source of the local time used in generated filenames
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Wall clock in the local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Resolves output arguments to PNG destinations
#[derive(Debug)]
pub struct OutputPathResolver<C: Clock = SystemClock> {
    clock:       C,
    working_dir: Option<PathBuf>,
    last_issued: Mutex<Option<NaiveDateTime>>,
}

impl Default for OutputPathResolver<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> OutputPathResolver<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            working_dir: None,
            last_issued: Mutex::new(None),
        }
    }

    /// Uses `dir` instead of the process working directory when no output
    /// argument is given
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Resolves the output argument
    ///
    /// # Errors
    ///
    /// - [`CaptureError::IoError`](crate::error::CaptureError::IoError) if
    ///   the argument is absent and the current directory cannot be read
    ///
    /// # Examples
    ///
    /// ```
    /// use window_shot_core::util::output_path::OutputPathResolver;
    ///
    /// let resolver = OutputPathResolver::default();
    ///
    /// let exact = resolver.resolve(Some("capture.PNG")).unwrap();
    /// assert_eq!(exact.path().to_str(), Some("capture.PNG"));
    /// assert!(!exact.is_timestamped());
    ///
    /// let generated = resolver.resolve(Some("shots/")).unwrap();
    /// assert!(generated.is_timestamped());
    /// assert!(generated.path().starts_with("shots"));
    /// ```
    pub fn resolve(&self, argument: Option<&str>) -> CaptureResult<OutputTarget> {
        let Some(arg) = argument.filter(|a| !a.trim().is_empty()) else {
            let dir = match &self.working_dir {
                Some(dir) => dir.clone(),
                None => std::env::current_dir()?,
            };
            return Ok(OutputTarget::timestamped(dir.join(self.next_filename())));
        };

        let path = Path::new(arg);

        if ends_with_separator(arg) || path.is_dir() {
            return Ok(OutputTarget::timestamped(path.join(self.next_filename())));
        }

        if has_png_extension(arg) {
            return Ok(OutputTarget::explicit(path));
        }

        tracing::debug!("Treating output argument '{}' as a directory", arg);
        Ok(OutputTarget::timestamped(path.join(self.next_filename())))
    }

    /// Generates the next `<timestamp>_screenshot.png` filename
    pub fn next_filename(&self) -> String {
        format!("{}{}", self.next_timestamp().format(TIMESTAMP_FORMAT), SCREENSHOT_SUFFIX)
    }

    fn next_timestamp(&self) -> NaiveDateTime {
        let now = self.clock.now().naive_local().trunc_subsecs(6);

        let mut last = self.last_issued.lock();
        let issued = match *last {
            Some(prev) if now <= prev => prev + TimeDelta::microseconds(1),
            _ => now,
        };
        *last = Some(issued);
        issued
    }
}

/// Extracts the embedded timestamp from a generated filename
///
/// # Examples
///
/// ```
/// use window_shot_core::util::output_path::timestamp_from_filename;
///
/// let ts = timestamp_from_filename("2024-03-05-14-07-09-000042_screenshot.png").unwrap();
/// assert_eq!(ts.to_string(), "2024-03-05 14:07:09.000042");
/// assert!(timestamp_from_filename("capture.png").is_none());
/// ```
pub fn timestamp_from_filename(name: &str) -> Option<NaiveDateTime> {
    let stamp = name.strip_suffix(SCREENSHOT_SUFFIX)?;
    NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()
}

fn ends_with_separator(arg: &str) -> bool {
    arg.ends_with('/') || arg.ends_with(std::path::MAIN_SEPARATOR)
}

fn has_png_extension(arg: &str) -> bool {
    let bytes = arg.as_bytes();
    bytes.len() >= 4 && bytes[bytes.len() - 4..].eq_ignore_ascii_case(b".png")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use tempfile::TempDir;

    use super::*;

    struct FixedClock(DateTime<Local>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Local> {
            self.0
        }
    }

    fn fixed_resolver() -> OutputPathResolver<FixedClock> {
        let at = Local
            .with_ymd_and_hms(2024, 3, 5, 14, 7, 9)
            .single()
            .unwrap();
        OutputPathResolver::new(FixedClock(at))
    }

    fn file_name(target: &OutputTarget) -> &str {
        target.path().file_name().unwrap().to_str().unwrap()
    }

    #[test]
    fn test_png_argument_used_verbatim() {
        let resolver = fixed_resolver();
        for arg in ["out.png", "out.PNG", "nested/dir/out.Png"] {
            let target = resolver.resolve(Some(arg)).unwrap();
            assert_eq!(target.path(), Path::new(arg));
            assert!(!target.is_timestamped());
        }
    }

    #[test]
    fn test_trailing_separator_is_directory() {
        let target = fixed_resolver().resolve(Some("shots/")).unwrap();
        assert_eq!(
            target.path(),
            Path::new("shots").join("2024-03-05-14-07-09-000000_screenshot.png")
        );
        assert!(target.is_timestamped());
    }

    #[test]
    fn test_other_argument_is_directory() {
        let target = fixed_resolver().resolve(Some("captures")).unwrap();
        assert_eq!(target.directory(), Some(Path::new("captures")));
        assert!(target.is_timestamped());
    }

    #[test]
    fn test_existing_directory_named_like_png() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("looks.png");
        std::fs::create_dir(&dir).unwrap();

        let target = fixed_resolver().resolve(dir.to_str()).unwrap();
        assert!(target.is_timestamped());
        assert_eq!(target.directory(), Some(dir.as_path()));
    }

    #[test]
    fn test_absent_and_blank_use_working_dir() {
        let temp = TempDir::new().unwrap();
        let resolver = fixed_resolver().with_working_dir(temp.path());

        for arg in [None, Some(""), Some("   ")] {
            let target = resolver.resolve(arg).unwrap();
            assert_eq!(target.directory(), Some(temp.path()));
            assert!(file_name(&target).ends_with(SCREENSHOT_SUFFIX));
        }
    }

    #[test]
    fn test_timestamps_unique_when_clock_stalls() {
        let resolver = fixed_resolver();
        let a = resolver.next_filename();
        let b = resolver.next_filename();
        let c = resolver.next_filename();

        assert_eq!(a, "2024-03-05-14-07-09-000000_screenshot.png");
        assert_eq!(b, "2024-03-05-14-07-09-000001_screenshot.png");
        assert_eq!(c, "2024-03-05-14-07-09-000002_screenshot.png");
    }

    #[test]
    fn test_system_clock_names_are_distinct() {
        let resolver = OutputPathResolver::default();
        let first = resolver.next_filename();
        let second = resolver.next_filename();
        assert_ne!(first, second);
    }

    #[test]
    fn test_timestamp_round_trips_through_filename() {
        let resolver = fixed_resolver();
        let name = resolver.next_filename();
        let parsed = timestamp_from_filename(&name).unwrap();
        assert_eq!(parsed.to_string(), "2024-03-05 14:07:09");
    }

    #[test]
    fn test_generated_name_is_near_now() {
        let before = Local::now().naive_local();
        let name = OutputPathResolver::default().next_filename();
        let stamp = timestamp_from_filename(&name).unwrap();
        let delta = stamp - before;
        assert!(delta >= TimeDelta::microseconds(-1));
        assert!(delta < TimeDelta::seconds(5));
    }

    #[test]
    fn test_has_png_extension() {
        assert!(has_png_extension(".png"));
        assert!(has_png_extension("a.pNg"));
        assert!(!has_png_extension("png"));
        assert!(!has_png_extension("a.png.bak"));
        assert!(!has_png_extension("ü.pn"));
    }
}
