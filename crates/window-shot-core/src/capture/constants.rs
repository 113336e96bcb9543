//! Constants shared by the capture pipeline.
//!
//! Win32 values that `windows-sys` does not export under a stable name live
//! here alongside the tuning values the engine and resolvers use.

/// Wait after requesting foreground focus, before measuring the window.
///
/// Gives the compositor time to finish a restore animation so the paint
/// strategies see a fully drawn frame.
pub const SETTLE_DELAY_MS: u64 = 100;

/// Title prefixes the shell adds to windows of elevated processes.
///
/// Tried in this order after an exact title match fails. Some Windows
/// versions use two spaces after the colon, others one.
pub const ELEVATED_TITLE_PREFIXES: [&str; 2] = ["Administrator:  ", "Administrator: "];

/// `PrintWindow` flag requesting DirectComposition / GPU content.
pub const PW_RENDERFULLCONTENT: u32 = 0x0000_0002;

/// `DwmGetWindowAttribute` attribute for bounds without the drop shadow.
pub const DWMWA_EXTENDED_FRAME_BOUNDS: i32 = 9;

/// Upper bound on window title length read from the host.
pub const MAX_TITLE_LEN: i32 = 32768;

/// `strftime` pattern of generated filenames, before the suffix.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S-%6f";

/// Suffix appended to generated filenames.
pub const SCREENSHOT_SUFFIX: &str = "_screenshot.png";

#[cfg(test)]
#[allow(clippy::assertions_on_constants)]
mod tests {
    use super::*;

    #[test]
    fn test_settle_delay_is_short() {
        assert!(SETTLE_DELAY_MS > 0);
        assert!(SETTLE_DELAY_MS < 1000);
    }

    #[test]
    fn test_elevated_prefixes_try_double_space_first() {
        assert!(ELEVATED_TITLE_PREFIXES[0].ends_with(":  "));
        assert!(ELEVATED_TITLE_PREFIXES[1].ends_with(": "));
        assert!(!ELEVATED_TITLE_PREFIXES[1].ends_with(":  "));
    }

    #[test]
    fn test_suffix_is_png() {
        assert!(SCREENSHOT_SUFFIX.ends_with(".png"));
    }
}
