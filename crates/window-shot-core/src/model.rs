//! Data models for window lookup and capture
//!
//! This module defines the values passed between the pipeline stages:
//! - [`WindowRecord`] snapshots produced by a window directory query
//! - [`WindowSelector`] describing which window the user asked for
//! - [`Rect`] geometry measured right before capture
//! - [`OutputTarget`] naming the PNG file to write
//! - [`CaptureOptions`] tuning the capture engine
//! - [`CaptureReport`] describing the file that was written

use std::{
    fmt,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Serialize, Serializer};

use crate::{
    capture::constants::SETTLE_DELAY_MS,
    error::{CaptureError, CaptureResult},
};

/// Represents the window system backend in use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    /// Win32 window manager and GDI
    Windows,
}

impl BackendType {
    /// Returns the backend type as a lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendType::Windows => "windows",
        }
    }
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Opaque platform window identifier
///
/// Holds the raw handle value. Displayed as upper-case hexadecimal without a
/// `0x` prefix, which is also the form accepted back by `--id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowHandle(u64);

impl WindowHandle {
    /// Wraps a raw handle value
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw handle value
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Parses a base-16 handle, accepting an optional `0x`/`0X` prefix
    ///
    /// # Examples
    ///
    /// ```
    /// use window_shot_core::model::WindowHandle;
    ///
    /// assert_eq!(WindowHandle::parse_hex("0x1A"), WindowHandle::parse_hex("1a"));
    /// assert!(WindowHandle::parse_hex("zz").is_none());
    /// ```
    pub fn parse_hex(text: &str) -> Option<Self> {
        let text = text.trim();
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(text);

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        u64::from_str_radix(digits, 16).ok().map(Self)
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}", self.0)
    }
}

impl Serialize for WindowHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A visible, titled top-level window at the moment of enumeration
///
/// Records are snapshots: the window may close, retitle, or have its handle
/// value reused by the host at any time after the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowRecord {
    /// Platform window handle
    pub handle: WindowHandle,
    /// Owning process id
    pub pid:    u32,
    /// Window title, never empty or whitespace-only
    pub title:  String,
}

impl WindowRecord {
    /// Builds a record, rejecting empty or whitespace-only titles
    pub fn new(handle: WindowHandle, pid: u32, title: impl Into<String>) -> Option<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return None;
        }

        Some(Self { handle, pid, title })
    }
}

/// Which attribute a selector matches on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorKind {
    /// Exact window title
    Title,
    /// Owning process id
    ProcessId,
    /// Raw window handle
    Handle,
}

impl SelectorKind {
    /// Returns the command-line flag that produces this selector
    pub fn flag(&self) -> &'static str {
        match self {
            SelectorKind::Title => "--title",
            SelectorKind::ProcessId => "--pid",
            SelectorKind::Handle => "--id",
        }
    }
}

impl fmt::Display for SelectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SelectorKind::Title => "title",
            SelectorKind::ProcessId => "pid",
            SelectorKind::Handle => "id",
        })
    }
}

/// The user's window selector, exactly one variant per invocation
///
/// Process id and handle selectors keep the raw text so that parse failures
/// surface as [`CaptureError::InvalidSelector`] rather than as "not found".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowSelector {
    /// Match the window title
    ByTitle(String),
    /// Match the owning process id (decimal text)
    ByProcessId(String),
    /// Match the window handle (hexadecimal text)
    ByHandle(String),
}

/// A parsed, ready-to-compare selector value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTarget<'a> {
    /// Title text to compare
    Title(&'a str),
    /// Parsed process id
    ProcessId(u32),
    /// Parsed window handle
    Handle(WindowHandle),
}

impl WindowSelector {
    /// Selector matching a window title
    pub fn by_title(title: impl Into<String>) -> Self {
        Self::ByTitle(title.into())
    }

    /// Selector matching an owning process id
    pub fn by_pid(pid: impl Into<String>) -> Self {
        Self::ByProcessId(pid.into())
    }

    /// Selector matching a hexadecimal window handle
    pub fn by_handle(handle: impl Into<String>) -> Self {
        Self::ByHandle(handle.into())
    }

    /// Returns which attribute this selector matches on
    pub fn kind(&self) -> SelectorKind {
        match self {
            Self::ByTitle(_) => SelectorKind::Title,
            Self::ByProcessId(_) => SelectorKind::ProcessId,
            Self::ByHandle(_) => SelectorKind::Handle,
        }
    }

    /// Returns the raw selector text as given by the user
    pub fn value(&self) -> &str {
        match self {
            Self::ByTitle(v) | Self::ByProcessId(v) | Self::ByHandle(v) => v,
        }
    }

    /// Parses the selector value
    ///
    /// # Errors
    ///
    /// - [`CaptureError::InvalidSelector`] when a process id is not a
    ///   non-negative decimal integer, or a handle is not hexadecimal
    pub fn target(&self) -> CaptureResult<MatchTarget<'_>> {
        match self {
            Self::ByTitle(title) => Ok(MatchTarget::Title(title)),
            Self::ByProcessId(text) => text
                .trim()
                .parse::<u32>()
                .map(MatchTarget::ProcessId)
                .map_err(|_| CaptureError::InvalidSelector {
                    kind:   SelectorKind::ProcessId,
                    value:  text.clone(),
                    reason: "expected a non-negative decimal process id".to_string(),
                }),
            Self::ByHandle(text) => WindowHandle::parse_hex(text)
                .map(MatchTarget::Handle)
                .ok_or_else(|| CaptureError::InvalidSelector {
                    kind:   SelectorKind::Handle,
                    value:  text.clone(),
                    reason: "expected a hexadecimal window id".to_string(),
                }),
        }
    }
}

impl fmt::Display for WindowSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByTitle(title) => write!(f, "title \"{title}\""),
            Self::ByProcessId(pid) => write!(f, "pid {pid}"),
            Self::ByHandle(id) => write!(f, "id {id}"),
        }
    }
}

/// Window bounds in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left:   i32,
    pub top:    i32,
    pub right:  i32,
    pub bottom: i32,
}

impl Rect {
    /// Creates a rectangle from its edges
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Width, which may be zero or negative for minimized windows
    pub fn width(&self) -> i64 {
        i64::from(self.right) - i64::from(self.left)
    }

    /// Height, which may be zero or negative for minimized windows
    pub fn height(&self) -> i64 {
        i64::from(self.bottom) - i64::from(self.top)
    }

    /// Returns `(width, height)` when both are strictly positive
    pub fn size(&self) -> Option<(u32, u32)> {
        let width = u32::try_from(self.width()).ok().filter(|w| *w > 0)?;
        let height = u32::try_from(self.height()).ok().filter(|h| *h > 0)?;
        Some((width, height))
    }
}

/// The resolved PNG destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    path:        PathBuf,
    timestamped: bool,
}

impl OutputTarget {
    /// Target that was given verbatim by the user
    pub fn explicit(path: impl Into<PathBuf>) -> Self {
        Self {
            path:        path.into(),
            timestamped: false,
        }
    }

    /// Target whose filename was generated from the clock
    pub fn timestamped(path: impl Into<PathBuf>) -> Self {
        Self {
            path:        path.into(),
            timestamped: true,
        }
    }

    /// Final file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the filename was generated
    pub fn is_timestamped(&self) -> bool {
        self.timestamped
    }

    /// Directory the file will be written into, if the path has one
    pub fn directory(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// One way of getting a window's pixels into the off-screen surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureStrategy {
    /// Ask the window to paint itself, including GPU-composited content
    PaintFullContent,
    /// Ask the window to paint itself without the full-content flag
    Paint,
    /// Copy whatever is on screen where the window is
    ScreenCopy,
}

impl CaptureStrategy {
    /// The fallback chain used unless overridden
    pub const DEFAULT_ORDER: [CaptureStrategy; 3] = [
        CaptureStrategy::PaintFullContent,
        CaptureStrategy::Paint,
        CaptureStrategy::ScreenCopy,
    ];

    /// Short name used in logs and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureStrategy::PaintFullContent => "paint_full_content",
            CaptureStrategy::Paint => "paint",
            CaptureStrategy::ScreenCopy => "screen_copy",
        }
    }
}

impl fmt::Display for CaptureStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a successful capture
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureReport {
    /// File that was written
    pub path:     PathBuf,
    /// Image width in pixels
    pub width:    u32,
    /// Image height in pixels
    pub height:   u32,
    /// Strategy that produced the pixels
    pub strategy: CaptureStrategy,
}

/// Options for a single capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOptions {
    /// Restore and foreground the window before measuring it
    pub prepare_window: bool,
    /// Wait after the foreground request, only used with `prepare_window`
    pub settle_delay:   Duration,
    /// Strategies tried in order until one succeeds
    pub strategies:     Vec<CaptureStrategy>,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            prepare_window: true,
            settle_delay:   Duration::from_millis(SETTLE_DELAY_MS),
            strategies:     CaptureStrategy::DEFAULT_ORDER.to_vec(),
        }
    }
}

impl CaptureOptions {
    /// Creates a builder starting from the defaults
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use window_shot_core::model::{CaptureOptions, CaptureStrategy};
    ///
    /// let opts = CaptureOptions::builder()
    ///     .prepare_window(false)
    ///     .strategies([CaptureStrategy::ScreenCopy])
    ///     .build();
    ///
    /// assert!(!opts.prepare_window);
    /// assert_eq!(opts.strategies, vec![CaptureStrategy::ScreenCopy]);
    /// assert_eq!(opts.settle_delay, Duration::from_millis(100));
    /// ```
    pub fn builder() -> CaptureOptionsBuilder {
        CaptureOptionsBuilder::default()
    }
}

/// Builder for [`CaptureOptions`]
#[derive(Debug, Default)]
pub struct CaptureOptionsBuilder {
    opts: CaptureOptions,
}

impl CaptureOptionsBuilder {
    pub fn prepare_window(mut self, prepare: bool) -> Self {
        self.opts.prepare_window = prepare;
        self
    }

    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.opts.settle_delay = delay;
        self
    }

    pub fn strategies(mut self, strategies: impl IntoIterator<Item = CaptureStrategy>) -> Self {
        self.opts.strategies = strategies.into_iter().collect();
        self
    }

    pub fn build(self) -> CaptureOptions {
        self.opts
    }
}
