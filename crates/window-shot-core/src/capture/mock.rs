//! Mock capture backend for testing
//!
//! `MockBackend` implements [`WindowEnumerator`] and [`CaptureHost`] without
//! a window system. It serves a fixed window list, configurable geometry,
//! and solid-color surfaces whose color identifies the strategy that filled
//! them.
//!
//! # Features
//!
//! - **Mock Window List:** three predefined windows, one of them elevated
//! - **Configurable Geometry:** per-window extended and plain rectangles
//! - **Failure Injection:** listing, foreground, surface allocation, and
//!   each capture strategy can be made to fail
//! - **Call Log:** every host primitive is recorded in order, including the
//!   release of the surface
//!
//! # Examples
//!
//! ```
//! use window_shot_core::{
//!     capture::{MockBackend, WindowEnumerator},
//!     model::CaptureStrategy,
//! };
//!
//! let backend = MockBackend::new().fail_strategy(CaptureStrategy::PaintFullContent);
//! assert_eq!(backend.list_windows().unwrap().len(), 3);
//! ```

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use image::{Rgba, RgbaImage};
use parking_lot::Mutex;

use super::traits::{
    CaptureHost, HostError, HostResult, PaintMode, RenderSurface, WindowEnumerator,
};
use crate::{
    error::{CaptureError, CaptureResult},
    model::{CaptureStrategy, Rect, WindowHandle, WindowRecord},
};

/// A host primitive invoked on the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    ListWindows,
    RestoreAndFocus(WindowHandle),
    ExtendedFrameBounds(WindowHandle),
    WindowRect(WindowHandle),
    CreateSurface(u32, u32),
    Paint(WindowHandle, PaintMode),
    ScreenCopy(WindowHandle),
    ReleaseSurface,
}

type CallLog = Arc<Mutex<Vec<HostCall>>>;

#[derive(Debug, Clone, Copy, Default)]
struct Geometry {
    extended: Option<Rect>,
    plain:    Option<Rect>,
}

/// Mock capture backend for testing and development
#[derive(Debug)]
pub struct MockBackend {
    /// Predefined mock windows, in enumeration order
    windows:            Vec<WindowRecord>,
    /// Per-window geometry; unknown handles use the default
    geometry:           HashMap<WindowHandle, Geometry>,
    default_geometry:   Geometry,
    failing_strategies: HashSet<CaptureStrategy>,
    fail_listing:       bool,
    fail_restore:       bool,
    fail_surface:       bool,
    calls:              CallLog,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Creates a new MockBackend with default mock windows
    ///
    /// The backend includes 3 predefined windows:
    /// - `Untitled - Notepad` (handle `10010`, pid 1000)
    /// - `Administrator:  Command Prompt` (handle `20020`, pid 2000)
    /// - `Visual Studio Code` (handle `30030`, pid 3000)
    ///
    /// Every window measures 800x600 without its shadow and 814x607 with it.
    pub fn new() -> Self {
        Self {
            windows:            Self::create_mock_windows(),
            geometry:           HashMap::new(),
            default_geometry:   Geometry {
                extended: Some(Rect::new(0, 0, 800, 600)),
                plain:    Some(Rect::new(-7, 0, 807, 607)),
            },
            failing_strategies: HashSet::new(),
            fail_listing:       false,
            fail_restore:       false,
            fail_surface:       false,
            calls:              Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Replaces the window list
    pub fn with_windows(mut self, windows: Vec<WindowRecord>) -> Self {
        self.windows = windows;
        self
    }

    /// Sets the rectangles reported for `handle`
    pub fn with_geometry(mut self, handle: WindowHandle, extended: Option<Rect>, plain: Option<Rect>) -> Self {
        self.geometry.insert(handle, Geometry { extended, plain });
        self
    }

    /// Makes one capture strategy fail
    pub fn fail_strategy(mut self, strategy: CaptureStrategy) -> Self {
        self.failing_strategies.insert(strategy);
        self
    }

    /// Makes every capture strategy fail
    pub fn fail_all_strategies(mut self) -> Self {
        self.failing_strategies.extend(CaptureStrategy::DEFAULT_ORDER);
        self
    }

    /// Makes window enumeration fail
    pub fn fail_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    /// Makes the foreground request fail
    pub fn fail_restore(mut self) -> Self {
        self.fail_restore = true;
        self
    }

    /// Makes surface allocation fail
    pub fn fail_surface(mut self) -> Self {
        self.fail_surface = true;
        self
    }

    /// Host primitives invoked so far, in order
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().clone()
    }

    /// Color a successful strategy fills the surface with
    pub fn strategy_color(strategy: CaptureStrategy) -> Rgba<u8> {
        match strategy {
            CaptureStrategy::PaintFullContent => Rgba([0x20, 0x40, 0x80, 0xFF]),
            CaptureStrategy::Paint => Rgba([0x40, 0x80, 0x20, 0xFF]),
            CaptureStrategy::ScreenCopy => Rgba([0x80, 0x20, 0x40, 0xFF]),
        }
    }

    fn create_mock_windows() -> Vec<WindowRecord> {
        [
            (0x10010, 1000, "Untitled - Notepad"),
            (0x20020, 2000, "Administrator:  Command Prompt"),
            (0x30030, 3000, "Visual Studio Code"),
        ]
        .into_iter()
        .filter_map(|(handle, pid, title)| WindowRecord::new(WindowHandle::new(handle), pid, title))
        .collect()
    }

    fn record(&self, call: HostCall) {
        self.calls.lock().push(call);
    }

    fn geometry_for(&self, handle: WindowHandle) -> Geometry {
        self.geometry.get(&handle).copied().unwrap_or(self.default_geometry)
    }

    fn fill(&self, strategy: CaptureStrategy, surface: &mut MockSurface) -> HostResult<()> {
        if self.failing_strategies.contains(&strategy) {
            return Err(HostError::new(format!("mock {strategy} failure")));
        }

        let color = Self::strategy_color(strategy);
        surface.pixels.pixels_mut().for_each(|p| *p = color);
        Ok(())
    }
}

impl WindowEnumerator for MockBackend {
    fn list_windows(&self) -> CaptureResult<Vec<WindowRecord>> {
        self.record(HostCall::ListWindows);

        if self.fail_listing {
            return Err(CaptureError::EnumerationFailed {
                reason: "mock listing failure".to_string(),
            });
        }

        Ok(self.windows.clone())
    }
}

/// In-memory surface that logs its release
#[derive(Debug)]
pub struct MockSurface {
    pixels: RgbaImage,
    calls:  CallLog,
}

impl RenderSurface for MockSurface {
    fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    fn to_image(&self) -> HostResult<RgbaImage> {
        Ok(self.pixels.clone())
    }
}

impl Drop for MockSurface {
    fn drop(&mut self) {
        self.calls.lock().push(HostCall::ReleaseSurface);
    }
}

impl CaptureHost for MockBackend {
    type Surface = MockSurface;

    fn restore_and_focus(&self, handle: WindowHandle) -> HostResult<()> {
        self.record(HostCall::RestoreAndFocus(handle));
        if self.fail_restore {
            return Err(HostError::new("mock foreground refused"));
        }
        Ok(())
    }

    fn extended_frame_bounds(&self, handle: WindowHandle) -> Option<Rect> {
        self.record(HostCall::ExtendedFrameBounds(handle));
        self.geometry_for(handle).extended
    }

    fn window_rect(&self, handle: WindowHandle) -> Option<Rect> {
        self.record(HostCall::WindowRect(handle));
        self.geometry_for(handle).plain
    }

    fn create_surface(&self, width: u32, height: u32) -> HostResult<MockSurface> {
        self.record(HostCall::CreateSurface(width, height));
        if self.fail_surface {
            return Err(HostError::new("mock allocation failure"));
        }

        Ok(MockSurface {
            pixels: RgbaImage::new(width, height),
            calls:  Arc::clone(&self.calls),
        })
    }

    fn paint_window(
        &self,
        handle: WindowHandle,
        _bounds: Rect,
        surface: &mut MockSurface,
        mode: PaintMode,
    ) -> HostResult<()> {
        self.record(HostCall::Paint(handle, mode));
        let strategy = match mode {
            PaintMode::FullContent => CaptureStrategy::PaintFullContent,
            PaintMode::Basic => CaptureStrategy::Paint,
        };
        self.fill(strategy, surface)
    }

    fn copy_from_screen(&self, handle: WindowHandle, _bounds: Rect, surface: &mut MockSurface) -> HostResult<()> {
        self.record(HostCall::ScreenCopy(handle));
        self.fill(CaptureStrategy::ScreenCopy, surface)
    }
}
