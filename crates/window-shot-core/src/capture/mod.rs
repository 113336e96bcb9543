//! Capture backend traits and implementations
//!
//! # Architecture
//!
//! A capture run is a straight pipeline:
//!
//! 1. Parse the [`WindowSelector`]
//! 2. Snapshot the visible windows with a [`WindowEnumerator`]
//! 3. Resolve the selector against the snapshot with [`WindowMatcher`]
//! 4. Resolve the output argument with an [`OutputPathResolver`]
//! 5. Capture and encode with the [`CaptureEngine`] over a [`CaptureHost`]
//!
//! [`take_screenshot`] runs all five steps.
//!
//! ## Backend Capabilities
//!
//! | Backend | WindowEnumerator | CaptureHost |
//! |---------|------------------|-------------|
//! | Windows | ✓ | ✓ |
//! | Mock    | ✓ | ✓ |
//!
//! Other platforms have no backend; [`create_default_backend()`] reports
//! [`CaptureError::BackendNotAvailable`] there.

use crate::{
    error::CaptureResult,
    model::{CaptureOptions, CaptureReport, WindowSelector},
    util::output_path::{Clock, OutputPathResolver},
};

pub mod constants;
pub mod engine;
pub mod matching;
pub mod mock;
pub mod traits;

#[cfg(target_os = "windows")]
pub mod windows_backend;

pub use engine::CaptureEngine;
pub use matching::WindowMatcher;
pub use mock::MockBackend;
pub use traits::{CaptureHost, HostError, HostResult, PaintMode, RenderSurface, WindowEnumerator};
#[cfg(target_os = "windows")]
pub use windows_backend::WindowsBackend;

/// Backend for the current platform
#[cfg(target_os = "windows")]
pub type DefaultBackend = WindowsBackend;

/// Backend for the current platform
#[cfg(not(target_os = "windows"))]
pub type DefaultBackend = unsupported::UnsupportedBackend;

/// Creates the capture backend for the current platform.
///
/// - **Windows**: [`WindowsBackend`]
/// - **Other**: a structured `BackendNotAvailable` error
pub fn create_default_backend() -> CaptureResult<DefaultBackend> {
    #[cfg(target_os = "windows")]
    {
        WindowsBackend::new()
    }

    #[cfg(not(target_os = "windows"))]
    {
        Err(crate::error::CaptureError::BackendNotAvailable {
            backend: crate::model::BackendType::Windows,
        })
    }
}

/// Captures the window named by `selector` into a PNG file.
///
/// The selector is parsed before the host is queried, so a malformed process
/// id or window id fails without enumerating anything. Nothing is written
/// unless a strategy produced pixels.
///
/// # Errors
///
/// Any [`CaptureError`](crate::error::CaptureError) from the pipeline
/// stages, unchanged.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use window_shot_core::{
///     capture::{MockBackend, take_screenshot},
///     model::{CaptureOptions, WindowSelector},
///     util::output_path::OutputPathResolver,
/// };
///
/// let dir = std::env::temp_dir().join("window-shot-doc");
/// let out = dir.join("notepad.png");
/// let opts = CaptureOptions::builder().settle_delay(Duration::ZERO).build();
///
/// let report = take_screenshot(
///     &MockBackend::new(),
///     &WindowSelector::by_pid("1000"),
///     out.to_str(),
///     &opts,
///     &OutputPathResolver::default(),
/// )
/// .unwrap();
///
/// assert_eq!((report.width, report.height), (800, 600));
/// # std::fs::remove_dir_all(dir).ok();
/// ```
pub fn take_screenshot<B, C>(
    backend: &B,
    selector: &WindowSelector,
    output: Option<&str>,
    opts: &CaptureOptions,
    paths: &OutputPathResolver<C>,
) -> CaptureResult<CaptureReport>
where
    B: WindowEnumerator + CaptureHost,
    C: Clock,
{
    selector.target()?;

    let windows = backend.list_windows()?;
    let window = WindowMatcher::new().resolve(selector, &windows)?;
    let target = paths.resolve(output)?;

    tracing::debug!(
        "Capturing {} (pid {}, '{}') to {}",
        window.handle,
        window.pid,
        window.title,
        target
    );

    CaptureEngine::new(backend, opts.clone()).capture(window.handle, &target)
}

#[cfg(not(target_os = "windows"))]
mod unsupported {
    use image::RgbaImage;

    use super::traits::{CaptureHost, HostResult, PaintMode, RenderSurface, WindowEnumerator};
    use crate::{
        error::CaptureResult,
        model::{Rect, WindowHandle, WindowRecord},
    };

    /// Placeholder backend type on platforms without window capture
    ///
    /// Uninhabited: [`create_default_backend`](super::create_default_backend)
    /// never produces one.
    #[derive(Debug)]
    pub enum UnsupportedBackend {}

    impl WindowEnumerator for UnsupportedBackend {
        fn list_windows(&self) -> CaptureResult<Vec<WindowRecord>> {
            match *self {}
        }
    }

    impl RenderSurface for UnsupportedBackend {
        fn dimensions(&self) -> (u32, u32) {
            match *self {}
        }

        fn to_image(&self) -> HostResult<RgbaImage> {
            match *self {}
        }
    }

    impl CaptureHost for UnsupportedBackend {
        type Surface = UnsupportedBackend;

        fn restore_and_focus(&self, _handle: WindowHandle) -> HostResult<()> {
            match *self {}
        }

        fn extended_frame_bounds(&self, _handle: WindowHandle) -> Option<Rect> {
            match *self {}
        }

        fn window_rect(&self, _handle: WindowHandle) -> Option<Rect> {
            match *self {}
        }

        fn create_surface(&self, _width: u32, _height: u32) -> HostResult<Self::Surface> {
            match *self {}
        }

        fn paint_window(
            &self,
            _handle: WindowHandle,
            _bounds: Rect,
            _surface: &mut Self::Surface,
            _mode: PaintMode,
        ) -> HostResult<()> {
            match *self {}
        }

        fn copy_from_screen(
            &self,
            _handle: WindowHandle,
            _bounds: Rect,
            _surface: &mut Self::Surface,
        ) -> HostResult<()> {
            match *self {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tempfile::TempDir;

    use super::*;
    use crate::{capture::mock::HostCall, error::CaptureError, model::CaptureStrategy};

    fn quick_opts() -> CaptureOptions {
        CaptureOptions::builder().settle_delay(Duration::ZERO).build()
    }

    #[test]
    fn test_invalid_pid_fails_before_enumeration() {
        let backend = MockBackend::new();
        let err = take_screenshot(
            &backend,
            &WindowSelector::by_pid("abc"),
            None,
            &quick_opts(),
            &OutputPathResolver::default(),
        )
        .unwrap_err();

        assert!(matches!(err, CaptureError::InvalidSelector { .. }));
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_not_found_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let paths = OutputPathResolver::default().with_working_dir(temp.path());

        let err = take_screenshot(&backend, &WindowSelector::by_pid("4242"), None, &quick_opts(), &paths)
            .unwrap_err();

        assert!(matches!(err, CaptureError::WindowNotFound { .. }));
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
        assert_eq!(backend.calls(), vec![HostCall::ListWindows]);
    }

    #[test]
    fn test_elevated_title_capture() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("cmd.png");
        let backend = MockBackend::new();

        let report = take_screenshot(
            &backend,
            &WindowSelector::by_title("Command Prompt"),
            out.to_str(),
            &quick_opts(),
            &OutputPathResolver::default(),
        )
        .unwrap();

        assert_eq!(report.path, out);
        assert_eq!(report.strategy, CaptureStrategy::PaintFullContent);
        assert!(backend.calls().contains(&HostCall::RestoreAndFocus(
            crate::model::WindowHandle::new(0x20020)
        )));
    }

    #[test]
    #[cfg(not(target_os = "windows"))]
    fn test_default_backend_unavailable() {
        let err = create_default_backend().unwrap_err();
        assert!(matches!(err, CaptureError::BackendNotAvailable { .. }));
    }
}
