//! Capability traits for the window system backend
//!
//! The capture pipeline talks to the host through two narrow traits:
//!
//! - [`WindowEnumerator`]: produce a snapshot of visible, titled windows
//! - [`CaptureHost`]: the drawing primitives the capture engine sequences
//!
//! Backends implement both. The engine never calls the host outside these
//! methods, which keeps the resolver and the engine testable against
//! [`MockBackend`](super::MockBackend).

use image::RgbaImage;

use crate::{
    error::CaptureResult,
    model::{Rect, WindowHandle, WindowRecord},
};

/// A failed host primitive, with the reason the host gave.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct HostError(pub String);

impl HostError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Result of a host primitive
pub type HostResult<T> = Result<T, HostError>;

/// How a window is asked to paint itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintMode {
    /// Highest fidelity, includes hardware-accelerated content
    FullContent,
    /// Plain paint without extra flags
    Basic,
}

/// Capability: Backend can enumerate windows on the system.
pub trait WindowEnumerator {
    /// Lists visible top-level windows with a non-blank title.
    ///
    /// The snapshot is materialized eagerly and in host order; no sorting
    /// is applied. Windows may close between this call and any later use of
    /// their handles.
    fn list_windows(&self) -> CaptureResult<Vec<WindowRecord>>;
}

/// An off-screen, 32-bit, alpha-capable drawing surface.
///
/// Dropping the surface releases every native handle it holds.
pub trait RenderSurface {
    /// Width and height in pixels
    fn dimensions(&self) -> (u32, u32);

    /// Copies the surface pixels out as RGBA
    fn to_image(&self) -> HostResult<RgbaImage>;
}

/// Capability: Backend exposes the drawing primitives used for capture.
pub trait CaptureHost {
    /// Surface type produced by [`create_surface`](CaptureHost::create_surface)
    type Surface: RenderSurface;

    /// Restores a minimized window and requests foreground focus.
    fn restore_and_focus(&self, handle: WindowHandle) -> HostResult<()>;

    /// Window bounds excluding compositor drop shadows, if supported.
    fn extended_frame_bounds(&self, handle: WindowHandle) -> Option<Rect>;

    /// Plain window rectangle.
    fn window_rect(&self, handle: WindowHandle) -> Option<Rect>;

    /// Allocates a surface of exactly `width` x `height` pixels.
    fn create_surface(&self, width: u32, height: u32) -> HostResult<Self::Surface>;

    /// Asks the window to paint its content into `surface`.
    ///
    /// `bounds` is the rectangle the surface was sized from.
    fn paint_window(
        &self,
        handle: WindowHandle,
        bounds: Rect,
        surface: &mut Self::Surface,
        mode: PaintMode,
    ) -> HostResult<()>;

    /// Copies the on-screen pixels of the window's region into `surface`.
    ///
    /// Picks up anything overlapping the window at that moment.
    fn copy_from_screen(
        &self,
        handle: WindowHandle,
        bounds: Rect,
        surface: &mut Self::Surface,
    ) -> HostResult<()>;
}
