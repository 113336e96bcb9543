//! Capture engine
//!
//! Sequences the host primitives for one capture:
//!
//! 1. Optionally restore and foreground the window, then wait for it to
//!    settle
//! 2. Measure its bounds, preferring the compositor's frame bounds
//! 3. Allocate an off-screen surface of exactly that size
//! 4. Try each [`CaptureStrategy`] in order until one succeeds
//! 5. Release the surface, then encode the pixels as PNG
//!
//! Measurement happens after preparation, so a window restored from the
//! taskbar is measured at its restored size.

use std::{thread, time::Instant};

use image::RgbaImage;
use tracing::instrument;

use super::traits::{CaptureHost, HostResult, PaintMode, RenderSurface};
use crate::{
    error::{CaptureError, CaptureResult, StrategyFailure},
    model::{CaptureOptions, CaptureReport, CaptureStrategy, OutputTarget, Rect, WindowHandle},
    util::encode::write_png,
};

/// Drives a [`CaptureHost`] through a single window capture
#[derive(Debug)]
pub struct CaptureEngine<'h, H> {
    host: &'h H,
    opts: CaptureOptions,
}

impl<'h, H: CaptureHost> CaptureEngine<'h, H> {
    pub fn new(host: &'h H, opts: CaptureOptions) -> Self {
        Self { host, opts }
    }

    /// Captures `handle` and writes the PNG to `target`
    ///
    /// # Errors
    ///
    /// - [`CaptureError::InvalidGeometry`] if the window has no area
    /// - [`CaptureError::SurfaceUnavailable`] if no surface can be allocated
    /// - [`CaptureError::RenderFailed`] if every strategy fails
    /// - [`CaptureError::EncodeFailed`] if the PNG cannot be written
    #[instrument(skip(self, target), fields(target = %target))]
    pub fn capture(&self, handle: WindowHandle, target: &OutputTarget) -> CaptureResult<CaptureReport> {
        let start = Instant::now();

        if self.opts.prepare_window {
            self.prepare(handle);
        }

        let bounds = self.measure(handle)?;
        let (image, strategy) = self.render(handle, bounds)?;
        let (width, height) = image.dimensions();

        write_png(&image, target)?;

        tracing::info!(
            strategy = %strategy,
            width,
            height,
            duration_ms = start.elapsed().as_millis() as u64,
            "Captured window {} to {}",
            handle,
            target
        );

        Ok(CaptureReport {
            path: target.path().to_path_buf(),
            width,
            height,
            strategy,
        })
    }

    /// Restores and foregrounds the window, then waits for it to settle
    ///
    /// Failure to foreground is not fatal; the paint strategies do not need
    /// focus and the screen copy just picks up whatever overlaps the window.
    pub fn prepare(&self, handle: WindowHandle) {
        if let Err(e) = self.host.restore_and_focus(handle) {
            tracing::debug!("Could not bring window {} to the foreground: {}", handle, e);
        }

        if !self.opts.settle_delay.is_zero() {
            thread::sleep(self.opts.settle_delay);
        }
    }

    /// Measures the window, preferring bounds without the drop shadow
    ///
    /// # Errors
    ///
    /// - [`CaptureError::InvalidGeometry`] if neither query succeeds or the
    ///   measured width or height is not positive
    pub fn measure(&self, handle: WindowHandle) -> CaptureResult<Rect> {
        let rect = match self.host.extended_frame_bounds(handle) {
            Some(rect) => rect,
            None => {
                tracing::debug!("Extended frame bounds unavailable for {}, using window rect", handle);
                self.host.window_rect(handle).unwrap_or_default()
            }
        };

        if rect.size().is_none() {
            return Err(CaptureError::InvalidGeometry {
                width:  rect.width(),
                height: rect.height(),
            });
        }

        tracing::debug!(?rect, "Measured window {}", handle);
        Ok(rect)
    }

    /// Renders the window into a fresh surface and reads the pixels back
    ///
    /// The surface is released before this returns, on success and failure
    /// alike.
    pub fn render(&self, handle: WindowHandle, bounds: Rect) -> CaptureResult<(RgbaImage, CaptureStrategy)> {
        let (width, height) = bounds.size().ok_or(CaptureError::InvalidGeometry {
            width:  bounds.width(),
            height: bounds.height(),
        })?;

        let mut surface = self
            .host
            .create_surface(width, height)
            .map_err(|e| CaptureError::SurfaceUnavailable {
                width,
                height,
                reason: e.to_string(),
            })?;

        let mut attempts = Vec::new();

        for &strategy in &self.opts.strategies {
            let outcome = self
                .attempt(strategy, handle, bounds, &mut surface)
                .and_then(|()| surface.to_image());

            match outcome {
                Ok(image) => {
                    tracing::debug!("Strategy {} succeeded for {}", strategy, handle);
                    return Ok((image, strategy));
                }
                Err(e) => {
                    tracing::debug!("Strategy {} failed for {}: {}", strategy, handle, e);
                    attempts.push(StrategyFailure {
                        strategy,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Err(CaptureError::RenderFailed { attempts })
    }

    fn attempt(
        &self,
        strategy: CaptureStrategy,
        handle: WindowHandle,
        bounds: Rect,
        surface: &mut H::Surface,
    ) -> HostResult<()> {
        match strategy {
            CaptureStrategy::PaintFullContent => {
                self.host.paint_window(handle, bounds, surface, PaintMode::FullContent)
            }
            CaptureStrategy::Paint => self.host.paint_window(handle, bounds, surface, PaintMode::Basic),
            CaptureStrategy::ScreenCopy => self.host.copy_from_screen(handle, bounds, surface),
        }
    }
}
