//! Windows capture backend using Win32 and GDI
//!
//! This module implements window capture for Windows using:
//!
//! - **Window Enumeration**: `EnumWindows` for visible, titled windows
//! - **Geometry**: DWM extended frame bounds, falling back to `GetWindowRect`
//! - **Render**: `PrintWindow` into a 32-bit top-down DIB section, with a
//!   `BitBlt` screen copy as the last resort
//!
//! # Resource Handling
//!
//! Every GDI handle is owned by a guard that releases it on drop:
//!
//! - [`WindowDc`] - device context of a live window, released with `ReleaseDC`
//! - [`MemoryDc`] - memory device context, deleted with `DeleteDC`
//! - [`DibSurface`] - DIB section selected into a memory DC
//!
//! # Examples
//!
//! ```rust,ignore
//! use window_shot_core::capture::{WindowEnumerator, windows_backend::WindowsBackend};
//!
//! let backend = WindowsBackend::new().unwrap();
//! for window in backend.list_windows().unwrap() {
//!     println!("{}\t{}\t{}", window.handle, window.pid, window.title);
//! }
//! ```

use std::{
    ffi::{OsString, c_void},
    mem,
    os::windows::ffi::OsStringExt,
    ptr, slice,
    time::Instant,
};

use image::RgbaImage;
use tracing::instrument;
use windows_sys::Win32::{
    Foundation::{HWND, POINT, RECT},
    Graphics::{
        Dwm::DwmGetWindowAttribute,
        Gdi::{
            BI_RGB, BITMAPINFO, BITMAPINFOHEADER, BitBlt, CreateCompatibleDC, CreateDIBSection,
            DIB_RGB_COLORS, DeleteDC, DeleteObject, GdiFlush, GetWindowDC, HBITMAP, HDC, HGDIOBJ,
            ReleaseDC, SRCCOPY, SelectObject, SetViewportOrgEx,
        },
    },
    Storage::Xps::PrintWindow,
    UI::WindowsAndMessaging::{
        EnumWindows, GetWindowRect, GetWindowTextLengthW, GetWindowTextW, GetWindowThreadProcessId,
        IsIconic, IsWindowVisible, SW_RESTORE, SetForegroundWindow, ShowWindow,
    },
};

#[allow(clippy::upper_case_acronyms)]
type BOOL = i32;
const TRUE: BOOL = 1;
const FALSE: BOOL = 0;

use super::{
    constants::{DWMWA_EXTENDED_FRAME_BOUNDS, MAX_TITLE_LEN, PW_RENDERFULLCONTENT},
    traits::{CaptureHost, HostError, HostResult, PaintMode, RenderSurface, WindowEnumerator},
};
use crate::{
    error::{CaptureError, CaptureResult},
    model::{Rect, WindowHandle, WindowRecord},
};

/// Windows capture backend using Win32 + GDI
///
/// Stateless; every call goes straight to the host.
#[derive(Debug)]
pub struct WindowsBackend {
    _private: (),
}

impl WindowsBackend {
    /// Creates a new WindowsBackend instance
    pub fn new() -> CaptureResult<Self> {
        Ok(Self { _private: () })
    }

    fn hwnd(handle: WindowHandle) -> HWND {
        handle.raw() as usize as HWND
    }

    /// Enumerates top-level windows that are visible and have a title
    fn enumerate_window_handles() -> CaptureResult<Vec<HWND>> {
        let mut handles: Vec<HWND> = Vec::new();

        unsafe extern "system" fn enum_callback(hwnd: HWND, lparam: isize) -> BOOL {
            // SAFETY: lparam is the Vec<HWND> passed from enumerate_window_handles,
            // which outlives the EnumWindows call
            let handles = unsafe { &mut *(lparam as *mut Vec<HWND>) };

            // SAFETY: hwnd is a valid window handle from EnumWindows
            if unsafe { IsWindowVisible(hwnd) } == FALSE {
                return TRUE;
            }

            // SAFETY: hwnd is a valid window handle from EnumWindows
            if unsafe { GetWindowTextLengthW(hwnd) } == 0 {
                return TRUE;
            }

            handles.push(hwnd);
            TRUE
        }

        // SAFETY: handles outlives the call, and the callback never stops early
        let ok = unsafe { EnumWindows(Some(enum_callback), &mut handles as *mut Vec<HWND> as isize) };
        if ok == FALSE {
            return Err(CaptureError::EnumerationFailed {
                reason: "EnumWindows returned FALSE".to_string(),
            });
        }

        tracing::debug!("Enumerated {} window handles", handles.len());
        Ok(handles)
    }

    /// Gets the title of a window
    ///
    /// `GetWindowTextLengthW` excludes the terminator, so the buffer holds
    /// `len + 1` units.
    fn get_window_title(hwnd: HWND) -> String {
        unsafe {
            let len = GetWindowTextLengthW(hwnd).min(MAX_TITLE_LEN);
            if len <= 0 {
                return String::new();
            }

            let mut buffer: Vec<u16> = vec![0; (len + 1) as usize];
            let copied = GetWindowTextW(hwnd, buffer.as_mut_ptr(), buffer.len() as i32);
            if copied <= 0 {
                return String::new();
            }

            buffer.truncate(copied as usize);
            OsString::from_wide(&buffer).to_string_lossy().into_owned()
        }
    }

    fn get_window_pid(hwnd: HWND) -> u32 {
        let mut pid: u32 = 0;
        // SAFETY: pid is a valid out pointer for the duration of the call
        unsafe { GetWindowThreadProcessId(hwnd, &mut pid) };
        pid
    }

    fn fetch_window_record(hwnd: HWND) -> Option<WindowRecord> {
        let title = Self::get_window_title(hwnd);
        let pid = Self::get_window_pid(hwnd);
        WindowRecord::new(WindowHandle::new(hwnd as usize as u64), pid, title)
    }

    fn query_window_rect(hwnd: HWND) -> Option<RECT> {
        let mut rect = empty_rect();
        // SAFETY: rect is a valid out pointer for the duration of the call
        if unsafe { GetWindowRect(hwnd, &mut rect) } == FALSE {
            return None;
        }
        Some(rect)
    }
}

impl WindowEnumerator for WindowsBackend {
    #[instrument(skip(self))]
    fn list_windows(&self) -> CaptureResult<Vec<WindowRecord>> {
        let start = Instant::now();

        let windows: Vec<WindowRecord> = Self::enumerate_window_handles()?
            .into_iter()
            .filter_map(Self::fetch_window_record)
            .inspect(|w| tracing::debug!(handle = %w.handle, pid = w.pid, title = %w.title, "Found window"))
            .collect();

        tracing::info!(
            window_count = windows.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Listed windows"
        );
        Ok(windows)
    }
}

impl CaptureHost for WindowsBackend {
    type Surface = DibSurface;

    fn restore_and_focus(&self, handle: WindowHandle) -> HostResult<()> {
        let hwnd = Self::hwnd(handle);

        unsafe {
            if IsIconic(hwnd) != FALSE {
                ShowWindow(hwnd, SW_RESTORE);
            }

            if SetForegroundWindow(hwnd) == FALSE {
                return Err(HostError::new("SetForegroundWindow returned FALSE"));
            }
        }

        Ok(())
    }

    fn extended_frame_bounds(&self, handle: WindowHandle) -> Option<Rect> {
        let mut rect = empty_rect();

        // SAFETY: rect is a RECT-sized out buffer for the duration of the call
        let hr = unsafe {
            DwmGetWindowAttribute(
                Self::hwnd(handle),
                DWMWA_EXTENDED_FRAME_BOUNDS,
                &mut rect as *mut RECT as *mut c_void,
                mem::size_of::<RECT>() as u32,
            )
        };

        if hr < 0 {
            tracing::trace!("DwmGetWindowAttribute failed with HRESULT {:#010x}", hr);
            return None;
        }

        Some(to_rect(rect))
    }

    fn window_rect(&self, handle: WindowHandle) -> Option<Rect> {
        Self::query_window_rect(Self::hwnd(handle)).map(to_rect)
    }

    fn create_surface(&self, width: u32, height: u32) -> HostResult<DibSurface> {
        DibSurface::new(width, height)
    }

    fn paint_window(
        &self,
        handle: WindowHandle,
        bounds: Rect,
        surface: &mut DibSurface,
        mode: PaintMode,
    ) -> HostResult<()> {
        let hwnd = Self::hwnd(handle);
        let flags = match mode {
            PaintMode::FullContent => PW_RENDERFULLCONTENT,
            PaintMode::Basic => 0,
        };

        // PrintWindow draws the full window rectangle at the DC origin; shift
        // it so the measured bounds land at (0, 0).
        let (dx, dy) = Self::query_window_rect(hwnd)
            .map(|wr| (wr.left - bounds.left, wr.top - bounds.top))
            .unwrap_or((0, 0));

        let dc = surface.dc();
        unsafe {
            let mut previous = POINT { x: 0, y: 0 };
            SetViewportOrgEx(dc, dx, dy, &mut previous);
            let ok = PrintWindow(hwnd, dc, flags);
            SetViewportOrgEx(dc, previous.x, previous.y, ptr::null_mut());

            if ok == FALSE {
                return Err(HostError::new(format!("PrintWindow(flags={flags}) returned FALSE")));
            }
        }

        Ok(())
    }

    fn copy_from_screen(&self, handle: WindowHandle, bounds: Rect, surface: &mut DibSurface) -> HostResult<()> {
        let hwnd = Self::hwnd(handle);
        let source = WindowDc::acquire(hwnd)?;

        // The window DC is anchored at the window rectangle, not the bounds.
        let (sx, sy) = Self::query_window_rect(hwnd)
            .map(|wr| (bounds.left - wr.left, bounds.top - wr.top))
            .unwrap_or((0, 0));

        let (width, height) = surface.dimensions();
        // SAFETY: both DCs are live for the duration of the call
        let ok = unsafe {
            BitBlt(surface.dc(), 0, 0, width as i32, height as i32, source.0, sx, sy, SRCCOPY)
        };

        if ok == FALSE {
            return Err(HostError::new("BitBlt from the window DC returned FALSE"));
        }

        Ok(())
    }
}

fn empty_rect() -> RECT {
    RECT {
        left:   0,
        top:    0,
        right:  0,
        bottom: 0,
    }
}

fn to_rect(rect: RECT) -> Rect {
    Rect::new(rect.left, rect.top, rect.right, rect.bottom)
}

/// Device context of a live window
pub struct WindowDc(HDC, HWND);

impl WindowDc {
    fn acquire(hwnd: HWND) -> HostResult<Self> {
        // SAFETY: GetWindowDC tolerates stale handles and returns null
        let dc = unsafe { GetWindowDC(hwnd) };
        if dc.is_null() {
            return Err(HostError::new("GetWindowDC returned NULL"));
        }
        Ok(Self(dc, hwnd))
    }
}

impl Drop for WindowDc {
    fn drop(&mut self) {
        // SAFETY: the DC was obtained from GetWindowDC for this window
        unsafe { ReleaseDC(self.1, self.0) };
    }
}

/// Memory device context compatible with the screen
pub struct MemoryDc(HDC);

impl MemoryDc {
    fn create() -> HostResult<Self> {
        // SAFETY: a null DC requests a DC compatible with the screen
        let dc = unsafe { CreateCompatibleDC(ptr::null_mut()) };
        if dc.is_null() {
            return Err(HostError::new("CreateCompatibleDC returned NULL"));
        }
        Ok(Self(dc))
    }
}

impl Drop for MemoryDc {
    fn drop(&mut self) {
        // SAFETY: the DC was created by CreateCompatibleDC and is not in use
        unsafe { DeleteDC(self.0) };
    }
}

/// 32-bit top-down BGRA DIB section selected into a memory DC
pub struct DibSurface {
    bitmap:   HBITMAP,
    previous: HGDIOBJ,
    bits:     *const u8,
    width:    u32,
    height:   u32,
    // Dropped after the bitmap is deselected and deleted.
    dc:       MemoryDc,
}

impl DibSurface {
    fn new(width: u32, height: u32) -> HostResult<Self> {
        let (Ok(w), Ok(h)) = (i32::try_from(width), i32::try_from(height)) else {
            return Err(HostError::new(format!("surface size {width}x{height} out of range")));
        };

        let dc = MemoryDc::create()?;

        // SAFETY: BITMAPINFO is plain data; all-zero is a valid starting state
        let mut info: BITMAPINFO = unsafe { mem::zeroed() };
        info.bmiHeader.biSize = mem::size_of::<BITMAPINFOHEADER>() as u32;
        info.bmiHeader.biWidth = w;
        // Negative height selects a top-down row order.
        info.bmiHeader.biHeight = -h;
        info.bmiHeader.biPlanes = 1;
        info.bmiHeader.biBitCount = 32;
        info.bmiHeader.biCompression = BI_RGB;

        let mut bits: *mut c_void = ptr::null_mut();
        // SAFETY: info and bits are valid for the duration of the call
        let bitmap = unsafe { CreateDIBSection(dc.0, &info, DIB_RGB_COLORS, &mut bits, ptr::null_mut(), 0) };

        if bitmap.is_null() || bits.is_null() {
            if !bitmap.is_null() {
                // SAFETY: bitmap was just created and never selected
                unsafe { DeleteObject(bitmap) };
            }
            return Err(HostError::new(format!("CreateDIBSection failed for {width}x{height}")));
        }

        // SAFETY: dc and bitmap are live
        let previous = unsafe { SelectObject(dc.0, bitmap) };

        Ok(Self {
            bitmap,
            previous,
            bits: bits as *const u8,
            width,
            height,
            dc,
        })
    }

    fn dc(&self) -> HDC {
        self.dc.0
    }
}

impl RenderSurface for DibSurface {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn to_image(&self) -> HostResult<RgbaImage> {
        let len = self.width as usize * self.height as usize * 4;

        // SAFETY: pending GDI drawing is flushed before the bits are read, and
        // the DIB section holds exactly width * height 32-bit pixels
        let bgra = unsafe {
            GdiFlush();
            slice::from_raw_parts(self.bits, len)
        };

        RgbaImage::from_raw(self.width, self.height, bgra_to_rgba(bgra))
            .ok_or_else(|| HostError::new("pixel buffer size mismatch"))
    }
}

impl Drop for DibSurface {
    fn drop(&mut self) {
        // SAFETY: previous was returned by SelectObject on this DC; the bitmap
        // is deselected before it is deleted
        unsafe {
            SelectObject(self.dc.0, self.previous);
            DeleteObject(self.bitmap);
        }
    }
}

/// Converts GDI's BGRA pixel order to opaque RGBA
///
/// GDI leaves the alpha byte at zero for what it draws while DWM content
/// carries real alpha, and one frame can mix both, so the alpha byte is not
/// trusted.
fn bgra_to_rgba(bgra: &[u8]) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(bgra.len());
    for px in bgra.chunks_exact(4) {
        rgba.extend_from_slice(&[px[2], px[1], px[0], 0xFF]);
    }
    rgba
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bgra_to_rgba_swaps_channels() {
        let bgra = [0x10, 0x20, 0x30, 0xFF, 0x01, 0x02, 0x03, 0xFF];
        assert_eq!(bgra_to_rgba(&bgra), vec![0x30, 0x20, 0x10, 0xFF, 0x03, 0x02, 0x01, 0xFF]);
    }

    #[test]
    fn test_bgra_to_rgba_mixed_alpha_is_opaque() {
        // A DWM-drawn pixel with alpha next to a GDI-drawn pixel without
        let bgra = [0x10, 0x20, 0x30, 0x80, 0x40, 0x50, 0x60, 0x00];
        let rgba = bgra_to_rgba(&bgra);
        assert_eq!(rgba, vec![0x30, 0x20, 0x10, 0xFF, 0x60, 0x50, 0x40, 0xFF]);
    }

    #[test]
    fn test_bgra_to_rgba_zero_alpha_is_opaque() {
        let bgra = [0x10, 0x20, 0x30, 0x00];
        assert_eq!(bgra_to_rgba(&bgra), vec![0x30, 0x20, 0x10, 0xFF]);
    }

    #[test]
    fn test_list_windows_has_no_blank_titles() {
        let backend = WindowsBackend::new().unwrap();
        let windows = backend.list_windows().unwrap();
        assert!(windows.iter().all(|w| !w.title.trim().is_empty()));
    }

    #[test]
    fn test_surface_dimensions_and_release() {
        let backend = WindowsBackend::new().unwrap();
        let surface = backend.create_surface(33, 17).unwrap();
        assert_eq!(surface.dimensions(), (33, 17));

        let image = surface.to_image().unwrap();
        assert_eq!(image.dimensions(), (33, 17));
    }

    #[test]
    fn test_stale_handle_has_no_geometry() {
        let backend = WindowsBackend::new().unwrap();
        let stale = WindowHandle::new(0xDEAD_0000);
        assert!(backend.window_rect(stale).is_none());
    }
}
