//! Error types for window lookup and capture
//!
//! This module defines the error taxonomy for a capture run. Every error is
//! fatal for the invocation and is reported once, as a single line. Each
//! variant also carries a remediation hint and a coarse category so the CLI
//! can log extra guidance without parsing the message text.

use std::path::PathBuf;

use crate::model::{BackendType, CaptureStrategy, SelectorKind, WindowSelector};

/// Result type alias for capture operations
pub type CaptureResult<T> = Result<T, CaptureError>;

/// High-level error category for filtering and grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The selector could not be parsed
    InvalidInput,
    /// No window matched the selector
    NotFound,
    /// The window had no measurable area
    Geometry,
    /// Every capture strategy failed
    Render,
    /// The PNG could not be written
    Encode,
    /// No window system backend on this platform
    Unavailable,
    /// I/O or system error
    SystemError,
}

/// A failed capture strategy and the reason it gave
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyFailure {
    /// Strategy that was attempted
    pub strategy: CaptureStrategy,
    /// Host-reported reason
    pub reason:   String,
}

/// Comprehensive error type for capture operations
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// A process id or window id selector could not be parsed
    #[error("Invalid {kind} '{value}': {reason}")]
    InvalidSelector {
        /// Which selector flag was malformed
        kind:   SelectorKind,
        /// The raw value given
        value:  String,
        /// Why it was rejected
        reason: String,
    },

    /// The host refused to enumerate its windows
    #[error("Failed to enumerate windows: {reason}")]
    EnumerationFailed {
        /// Host-reported reason
        reason: String,
    },

    /// Window matching the selector could not be found
    #[error("Window not found: {selector}")]
    WindowNotFound {
        /// The selector that failed to match any window
        selector: WindowSelector,
    },

    /// The window measured with a non-positive width or height
    #[error("Window has invalid size {width}x{height}")]
    InvalidGeometry {
        /// Measured width
        width:  i64,
        /// Measured height
        height: i64,
    },

    /// The off-screen surface could not be allocated
    #[error("Failed to allocate a {width}x{height} capture surface: {reason}")]
    SurfaceUnavailable {
        /// Requested width
        width:  u32,
        /// Requested height
        height: u32,
        /// Host-reported reason
        reason: String,
    },

    /// All capture strategies failed
    #[error("Failed to capture window: {}", summarize_attempts(attempts))]
    RenderFailed {
        /// Every strategy attempted, in order
        attempts: Vec<StrategyFailure>,
    },

    /// The image could not be written as PNG
    #[error("Failed to write PNG to {}: {reason}", path.display())]
    EncodeFailed {
        /// Destination path
        path:   PathBuf,
        /// Underlying failure
        reason: String,
    },

    /// Requested backend is not available
    #[error("Backend {backend} is not available on this platform")]
    BackendNotAvailable {
        /// Backend type that's unavailable
        backend: BackendType,
    },

    /// I/O error occurred
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

fn summarize_attempts(attempts: &[StrategyFailure]) -> String {
    if attempts.is_empty() {
        return "no capture strategies configured".to_string();
    }

    attempts
        .iter()
        .map(|a| format!("{} ({})", a.strategy, a.reason))
        .collect::<Vec<_>>()
        .join(", ")
}

impl CaptureError {
    /// Returns the category of this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            CaptureError::InvalidSelector { .. } => ErrorCategory::InvalidInput,
            CaptureError::EnumerationFailed { .. } => ErrorCategory::SystemError,
            CaptureError::WindowNotFound { .. } => ErrorCategory::NotFound,
            CaptureError::InvalidGeometry { .. } => ErrorCategory::Geometry,
            CaptureError::SurfaceUnavailable { .. } | CaptureError::RenderFailed { .. } => {
                ErrorCategory::Render
            }
            CaptureError::EncodeFailed { .. } => ErrorCategory::Encode,
            CaptureError::BackendNotAvailable { .. } => ErrorCategory::Unavailable,
            CaptureError::IoError(_) => ErrorCategory::SystemError,
        }
    }

    /// Returns an actionable remediation hint for this error
    ///
    /// # Examples
    ///
    /// ```
    /// use window_shot_core::{error::CaptureError, model::WindowSelector};
    ///
    /// let error = CaptureError::WindowNotFound {
    ///     selector: WindowSelector::by_title("Notepad"),
    /// };
    ///
    /// assert!(error.remediation_hint().contains("without arguments"));
    /// ```
    pub fn remediation_hint(&self) -> &str {
        match self {
            CaptureError::InvalidSelector { kind, .. } => match kind {
                SelectorKind::ProcessId => "Process ids are plain decimal numbers, e.g. --pid 4242.",
                SelectorKind::Handle => {
                    "Window ids are hexadecimal as printed in the window list, e.g. --id 3E0A4C \
                     or --id 0x3E0A4C."
                }
                SelectorKind::Title => "Pass the window title exactly as shown in the window list.",
            },
            CaptureError::EnumerationFailed { .. } => {
                "The window list could not be read. Run the tool from an interactive desktop \
                 session."
            }
            CaptureError::WindowNotFound { .. } => {
                "Run the tool without arguments to see the visible windows with their ids and \
                 process ids. Titles must match exactly, including case."
            }
            CaptureError::InvalidGeometry { .. } => {
                "The window was minimized or closed while being captured. Restore it and try \
                 again."
            }
            CaptureError::SurfaceUnavailable { .. } => {
                "The system ran out of graphics resources. Close some windows and try again."
            }
            CaptureError::RenderFailed { .. } => {
                "The window refused to paint and the screen copy failed. Make sure the window is \
                 on an active desktop and not protected from capture."
            }
            CaptureError::EncodeFailed { .. } => {
                "Check that the output location is writable and that no directory in the path \
                 is an existing file."
            }
            CaptureError::BackendNotAvailable { .. } => {
                "Window capture is only implemented for the Windows desktop."
            }
            CaptureError::IoError(_) => {
                "An I/O error occurred. Check file permissions, disk space, and the current \
                 directory."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_not_found_error_message() {
        let error = CaptureError::WindowNotFound {
            selector: WindowSelector::by_pid("4242"),
        };

        let msg = error.to_string();
        assert!(msg.contains("Window not found"));
        assert!(msg.contains("4242"));
        assert_eq!(error.category(), ErrorCategory::NotFound);
    }

    #[test]
    fn test_invalid_selector_message() {
        let error = CaptureError::InvalidSelector {
            kind:   SelectorKind::ProcessId,
            value:  "abc".to_string(),
            reason: "expected a non-negative decimal process id".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Invalid pid 'abc': expected a non-negative decimal process id"
        );
        assert!(error.remediation_hint().contains("--pid"));
        assert_eq!(error.category(), ErrorCategory::InvalidInput);
    }

    #[test]
    fn test_render_failed_lists_attempts() {
        let error = CaptureError::RenderFailed {
            attempts: vec![
                StrategyFailure {
                    strategy: CaptureStrategy::PaintFullContent,
                    reason:   "PrintWindow returned FALSE".to_string(),
                },
                StrategyFailure {
                    strategy: CaptureStrategy::ScreenCopy,
                    reason:   "BitBlt returned FALSE".to_string(),
                },
            ],
        };

        let msg = error.to_string();
        assert!(msg.starts_with("Failed to capture window"));
        assert!(msg.contains("paint_full_content (PrintWindow returned FALSE)"));
        assert!(msg.contains("screen_copy (BitBlt returned FALSE)"));
    }

    #[test]
    fn test_render_failed_without_strategies() {
        let error = CaptureError::RenderFailed { attempts: vec![] };
        assert!(error.to_string().contains("no capture strategies configured"));
    }

    #[test]
    fn test_invalid_geometry_message() {
        let error = CaptureError::InvalidGeometry {
            width:  0,
            height: -4,
        };
        assert_eq!(error.to_string(), "Window has invalid size 0x-4");
        assert!(error.remediation_hint().contains("minimized"));
    }

    #[test]
    fn test_encode_failed_message() {
        let error = CaptureError::EncodeFailed {
            path:   PathBuf::from("out/shot.png"),
            reason: "permission denied".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("shot.png"));
        assert!(msg.contains("permission denied"));
        assert_eq!(error.category(), ErrorCategory::Encode);
    }

    #[test]
    fn test_messages_are_single_line() {
        let errors = [
            CaptureError::WindowNotFound {
                selector: WindowSelector::by_title("a"),
            },
            CaptureError::InvalidGeometry {
                width:  0,
                height: 0,
            },
            CaptureError::BackendNotAvailable {
                backend: BackendType::Windows,
            },
            CaptureError::EnumerationFailed {
                reason: "mock listing failure".to_string(),
            },
        ];

        for error in errors {
            assert!(!error.to_string().contains('\n'), "{error}");
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: CaptureError = io_error.into();
        assert!(matches!(error, CaptureError::IoError(_)));
        assert_eq!(error.category(), ErrorCategory::SystemError);
    }
}
