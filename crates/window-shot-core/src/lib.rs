//! window-shot-core: Window lookup and capture to PNG
//!
//! This library finds a top-level window by exact title, owning process id,
//! or window handle, renders its pixels into an off-screen surface, and
//! writes them as an RGBA PNG. It includes the Windows backend, a mock
//! backend for tests, window matching, output path resolution, and error
//! handling.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use window_shot_core::{
//!     capture::{create_default_backend, take_screenshot},
//!     model::{CaptureOptions, WindowSelector},
//!     util::output_path::OutputPathResolver,
//! };
//!
//! let backend = create_default_backend()?;
//! let report = take_screenshot(
//!     &backend,
//!     &WindowSelector::by_title("Untitled - Notepad"),
//!     None,
//!     &CaptureOptions::default(),
//!     &OutputPathResolver::default(),
//! )?;
//! println!("Wrote {}", report.path.display());
//! ```

pub mod capture;
pub mod error;
pub mod model;
pub mod util;
