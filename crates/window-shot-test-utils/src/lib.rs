//! Test utilities for window-shot integration tests
//!
//! Shared fixtures and assertions for the window-shot workspace. The core
//! crate lists this crate as a dev-dependency, so only its `tests/` directory
//! uses it.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! window-shot-test-utils = { path = "../window-shot-test-utils" }
//! ```
//!
//! # Modules
//!
//! - [`fixtures`]: Window snapshots for resolver and pipeline tests
//! - [`png`]: Assertions on PNG files written by a capture
//! - [`timing`]: Timing measurement and duration assertions
//! - [`windows`]: Live-desktop helpers (Windows only)
//!
//! # Example
//!
//! ```ignore
//! use window_shot_test_utils::{fixtures::sample_snapshot, png::assert_png};
//!
//! let windows = sample_snapshot();
//! // ... capture into `path` ...
//! let image = assert_png(&path, 800, 600);
//! ```

pub mod fixtures;
pub mod png;
pub mod timing;

#[cfg(target_os = "windows")]
pub mod windows;
