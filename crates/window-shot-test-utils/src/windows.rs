//! Windows-specific test utilities
//!
//! Helpers for integration tests that need a live desktop session.
//!
//! # Key Types
//!
//! - [`TitledConsole`]: a console window with a unique title, closed on drop
//! - [`save_test_image`]: Save captured images for visual verification
//! - [`validate_image_pixels`]: Verify image content is not blank
//!
//! # Example
//!
//! ```ignore
//! use window_shot_test_utils::windows::TitledConsole;
//!
//! let console = TitledConsole::spawn("window-shot-test");
//! let record = console.wait_for_window(&backend).expect("console never appeared");
//! ```

#![allow(dead_code)] // Helpers are available for test use, not all are always needed

use std::{
    os::windows::process::CommandExt,
    path::PathBuf,
    process::{Child, Command},
    thread,
    time::{Duration, Instant},
};

use image::RgbaImage;
use window_shot_core::{capture::WindowEnumerator, model::WindowRecord};

/// `CREATE_NEW_CONSOLE` process creation flag
const CREATE_NEW_CONSOLE: u32 = 0x0000_0010;

/// How long to wait for a spawned window to show up in enumeration
const WINDOW_APPEAR_TIMEOUT: Duration = Duration::from_secs(10);

/// Get the test output directory using CARGO_MANIFEST_DIR for robustness
pub fn test_output_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_output")
}

/// Save an image to test_output/ directory for visual verification
pub fn save_test_image(image: &RgbaImage, name: &str) -> PathBuf {
    use std::fs;

    let output_dir = test_output_dir();
    fs::create_dir_all(&output_dir).expect("Failed to create test_output directory");

    let path = output_dir.join(format!("{name}.png"));
    image.save(&path).expect("Failed to save PNG");

    let abs_path = fs::canonicalize(&path).unwrap_or(path.clone());
    println!(
        "[SAVED] {} ({}x{}) -> {}",
        name,
        image.width(),
        image.height(),
        abs_path.display()
    );

    abs_path
}

/// Validate that an image contains actual pixel data (not blank)
///
/// # Panics
///
/// Panics if the image has no area or every color byte is zero.
pub fn validate_image_pixels(image: &RgbaImage, name: &str) {
    let (width, height) = image.dimensions();
    assert!(width > 0 && height > 0, "Image '{}' should have non-zero dimensions", name);

    let non_black = image
        .pixels()
        .filter(|p| p.0[0] != 0 || p.0[1] != 0 || p.0[2] != 0)
        .count();
    let total = (width * height) as usize;

    println!(
        "[PIXELS] {} - {}x{} ({:.1}% non-black)",
        name,
        width,
        height,
        non_black as f64 * 100.0 / total as f64
    );

    assert!(non_black > 0, "Image '{}' is entirely black", name);
}

/// A `cmd.exe` console window with a known title
///
/// The console is killed when this value is dropped.
pub struct TitledConsole {
    child: Child,
    title: String,
}

impl TitledConsole {
    /// Spawns a console and sets its title to `title` plus the process id
    /// of the test, so parallel test runs do not collide
    pub fn spawn(title: &str) -> Self {
        let title = format!("{title} {}", std::process::id());
        let child = Command::new("cmd.exe")
            .args(["/K", "title", &title])
            .creation_flags(CREATE_NEW_CONSOLE)
            .spawn()
            .expect("Failed to spawn cmd.exe");

        Self { child, title }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Polls enumeration until the console's window appears
    pub fn wait_for_window<B: WindowEnumerator>(&self, backend: &B) -> Option<WindowRecord> {
        let deadline = Instant::now() + WINDOW_APPEAR_TIMEOUT;

        while Instant::now() < deadline {
            if let Ok(windows) = backend.list_windows() {
                if let Some(found) = windows.into_iter().find(|w| w.title == self.title) {
                    println!("[TARGET] Console '{}' is {} (pid {})", found.title, found.handle, found.pid);
                    return Some(found);
                }
            }
            thread::sleep(Duration::from_millis(100));
        }

        None
    }
}

impl Drop for TitledConsole {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
