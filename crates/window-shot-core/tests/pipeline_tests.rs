//! End-to-end capture runs against the mock backend

use std::time::Duration;

use tempfile::TempDir;
use window_shot_core::{
    capture::{MockBackend, take_screenshot},
    error::CaptureError,
    model::{CaptureOptions, CaptureStrategy, Rect, WindowHandle, WindowSelector},
    util::output_path::{OutputPathResolver, timestamp_from_filename},
};
use window_shot_test_utils::{
    fixtures::sample_snapshot,
    png::{assert_dir_empty, assert_png, png_files_in},
    timing::{assert_duration_above, measure_sync},
};

fn quick_opts() -> CaptureOptions {
    CaptureOptions::builder().settle_delay(Duration::ZERO).build()
}

fn resolver_in(temp: &TempDir) -> OutputPathResolver {
    OutputPathResolver::default().with_working_dir(temp.path())
}

#[test]
fn test_capture_by_title_writes_png_of_window_size() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("notepad.png");
    let backend = MockBackend::new();

    let report = take_screenshot(
        &backend,
        &WindowSelector::by_title("Untitled - Notepad"),
        out.to_str(),
        &quick_opts(),
        &resolver_in(&temp),
    )
    .unwrap();

    assert_eq!(report.path, out);
    let image = assert_png(&out, 800, 600);
    assert_eq!(
        image.get_pixel(400, 300),
        &MockBackend::strategy_color(CaptureStrategy::PaintFullContent)
    );
}

#[test]
fn test_fallback_strategy_pixels_are_written() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("fallback.png");
    let backend = MockBackend::new()
        .fail_strategy(CaptureStrategy::PaintFullContent)
        .fail_strategy(CaptureStrategy::Paint);

    let report = take_screenshot(
        &backend,
        &WindowSelector::by_pid("1000"),
        out.to_str(),
        &quick_opts(),
        &resolver_in(&temp),
    )
    .unwrap();

    assert_eq!(report.strategy, CaptureStrategy::ScreenCopy);
    let image = assert_png(&out, 800, 600);
    assert_eq!(
        image.get_pixel(0, 0),
        &MockBackend::strategy_color(CaptureStrategy::ScreenCopy)
    );
}

#[test]
fn test_all_strategies_failing_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let backend = MockBackend::new().fail_all_strategies();

    let err = take_screenshot(
        &backend,
        &WindowSelector::by_handle("0x10010"),
        Some("nested/dir/"),
        &quick_opts(),
        &resolver_in(&temp),
    )
    .unwrap_err();

    assert!(matches!(err, CaptureError::RenderFailed { ref attempts } if attempts.len() == 3));
    assert_dir_empty(temp.path());
}

#[test]
fn test_minimized_window_is_invalid_geometry() {
    let temp = TempDir::new().unwrap();
    let handle = WindowHandle::new(0x30030);
    let backend = MockBackend::new().with_geometry(
        handle,
        Some(Rect::new(-32000, -32000, -32000, -32000)),
        None,
    );

    let err = take_screenshot(
        &backend,
        &WindowSelector::by_title("Visual Studio Code"),
        None,
        &quick_opts(),
        &resolver_in(&temp),
    )
    .unwrap_err();

    assert!(matches!(err, CaptureError::InvalidGeometry { width: 0, height: 0 }));
    assert_dir_empty(temp.path());
}

#[test]
fn test_unknown_pid_is_not_found_and_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let backend = MockBackend::new().with_windows(sample_snapshot());

    let err = take_screenshot(
        &backend,
        &WindowSelector::by_pid("4242"),
        None,
        &quick_opts(),
        &resolver_in(&temp),
    )
    .unwrap_err();

    assert_eq!(err.to_string(), "Window not found: pid 4242");
    assert_dir_empty(temp.path());
}

#[test]
fn test_listing_failure_propagates() {
    let temp = TempDir::new().unwrap();
    let backend = MockBackend::new().fail_listing();

    let err = take_screenshot(
        &backend,
        &WindowSelector::by_title("Untitled - Notepad"),
        None,
        &quick_opts(),
        &resolver_in(&temp),
    )
    .unwrap_err();

    assert!(matches!(err, CaptureError::EnumerationFailed { .. }));
    assert_dir_empty(temp.path());
}

#[test]
fn test_no_output_argument_uses_timestamped_name_in_working_dir() {
    let temp = TempDir::new().unwrap();
    let backend = MockBackend::new();

    let report = take_screenshot(
        &backend,
        &WindowSelector::by_pid("2000"),
        None,
        &quick_opts(),
        &resolver_in(&temp),
    )
    .unwrap();

    assert_eq!(png_files_in(temp.path()), vec![report.path.clone()]);
    let name = report.path.file_name().unwrap().to_str().unwrap();
    assert!(timestamp_from_filename(name).is_some(), "{name}");
}

#[test]
fn test_directory_argument_is_created_at_write_time() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("shots");
    let arg = format!("{}/", dir.display());
    let backend = MockBackend::new();

    let report = take_screenshot(
        &backend,
        &WindowSelector::by_title("Untitled - Notepad"),
        Some(&arg),
        &quick_opts(),
        &resolver_in(&temp),
    )
    .unwrap();

    assert!(dir.is_dir());
    assert_eq!(png_files_in(&dir), vec![report.path]);
}

#[test]
fn test_back_to_back_captures_get_distinct_files() {
    let temp = TempDir::new().unwrap();
    let backend = MockBackend::new();
    let paths = resolver_in(&temp);

    for _ in 0..3 {
        take_screenshot(
            &backend,
            &WindowSelector::by_pid("1000"),
            None,
            &quick_opts(),
            &paths,
        )
        .unwrap();
    }

    assert_eq!(png_files_in(temp.path()).len(), 3);
}

#[test]
fn test_settle_delay_is_honored() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("settled.png");
    let backend = MockBackend::new();
    let opts = CaptureOptions::builder()
        .settle_delay(Duration::from_millis(100))
        .build();

    let (result, elapsed) = measure_sync("capture with settle delay", || {
        take_screenshot(
            &backend,
            &WindowSelector::by_pid("1000"),
            out.to_str(),
            &opts,
            &resolver_in(&temp),
        )
    });

    result.unwrap();
    assert_duration_above(elapsed, Duration::from_millis(100), "capture with settle delay");
}
