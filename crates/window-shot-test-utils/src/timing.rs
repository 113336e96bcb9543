//! Timing measurement utilities
//!
//! - [`measure_sync`]: Simple synchronous timing wrapper
//! - [`assert_duration_above`]: Assert duration exceeds minimum

use std::time::{Duration, Instant};

/// Measure the duration of a synchronous operation
///
/// Simple wrapper for timing sync operations. Returns the result and elapsed duration.
///
/// # Example
///
/// ```ignore
/// use window_shot_test_utils::timing::measure_sync;
///
/// let (report, duration) = measure_sync("capture", || engine.capture(handle, &target));
/// println!("Capture took {:.2}ms", duration.as_secs_f64() * 1000.0);
/// ```
pub fn measure_sync<F, T>(name: &str, f: F) -> (T, Duration)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed();
    println!("[TIMING] {}: {:.2}ms", name, elapsed.as_secs_f64() * 1000.0);
    (result, elapsed)
}

/// Asserts that a duration is above a minimum (for sanity checks)
///
/// Useful for checking that a configured wait actually happened.
///
/// # Example
///
/// ```
/// use window_shot_test_utils::timing::assert_duration_above;
/// use std::time::Duration;
///
/// // The settle delay was honored
/// assert_duration_above(Duration::from_millis(104), Duration::from_millis(100), "prepare");
/// ```
///
/// # Panics
///
/// Panics if `actual < minimum` with a message noting the suspiciously fast time.
pub fn assert_duration_above(actual: Duration, minimum: Duration, operation: &str) {
    assert!(
        actual >= minimum,
        "{} took {:.3}s, expected >={:.3}s (suspiciously fast)",
        operation,
        actual.as_secs_f64(),
        minimum.as_secs_f64()
    );
}
