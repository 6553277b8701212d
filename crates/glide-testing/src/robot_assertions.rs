//! Assertion utilities for robot testing
//!
//! Helpers for checking panel motion recorded by a robot run.

/// Assert that a value is within an expected range.
///
/// Useful where frame timing makes exact values brittle.
pub fn assert_approx_eq(actual: f32, expected: f32, tolerance: f32, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{}: expected {} (±{}), got {} (diff: {})",
        msg,
        expected,
        tolerance,
        actual,
        diff
    );
}

/// Assert that `values` never change direction.
///
/// Either non-decreasing or non-increasing passes; settle animations must
/// not overshoot and come back.
pub fn assert_monotonic(values: &[f32], msg: &str) {
    let rising = values.windows(2).all(|pair| pair[0] <= pair[1]);
    let falling = values.windows(2).all(|pair| pair[0] >= pair[1]);
    assert!(
        rising || falling,
        "{}: values change direction: {:?}",
        msg,
        values
    );
}

/// Assert that every value lies within `[min, max]`.
pub fn assert_within(values: &[f32], min: f32, max: f32, msg: &str) {
    if let Some(value) = values.iter().find(|value| !(min..=max).contains(*value)) {
        panic!("{}: value {} outside [{}, {}]", msg, value, min, max);
    }
}

/// Assert that a collection has an expected count.
pub fn assert_count<T>(items: &[T], expected: usize, msg: &str) {
    assert_eq!(
        items.len(),
        expected,
        "{}: expected {} items, got {}",
        msg,
        expected,
        items.len()
    );
}
