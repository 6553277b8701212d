//! Shared gesture constants for touch handling.
//!
//! Values are in physical pixels at a baseline density. Hosts on dense
//! screens scale them through the panel configuration.

/// Drag threshold in pixels.
///
/// Movement from the initial press position smaller than this never commits a
/// direction: the panel does not intercept and its translation does not change.
/// Matches the platform's default touch slop of 8dp.
pub const TOUCH_SLOP: f32 = 8.0;

/// Maximum fling velocity in pixels per second.
///
/// Release velocities are clamped to this before being used for settle or
/// fling decisions.
pub const MAX_FLING_VELOCITY: f32 = 8_000.0;

/// Time in milliseconds for the panel to travel its full range at the default
/// settle velocity.
pub const DEFAULT_SETTLE_DURATION_MS: f32 = 200.0;
