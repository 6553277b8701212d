//! Panel configuration.

use std::fmt;

use glide_animation::{Easing, FlingParameters};
use glide_foundation::{DEFAULT_SETTLE_DURATION_MS, MAX_FLING_VELOCITY, TOUCH_SLOP};

/// Construction-time configuration of a sliding panel.
///
/// Fixed for the lifetime of a controller. Pixel values are physical pixels;
/// [`with_density`](Self::with_density) scales the density-dependent defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelConfig {
    /// Distance in pixels between the expanded and collapsed positions.
    pub offset_max: f32,
    /// Time for the panel to cover `offset_max` at the default settle velocity.
    pub default_settle_duration_ms: f32,
    /// Movement from the press position required before a drag commits.
    pub touch_slop: f32,
    /// Release velocities are clamped to this, in px/sec.
    pub max_fling_velocity: f32,
    /// Easing of settle animations.
    pub settle_easing: Easing,
    /// Physical constants for the list fling model.
    pub fling: FlingParameters,
}

impl PanelConfig {
    /// Configuration for a panel travelling `offset_max` pixels, with platform defaults.
    pub fn new(offset_max: f32) -> Self {
        Self {
            offset_max,
            default_settle_duration_ms: DEFAULT_SETTLE_DURATION_MS,
            touch_slop: TOUCH_SLOP,
            max_fling_velocity: MAX_FLING_VELOCITY,
            settle_easing: Easing::EaseInOut,
            fling: FlingParameters::default(),
        }
    }

    /// Scale touch slop, maximum fling velocity and fling physics to a screen density.
    pub fn with_density(mut self, density: f32) -> Self {
        self.touch_slop = TOUCH_SLOP * density;
        self.max_fling_velocity = MAX_FLING_VELOCITY * density;
        self.fling = FlingParameters::new(self.fling.friction(), density);
        self
    }

    pub fn with_settle_duration_ms(mut self, duration_ms: f32) -> Self {
        self.default_settle_duration_ms = duration_ms;
        self
    }

    pub fn with_touch_slop(mut self, touch_slop: f32) -> Self {
        self.touch_slop = touch_slop;
        self
    }

    pub fn with_max_fling_velocity(mut self, max_velocity: f32) -> Self {
        self.max_fling_velocity = max_velocity;
        self
    }

    pub fn with_settle_easing(mut self, easing: Easing) -> Self {
        self.settle_easing = easing;
        self
    }

    pub fn with_fling_parameters(mut self, fling: FlingParameters) -> Self {
        self.fling = fling;
        self
    }

    /// Speed at which the panel covers its full range in the default settle
    /// duration, in px/sec.
    pub fn default_velocity(&self) -> f32 {
        self.offset_max * 1000.0 / self.default_settle_duration_ms
    }

    /// Release speed above which the panel snaps in the direction of motion.
    /// Also the lowest speed a settle animation runs at.
    pub fn min_velocity(&self) -> f32 {
        self.default_velocity() / 2.0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.offset_max.is_finite() || self.offset_max < 0.0 {
            return Err(ConfigError::InvalidOffset(self.offset_max));
        }
        if !self.default_settle_duration_ms.is_finite() || self.default_settle_duration_ms <= 0.0 {
            return Err(ConfigError::InvalidSettleDuration(
                self.default_settle_duration_ms,
            ));
        }
        if !self.touch_slop.is_finite() || self.touch_slop < 0.0 {
            return Err(ConfigError::InvalidTouchSlop(self.touch_slop));
        }
        if self.max_fling_velocity.is_nan() || self.max_fling_velocity <= 0.0 {
            return Err(ConfigError::InvalidMaxFlingVelocity(self.max_fling_velocity));
        }
        if !self.fling.is_valid() {
            return Err(ConfigError::InvalidFlingParameters(self.fling));
        }
        Ok(())
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    InvalidOffset(f32),
    InvalidSettleDuration(f32),
    InvalidTouchSlop(f32),
    InvalidMaxFlingVelocity(f32),
    InvalidFlingParameters(FlingParameters),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidOffset(value) => {
                write!(f, "panel offset must be a non-negative finite distance, got {value}")
            }
            ConfigError::InvalidSettleDuration(value) => {
                write!(f, "settle duration must be positive, got {value}ms")
            }
            ConfigError::InvalidTouchSlop(value) => {
                write!(f, "touch slop must be non-negative, got {value}")
            }
            ConfigError::InvalidMaxFlingVelocity(value) => {
                write!(f, "max fling velocity must be positive, got {value}")
            }
            ConfigError::InvalidFlingParameters(params) => write!(
                f,
                "fling friction and physical coefficient must be positive, got {} and {}",
                params.friction(),
                params.physical_coefficient()
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
