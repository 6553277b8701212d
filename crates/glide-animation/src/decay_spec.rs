//! Spline deceleration model for fling hand-off.
//!
//! Converts a release velocity into the distance and duration a ballistic
//! fling would travel, using the same spline-deceleration curve the platform
//! scroller uses. Nothing here holds state; the physical constants are
//! computed once from the display density and injected as [`FlingParameters`].

/// Tension lines cross at (INFLEXION, 1).
const INFLEXION: f64 = 0.35;

/// Earth's gravity in SI units (m/s²)
const GRAVITY_EARTH: f32 = 9.80665;
/// Inches per meter (for density conversion)
const INCHES_PER_METER: f32 = 39.37;
/// Pixels per inch at density 1.0
const BASELINE_PPI: f32 = 160.0;
/// Look and feel tuning
const PHYSICAL_FEEL: f32 = 0.84;

/// ln(0.78) / ln(0.9)
const DECELERATION_RATE: f64 = 2.358_201_815_425_944_8;

/// Immutable per-device physical constants for fling computations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlingParameters {
    friction: f32,
    physical_coefficient: f32,
}

impl FlingParameters {
    /// Default scroll friction (matches the platform default).
    pub const DEFAULT_FRICTION: f32 = 0.015;

    /// Create parameters for the given friction and screen density.
    ///
    /// # Arguments
    /// * `friction` - Scroll friction coefficient (higher = faster deceleration)
    /// * `density` - Screen density scale (1.0 for mdpi, 2.0 for xhdpi, ...)
    pub fn new(friction: f32, density: f32) -> Self {
        let ppi = density * BASELINE_PPI;
        Self {
            friction,
            physical_coefficient: GRAVITY_EARTH * INCHES_PER_METER * ppi * PHYSICAL_FEEL,
        }
    }

    /// Create parameters with default friction for the given density.
    pub fn with_density(density: f32) -> Self {
        Self::new(Self::DEFAULT_FRICTION, density)
    }

    pub fn friction(&self) -> f32 {
        self.friction
    }

    /// Density- and gravity-derived coefficient, already scaled by the feel factor.
    pub fn physical_coefficient(&self) -> f32 {
        self.physical_coefficient
    }

    /// Whether both constants are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.friction.is_finite()
            && self.friction > 0.0
            && self.physical_coefficient.is_finite()
            && self.physical_coefficient > 0.0
    }
}

impl Default for FlingParameters {
    fn default() -> Self {
        Self::with_density(1.0)
    }
}

/// Distance and duration of a computed fling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlingInfo {
    /// Release velocity in px/sec, signed.
    pub initial_velocity: f32,
    /// Unsigned distance the fling travels, in pixels.
    pub distance: f32,
    /// Total duration in milliseconds.
    pub duration_millis: u64,
}

/// Calculator for spline-decelerated flings.
///
/// `velocity` must be nonzero for [`fling_distance`](Self::fling_distance) and
/// [`fling_duration`](Self::fling_duration): the model takes the log of it.
/// [`fling_info`](Self::fling_info) performs that guard for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlingCalculator {
    params: FlingParameters,
}

impl FlingCalculator {
    pub fn new(params: FlingParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> FlingParameters {
        self.params
    }

    fn friction_coefficient(&self) -> f64 {
        self.params.friction as f64 * self.params.physical_coefficient as f64
    }

    fn spline_deceleration(&self, velocity: f32) -> f64 {
        (INFLEXION * velocity.abs() as f64 / self.friction_coefficient()).ln()
    }

    /// Total distance a fling at `velocity` px/sec travels before coming to rest.
    pub fn fling_distance(&self, velocity: f32) -> f32 {
        let l = self.spline_deceleration(velocity);
        let decel_minus_one = DECELERATION_RATE - 1.0;
        (self.friction_coefficient() * (DECELERATION_RATE / decel_minus_one * l).exp()) as f32
    }

    /// Duration of a fling at `velocity` px/sec, in milliseconds.
    pub fn fling_duration(&self, velocity: f32) -> f64 {
        let l = self.spline_deceleration(velocity);
        let decel_minus_one = DECELERATION_RATE - 1.0;
        1000.0 * (l / decel_minus_one).exp()
    }

    /// Distance and duration together, or `None` for a zero or non-finite velocity.
    pub fn fling_info(&self, velocity: f32) -> Option<FlingInfo> {
        if velocity == 0.0 || !velocity.is_finite() {
            return None;
        }
        Some(FlingInfo {
            initial_velocity: velocity,
            distance: self.fling_distance(velocity),
            duration_millis: self.fling_duration(velocity) as u64,
        })
    }
}
