//! Velocity tracking for release decisions.
//!
//! [`VelocityTracker1D`] estimates the y velocity of a pointer from its recent
//! positions using the impulse strategy: velocity is derived from the kinetic
//! energy the samples impart rather than from a least-squares fit.
//! Trackers are leased per gesture from a [`VelocityTrackerPool`].

use std::cell::{Cell, RefCell};
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use smallvec::SmallVec;

/// Ring buffer size for velocity tracking samples.
const HISTORY_SIZE: usize = 20;

/// Only use samples within the last 100ms for velocity calculation.
const HORIZON_MS: i64 = 100;

/// If no movement for this duration, assume the pointer has stopped.
pub const ASSUME_STOPPED_MS: i64 = 40;

/// Trackers kept for reuse.
const POOL_CAPACITY: usize = 2;

/// Velocity service consumed by the panel controller.
pub trait VelocityTracker {
    /// Record the pointer position at `time_ms`.
    fn add_position(&mut self, time_ms: i64, position: f32);

    /// Current velocity in px/sec, clamped to `±max_velocity`. Zero when unknown.
    fn velocity(&self, max_velocity: f32) -> f32;

    /// Forget all samples.
    fn reset(&mut self);
}

#[derive(Clone, Copy)]
struct Sample {
    time_ms: i64,
    position: f32,
}

/// 1D velocity tracker using impulse-based velocity calculation.
#[derive(Clone)]
pub struct VelocityTracker1D {
    /// Ring buffer of samples.
    samples: [Option<Sample>; HISTORY_SIZE],
    /// Index of the newest sample.
    index: usize,
}

impl Default for VelocityTracker1D {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityTracker1D {
    pub fn new() -> Self {
        Self {
            samples: [None; HISTORY_SIZE],
            index: 0,
        }
    }

    /// Calculates the velocity in units/second.
    ///
    /// Returns 0.0 with fewer than two usable samples. Samples older than the
    /// horizon, or separated from their neighbour by a pause, are ignored.
    pub fn calculate_velocity(&self) -> f32 {
        let Some(newest) = self.samples[self.index] else {
            return 0.0;
        };

        let mut positions = [0.0f32; HISTORY_SIZE];
        let mut ages = [0.0f32; HISTORY_SIZE];
        let mut count = 0;
        let mut cursor = self.index;
        let mut previous_time = newest.time_ms;

        while let Some(sample) = self.samples[cursor] {
            let age = newest.time_ms - sample.time_ms;
            let gap = (previous_time - sample.time_ms).abs();
            if age > HORIZON_MS || gap > ASSUME_STOPPED_MS {
                break;
            }
            previous_time = sample.time_ms;

            positions[count] = sample.position;
            ages[count] = -(age as f32);
            count += 1;
            if count == HISTORY_SIZE {
                break;
            }
            cursor = (cursor + HISTORY_SIZE - 1) % HISTORY_SIZE;
        }

        if count < 2 {
            return 0.0;
        }

        impulse_velocity(&positions[..count], &ages[..count]) * 1000.0
    }

    /// Calculates the velocity in units/second, capped to `max_velocity`.
    pub fn calculate_velocity_with_max(&self, max_velocity: f32) -> f32 {
        if !max_velocity.is_finite() || max_velocity <= 0.0 {
            return 0.0;
        }

        let velocity = self.calculate_velocity();
        if velocity == 0.0 || velocity.is_nan() {
            return 0.0;
        }

        velocity.clamp(-max_velocity, max_velocity)
    }
}

impl VelocityTracker for VelocityTracker1D {
    fn add_position(&mut self, time_ms: i64, position: f32) {
        self.index = (self.index + 1) % HISTORY_SIZE;
        self.samples[self.index] = Some(Sample { time_ms, position });
    }

    fn velocity(&self, max_velocity: f32) -> f32 {
        self.calculate_velocity_with_max(max_velocity)
    }

    fn reset(&mut self) {
        self.samples = [None; HISTORY_SIZE];
        self.index = 0;
    }
}

/// Impulse velocity in units/ms. Samples are ordered newest first; `ages` are
/// non-positive offsets from the newest sample.
fn impulse_velocity(positions: &[f32], ages: &[f32]) -> f32 {
    let oldest = positions.len() - 1;
    let mut work = 0.0f32;

    for i in (1..=oldest).rev() {
        let dt = ages[i] - ages[i - 1];
        if dt == 0.0 {
            continue;
        }
        let v_curr = (positions[i] - positions[i - 1]) / dt;
        let v_prev = kinetic_energy_to_velocity(work);
        work += (v_curr - v_prev) * v_curr.abs();
        if i == oldest {
            work *= 0.5;
        }
    }

    kinetic_energy_to_velocity(work)
}

/// Converts kinetic energy to velocity using E = 0.5 * m * v^2 (with m = 1).
#[inline]
fn kinetic_energy_to_velocity(kinetic_energy: f32) -> f32 {
    kinetic_energy.signum() * (2.0 * kinetic_energy.abs()).sqrt()
}

type TrackerFactory = Box<dyn Fn() -> Box<dyn VelocityTracker>>;

struct PoolInner {
    factory: TrackerFactory,
    free: RefCell<SmallVec<[Box<dyn VelocityTracker>; POOL_CAPACITY]>>,
    leased: Cell<usize>,
}

/// Recycling source of velocity trackers.
///
/// A tracker is leased for one gesture and goes back to the pool, reset, when
/// its [`TrackerLease`] drops. That covers every way a gesture can end.
#[derive(Clone)]
pub struct VelocityTrackerPool {
    inner: Rc<PoolInner>,
}

impl Default for VelocityTrackerPool {
    fn default() -> Self {
        Self::with_factory(|| Box::new(VelocityTracker1D::new()))
    }
}

impl VelocityTrackerPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pool producing trackers from `factory`, for hosts with their own tracker.
    pub fn with_factory(factory: impl Fn() -> Box<dyn VelocityTracker> + 'static) -> Self {
        Self {
            inner: Rc::new(PoolInner {
                factory: Box::new(factory),
                free: RefCell::new(SmallVec::new()),
                leased: Cell::new(0),
            }),
        }
    }

    pub fn obtain(&self) -> TrackerLease {
        let recycled = self.inner.free.borrow_mut().pop();
        let tracker = recycled.unwrap_or_else(|| (self.inner.factory)());
        self.inner.leased.set(self.inner.leased.get() + 1);
        TrackerLease {
            tracker: Some(tracker),
            pool: Rc::clone(&self.inner),
        }
    }

    /// Trackers currently out on lease.
    pub fn leased(&self) -> usize {
        self.inner.leased.get()
    }

    /// Trackers waiting for reuse.
    pub fn idle(&self) -> usize {
        self.inner.free.borrow().len()
    }
}

/// A tracker on loan from a [`VelocityTrackerPool`].
pub struct TrackerLease {
    tracker: Option<Box<dyn VelocityTracker>>,
    pool: Rc<PoolInner>,
}

impl Deref for TrackerLease {
    type Target = dyn VelocityTracker;

    fn deref(&self) -> &Self::Target {
        match &self.tracker {
            Some(tracker) => tracker.as_ref(),
            None => unreachable!("tracker is only taken in drop"),
        }
    }
}

impl DerefMut for TrackerLease {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match &mut self.tracker {
            Some(tracker) => tracker.as_mut(),
            None => unreachable!("tracker is only taken in drop"),
        }
    }
}

impl Drop for TrackerLease {
    fn drop(&mut self) {
        self.pool.leased.set(self.pool.leased.get().saturating_sub(1));
        if let Some(mut tracker) = self.tracker.take() {
            let mut free = self.pool.free.borrow_mut();
            if free.len() < POOL_CAPACITY {
                tracker.reset();
                free.push(tracker);
            } else {
                log::trace!("velocity tracker pool full, dropping returned tracker");
            }
        }
    }
}
