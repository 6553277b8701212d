//! Settle animation scheduling.
//!
//! The panel controller never drives frames itself. It asks an
//! [`AnimationScheduler`] to interpolate a value from A to B and receives the
//! intermediate values through a callback. [`FrameAnimator`] is the frame-driven
//! implementation used by hosts without their own animation system.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use web_time::Instant;

/// Trait for types that can be linearly interpolated.
pub trait Lerp {
    fn lerp(&self, target: &Self, fraction: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        self + (target - self) * fraction
    }
}

/// Easing curves for settle animations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    /// Linear interpolation (no easing).
    LinearEasing,
    /// Accelerate then decelerate. The platform's default property-animation curve.
    EaseInOut,
    /// Fast out, slow in (material design standard).
    FastOutSlowInEasing,
    /// Decelerate into the target.
    LinearOutSlowInEasing,
}

impl Easing {
    /// Apply the easing function to a linear fraction [0, 1].
    pub fn transform(&self, fraction: f32) -> f32 {
        match self {
            Easing::LinearEasing => fraction.clamp(0.0, 1.0),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, fraction),
            Easing::FastOutSlowInEasing => cubic_bezier(0.4, 0.0, 0.2, 1.0, fraction),
            Easing::LinearOutSlowInEasing => cubic_bezier(0.0, 0.0, 0.2, 1.0, fraction),
        }
    }
}

/// Cubic bezier curve approximation for easing.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, fraction: f32) -> f32 {
    if fraction <= 0.0 {
        return 0.0;
    }
    if fraction >= 1.0 {
        return 1.0;
    }

    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;

    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    let sample = |a: f32, b: f32, c: f32, t: f32| ((a * t + b) * t + c) * t;
    let slope = |a: f32, b: f32, c: f32, t: f32| (3.0 * a * t + 2.0 * b) * t + c;

    // Newton-Raphson first, bisection if the slope flattens out.
    let mut t = fraction;
    for _ in 0..8 {
        let x = sample(ax, bx, cx, t) - fraction;
        if x.abs() < 1e-6 {
            return sample(ay, by, cy, t);
        }
        let dx = slope(ax, bx, cx, t);
        if dx.abs() < 1e-6 {
            break;
        }
        t = (t - x / dx).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    t = fraction;
    for _ in 0..24 {
        let delta = sample(ax, bx, cx, t) - fraction;
        if delta.abs() < 1e-6 {
            break;
        }
        if delta > 0.0 {
            hi = t;
        } else {
            lo = t;
        }
        t = 0.5 * (lo + hi);
    }

    sample(ay, by, cy, t)
}

/// Tween specification: duration plus easing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    /// Duration in milliseconds.
    pub duration_millis: u64,
    /// Easing function to apply.
    pub easing: Easing,
}

impl AnimationSpec {
    /// Create a tween animation with duration and easing.
    pub fn tween(duration_millis: u64, easing: Easing) -> Self {
        Self {
            duration_millis,
            easing,
        }
    }

    /// Create a linear tween animation.
    pub fn linear(duration_millis: u64) -> Self {
        Self::tween(duration_millis, Easing::LinearEasing)
    }
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::tween(200, Easing::EaseInOut)
    }
}

#[derive(Debug, Default)]
struct AnimationControl {
    cancelled: Cell<bool>,
    finished: Cell<bool>,
}

impl AnimationControl {
    fn is_active(&self) -> bool {
        !self.cancelled.get() && !self.finished.get()
    }
}

/// Handle to a running animation.
///
/// Cancelling stops further update callbacks. Dropping the handle cancels the
/// animation as well, so whoever owns the handle owns the animated value.
#[derive(Debug)]
pub struct AnimationHandle {
    control: Rc<AnimationControl>,
}

impl AnimationHandle {
    fn new(control: Rc<AnimationControl>) -> Self {
        Self { control }
    }

    /// A handle for an animation that never started.
    pub fn inactive() -> Self {
        let control = AnimationControl::default();
        control.finished.set(true);
        Self::new(Rc::new(control))
    }

    /// Whether the animation will still emit update callbacks.
    pub fn is_active(&self) -> bool {
        self.control.is_active()
    }

    pub fn cancel(self) {
        self.control.cancelled.set(true);
    }
}

impl Drop for AnimationHandle {
    fn drop(&mut self) {
        if !self.control.finished.get() {
            self.control.cancelled.set(true);
        }
    }
}

/// Callback receiving each interpolated value.
pub type UpdateCallback = Box<dyn FnMut(f32)>;

/// Collaborator that plays value animations on the UI thread.
pub trait AnimationScheduler {
    /// Start interpolating from `from` to `to` as described by `spec`.
    ///
    /// `on_update` is called with every intermediate value and finally with
    /// `to` exactly, unless the returned handle is cancelled first.
    fn animate(&self, from: f32, to: f32, spec: AnimationSpec, on_update: UpdateCallback)
        -> AnimationHandle;
}

struct Tween {
    from: f32,
    to: f32,
    spec: AnimationSpec,
    start_time_nanos: Option<u64>,
    on_update: UpdateCallback,
    control: Rc<AnimationControl>,
}

impl Tween {
    /// Advance to `frame_time_nanos`. Returns `true` while more frames are needed.
    fn on_frame(&mut self, frame_time_nanos: u64) -> bool {
        if !self.control.is_active() {
            return false;
        }

        let start_time = *self.start_time_nanos.get_or_insert(frame_time_nanos);
        let elapsed_nanos = frame_time_nanos.saturating_sub(start_time);
        let duration_nanos = self.spec.duration_millis.saturating_mul(1_000_000);
        let linear_progress = if duration_nanos == 0 {
            1.0
        } else {
            (elapsed_nanos as f32 / duration_nanos as f32).clamp(0.0, 1.0)
        };

        if linear_progress >= 1.0 {
            self.control.finished.set(true);
            (self.on_update)(self.to);
            return false;
        }

        let progress = self.spec.easing.transform(linear_progress);
        (self.on_update)(self.from.lerp(&self.to, progress));
        true
    }
}

struct FrameAnimatorInner {
    tweens: RefCell<Vec<Tween>>,
    origin: Instant,
}

/// Frame-driven [`AnimationScheduler`].
///
/// Tweens advance only when the host calls [`on_frame`](Self::on_frame) (or
/// [`on_frame_now`](Self::on_frame_now)) from its frame loop. The first frame
/// after `animate` pins the tween's start time.
#[derive(Clone)]
pub struct FrameAnimator {
    inner: Rc<FrameAnimatorInner>,
}

impl Default for FrameAnimator {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameAnimator {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(FrameAnimatorInner {
                tweens: RefCell::new(Vec::new()),
                origin: Instant::now(),
            }),
        }
    }

    /// Number of tweens still waiting for frames.
    pub fn running_count(&self) -> usize {
        self.inner
            .tweens
            .borrow()
            .iter()
            .filter(|tween| tween.control.is_active())
            .count()
    }

    pub fn is_idle(&self) -> bool {
        self.running_count() == 0
    }

    /// Advance every running tween to `frame_time_nanos`.
    pub fn on_frame(&self, frame_time_nanos: u64) {
        // Callbacks may start new animations, so run them with the list released.
        let mut running = std::mem::take(&mut *self.inner.tweens.borrow_mut());
        running.retain_mut(|tween| tween.on_frame(frame_time_nanos));

        let mut tweens = self.inner.tweens.borrow_mut();
        running.append(&mut tweens);
        *tweens = running;
    }

    /// Advance using wall-clock time since this animator was created.
    pub fn on_frame_now(&self) {
        let nanos = self.inner.origin.elapsed().as_nanos();
        self.on_frame(u64::try_from(nanos).unwrap_or(u64::MAX));
    }
}

impl AnimationScheduler for FrameAnimator {
    fn animate(
        &self,
        from: f32,
        to: f32,
        spec: AnimationSpec,
        on_update: UpdateCallback,
    ) -> AnimationHandle {
        let control = Rc::new(AnimationControl::default());
        log::trace!(
            "tween {from} -> {to} over {}ms ({:?})",
            spec.duration_millis,
            spec.easing
        );
        self.inner.tweens.borrow_mut().push(Tween {
            from,
            to,
            spec,
            start_time_nanos: None,
            on_update,
            control: Rc::clone(&control),
        });
        AnimationHandle::new(control)
    }
}

#[cfg(test)]
#[path = "tests/animation_tests.rs"]
mod tests;
