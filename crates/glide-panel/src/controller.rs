//! Touch handling for the sliding panel.
//!
//! The host feeds every pointer event through two entry points, mirroring how
//! a view container sees touches:
//!
//! - [`on_intercept_touch_event`](SlidingPanelController::on_intercept_touch_event)
//!   runs before the list sees an event. Returning `true` steals the rest of the
//!   gesture from the list.
//! - [`on_touch_event`](SlidingPanelController::on_touch_event) receives the
//!   gesture once stolen.
//!
//! A panel collapsed at `offset_max` steals upward drags and expands; an
//! expanded panel steals downward drags and collapses. When the panel runs out
//! of travel mid-drag, the rest of the drag scrolls the list.

use std::rc::Rc;

use glide_animation::{AnimationHandle, AnimationScheduler, AnimationSpec, FlingCalculator};
use glide_foundation::{
    PanelList, PointerEvent, PointerEventKind, PointerId, TrackerLease,
    VelocityTrackerPool,
};

use crate::config::{ConfigError, PanelConfig};
use crate::state::{PanelState, PanelTranslation, TranslateListener};

/// One pointer-down to pointer-up sequence.
struct GestureSession {
    pointer: PointerId,
    initial_y: f32,
    last_y: f32,
    /// Returned to the pool when the session drops.
    tracker: TrackerLease,
}

impl GestureSession {
    fn track(&mut self, event: &PointerEvent) {
        self.tracker.add_position(event.uptime_ms, event.y);
    }
}

/// Gesture controller of a sliding list panel.
pub struct SlidingPanelController {
    config: PanelConfig,
    translation: PanelTranslation,
    list: Option<Rc<dyn PanelList>>,
    scheduler: Rc<dyn AnimationScheduler>,
    fling: FlingCalculator,
    trackers: VelocityTrackerPool,
    session: Option<GestureSession>,
    settle: Option<AnimationHandle>,
}

impl SlidingPanelController {
    /// Create a collapsed panel. Fails if `config` does not validate.
    pub fn new(
        config: PanelConfig,
        scheduler: Rc<dyn AnimationScheduler>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            translation: PanelTranslation::new(config.offset_max),
            fling: FlingCalculator::new(config.fling),
            config,
            list: None,
            scheduler,
            trackers: VelocityTrackerPool::default(),
            session: None,
            settle: None,
        })
    }

    /// Lease velocity trackers from `pool` instead of a private one.
    pub fn with_tracker_pool(mut self, pool: VelocityTrackerPool) -> Self {
        self.trackers = pool;
        self
    }

    pub fn set_list(&mut self, list: Option<Rc<dyn PanelList>>) {
        self.list = list;
    }

    pub fn list(&self) -> Option<&Rc<dyn PanelList>> {
        self.list.as_ref()
    }

    pub fn set_translate_listener(&mut self, listener: Option<Rc<dyn TranslateListener>>) {
        self.translation.set_listener(listener);
    }

    pub fn translate_listener(&self) -> Option<Rc<dyn TranslateListener>> {
        self.translation.listener()
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn translation(&self) -> f32 {
        self.translation.value()
    }

    pub fn offset_max(&self) -> f32 {
        self.config.offset_max
    }

    pub fn state(&self) -> PanelState {
        self.translation.state()
    }

    /// Whether a pointer is currently down on the panel.
    pub fn has_active_gesture(&self) -> bool {
        self.session.is_some()
    }

    /// Whether a settle animation still owns the translation.
    pub fn is_settling(&self) -> bool {
        self.settle.as_ref().is_some_and(AnimationHandle::is_active)
    }

    /// Animate to the expanded position at the default settle velocity.
    pub fn expand(&mut self) {
        self.settle_at(0.0, self.config.default_velocity());
    }

    /// Animate to the collapsed position at the default settle velocity.
    pub fn collapse(&mut self) {
        self.settle_at(self.config.offset_max, self.config.default_velocity());
    }

    /// Jump to `translation` (clamped) without animating.
    pub fn snap_to(&mut self, translation: f32) {
        self.cancel_settle();
        self.translation.set(translation);
    }

    /// Decide whether to steal the gesture from the list.
    pub fn on_intercept_touch_event(&mut self, event: &PointerEvent) -> bool {
        match event.kind {
            PointerEventKind::Down => {
                self.begin_session(event);
                false
            }
            PointerEventKind::Move => self.should_intercept_move(event),
            PointerEventKind::Up | PointerEventKind::Cancel => {
                // The list kept the gesture to itself.
                if self.owns(event) {
                    self.end_session_unclaimed();
                }
                false
            }
        }
    }

    /// Handle a gesture the panel has intercepted. Returns whether the event
    /// was consumed.
    pub fn on_touch_event(&mut self, event: &PointerEvent) -> bool {
        match event.kind {
            PointerEventKind::Down => {
                // A down on the container itself lands outside the list. Let
                // it fall through to whatever is drawn underneath.
                if self.owns(event) {
                    self.end_session_unclaimed();
                }
                false
            }
            PointerEventKind::Move => {
                let Some(session) = self.active_session(event) else {
                    return false;
                };
                session.track(event);
                self.handle_move(event.y);
                event.consume();
                true
            }
            PointerEventKind::Up => {
                if self.active_session(event).is_none() {
                    return false;
                }
                if let Some(mut session) = self.session.take() {
                    session.track(event);
                    let velocity = session.tracker.velocity(self.config.max_fling_velocity);
                    self.handle_release(velocity);
                }
                event.consume();
                true
            }
            PointerEventKind::Cancel => {
                if self.active_session(event).is_none() {
                    return false;
                }
                self.session = None;
                event.consume();
                true
            }
        }
    }

    fn owns(&self, event: &PointerEvent) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.pointer == event.id)
    }

    /// The session `event` belongs to. Events from other pointers, or with no
    /// gesture in progress, are absorbed.
    fn active_session(&mut self, event: &PointerEvent) -> Option<&mut GestureSession> {
        match self.session.as_mut() {
            Some(session) if session.pointer == event.id => Some(session),
            Some(_) => {
                log::trace!("ignoring {:?} from secondary pointer {}", event.kind, event.id);
                None
            }
            None => {
                log::warn!("ignoring {:?} without a preceding down", event.kind);
                None
            }
        }
    }

    fn begin_session(&mut self, event: &PointerEvent) {
        if let Some(session) = &self.session {
            if session.pointer != event.id {
                log::trace!("ignoring down from secondary pointer {}", event.id);
                return;
            }
        }

        // Direct manipulation takes over from any settle still running.
        self.cancel_settle();

        let mut session = GestureSession {
            pointer: event.id,
            initial_y: event.y,
            last_y: event.y,
            tracker: self.trackers.obtain(),
        };
        session.track(event);
        self.session = Some(session);
    }

    /// Drop a session the panel never claimed. Its down cancelled any settle,
    /// so a panel left between endpoints settles to the nearer one.
    fn end_session_unclaimed(&mut self) {
        self.session = None;
        if self.state() == PanelState::Partial && !self.is_settling() {
            let target = self.nearest_endpoint();
            log::debug!("gesture ended unclaimed mid-travel, settling to {target}");
            self.settle_at(target, self.config.min_velocity());
        }
    }

    fn nearest_endpoint(&self) -> f32 {
        let offset_max = self.config.offset_max;
        if self.translation.value() > offset_max / 2.0 {
            offset_max
        } else {
            0.0
        }
    }

    fn should_intercept_move(&mut self, event: &PointerEvent) -> bool {
        let Some(session) = self.active_session(event) else {
            return false;
        };
        session.track(event);
        let dy = event.y - session.initial_y;

        if dy.abs() < self.config.touch_slop {
            // A list that flung into place can be left with a nonzero scroll
            // offset at rest. It then claims the next move as overscroll before
            // the slop is crossed, and the panel never gets a chance to steal
            // the gesture. Zeroing the offset here keeps the decision ours.
            if let Some(list) = &self.list {
                if list.scroll_offset() != 0.0 {
                    list.reset_scroll_offset();
                }
            }
            return false;
        }

        let state = self.state();
        let intercept = if dy < 0.0 {
            state != PanelState::Up
        } else if dy > 0.0 {
            state != PanelState::Down
        } else {
            false
        };
        log::trace!("move dy={dy} state={state:?} intercept={intercept}");
        intercept
    }

    fn handle_move(&mut self, y: f32) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let dy = y - session.last_y;
        session.last_y = y;

        let state = self.state();
        let can_translate = if dy < 0.0 {
            state != PanelState::Up
        } else if dy > 0.0 {
            state != PanelState::Down
        } else {
            return;
        };

        if can_translate {
            self.translation.offset_by(dy);
        } else if let Some(list) = &self.list {
            list.scroll_by(dy);
        }
    }

    fn handle_release(&mut self, velocity: f32) {
        let min_velocity = self.config.min_velocity();
        let offset_max = self.config.offset_max;
        let current = self.translation.value();

        let target = if velocity.abs() > min_velocity {
            Some(if velocity > 0.0 { offset_max } else { 0.0 })
        } else if self.state() == PanelState::Partial {
            Some(self.nearest_endpoint())
        } else {
            None
        };
        log::debug!("release velocity={velocity} translation={current} target={target:?}");

        if let Some(target) = target {
            self.settle_at(target, velocity.abs().max(min_velocity));
        }

        if velocity != 0.0 {
            self.fling_list(velocity);
        }
    }

    /// Animate the translation to `target` at `speed` px/sec.
    fn settle_at(&mut self, target: f32, speed: f32) {
        self.cancel_settle();

        let from = self.translation.value();
        let distance = target - from;
        if distance == 0.0 || speed <= 0.0 || !speed.is_finite() {
            return;
        }

        let duration_millis = (distance.abs() / speed * 1000.0).round() as u64;
        let spec = AnimationSpec::tween(duration_millis, self.config.settle_easing);
        log::debug!("settling {from} -> {target} over {duration_millis}ms");

        let weak = self.translation.downgrade();
        let handle = self.scheduler.animate(
            from,
            target,
            spec,
            Box::new(move |value: f32| {
                if let Some(translation) = weak.upgrade() {
                    translation.set(value);
                }
            }),
        );
        self.settle = Some(handle);
    }

    fn cancel_settle(&mut self) {
        if let Some(handle) = self.settle.take() {
            handle.cancel();
        }
    }

    fn fling_list(&self, velocity: f32) {
        let Some(list) = &self.list else {
            return;
        };
        let Some(info) = self.fling.fling_info(velocity) else {
            return;
        };
        // A downward release flings content back toward the top of the list.
        let distance = if velocity > 0.0 {
            -info.distance
        } else {
            info.distance
        };
        log::debug!(
            "flinging list velocity={velocity} distance={distance} duration={}ms",
            info.duration_millis
        );
        list.fling_by(distance, info.duration_millis);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
