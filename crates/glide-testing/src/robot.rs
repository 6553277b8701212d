//! Robot testing framework for panel gestures
//!
//! [`PanelRobot`] plays the part of the host container: it owns a panel, a
//! recording list and a frame-driven animator, routes pointer events through
//! the panel's intercept/touch entry points the way a view hierarchy would,
//! and keeps a virtual clock so velocity tracking and settle animations see
//! realistic timestamps.
//!
//! # Example
//!
//! ```
//! use glide_panel::{PanelConfig, PanelState};
//! use glide_testing::PanelRobot;
//!
//! let mut robot = PanelRobot::new(PanelConfig::new(600.0)).unwrap();
//!
//! // Quick upward swipe from the collapsed position.
//! robot.swipe(1000.0, 400.0, 10);
//! robot.wait_for_idle();
//!
//! assert_eq!(robot.panel().state(), PanelState::Up);
//! ```

use std::rc::Rc;

use glide_animation::FrameAnimator;
use glide_foundation::{PointerEvent, PointerEventKind, PointerId};
use glide_panel::{ConfigError, PanelConfig, SlidingPanelController};

use crate::testing::{RecordingList, RecordingListener};

/// Milliseconds between two frames and between two drag samples.
pub const FRAME_INTERVAL_MS: i64 = 16;

/// Frames [`PanelRobot::wait_for_idle`] pumps before giving up.
const MAX_IDLE_FRAMES: usize = 10_000;

/// The pointer currently held down by the robot.
#[derive(Clone, Copy, Debug)]
struct Press {
    id: PointerId,
    y: f32,
    /// The panel has stolen the gesture from the list.
    intercepted: bool,
}

/// Drives a [`SlidingPanelController`] with scripted touches.
pub struct PanelRobot {
    panel: SlidingPanelController,
    animator: FrameAnimator,
    list: Rc<RecordingList>,
    listener: Rc<RecordingListener>,
    now_ms: i64,
    press: Option<Press>,
    next_pointer: PointerId,
}

impl PanelRobot {
    /// Create a robot around a fresh, collapsed panel.
    pub fn new(config: PanelConfig) -> Result<Self, ConfigError> {
        let animator = FrameAnimator::new();
        let list = Rc::new(RecordingList::new());
        let listener = Rc::new(RecordingListener::new());

        let mut panel = SlidingPanelController::new(config, Rc::new(animator.clone()))?;
        panel.set_list(Some(list.clone()));
        panel.set_translate_listener(Some(listener.clone()));

        Ok(Self {
            panel,
            animator,
            list,
            listener,
            now_ms: 0,
            press: None,
            next_pointer: 0,
        })
    }

    pub fn panel(&self) -> &SlidingPanelController {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut SlidingPanelController {
        &mut self.panel
    }

    pub fn list(&self) -> &RecordingList {
        &self.list
    }

    pub fn listener(&self) -> &RecordingListener {
        &self.listener
    }

    pub fn animator(&self) -> &FrameAnimator {
        &self.animator
    }

    /// Virtual time in milliseconds.
    pub fn now_ms(&self) -> i64 {
        self.now_ms
    }

    /// Whether the panel currently owns the held pointer.
    pub fn is_intercepting(&self) -> bool {
        self.press.is_some_and(|press| press.intercepted)
    }

    /// Route `event` as a container would. Returns whether the panel handled it.
    ///
    /// Before the panel intercepts, events go to the intercept entry point and
    /// then to the list. Once it intercepts, the list receives a cancel and the
    /// rest of the gesture goes to the touch entry point.
    pub fn dispatch(&mut self, event: PointerEvent) -> bool {
        let ends_gesture = matches!(event.kind, PointerEventKind::Up | PointerEventKind::Cancel);

        let handled = if self.is_intercepting() {
            self.panel.on_touch_event(&event)
        } else if self.panel.on_intercept_touch_event(&event) {
            log::trace!("panel intercepted at y={}", event.y);
            if let Some(press) = self.press.as_mut() {
                press.intercepted = true;
            }
            self.list.record_event(PointerEventKind::Cancel);
            true
        } else {
            self.list.record_event(event.kind);
            false
        };

        if ends_gesture {
            self.press = None;
        }
        handled
    }

    /// Put a new pointer down at `y`.
    pub fn press(&mut self, y: f32) -> bool {
        let id = self.next_pointer;
        self.next_pointer += 1;
        self.press = Some(Press {
            id,
            y,
            intercepted: false,
        });
        let event = PointerEvent::down(y, self.now_ms).with_id(id);
        self.dispatch(event)
    }

    /// Move the held pointer to `y`, one frame after the previous event.
    ///
    /// Does nothing without a held pointer.
    pub fn move_to(&mut self, y: f32) -> bool {
        let Some(press) = self.press.as_mut() else {
            return false;
        };
        press.y = y;
        let id = press.id;
        self.advance_time(FRAME_INTERVAL_MS);
        self.dispatch(PointerEvent::moved(y, self.now_ms).with_id(id))
    }

    /// Move the held pointer to `y` in `steps` evenly spaced frames.
    pub fn drag_to(&mut self, y: f32, steps: usize) {
        let Some(start) = self.press.map(|press| press.y) else {
            return;
        };
        let steps = steps.max(1);
        for step in 1..=steps {
            let t = step as f32 / steps as f32;
            self.move_to(start + (y - start) * t);
        }
    }

    /// Lift the held pointer where it is, without advancing time.
    pub fn release(&mut self) -> bool {
        let Some(press) = self.press else {
            return false;
        };
        self.dispatch(PointerEvent::up(press.y, self.now_ms).with_id(press.id))
    }

    /// Cancel the held pointer, as when a parent steals the gesture.
    pub fn cancel(&mut self) -> bool {
        let Some(press) = self.press else {
            return false;
        };
        self.dispatch(PointerEvent::cancel(press.y, self.now_ms).with_id(press.id))
    }

    /// Press at `from`, drag to `to` over `steps` frames and release.
    pub fn swipe(&mut self, from: f32, to: f32, steps: usize) {
        self.press(from);
        self.drag_to(to, steps);
        self.release();
    }

    /// Let `millis` pass, pumping a frame every [`FRAME_INTERVAL_MS`].
    pub fn advance_time(&mut self, millis: i64) {
        let target = self.now_ms + millis.max(0);
        while self.now_ms < target {
            self.now_ms = (self.now_ms + FRAME_INTERVAL_MS).min(target);
            self.pump_frame();
        }
    }

    /// Pump frames until no animation is running.
    ///
    /// Panics if animations are still running after a generous number of frames.
    pub fn wait_for_idle(&mut self) {
        for _ in 0..MAX_IDLE_FRAMES {
            self.pump_frame();
            if self.animator.is_idle() {
                return;
            }
            self.now_ms += FRAME_INTERVAL_MS;
        }
        panic!(
            "animations still running after {MAX_IDLE_FRAMES} frames: {}",
            self.animator.running_count()
        );
    }

    fn pump_frame(&mut self) {
        let nanos = u64::try_from(self.now_ms).unwrap_or(0) * 1_000_000;
        self.animator.on_frame(nanos);
    }
}
