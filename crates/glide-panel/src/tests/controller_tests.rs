use super::*;

use glide_animation::{AnimationSpec, Easing, FrameAnimator, UpdateCallback};
use glide_foundation::VelocityTracker;
use std::cell::{Cell, RefCell};

const MS: u64 = 1_000_000;

#[derive(Default)]
struct MockList {
    scrolled: RefCell<Vec<f32>>,
    flings: RefCell<Vec<(f32, u64)>>,
    offset: Cell<f32>,
    resets: Cell<usize>,
}

impl PanelList for MockList {
    fn scroll_by(&self, delta: f32) {
        self.scrolled.borrow_mut().push(delta);
    }

    fn fling_by(&self, distance: f32, duration_millis: u64) {
        self.flings.borrow_mut().push((distance, duration_millis));
    }

    fn scroll_offset(&self) -> f32 {
        self.offset.get()
    }

    fn reset_scroll_offset(&self) {
        self.resets.set(self.resets.get() + 1);
        self.offset.set(0.0);
    }
}

#[derive(Default)]
struct MockScheduler {
    animator: FrameAnimator,
    requests: RefCell<Vec<(f32, f32, AnimationSpec)>>,
}

impl AnimationScheduler for MockScheduler {
    fn animate(
        &self,
        from: f32,
        to: f32,
        spec: AnimationSpec,
        on_update: UpdateCallback,
    ) -> AnimationHandle {
        self.requests.borrow_mut().push((from, to, spec));
        self.animator.animate(from, to, spec, on_update)
    }
}

/// Reports whatever velocity the test dials in.
struct FixedVelocity(Rc<Cell<f32>>);

impl VelocityTracker for FixedVelocity {
    fn add_position(&mut self, _time_ms: i64, _position: f32) {}

    fn velocity(&self, _max_velocity: f32) -> f32 {
        self.0.get()
    }

    fn reset(&mut self) {}
}

struct Harness {
    panel: SlidingPanelController,
    list: Rc<MockList>,
    scheduler: Rc<MockScheduler>,
    velocity: Rc<Cell<f32>>,
    pool: VelocityTrackerPool,
}

impl Harness {
    fn new(config: PanelConfig) -> Self {
        let list = Rc::new(MockList::default());
        let scheduler = Rc::new(MockScheduler::default());
        let velocity = Rc::new(Cell::new(0.0));
        let dial = Rc::clone(&velocity);
        let pool = VelocityTrackerPool::with_factory(move || {
            Box::new(FixedVelocity(Rc::clone(&dial))) as Box<dyn VelocityTracker>
        });
        let mut panel = SlidingPanelController::new(config, scheduler.clone())
            .expect("valid config")
            .with_tracker_pool(pool.clone());
        panel.set_list(Some(list.clone()));
        Self {
            panel,
            list,
            scheduler,
            velocity,
            pool,
        }
    }

    /// offset_max = 300, touch slop = 8, min velocity = 75 px/s.
    fn standard() -> Self {
        Self::new(
            PanelConfig::new(300.0)
                .with_touch_slop(8.0)
                .with_settle_duration_ms(2000.0),
        )
    }

    fn down(&mut self, y: f32) -> bool {
        self.panel.on_intercept_touch_event(&PointerEvent::down(y, 0))
    }

    fn intercept_move(&mut self, y: f32) -> bool {
        self.panel.on_intercept_touch_event(&PointerEvent::moved(y, 0))
    }

    fn drag(&mut self, y: f32) -> bool {
        self.panel.on_touch_event(&PointerEvent::moved(y, 0))
    }

    fn release(&mut self, y: f32, velocity: f32) -> bool {
        self.velocity.set(velocity);
        self.panel.on_touch_event(&PointerEvent::up(y, 0))
    }

    fn last_request(&self) -> Option<(f32, f32, AnimationSpec)> {
        self.scheduler.requests.borrow().last().copied()
    }

    fn finish_animations(&self) {
        self.scheduler.animator.on_frame(0);
        self.scheduler.animator.on_frame(60_000 * MS);
    }
}

#[test]
fn drag_inside_slop_is_not_intercepted() {
    let mut h = Harness::standard();
    assert_eq!(h.panel.state(), PanelState::Down);

    assert!(!h.down(100.0));
    assert!(!h.intercept_move(105.0));
    assert!(h.intercept_move(80.0), "upward drag past slop expands a collapsed panel");
}

#[test]
fn collapsed_panel_lets_downward_drags_through() {
    let mut h = Harness::standard();
    h.down(100.0);
    assert!(!h.intercept_move(140.0));
}

#[test]
fn expanded_panel_lets_upward_drags_through() {
    let mut h = Harness::standard();
    h.panel.snap_to(0.0);
    assert_eq!(h.panel.state(), PanelState::Up);

    h.down(100.0);
    assert!(!h.intercept_move(60.0));
    assert!(h.intercept_move(140.0));
}

#[test]
fn partial_panel_intercepts_both_directions() {
    let mut h = Harness::standard();
    h.panel.snap_to(150.0);

    h.down(100.0);
    assert!(h.intercept_move(80.0));
    h.down(100.0);
    assert!(h.intercept_move(120.0));
}

#[test]
fn stale_list_offset_is_reset_inside_slop() {
    let mut h = Harness::standard();
    h.list.offset.set(-12.0);

    h.down(100.0);
    assert!(!h.intercept_move(103.0));
    assert_eq!(h.list.offset.get(), 0.0);
    assert_eq!(h.list.resets.get(), 1);

    // Nothing to reset the second time round.
    assert!(!h.intercept_move(104.0));
    assert_eq!(h.list.resets.get(), 1);
}

#[test]
fn drag_translates_then_scrolls_once_out_of_travel() {
    let mut h = Harness::standard();
    h.down(500.0);
    assert!(h.intercept_move(480.0));

    // First stolen move is measured from the press position.
    assert!(h.drag(400.0));
    assert_eq!(h.panel.translation(), 200.0);
    assert_eq!(h.panel.state(), PanelState::Partial);

    h.drag(150.0);
    assert_eq!(h.panel.translation(), 0.0);
    assert_eq!(h.panel.state(), PanelState::Up);
    assert!(h.list.scrolled.borrow().is_empty());

    h.drag(100.0);
    assert_eq!(h.panel.translation(), 0.0);
    assert_eq!(h.list.scrolled.borrow().as_slice(), &[-50.0]);

    // Reversing direction collapses the panel again instead of scrolling.
    h.drag(130.0);
    assert_eq!(h.panel.translation(), 30.0);
    assert_eq!(h.list.scrolled.borrow().len(), 1);
}

#[test]
fn translation_stays_in_range_for_any_drag() {
    let mut h = Harness::standard();
    h.down(1000.0);
    h.intercept_move(900.0);

    let mut y = 1000.0;
    for step in 0..200 {
        y += if step % 7 < 4 { -37.5 } else { 53.0 };
        h.drag(y);
        let translation = h.panel.translation();
        assert!(
            (0.0..=300.0).contains(&translation),
            "translation {translation} escaped at step {step}"
        );
        assert_eq!(
            h.panel.state(),
            PanelState::from_translation(translation, 300.0)
        );
    }
}

#[test]
fn fast_upward_release_expands() {
    let mut h = Harness::standard();
    h.down(100.0);
    assert!(h.release(100.0, -600.0));

    let (from, to, spec) = h.last_request().expect("settle scheduled");
    assert_eq!((from, to), (300.0, 0.0));
    assert_eq!(spec.duration_millis, 500);
    assert_eq!(spec.easing, Easing::EaseInOut);
    assert!(h.panel.is_settling());

    h.finish_animations();
    assert_eq!(h.panel.translation(), 0.0);
    assert_eq!(h.panel.state(), PanelState::Up);
    assert!(!h.panel.is_settling());
}

#[test]
fn slow_release_settles_at_min_velocity() {
    let mut h = Harness::standard();
    h.panel.snap_to(200.0);
    h.down(100.0);
    h.release(100.0, 10.0);

    // 200 > 150, so the panel collapses; 100px at 75 px/s.
    let (from, to, spec) = h.last_request().expect("settle scheduled");
    assert_eq!((from, to), (200.0, 300.0));
    assert_eq!(spec.duration_millis, 1333);
}

#[test]
fn partial_release_without_velocity_snaps_to_nearest_end() {
    let mut h = Harness::standard();
    h.panel.snap_to(100.0);
    assert_eq!(h.panel.state(), PanelState::Partial);

    h.down(100.0);
    h.release(100.0, 0.0);

    let (_, to, _) = h.last_request().expect("settle scheduled");
    assert_eq!(to, 0.0);
    assert!(h.list.flings.borrow().is_empty(), "no fling without velocity");
}

#[test]
fn release_at_rest_on_endpoint_does_nothing() {
    let mut h = Harness::standard();
    h.down(100.0);
    h.release(100.0, 0.0);

    assert!(h.last_request().is_none());
    assert!(h.list.flings.borrow().is_empty());
    assert_eq!(h.panel.translation(), 300.0);
}

#[test]
fn release_velocity_is_handed_to_the_list() {
    let mut h = Harness::standard();
    let calc = FlingCalculator::new(h.panel.config().fling);

    h.panel.snap_to(0.0);
    h.down(100.0);
    h.release(100.0, -600.0);
    let (distance, duration) = h.list.flings.borrow()[0];
    assert_eq!(distance, calc.fling_distance(-600.0));
    assert_eq!(duration, calc.fling_duration(-600.0) as u64);
    assert!(distance > 0.0, "upward release scrolls further down the list");

    h.down(100.0);
    h.release(100.0, 600.0);
    let (distance, _) = h.list.flings.borrow()[1];
    assert_eq!(distance, -calc.fling_distance(600.0));
}

#[test]
fn settle_and_fling_run_together() {
    let mut h = Harness::standard();
    h.panel.snap_to(150.0);
    h.down(100.0);
    h.release(100.0, -900.0);

    assert!(h.panel.is_settling());
    assert_eq!(h.list.flings.borrow().len(), 1);
}

#[test]
fn cancel_releases_tracker_without_settling() {
    let mut h = Harness::standard();
    h.down(500.0);
    h.intercept_move(450.0);
    h.drag(420.0);
    assert_eq!(h.pool.leased(), 1);

    h.velocity.set(-5000.0);
    assert!(h.panel.on_touch_event(&PointerEvent::cancel(420.0, 0)));

    assert_eq!(h.pool.leased(), 0);
    assert!(!h.panel.has_active_gesture());
    assert!(h.last_request().is_none());
    assert!(h.list.flings.borrow().is_empty());
    assert_eq!(h.panel.translation(), 220.0);
}

#[test]
fn every_session_returns_its_tracker() {
    let mut h = Harness::standard();

    h.down(100.0);
    h.release(100.0, -600.0);
    assert_eq!(h.pool.leased(), 0);

    // List handled the whole gesture.
    h.down(100.0);
    h.panel
        .on_intercept_touch_event(&PointerEvent::up(100.0, 0));
    assert_eq!(h.pool.leased(), 0);

    // Down landed on the container itself.
    h.down(100.0);
    assert!(!h.panel.on_touch_event(&PointerEvent::down(100.0, 0)));
    assert_eq!(h.pool.leased(), 0);
    assert!(!h.panel.has_active_gesture());
}

#[test]
fn new_gesture_cancels_running_settle() {
    let mut h = Harness::standard();
    h.down(100.0);
    h.release(100.0, -600.0);
    h.scheduler.animator.on_frame(0);
    h.scheduler.animator.on_frame(250 * MS);
    let mid_flight = h.panel.translation();
    assert!(mid_flight > 0.0 && mid_flight < 300.0);

    h.down(400.0);
    assert!(!h.panel.is_settling());
    h.scheduler.animator.on_frame(400 * MS);
    h.scheduler.animator.on_frame(10_000 * MS);
    assert_eq!(h.panel.translation(), mid_flight);
}

#[test]
fn out_of_sequence_events_are_absorbed() {
    let mut h = Harness::standard();

    assert!(!h.release(100.0, -600.0));
    assert!(!h.drag(50.0));
    assert!(!h.intercept_move(10.0));
    assert!(!h.panel.on_touch_event(&PointerEvent::cancel(0.0, 0)));

    assert_eq!(h.panel.translation(), 300.0);
    assert!(h.last_request().is_none());
    assert!(h.list.flings.borrow().is_empty());
}

#[test]
fn secondary_pointers_are_ignored() {
    let mut h = Harness::standard();
    h.down(500.0);
    assert!(h.intercept_move(450.0));

    let second = |event: PointerEvent| event.with_id(7);
    assert!(!h.panel.on_intercept_touch_event(&second(PointerEvent::down(10.0, 0))));
    assert!(!h.panel.on_touch_event(&second(PointerEvent::moved(300.0, 0))));
    assert!(!h.panel.on_touch_event(&second(PointerEvent::up(300.0, 0))));
    assert_eq!(h.panel.translation(), 300.0);
    assert!(h.panel.has_active_gesture());

    h.drag(400.0);
    assert_eq!(h.panel.translation(), 200.0);
}

#[test]
fn consumed_events_are_marked() {
    let mut h = Harness::standard();
    h.down(500.0);
    h.intercept_move(450.0);
    let event = PointerEvent::moved(400.0, 0);
    assert!(h.panel.on_touch_event(&event));
    assert!(event.is_consumed());
}

#[test]
fn round_trip_leaves_no_drift() {
    // Real impulse tracker: the pauses before each release bring velocity to zero.
    let list = Rc::new(MockList::default());
    let scheduler = Rc::new(MockScheduler::default());
    let mut panel =
        SlidingPanelController::new(PanelConfig::new(300.0), scheduler.clone()).expect("config");
    panel.set_list(Some(list.clone()));

    let mut t = 0;
    let mut event = |kind: PointerEventKind, y: f32, dt: i64| {
        t += dt;
        PointerEvent::new(kind, y, t)
    };

    panel.on_intercept_touch_event(&event(PointerEventKind::Down, 600.0, 0));
    assert!(panel.on_intercept_touch_event(&event(PointerEventKind::Move, 580.0, 16)));
    for y in [533.3, 466.6, 399.9, 333.2, 280.0, 250.0] {
        panel.on_touch_event(&event(PointerEventKind::Move, y, 16));
    }
    panel.on_touch_event(&event(PointerEventKind::Up, 250.0, 200));
    assert_eq!(panel.translation(), 0.0);

    panel.on_intercept_touch_event(&event(PointerEventKind::Down, 250.0, 500));
    assert!(panel.on_intercept_touch_event(&event(PointerEventKind::Move, 270.0, 16)));
    for y in [316.7, 383.4, 450.1, 516.8, 560.0, 600.0] {
        panel.on_touch_event(&event(PointerEventKind::Move, y, 16));
    }
    panel.on_touch_event(&event(PointerEventKind::Up, 600.0, 200));
    assert_eq!(panel.translation(), 300.0);

    assert!(scheduler.requests.borrow().is_empty());
    assert!(list.flings.borrow().is_empty());
}

#[test]
fn programmatic_expand_and_collapse() {
    let mut h = Harness::standard();

    h.panel.expand();
    let (from, to, spec) = h.last_request().expect("expand scheduled");
    assert_eq!((from, to), (300.0, 0.0));
    // Full travel at the default velocity takes the default settle duration.
    assert_eq!(spec.duration_millis, 2000);
    h.finish_animations();
    assert_eq!(h.panel.state(), PanelState::Up);

    h.panel.collapse();
    h.finish_animations();
    assert_eq!(h.panel.state(), PanelState::Down);

    h.panel.expand();
    h.panel.snap_to(120.0);
    assert!(!h.panel.is_settling());
    h.finish_animations();
    assert_eq!(h.panel.translation(), 120.0);
}

#[test]
fn listener_follows_drags_and_settles() {
    let mut h = Harness::standard();
    let seen: Rc<RefCell<Vec<(f32, f32, f32)>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    h.panel
        .set_translate_listener(Some(Rc::new(move |start: f32, end: f32, value: f32| {
            sink.borrow_mut().push((start, end, value));
        })));

    h.down(500.0);
    h.intercept_move(450.0);
    h.drag(400.0);
    h.release(400.0, 0.0);
    h.finish_animations();

    let seen = seen.borrow();
    assert_eq!(seen.first().copied(), Some((300.0, 0.0, 200.0)));
    assert_eq!(seen.last().copied(), Some((300.0, 0.0, 300.0)));
    assert!(seen.iter().all(|&(start, end, _)| start == 300.0 && end == 0.0));
}

#[test]
fn invalid_config_is_rejected() {
    let scheduler: Rc<dyn AnimationScheduler> = Rc::new(FrameAnimator::new());
    let result = SlidingPanelController::new(PanelConfig::new(-5.0), scheduler);
    assert!(matches!(result, Err(ConfigError::InvalidOffset(_))));
}

#[test]
fn panel_without_list_still_settles() {
    let scheduler = Rc::new(MockScheduler::default());
    let mut panel =
        SlidingPanelController::new(PanelConfig::new(300.0), scheduler.clone()).expect("config");
    panel.snap_to(200.0);

    panel.on_intercept_touch_event(&PointerEvent::down(300.0, 0));
    assert!(panel.on_intercept_touch_event(&PointerEvent::moved(250.0, 16)));
    panel.on_touch_event(&PointerEvent::moved(200.0, 32));
    assert_eq!(panel.translation(), 100.0);

    // Fast upward release: settles, and the fling has nowhere to go.
    assert!(panel.on_touch_event(&PointerEvent::up(200.0, 32)));
    let (from, to, _) = scheduler.requests.borrow().last().copied().expect("settle");
    assert_eq!((from, to), (100.0, 0.0));

    scheduler.animator.on_frame(0);
    scheduler.animator.on_frame(60_000 * MS);
    assert_eq!(panel.state(), PanelState::Up);
}

#[test]
fn unclaimed_tap_mid_travel_settles_to_nearest_end() {
    let mut h = Harness::standard();
    h.panel.snap_to(150.0);

    // The list keeps the whole gesture.
    h.down(100.0);
    assert!(!h.panel.on_intercept_touch_event(&PointerEvent::up(100.0, 0)));

    let (from, to, spec) = h.last_request().expect("settle scheduled");
    assert_eq!((from, to), (150.0, 0.0));
    assert_eq!(spec.duration_millis, 2000);
    h.finish_animations();
    assert_eq!(h.panel.state(), PanelState::Up);
}

#[test]
fn container_touch_down_mid_travel_settles_to_nearest_end() {
    let mut h = Harness::standard();
    h.panel.snap_to(200.0);

    h.down(100.0);
    assert!(!h.panel.on_touch_event(&PointerEvent::down(100.0, 0)));

    let (from, to, spec) = h.last_request().expect("settle scheduled");
    assert_eq!((from, to), (200.0, 300.0));
    assert_eq!(spec.duration_millis, 1333);
    h.finish_animations();
    assert_eq!(h.panel.state(), PanelState::Down);
}

#[test]
fn unclaimed_gesture_at_endpoint_schedules_nothing() {
    let mut h = Harness::standard();
    h.down(100.0);
    h.panel.on_intercept_touch_event(&PointerEvent::cancel(100.0, 0));
    assert!(h.last_request().is_none());
    assert_eq!(h.panel.state(), PanelState::Down);
}
