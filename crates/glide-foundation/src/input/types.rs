use std::cell::Cell;
use std::rc::Rc;

pub type PointerId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Cancel,
}

/// Vertical pointer event with consumption tracking.
///
/// Only the y coordinate is carried; the sliding panel never reacts to
/// horizontal motion. `uptime_ms` is the host's monotonic event time and feeds
/// velocity tracking.
#[derive(Clone, Debug)]
pub struct PointerEvent {
    pub id: PointerId,
    pub kind: PointerEventKind,
    pub y: f32,
    pub uptime_ms: i64,
    /// Shared via Rc<Cell> so consumption can be tracked across copies.
    consumed: Rc<Cell<bool>>,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, y: f32, uptime_ms: i64) -> Self {
        Self {
            id: 0,
            kind,
            y,
            uptime_ms,
            consumed: Rc::new(Cell::new(false)),
        }
    }

    pub fn down(y: f32, uptime_ms: i64) -> Self {
        Self::new(PointerEventKind::Down, y, uptime_ms)
    }

    pub fn moved(y: f32, uptime_ms: i64) -> Self {
        Self::new(PointerEventKind::Move, y, uptime_ms)
    }

    pub fn up(y: f32, uptime_ms: i64) -> Self {
        Self::new(PointerEventKind::Up, y, uptime_ms)
    }

    pub fn cancel(y: f32, uptime_ms: i64) -> Self {
        Self::new(PointerEventKind::Cancel, y, uptime_ms)
    }

    /// Set the pointer this event belongs to.
    pub fn with_id(mut self, id: PointerId) -> Self {
        self.id = id;
        self
    }

    /// Mark this event as consumed, preventing other handlers from processing it.
    pub fn consume(&self) {
        self.consumed.set(true);
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed.get()
    }
}
