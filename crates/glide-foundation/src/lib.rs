//! Foundation elements for Glide: pointer input, velocity tracking and the
//! scrollable-list contract the panel controller drives.

pub mod gesture_constants;
pub mod input;
pub mod scrollable;
pub mod velocity_tracker;

pub use gesture_constants::*;
pub use input::{PointerEvent, PointerEventKind, PointerId};
pub use scrollable::PanelList;
pub use velocity_tracker::{TrackerLease, VelocityTracker, VelocityTracker1D, VelocityTrackerPool};

pub mod prelude {
    pub use crate::gesture_constants::*;
    pub use crate::input::prelude::*;
    pub use crate::scrollable::*;
    pub use crate::velocity_tracker::*;
}
