//! Sliding list panel for Glide
//!
//! A container that translates the list it hosts between a collapsed
//! (`offset_max`) and an expanded (`0`) vertical position. Touch gestures move
//! the panel while it has room to travel and scroll the list once it does not,
//! so a single drag can expand the panel and keep scrolling the list.
//! On release the panel settles at an endpoint and hands the remaining
//! velocity to the list as a fling.

pub mod config;
pub mod controller;
pub mod state;

pub use config::{ConfigError, PanelConfig};
pub use controller::SlidingPanelController;
pub use state::{PanelState, PanelTranslation, TranslateListener};

pub use glide_animation::{AnimationScheduler, Easing, FlingParameters, FrameAnimator};
pub use glide_foundation::{PanelList, PointerEvent, PointerEventKind, VelocityTrackerPool};

pub mod prelude {
    pub use crate::config::*;
    pub use crate::controller::*;
    pub use crate::state::*;
    pub use glide_animation::{AnimationHandle, AnimationScheduler, AnimationSpec, Easing};
    pub use glide_foundation::prelude::*;
}
