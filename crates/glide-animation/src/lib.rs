//! Animation support for Glide
//!
//! Provides the spline fling model used to hand a release velocity over to a
//! list, and the tween scheduling used to settle a panel at an endpoint.

pub mod animation;
pub mod decay_spec;

pub use animation::*;
pub use decay_spec::*;
