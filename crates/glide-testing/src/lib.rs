//! Testing utilities and harness for Glide panels

pub mod robot;
pub mod robot_assertions;
pub mod testing;

// Re-export testing utilities
pub use robot::*;
pub use testing::*;

pub mod prelude {
    pub use crate::robot::*;
    pub use crate::robot_assertions;
    pub use crate::testing::*;
}
