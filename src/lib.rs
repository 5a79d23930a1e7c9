//! rust_slalom - jerk-limited motion profiles and slalom trajectories
//!
//! This crate provides closed-form jerk-limited velocity profiles, a slalom
//! (curve between two straights) trajectory generator for wheeled robots and a
//! feedback trajectory tracker.

// Core modules
pub mod common;
pub mod utils;

// Algorithm modules
pub mod motion_profile;
pub mod slalom;
pub mod straight;
pub mod path_tracking;

// Re-export common types for convenience
pub use common::{Pose, State, Polar};
pub use common::{MotionProfile, StateTrajectory};
pub use common::{MotionError, MotionResult};
pub use motion_profile::{AccelCurve, AccelDesigner, ProfileShape};
