//! Common types, traits, and error definitions for rust_slalom
//!
//! This module provides the foundational building blocks shared by the
//! motion profiles, the slalom planner and the trajectory tracker.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::{MotionError, MotionResult};
