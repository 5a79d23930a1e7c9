// Jerk-limited 1-D motion profiles

pub mod accel_curve;
pub mod accel_designer;

pub use accel_curve::*;
pub use accel_designer::*;
