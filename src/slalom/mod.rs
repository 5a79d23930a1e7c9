//! Slalom: a turn between two straight legs with jerk-limited heading
//!
//! [`Shape`] describes the geometry of a turn and [`Trajectory`] replays it at
//! an arbitrary translational velocity.

pub mod shape;
pub mod trajectory;

pub use shape::*;
pub use trajectory::*;

use std::f64::consts::PI;

/// Angular limits of a turn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularLimits {
    /// Maximum angular jerk [rad/s/s/s]
    pub dddth_max: f64,
    /// Maximum angular acceleration [rad/s/s]
    pub ddth_max: f64,
    /// Maximum angular velocity [rad/s]
    pub dth_max: f64,
}

impl AngularLimits {
    pub fn new(dddth_max: f64, ddth_max: f64, dth_max: f64) -> Self {
        Self { dddth_max, ddth_max, dth_max }
    }

    /// Limits for a run `gain` times faster than the reference
    ///
    /// Time shrinks by `1 / gain`, so the path stays the same.
    pub fn scaled(&self, gain: f64) -> Self {
        Self {
            dddth_max: gain * gain * gain * self.dddth_max,
            ddth_max: gain * gain * self.ddth_max,
            dth_max: gain * self.dth_max,
        }
    }
}

impl Default for AngularLimits {
    fn default() -> Self {
        Self {
            dddth_max: 1200.0 * PI,
            ddth_max: 36.0 * PI,
            dth_max: 3.0 * PI,
        }
    }
}

/// Parameters of the shape simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeConfig {
    /// Integration step [s]
    pub ts: f64,
    /// Number of velocity refinement passes
    pub passes: usize,
    /// Velocity of the first pass [m/s]
    pub v_trial: f64,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            ts: 1.5e-3,
            passes: 3,
            v_trial: 0.6,
        }
    }
}
