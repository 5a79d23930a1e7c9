//! Common traits defining interfaces for motion profiles and trajectories

use crate::common::types::State;

/// A time-parameterized 1-D motion: jerk, acceleration, velocity and position
///
/// Evaluators never fail. Outside the published range they hold the boundary
/// state (position keeps moving at the boundary velocity).
pub trait MotionProfile {
    /// Jerk at time `t` [s]
    fn j(&self, t: f64) -> f64;
    /// Acceleration at time `t` [s]
    fn a(&self, t: f64) -> f64;
    /// Velocity at time `t` [s]
    fn v(&self, t: f64) -> f64;
    /// Position at time `t` [s]
    fn x(&self, t: f64) -> f64;
    /// Start time [s]
    fn t_start(&self) -> f64;
    /// End time [s]
    fn t_end(&self) -> f64;
    /// Ordered phase boundaries, first is `t_start`, last is `t_end`
    fn time_stamps(&self) -> Vec<f64>;

    /// Total duration [s]
    fn duration(&self) -> f64 {
        self.t_end() - self.t_start()
    }
}

/// A trajectory producing full 2-D states over time
pub trait StateTrajectory {
    /// State at `t + dt` given the state at `t`
    fn next_state(&self, state: &State, t: f64, dt: f64) -> State;
    /// Time interval `[start, end]` the trajectory is meant to be sampled on
    fn time_range(&self) -> (f64, f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ConstantVelocity(f64);

    impl MotionProfile for ConstantVelocity {
        fn j(&self, _t: f64) -> f64 {
            0.0
        }
        fn a(&self, _t: f64) -> f64 {
            0.0
        }
        fn v(&self, _t: f64) -> f64 {
            self.0
        }
        fn x(&self, t: f64) -> f64 {
            self.0 * t
        }
        fn t_start(&self) -> f64 {
            0.0
        }
        fn t_end(&self) -> f64 {
            2.0
        }
        fn time_stamps(&self) -> Vec<f64> {
            vec![0.0, 2.0]
        }
    }

    #[test]
    fn test_motion_profile_duration() {
        let p = ConstantVelocity(1.5);
        assert_eq!(p.duration(), 2.0);
        assert_eq!(p.x(p.t_end()), 3.0);
    }
}
