//! Straight trajectory along the x axis

use crate::common::{MotionProfile, MotionResult, Pose, State, StateTrajectory};
use crate::motion_profile::AccelDesigner;

/// Jerk-limited straight run, expressed as a full 2-D [`State`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trajectory {
    ad: AccelDesigner,
}

impl Trajectory {
    pub fn new(ad: AccelDesigner) -> Self {
        Trajectory { ad }
    }

    /// Design a straight run; see [`AccelDesigner::new`]
    pub fn design(
        j_max: f64,
        a_max: f64,
        v_max: f64,
        v_start: f64,
        v_target: f64,
        distance: f64,
    ) -> MotionResult<Self> {
        AccelDesigner::new(j_max, a_max, v_max, v_start, v_target, distance).map(Self::new)
    }

    /// State at time `t`
    pub fn update(&self, t: f64) -> State {
        State::new(
            Pose::straight(self.ad.x(t)),
            Pose::straight(self.ad.v(t)),
            Pose::straight(self.ad.a(t)),
            Pose::straight(self.ad.j(t)),
        )
    }

    pub fn accel_designer(&self) -> &AccelDesigner {
        &self.ad
    }
}

impl From<AccelDesigner> for Trajectory {
    fn from(ad: AccelDesigner) -> Self {
        Self::new(ad)
    }
}

impl StateTrajectory for Trajectory {
    fn next_state(&self, _state: &State, t: f64, dt: f64) -> State {
        self.update(t + dt)
    }

    fn time_range(&self) -> (f64, f64) {
        (self.ad.t_start(), self.ad.t_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_state() {
        let tr = Trajectory::design(100.0, 10.0, 4.0, 0.0, 2.0, 4.0).unwrap();
        let ad = *tr.accel_designer();
        let t = 0.37;
        let s = tr.update(t);
        assert_eq!(s.q, Pose::new(ad.x(t), 0.0, 0.0));
        assert_eq!(s.dq.x, ad.v(t));
        assert_eq!(s.ddq.x, ad.a(t));
        assert_eq!(s.dddq.x, ad.j(t));
        assert_eq!(s.dq.th, 0.0);
    }

    #[test]
    fn test_end_state() {
        let tr = Trajectory::design(100.0, 10.0, 4.0, 0.0, 0.0, 1.0).unwrap();
        let (_, t_end) = tr.time_range();
        let s = tr.next_state(&State::origin(), t_end - 0.5, 0.5);
        assert!((s.q.x - 1.0).abs() < 1e-9);
        assert!(s.dq.x.abs() < 1e-9);
    }
}
