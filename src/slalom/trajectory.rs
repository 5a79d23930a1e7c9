//! Slalom trajectory: replays a [`Shape`] at a given translational velocity

use super::Shape;
use crate::common::error::ensure_positive;
use crate::common::{MotionProfile, MotionResult, State, StateTrajectory};
use crate::motion_profile::AccelDesigner;

/// Time-parameterized slalom at constant translational velocity
///
/// The heading follows an angular [`AccelDesigner`] whose limits are scaled
/// with the velocity so that the path is the same at any speed.
#[derive(Debug, Clone)]
pub struct Trajectory {
    shape: Shape,
    ad: AccelDesigner,
    velocity: f64,
}

impl Trajectory {
    /// Create a trajectory at the reference velocity of `shape`
    ///
    /// `mirror_x` flips the turn to the other side of the direction of travel.
    pub fn new(shape: &Shape, mirror_x: bool) -> MotionResult<Self> {
        let mut shape = *shape;
        if mirror_x {
            shape.curve = shape.curve.mirror_x();
            shape.total = shape.total.mirror_x();
        }
        let ad = Self::design(&shape, shape.v_ref, 0.0, 0.0)?;
        Ok(Trajectory {
            shape,
            ad,
            velocity: shape.v_ref,
        })
    }

    /// Set the translational velocity and restart the turn
    ///
    /// # Arguments
    /// * `velocity` - Translational velocity [m/s], positive
    /// * `th_start` - Heading at the start of the curve [rad]
    /// * `t_start` - Time the curve starts [s], usually [`Self::time_straight_prev`]
    pub fn reset(&mut self, velocity: f64, th_start: f64, t_start: f64) -> MotionResult<()> {
        self.ad = Self::design(&self.shape, velocity, th_start, t_start)?;
        self.velocity = velocity;
        Ok(())
    }

    fn design(shape: &Shape, velocity: f64, th_start: f64, t_start: f64) -> MotionResult<AccelDesigner> {
        ensure_positive("velocity", velocity)?;
        let limits = shape.limits.scaled(velocity / shape.v_ref);
        let ad = AccelDesigner::new(
            limits.dddth_max,
            limits.ddth_max,
            limits.dth_max,
            0.0,
            0.0,
            shape.total.th,
        )?;
        Ok(ad.with_origin(th_start, t_start))
    }

    /// State at `t + dt` given `state` at `t`
    ///
    /// Outside the curve the heading is held, so the legs are straight.
    pub fn update(&self, state: &State, t: f64, dt: f64, k_slip: f64) -> State {
        Shape::integrate(&self.ad, state, self.velocity, t, dt, k_slip)
    }

    /// State at time `t`, integrated from the origin at time 0 with step `dt`
    pub fn evaluate(&self, t: f64, dt: f64) -> MotionResult<State> {
        ensure_positive("dt", dt)?;
        let mut s = State::origin();
        let mut tt = 0.0;
        while tt + dt < t {
            s = self.update(&s, tt, dt, 0.0);
            tt += dt;
        }
        Ok(self.update(&s, tt, (t - tt).max(0.0), 0.0))
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Duration of the curved part [s]
    pub fn time_curve(&self) -> f64 {
        self.ad.duration()
    }

    /// Absolute time the curve ends [s]
    pub fn t_end(&self) -> f64 {
        self.ad.t_end()
    }

    pub fn time_straight_prev(&self) -> f64 {
        self.shape.straight_prev / self.velocity
    }

    pub fn time_straight_post(&self) -> f64 {
        self.shape.straight_post / self.velocity
    }

    /// Duration of the whole maneuver, straights included [s]
    pub fn time_total(&self) -> f64 {
        self.time_straight_prev() + self.time_curve() + self.time_straight_post()
    }

    /// Shape in use, mirrored if requested
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Angular profile of the heading
    pub fn accel_designer(&self) -> &AccelDesigner {
        &self.ad
    }
}

impl StateTrajectory for Trajectory {
    fn next_state(&self, state: &State, t: f64, dt: f64) -> State {
        self.update(state, t, dt, 0.0)
    }

    fn time_range(&self) -> (f64, f64) {
        (
            self.ad.t_start() - self.time_straight_prev(),
            self.ad.t_end() + self.time_straight_post(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{MotionError, Pose};
    use crate::slalom::AngularLimits;
    use std::f64::consts::PI;

    fn sl90() -> Shape {
        Shape::new(
            Pose::new(0.045, 0.045, PI / 2.0),
            0.044,
            0.0,
            AngularLimits::default(),
        )
        .unwrap()
    }

    /// Run the maneuver from the origin and return the final state
    fn run(tr: &Trajectory, dt: f64) -> State {
        let t_end = tr.time_total();
        let mut s = State::origin();
        let mut t = 0.0;
        while t + dt < t_end {
            s = tr.update(&s, t, dt, 0.0);
            t += dt;
        }
        tr.update(&s, t, t_end - t, 0.0)
    }

    #[test]
    fn test_reaches_total_pose() {
        let shape = sl90();
        let mut tr = Trajectory::new(&shape, false).unwrap();
        for &v in &[shape.v_ref, 0.3, 1.2] {
            let t_start = shape.straight_prev / v;
            tr.reset(v, 0.0, t_start).unwrap();
            let end = run(&tr, 1e-3);
            assert!((end.q.x - 0.045).abs() < 1e-5, "v = {}: {}", v, end.q);
            assert!((end.q.y - 0.045).abs() < 1e-5, "v = {}: {}", v, end.q);
            assert!((end.q.th - PI / 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_time_scales_with_velocity() {
        let shape = sl90();
        let mut tr = Trajectory::new(&shape, false).unwrap();
        tr.reset(0.3, 0.0, 0.0).unwrap();
        let slow = tr.time_curve();
        tr.reset(0.6, 0.0, 0.0).unwrap();
        assert!((slow / tr.time_curve() - 2.0).abs() < 1e-9);
        assert_eq!(tr.velocity(), 0.6);
    }

    #[test]
    fn test_mirror_symmetry() {
        let shape = sl90();
        let mut left = Trajectory::new(&shape, false).unwrap();
        let mut right = Trajectory::new(&shape, true).unwrap();
        left.reset(0.5, 0.0, 0.01).unwrap();
        right.reset(0.5, 0.0, 0.01).unwrap();
        assert_eq!(right.shape().total, shape.total.mirror_x());
        let (mut sl, mut sr) = (State::origin(), State::origin());
        let dt = 1e-3;
        for i in 0..200 {
            let t = i as f64 * dt;
            sl = left.update(&sl, t, dt, 0.0);
            sr = right.update(&sr, t, dt, 0.0);
            assert!((sl.q.x - sr.q.x).abs() < 1e-12);
            assert!((sl.q.y + sr.q.y).abs() < 1e-12);
            assert!((sl.q.th + sr.q.th).abs() < 1e-12);
            assert!((sl.dq.th + sr.dq.th).abs() < 1e-12);
        }
    }

    #[test]
    fn test_straight_legs_hold_heading() {
        let shape = sl90();
        let mut tr = Trajectory::new(&shape, false).unwrap();
        tr.reset(0.5, 0.3, 1.0).unwrap();
        let s = tr.update(&State::origin(), 0.2, 0.1, 0.0);
        assert_eq!(s.q.th, 0.3);
        assert_eq!(s.dq.th, 0.0);
        assert!((s.q.x - 0.05 * 0.3f64.cos()).abs() < 1e-12);
        let s = tr.update(&State::origin(), tr.t_end() + 1.0, 0.1, 0.0);
        assert!((s.q.th - (0.3 + PI / 2.0)).abs() < 1e-9);
    }

    #[test]
    fn test_curve_from_time_zero() {
        // U-turn without straight legs: the curve starts right away
        let shape = Shape::new(Pose::new(0.0, 0.09, PI), 0.09, 0.0, AngularLimits::default()).unwrap();
        assert_eq!(shape.straight_prev, 0.0);
        let tr = Trajectory::new(&shape, false).unwrap();
        let v = tr.velocity();
        let dt = tr.time_curve() / 500.0;
        let mut s = State::origin();
        for i in 0..500 {
            let next = tr.update(&s, i as f64 * dt, dt, 0.0);
            let step = ((next.q.x - s.q.x).powi(2) + (next.q.y - s.q.y).powi(2)).sqrt();
            assert!(step > 0.0 && step <= v * dt * (1.0 + 1e-9));
            assert!(next.q.th >= s.q.th);
            s = next;
        }
        assert!(s.q.x.abs() < 1e-6);
        assert!((s.q.y - 0.09).abs() < 1e-6);
    }

    #[test]
    fn test_evaluate_matches_stepping() {
        let shape = sl90();
        let mut tr = Trajectory::new(&shape, false).unwrap();
        tr.reset(0.5, 0.0, tr.time_straight_prev()).unwrap();
        let t = tr.time_total();
        let s = tr.evaluate(t, 1e-3).unwrap();
        let stepped = run(&tr, 1e-3);
        assert!((s.q.x - stepped.q.x).abs() < 1e-12);
        assert!((s.q.y - stepped.q.y).abs() < 1e-12);
        assert!(tr.evaluate(t, 0.0).is_err());
    }

    #[test]
    fn test_time_range() {
        let shape = sl90();
        let mut tr = Trajectory::new(&shape, false).unwrap();
        let v = 0.5;
        tr.reset(v, 0.0, shape.straight_prev / v).unwrap();
        let (t0, t1) = tr.time_range();
        assert!(t0.abs() < 1e-12);
        assert!((t1 - tr.time_total()).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_velocity() {
        let mut tr = Trajectory::new(&sl90(), false).unwrap();
        assert!(matches!(
            tr.reset(0.0, 0.0, 0.0),
            Err(MotionError::InvalidParameter(_))
        ));
        assert!(tr.reset(f64::NAN, 0.0, 0.0).is_err());
        // a failed reset keeps the previous design
        assert_eq!(tr.velocity(), tr.shape().v_ref);
    }
}
