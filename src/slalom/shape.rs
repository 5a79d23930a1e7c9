//! Slalom shape generated from geometric constraints
//!
//! The heading follows a jerk-limited profile from 0 to `total.th`. The shape
//! simulates that turn once, finds the translational velocity at which the
//! lateral travel of the curve equals `y_curve_end`, then adds straight legs
//! before and after the curve so that the whole maneuver ends at `total`.

use std::fmt;

use tracing::debug;

use super::{AngularLimits, ShapeConfig};
use crate::common::error::{ensure_finite, ensure_positive};
use crate::common::{MotionError, MotionProfile, MotionResult, Pose, State};
use crate::motion_profile::AccelDesigner;

/// Below this `|sin(th)|` the turn is treated as a U-turn
const U_TURN_SIN_THRESHOLD: f64 = 1e-3;

/// Geometry of a slalom maneuver
///
/// The fields depend on each other; build it with [`Shape::new`] or, for
/// precomputed values, [`Shape::from_parts`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    /// pose change of the whole maneuver, straights included
    pub total: Pose,
    /// pose change of the curved part
    pub curve: Pose,
    /// straight before the curve [m]
    pub straight_prev: f64,
    /// straight after the curve [m]
    pub straight_post: f64,
    /// translational velocity the limits are tuned for [m/s]
    pub v_ref: f64,
    pub limits: AngularLimits,
}

impl Shape {
    /// Generate a shape with the default simulation parameters
    ///
    /// # Arguments
    /// * `total` - Pose change of the whole maneuver
    /// * `y_curve_end` - Lateral travel of the curved part [m], sets the size of the turn
    /// * `x_adv` - Straight before and after a U-turn [m], where `y_curve_end` cannot
    ///   adjust the legs
    /// * `limits` - Angular limits at `v_ref`
    pub fn new(
        total: Pose,
        y_curve_end: f64,
        x_adv: f64,
        limits: AngularLimits,
    ) -> MotionResult<Self> {
        Self::with_config(total, y_curve_end, x_adv, limits, &ShapeConfig::default())
    }

    /// Generate a shape with explicit simulation parameters
    pub fn with_config(
        total: Pose,
        y_curve_end: f64,
        x_adv: f64,
        limits: AngularLimits,
        config: &ShapeConfig,
    ) -> MotionResult<Self> {
        ensure_finite(&[
            ("total.x", total.x),
            ("total.y", total.y),
            ("total.th", total.th),
            ("y_curve_end", y_curve_end),
            ("x_adv", x_adv),
        ])?;
        if total.th == 0.0 {
            return Err(MotionError::InvalidParameter(
                "total.th must be non-zero".to_string(),
            ));
        }
        if y_curve_end == 0.0 {
            return Err(MotionError::InvalidParameter(
                "y_curve_end must be non-zero".to_string(),
            ));
        }
        ensure_positive("ts", config.ts)?;
        ensure_positive("v_trial", config.v_trial)?;

        let ad = AccelDesigner::new(
            limits.dddth_max,
            limits.ddth_max,
            limits.dth_max,
            0.0,
            0.0,
            total.th,
        )?;
        // y is proportional to v, extra passes only mop up rounding
        let mut v = config.v_trial;
        let mut s = State::origin();
        for _ in 0..config.passes.max(1) {
            s = Self::simulate(&ad, v, config.ts);
            if s.q.y == 0.0 || !s.q.y.is_finite() {
                return Err(MotionError::Infeasible(format!(
                    "a turn of {} rad has no lateral travel to scale",
                    total.th
                )));
            }
            v *= y_curve_end / s.q.y;
        }
        let mut curve = s.q;
        let v_ref = v;

        let sin_th = total.th.sin();
        let cos_th = total.th.cos();
        let (straight_prev, straight_post) = if sin_th.abs() < U_TURN_SIN_THRESHOLD {
            curve = total;
            (x_adv, x_adv)
        } else {
            (
                total.x - s.q.x - cos_th / sin_th * (total.y - s.q.y),
                (total.y - s.q.y) / sin_th,
            )
        };
        debug!(v_ref, straight_prev, straight_post, "slalom shape generated");

        Self::from_parts(total, curve, straight_prev, straight_post, v_ref, limits)
    }

    /// Assemble a shape from precomputed values
    pub fn from_parts(
        total: Pose,
        curve: Pose,
        straight_prev: f64,
        straight_post: f64,
        v_ref: f64,
        limits: AngularLimits,
    ) -> MotionResult<Self> {
        ensure_finite(&[
            ("straight_prev", straight_prev),
            ("straight_post", straight_post),
            ("v_ref", v_ref),
        ])?;
        ensure_positive("dddth_max", limits.dddth_max)?;
        ensure_positive("ddth_max", limits.ddth_max)?;
        ensure_positive("dth_max", limits.dth_max)?;
        if straight_prev < 0.0 || straight_post < 0.0 {
            return Err(MotionError::Infeasible(format!(
                "the curve overshoots the target: straight_prev = {}, straight_post = {}",
                straight_prev, straight_post
            )));
        }
        if v_ref <= 0.0 {
            return Err(MotionError::Infeasible(format!(
                "reference velocity must be positive, got {}",
                v_ref
            )));
        }
        Ok(Shape {
            total,
            curve,
            straight_prev,
            straight_post,
            v_ref,
            limits,
        })
    }

    /// Advance `state` over `[t, t + ts]` at translational velocity `v`
    ///
    /// Position is integrated with Simpson's rule on the heading given by `ad`.
    /// A positive `k_slip` adds the slip angle `atan(-k_slip * v * w)`.
    /// Heading and all derivatives are taken at `t + ts`.
    pub fn integrate(
        ad: &AccelDesigner,
        state: &State,
        v: f64,
        t: f64,
        ts: f64,
        k_slip: f64,
    ) -> State {
        let times = [t, t + ts / 2.0, t + ts];
        let mut cos_th = [0.0; 3];
        let mut sin_th = [0.0; 3];
        for (i, &ti) in times.iter().enumerate() {
            let th_slip = (-k_slip * v * ad.v(ti)).atan();
            let th = ad.x(ti) + th_slip;
            cos_th[i] = th.cos();
            sin_th[i] = th.sin();
        }

        let mut s = *state;
        s.q.x += v * ts * (cos_th[0] + 4.0 * cos_th[1] + cos_th[2]) / 6.0;
        s.q.y += v * ts * (sin_th[0] + 4.0 * sin_th[1] + sin_th[2]) / 6.0;
        s.q.th = ad.x(t + ts);
        s.dq.x = v * cos_th[2];
        s.dq.y = v * sin_th[2];
        s.dq.th = ad.v(t + ts);
        s.ddq.th = ad.a(t + ts);
        s.dddq.th = ad.j(t + ts);
        s.ddq.x = -s.dq.y * s.dq.th;
        s.ddq.y = s.dq.x * s.dq.th;
        s.dddq.x = -s.ddq.y * s.dq.th - s.dq.y * s.ddq.th;
        s.dddq.y = s.ddq.x * s.dq.th + s.dq.x * s.ddq.th;
        s
    }

    /// Residual between `total` and the sum of the legs; zero for a consistent shape
    pub fn integral_error(&self) -> Pose {
        let end = Pose::straight(self.straight_prev)
            + self.curve
            + Pose::straight(self.straight_post).rotate(self.curve.th);
        self.total - end
    }

    /// Run the whole turn at velocity `v` from the origin
    fn simulate(ad: &AccelDesigner, v: f64, ts: f64) -> State {
        let t_end = ad.t_end();
        let mut s = State::origin();
        let mut t = 0.0;
        while t + ts < t_end {
            s = Self::integrate(ad, &s, v, t, ts, 0.0);
            t += ts;
        }
        Self::integrate(ad, &s, v, t, t_end - t, 0.0)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Slalom Shape")?;
        writeln!(f, "\ttotal:\t{}", self.total)?;
        writeln!(f, "\tcurve:\t{}", self.curve)?;
        writeln!(f, "\tv_ref:\t{}", self.v_ref)?;
        writeln!(f, "\tstraight_prev:\t{}", self.straight_prev)?;
        writeln!(f, "\tstraight_post:\t{}", self.straight_post)?;
        write!(f, "\tintegral error:\t{}", self.integral_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    #[test]
    fn test_quarter_turn() {
        let s = sl90();
        assert!(s.v_ref > 0.0);
        assert!((s.curve.y - 0.044).abs() < 1e-9);
        // a symmetric quarter turn ends on the diagonal
        assert!((s.curve.x - s.curve.y).abs() < 1e-6);
        assert!((s.curve.th - PI / 2.0).abs() < 1e-9);
        assert!((s.straight_prev - 0.001).abs() < 1e-6);
        assert!((s.straight_post - 0.001).abs() < 1e-6);
        let e = s.integral_error();
        assert!(e.x.abs() < 1e-9 && e.y.abs() < 1e-9 && e.th.abs() < 1e-9);
    }

    #[test]
    fn test_u_turn() {
        let total = Pose::new(0.0, 0.09, PI);
        let s = Shape::new(total, 0.09, 0.024, AngularLimits::default()).unwrap();
        assert_eq!(s.curve, total);
        assert_eq!(s.straight_prev, 0.024);
        assert_eq!(s.straight_post, 0.024);
        assert!(s.v_ref > 0.0);
        let e = s.integral_error();
        assert!(e.x.abs() < 1e-9 && e.y.abs() < 1e-9);
    }

    #[test]
    fn test_v_ref_scales_with_size() {
        let small = sl90();
        let large = Shape::new(
            Pose::new(0.09, 0.09, PI / 2.0),
            0.088,
            0.0,
            AngularLimits::default(),
        )
        .unwrap();
        assert!((large.v_ref / small.v_ref - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_integrate_straight_heading() {
        let ad = AccelDesigner::new(100.0, 10.0, 1.0, 0.0, 0.0, 0.0).unwrap();
        let s = Shape::integrate(&ad, &State::origin(), 0.5, 0.0, 0.1, 0.0);
        assert!((s.q.x - 0.05).abs() < 1e-12);
        assert_eq!(s.q.y, 0.0);
        assert_eq!(s.dq.x, 0.5);
        assert_eq!(s.ddq.x, 0.0);
    }

    #[test]
    fn test_slip_turns_outward() {
        let ad = AccelDesigner::new(1200.0 * PI, 36.0 * PI, 3.0 * PI, 0.0, 0.0, PI / 2.0).unwrap();
        let t = ad.t_end() / 2.0;
        let no_slip = Shape::integrate(&ad, &State::origin(), 0.3, t, 1e-3, 0.0);
        let slip = Shape::integrate(&ad, &State::origin(), 0.3, t, 1e-3, 0.1);
        // slip angle lags behind the heading of a left turn
        assert!(slip.q.y < no_slip.q.y);
        assert_eq!(slip.q.th, no_slip.q.th);
    }

    #[test]
    fn test_invalid_shape() {
        let l = AngularLimits::default();
        assert!(matches!(
            Shape::new(Pose::new(0.045, 0.045, 0.0), 0.044, 0.0, l),
            Err(MotionError::InvalidParameter(_))
        ));
        assert!(matches!(
            Shape::new(Pose::new(0.045, 0.045, PI / 2.0), 0.0, 0.0, l),
            Err(MotionError::InvalidParameter(_))
        ));
        // the curve alone is larger than the turn
        assert!(matches!(
            Shape::new(Pose::new(0.045, 0.045, PI / 2.0), 0.05, 0.0, l),
            Err(MotionError::Infeasible(_))
        ));
        assert!(matches!(
            Shape::from_parts(Pose::origin(), Pose::origin(), 0.0, 0.0, -1.0, l),
            Err(MotionError::Infeasible(_))
        ));
    }

    #[test]
    fn test_display() {
        let text = format!("{}", sl90());
        assert!(text.starts_with("Slalom Shape"));
        assert!(text.contains("integral error"));
    }
}
