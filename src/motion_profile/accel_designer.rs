//! Distance-constrained jerk-limited profile
//!
//! Composes an accelerating [`AccelCurve`], an optional cruise and a
//! decelerating [`AccelCurve`] so that the motion starts at `v_start`, ends at
//! `v_target` and covers exactly `distance`, without exceeding `v_max`,
//! `a_max` or `j_max`.
//!
//! The design always runs in the direction of travel. A profile for
//! `(-v_start, -v_target, -distance)` is the point reflection of the one for
//! `(v_start, v_target, distance)`, bit for bit.

use std::fmt;

use itertools::Itertools;
use tracing::{debug, warn};

use super::accel_curve::AccelCurve;
use crate::common::error::{ensure_finite, ensure_positive};
use crate::common::{MotionError, MotionProfile, MotionResult};

/// Relative tolerance for the distance bookkeeping of the design
const DISTANCE_TOLERANCE: f64 = 1e-9;

/// Which branch of the design produced the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileShape {
    /// accelerate to `v_max`, cruise, decelerate
    ThreePhase,
    /// peak velocity limited by the distance; no cruise at `v_max`
    TwoPhaseNoCruise,
    /// zero duration (`v_start == v_target == 0`, `distance == 0`)
    Degenerate,
}

/// How to react when the distance is too short to reach `v_target`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndVelocityPolicy {
    Strict,
    Reachable,
}

/// Jerk-limited profile meeting a distance constraint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelDesigner {
    /// boundary times [s]: start, end of accel, end of cruise, end
    t0: f64,
    t1: f64,
    t2: f64,
    t3: f64,
    /// start and end positions [m]
    x0: f64,
    x3: f64,
    /// +1 or -1, maps the forward design back to the requested direction
    sign: f64,
    /// distance in the direction of travel [m]
    d_forward: f64,
    ac: AccelCurve,
    dc: AccelCurve,
    shape: ProfileShape,
}

impl AccelDesigner {
    /// Design a profile that reaches `v_target` exactly
    ///
    /// # Arguments
    /// * `j_max` - Maximum jerk magnitude [m/s/s/s], positive
    /// * `a_max` - Maximum acceleration magnitude [m/s/s], positive
    /// * `v_max` - Maximum velocity magnitude [m/s], positive
    /// * `v_start` - Start velocity [m/s]
    /// * `v_target` - End velocity [m/s]
    /// * `distance` - Travel distance [m], may be negative
    ///
    /// # Errors
    /// `InvalidParameter` for non-positive limits, non-finite values or end
    /// velocities above `v_max`; `Infeasible` when the distance is too short
    /// to change velocity from `v_start` to `v_target`.
    pub fn new(
        j_max: f64,
        a_max: f64,
        v_max: f64,
        v_start: f64,
        v_target: f64,
        distance: f64,
    ) -> MotionResult<Self> {
        for (name, v) in &[("v_start", v_start), ("v_target", v_target)] {
            if v.abs() > v_max {
                return Err(MotionError::InvalidParameter(format!(
                    "|{}| = {} exceeds v_max = {}",
                    name,
                    v.abs(),
                    v_max
                )));
            }
        }
        Self::design(
            j_max,
            a_max,
            v_max,
            v_start,
            v_target,
            distance,
            EndVelocityPolicy::Strict,
        )
    }

    /// Design a profile that settles for the reachable end velocity
    ///
    /// When `distance` is too short to reach `v_target`, the profile ends at
    /// the velocity reachable within `distance` instead of failing. Velocities
    /// above `v_max` at either end are kept as given.
    pub fn reachable(
        j_max: f64,
        a_max: f64,
        v_max: f64,
        v_start: f64,
        v_target: f64,
        distance: f64,
    ) -> MotionResult<Self> {
        Self::design(
            j_max,
            a_max,
            v_max,
            v_start,
            v_target,
            distance,
            EndVelocityPolicy::Reachable,
        )
    }

    /// Move the origin of the profile to position `x_start` at time `t_start`
    pub fn with_origin(mut self, x_start: f64, t_start: f64) -> Self {
        self.t0 += t_start;
        self.t1 += t_start;
        self.t2 += t_start;
        self.t3 += t_start;
        self.x0 += x_start;
        self.x3 += x_start;
        self
    }

    fn design(
        j_max: f64,
        a_max: f64,
        v_max: f64,
        v_start: f64,
        v_target: f64,
        distance: f64,
        policy: EndVelocityPolicy,
    ) -> MotionResult<Self> {
        ensure_positive("j_max", j_max)?;
        ensure_positive("a_max", a_max)?;
        ensure_positive("v_max", v_max)?;
        ensure_finite(&[
            ("v_start", v_start),
            ("v_target", v_target),
            ("distance", distance),
        ])?;

        // a standstill round trip is walked backwards first
        let sign = if distance > 0.0 {
            1.0
        } else if distance < 0.0 {
            -1.0
        } else if v_start + v_target > 0.0 {
            -1.0
        } else {
            1.0
        };
        let vs = sign * v_start;
        let vt = sign * v_target;
        let d = sign * distance;

        // the velocity change alone may already overshoot the distance
        let mut v_end = vt;
        let d_min = AccelCurve::distance_from_velocities(j_max, a_max, vs, vt);
        let tolerance = DISTANCE_TOLERANCE * d.abs().max(d_min.abs()).max(1.0);
        if d < d_min - tolerance {
            match policy {
                EndVelocityPolicy::Strict => {
                    return Err(MotionError::Infeasible(format!(
                        "distance {} is shorter than the {} needed to go from {} to {}",
                        distance,
                        sign * d_min,
                        v_start,
                        v_target
                    )));
                }
                EndVelocityPolicy::Reachable => {
                    v_end = AccelCurve::reachable_velocity_end(j_max, a_max, vs, vt, d);
                    warn!(
                        v_target,
                        v_end = sign * v_end,
                        distance,
                        "target velocity unreachable, ending at reachable velocity"
                    );
                }
            }
        }

        // saturate at v_max first
        let mut v_sat = vs.max(v_max).max(v_end);
        let mut ac = AccelCurve::new(j_max, a_max, vs, v_sat)?;
        let mut dc = AccelCurve::new(j_max, a_max, v_sat, v_end)?;
        let mut peak_limited = false;
        if d < ac.x_end() + dc.x_end() {
            // the distance is too short to cruise at v_max
            let v_rm = AccelCurve::reachable_velocity_max(j_max, a_max, vs, v_end, d);
            // never decelerate below both end velocities on the way
            v_sat = vs.max(v_rm).max(v_end);
            ac = AccelCurve::new(j_max, a_max, vs, v_sat)?;
            dc = AccelCurve::new(j_max, a_max, v_sat, v_end)?;
            peak_limited = true;
            debug!(v_peak = sign * v_sat, "vs -> vr -> ve");
        } else {
            debug!(v_peak = sign * v_sat, "vs -> vm -> ve");
        }

        let remaining = d - ac.x_end() - dc.x_end();
        if remaining < -tolerance {
            match policy {
                EndVelocityPolicy::Strict => {
                    return Err(MotionError::Infeasible(format!(
                        "no jerk-limited profile covers distance {} from {} to {} (overshoot {})",
                        distance, v_start, v_target, -remaining
                    )));
                }
                EndVelocityPolicy::Reachable => {
                    warn!(overshoot = -remaining, distance, "profile overshoots the distance");
                }
            }
        }
        // avoid 0 / 0 when vs = ve = d = 0
        let v_cruise = if v_sat.abs() < f64::EPSILON { 1.0 } else { v_sat };
        // rounding may leave a tiny negative cruise; time must not run backwards
        let t23 = (remaining / v_cruise).max(0.0);

        let t0 = 0.0;
        let t1 = t0 + ac.t_end();
        let t2 = t1 + t23;
        let t3 = t2 + dc.t_end();

        let shape = if t3 - t0 <= 0.0 {
            ProfileShape::Degenerate
        } else if peak_limited || t23 <= 0.0 {
            ProfileShape::TwoPhaseNoCruise
        } else {
            ProfileShape::ThreePhase
        };

        Ok(AccelDesigner {
            t0,
            t1,
            t2,
            t3,
            x0: 0.0,
            x3: distance,
            sign,
            d_forward: d,
            ac,
            dc,
            shape,
        })
    }

    /// End velocity [m/s]
    pub fn v_end(&self) -> f64 {
        self.sign * self.dc.v_end()
    }

    /// Peak (or cruise) velocity [m/s]
    pub fn v_peak(&self) -> f64 {
        self.sign * self.ac.v_end()
    }

    /// End position [m]
    pub fn x_end(&self) -> f64 {
        self.x3
    }

    pub fn t_0(&self) -> f64 {
        self.t0
    }

    pub fn t_1(&self) -> f64 {
        self.t1
    }

    pub fn t_2(&self) -> f64 {
        self.t2
    }

    pub fn t_3(&self) -> f64 {
        self.t3
    }

    /// Branch chosen at construction
    pub fn shape(&self) -> ProfileShape {
        self.shape
    }

    /// Accelerating part, expressed in the direction of travel
    pub fn accel_curve(&self) -> &AccelCurve {
        &self.ac
    }

    /// Decelerating part, expressed in the direction of travel
    pub fn decel_curve(&self) -> &AccelCurve {
        &self.dc
    }

    /// Position along the forward design, relative to the start
    fn x_forward(&self, t: f64) -> f64 {
        if t < self.t2 {
            self.ac.x(t - self.t0)
        } else {
            self.d_forward - self.dc.x_end() + self.dc.x(t - self.t2)
        }
    }
}

impl MotionProfile for AccelDesigner {
    fn j(&self, t: f64) -> f64 {
        if t < self.t2 {
            self.sign * self.ac.j(t - self.t0)
        } else {
            self.sign * self.dc.j(t - self.t2)
        }
    }

    fn a(&self, t: f64) -> f64 {
        if t < self.t2 {
            self.sign * self.ac.a(t - self.t0)
        } else {
            self.sign * self.dc.a(t - self.t2)
        }
    }

    fn v(&self, t: f64) -> f64 {
        if t < self.t2 {
            self.sign * self.ac.v(t - self.t0)
        } else {
            self.sign * self.dc.v(t - self.t2)
        }
    }

    fn x(&self, t: f64) -> f64 {
        self.x0 + self.sign * self.x_forward(t)
    }

    fn t_start(&self) -> f64 {
        self.t0
    }

    fn t_end(&self) -> f64 {
        self.t3
    }

    /// All curve boundaries in absolute time, strictly increasing
    fn time_stamps(&self) -> Vec<f64> {
        let (t0, t2) = (self.t0, self.t2);
        self.ac
            .time_stamp()
            .iter()
            .map(|t| t0 + t)
            .chain(self.dc.time_stamp().iter().map(|t| t2 + t))
            .dedup_by(|prev, next| next <= prev)
            .collect()
    }
}

impl fmt::Display for AccelDesigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AccelDesigner:\td: {}\tvs: {}\tvm: {}\tve: {}\tt0: {}\tt1: {}\tt2: {}\tt3: {}",
            self.x3 - self.x0,
            self.v(self.t0),
            self.v_peak(),
            self.v_end(),
            self.t0,
            self.t1,
            self.t2,
            self.t3
        )
    }
}
