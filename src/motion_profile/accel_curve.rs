//! Jerk-limited velocity transition
//!
//! Piecewise polynomial curve with constant jerk, linear acceleration, quadratic
//! velocity and cubic position that connects a start velocity to an end velocity.
//! There is no distance constraint; see [`AccelDesigner`](super::AccelDesigner)
//! for that.
//!
//! Reference: <https://www.kerislab.jp/posts/2018-04-29-accel-designer4/>

use std::fmt;

use tracing::warn;

use crate::common::error::{ensure_finite, ensure_positive};
use crate::common::{MotionProfile, MotionResult};

/// Jerk-limited transition between two velocities
///
/// - starts at `t = 0`, `x = 0`
/// - velocity moves monotonically from `v_start` to `v_end`
/// - `|j| <= j_max` and `|a| <= a_max` everywhere
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AccelCurve {
    /// signed jerk [m/s/s/s]
    jm: f64,
    /// signed acceleration [m/s/s]
    am: f64,
    /// boundary times [s]
    t0: f64,
    t1: f64,
    t2: f64,
    t3: f64,
    /// boundary velocities [m/s]
    v0: f64,
    v1: f64,
    v3: f64,
    /// boundary positions [m]
    x0: f64,
    x1: f64,
    x3: f64,
}

impl AccelCurve {
    /// Build the curve from `v_start` to `v_end`
    ///
    /// # Arguments
    /// * `j_max` - Maximum jerk magnitude [m/s/s/s], positive
    /// * `a_max` - Maximum acceleration magnitude [m/s/s], positive
    /// * `v_start` - Start velocity [m/s]
    /// * `v_end` - End velocity [m/s]
    pub fn new(j_max: f64, a_max: f64, v_start: f64, v_end: f64) -> MotionResult<Self> {
        ensure_positive("j_max", j_max)?;
        ensure_positive("a_max", a_max)?;
        ensure_finite(&[("v_start", v_start), ("v_end", v_end)])?;

        let am = if v_end > v_start { a_max } else { -a_max };
        let jm = if v_end > v_start { j_max } else { -j_max };
        let (t0, v0, v3, x0) = (0.0, v_start, v_end, 0.0);
        // duration of each curved part of the velocity
        let tc = a_max / j_max;
        // duration of the constant acceleration part
        let tm = (v3 - v0) / am - tc;

        let curve = if tm > 0.0 {
            // velocity: curve -> line -> curve
            let t1 = t0 + tc;
            let t2 = t1 + tm;
            let t3 = t2 + tc;
            let v1 = v0 + am * tc / 2.0;
            let x1 = x0 + v0 * tc + am * tc * tc / 6.0;
            // area of the trapezoid under v(t)
            let x3 = x0 + (v0 + v3) / 2.0 * (t3 - t0);
            AccelCurve { jm, am, t0, t1, t2, t3, v0, v1, v3, x0, x1, x3 }
        } else {
            // velocity: curve -> curve
            let tcp = ((v3 - v0) / jm).sqrt();
            let t1 = t0 + tcp;
            let t3 = t1 + tcp;
            let v1 = (v0 + v3) / 2.0;
            let x1 = x0 + v1 * tcp + jm * tcp * tcp * tcp / 6.0;
            let x3 = x0 + 2.0 * v1 * tcp;
            AccelCurve { jm, am, t0, t1, t2: t1, t3, v0, v1, v3, x0, x1, x3 }
        };
        Ok(curve)
    }

    /// End time [s]
    pub fn t_end(&self) -> f64 {
        self.t3
    }

    /// End velocity [m/s]
    pub fn v_end(&self) -> f64 {
        self.v3
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

    /// Whether the curve saturates at `a_max` (three sub-phases)
    pub fn has_constant_accel(&self) -> bool {
        self.t2 > self.t1
    }

    /// Phase boundaries `[t0, t1, t2, t3]`, non-decreasing
    pub fn time_stamp(&self) -> [f64; 4] {
        [self.t0, self.t1, self.t2, self.t3]
    }

    /// End velocity reachable within distance `d` when heading for `vt`
    ///
    /// # Arguments
    /// * `j_max` - Maximum jerk magnitude [m/s/s/s], positive
    /// * `a_max` - Maximum acceleration magnitude [m/s/s], positive
    /// * `vs` - Start velocity [m/s]
    /// * `vt` - Target velocity [m/s]
    /// * `d` - Travel distance [m]
    pub fn reachable_velocity_end(j_max: f64, a_max: f64, vs: f64, vt: f64, d: f64) -> f64 {
        if d == 0.0 {
            return vs;
        }
        let tc = a_max / j_max;
        let am = if vt > vs { a_max } else { -a_max };
        let jm = if vt > vs { j_max } else { -j_max };
        let sign = if d > 0.0 { 1.0 } else { -1.0 };
        // distance and end velocity when the plateau vanishes (duration 2 tc)
        let d_triangle = (vs + am * tc / 2.0) * 2.0 * tc;
        let v_triangle = jm / am * d - vs;
        if d * v_triangle > 0.0 && d.abs() > d_triangle.abs() {
            // curve -> line -> curve: quadratic in the end velocity
            let amtc = am * tc;
            let disc = amtc * amtc - 4.0 * (amtc * vs - vs * vs - 2.0 * am * d);
            return (-amtc + sign * disc.sqrt()) / 2.0;
        }
        // curve -> curve: cubic in the end velocity, solved on magnitudes
        let a = vs.abs();
        let b = sign * jm * d * d;
        let aaa_27 = a * a * a / 27.0;
        let cr = 8.0 * aaa_27 + b / 2.0;
        let ci_b = 8.0 * aaa_27 / b + 0.25;
        if ci_b >= 0.0 {
            let c = (cr + b.abs() * ci_b.sqrt()).cbrt();
            sign * (c + 4.0 * a * a / c / 9.0 - a / 3.0)
        } else {
            // three real roots, take the principal one via polar form
            let ci = b.abs() * (-ci_b).sqrt();
            let r = cr.hypot(ci);
            let th = ci.atan2(cr);
            sign * (2.0 * r.cbrt() * (th / 3.0).cos() - a / 3.0)
        }
    }

    /// Peak velocity of an accelerate-then-decelerate profile covering `d`
    ///
    /// Assumes both transitions saturate at `a_max`. When they do not, the
    /// returned peak is slightly low, which leaves a short cruise.
    ///
    /// # Arguments
    /// * `j_max` - Maximum jerk magnitude [m/s/s/s], positive
    /// * `a_max` - Maximum acceleration magnitude [m/s/s], positive
    /// * `vs` - Start velocity [m/s]
    /// * `ve` - End velocity [m/s]
    /// * `d` - Travel distance [m]
    pub fn reachable_velocity_max(j_max: f64, a_max: f64, vs: f64, ve: f64, d: f64) -> f64 {
        let tc = a_max / j_max;
        // the direction of travel decides the sign of the acceleration
        let am = if d >= 0.0 { a_max } else { -a_max };
        let amtc = am * tc;
        let disc = amtc * amtc - 2.0 * (vs + ve) * amtc + 4.0 * am * d + 2.0 * (vs * vs + ve * ve);
        if disc < 0.0 {
            warn!(disc, vs, ve, d, "no peak velocity satisfies the distance");
            return vs;
        }
        let sqrt_disc = if d >= 0.0 { disc.sqrt() } else { -disc.sqrt() };
        (-amtc + sqrt_disc) / 2.0
    }

    /// Distance travelled by the curve from `v_start` to `v_end`
    pub fn distance_from_velocities(j_max: f64, a_max: f64, v_start: f64, v_end: f64) -> f64 {
        let am = if v_end > v_start { a_max } else { -a_max };
        let jm = if v_end > v_start { j_max } else { -j_max };
        let tc = a_max / j_max;
        let tm = (v_end - v_start) / am - tc;
        let t_all = if tm > 0.0 {
            tc + tm + tc
        } else {
            2.0 * ((v_end - v_start) / jm).sqrt()
        };
        // area under v(t)
        (v_start + v_end) / 2.0 * t_all
    }
}

impl MotionProfile for AccelCurve {
    fn j(&self, t: f64) -> f64 {
        if t <= self.t0 {
            0.0
        } else if t <= self.t1 {
            self.jm
        } else if t <= self.t2 {
            0.0
        } else if t <= self.t3 {
            -self.jm
        } else {
            0.0
        }
    }

    fn a(&self, t: f64) -> f64 {
        if t <= self.t0 {
            0.0
        } else if t <= self.t1 {
            self.jm * (t - self.t0)
        } else if t <= self.t2 {
            self.am
        } else if t <= self.t3 {
            -self.jm * (t - self.t3)
        } else {
            0.0
        }
    }

    fn v(&self, t: f64) -> f64 {
        if t <= self.t0 {
            self.v0
        } else if t <= self.t1 {
            self.v0 + self.jm / 2.0 * (t - self.t0) * (t - self.t0)
        } else if t <= self.t2 {
            self.v1 + self.am * (t - self.t1)
        } else if t <= self.t3 {
            self.v3 - self.jm / 2.0 * (t - self.t3) * (t - self.t3)
        } else {
            self.v3
        }
    }

    fn x(&self, t: f64) -> f64 {
        if t <= self.t0 {
            self.x0 + self.v0 * (t - self.t0)
        } else if t <= self.t1 {
            let dt = t - self.t0;
            self.x0 + self.v0 * dt + self.jm / 6.0 * dt * dt * dt
        } else if t <= self.t2 {
            let dt = t - self.t1;
            self.x1 + self.v1 * dt + self.am / 2.0 * dt * dt
        } else if t <= self.t3 {
            let dt = t - self.t3;
            self.x3 + self.v3 * dt - self.jm / 6.0 * dt * dt * dt
        } else {
            self.x3 + self.v3 * (t - self.t3)
        }
    }

    fn t_start(&self) -> f64 {
        self.t0
    }

    fn t_end(&self) -> f64 {
        self.t3
    }

    fn time_stamps(&self) -> Vec<f64> {
        self.time_stamp().to_vec()
    }
}

impl fmt::Display for AccelCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AccelCurve\tvs: {}\tve: {}\tt0: {}\tt1: {}\tt2: {}\tt3: {}\td: {}",
            self.v0,
            self.v3,
            self.t0,
            self.t1,
            self.t2,
            self.t3,
            self.x3 - self.x0
        )
    }
}
