//! Trajectory tracking for a differential-drive robot
//!
//! Dynamic feedback linearization: the translational velocity is an extra state
//! `xi`, integrated from a virtual acceleration input, which turns the unicycle
//! into two decoupled double integrators in x and y. The linearization is
//! singular at `xi == 0`, so below `xi_threshold` a nonlinear low-speed law takes
//! over.
//!
//! Reference: G. Oriolo, A. De Luca, M. Vendittelli, "WMR control via dynamic
//! feedback linearization", IEEE TCST, 2002.

use crate::common::{Polar, Pose, State};

/// Feedback gains
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerGain {
    /// damping ratio of the linearized loop
    pub zeta: f64,
    /// natural frequency of the linearized loop [rad/s]
    pub omega_n: f64,
    /// damping of the low-speed law, in `[0, 1]`
    pub low_zeta: f64,
    /// gain of the low-speed law, positive
    pub low_b: f64,
}

impl Default for TrackerGain {
    fn default() -> Self {
        Self {
            zeta: 1.0,
            omega_n: 15.0,
            low_zeta: 1.0,
            low_b: 1e-3,
        }
    }
}

/// Timing and switching parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerConfig {
    /// Control period [s]
    pub ts: f64,
    /// Below this `|xi|` the low-speed law is used [m/s]
    pub xi_threshold: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            ts: 1e-3,
            xi_threshold: 0.15,
        }
    }
}

/// Control command
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrackerOutput {
    /// translational velocity [m/s]
    pub v: f64,
    /// angular velocity [rad/s]
    pub w: f64,
    /// translational acceleration [m/s/s]
    pub dv: f64,
    /// angular acceleration [rad/s/s]
    pub dw: f64,
}

/// `sin(x) / x`, accurate for `|x| < 1` and finite at 0
pub fn sinc(x: f64) -> f64 {
    let xx = x * x;
    let xxxx = xx * xx;
    xxxx * xxxx / 362880.0 - xxxx * xx / 5040.0 + xxxx / 120.0 - xx / 6.0 + 1.0
}

/// Trajectory tracking controller
#[derive(Debug, Clone)]
pub struct TrajectoryTracker {
    gain: TrackerGain,
    config: TrackerConfig,
    /// translational velocity state of the dynamic extension
    xi: f64,
}

impl TrajectoryTracker {
    pub fn new(gain: TrackerGain) -> Self {
        Self::with_config(gain, TrackerConfig::default())
    }

    pub fn with_config(gain: TrackerGain, config: TrackerConfig) -> Self {
        TrajectoryTracker { gain, config, xi: 0.0 }
    }

    /// Restart from translational velocity `v_start`
    pub fn reset(&mut self, v_start: f64) {
        self.xi = v_start;
    }

    pub fn xi(&self) -> f64 {
        self.xi
    }

    /// Compute the command for one control period
    ///
    /// # Arguments
    /// * `est_q` - Estimated pose
    /// * `est_v` - Estimated velocity
    /// * `est_a` - Estimated acceleration
    /// * `ref_state` - Reference state at this period
    pub fn update(
        &mut self,
        est_q: &Pose,
        est_v: &Polar,
        est_a: &Polar,
        ref_state: &State,
    ) -> TrackerOutput {
        let (ref_q, ref_dq, ref_ddq, ref_dddq) =
            (&ref_state.q, &ref_state.dq, &ref_state.ddq, &ref_state.dddq);

        let (x, y, theta) = (est_q.x, est_q.y, est_q.th);
        let cos_theta = theta.cos();
        let sin_theta = theta.sin();
        let dx = est_v.tra * cos_theta;
        let dy = est_v.tra * sin_theta;
        let ddx = est_a.tra * cos_theta;
        let ddy = est_a.tra * sin_theta;

        let kx = self.gain.omega_n * self.gain.omega_n;
        let kdx = 2.0 * self.gain.zeta * self.gain.omega_n;
        let (ky, kdy) = (kx, kdx);

        let cos_th_r = ref_q.th.cos();
        let sin_th_r = ref_q.th.sin();
        let u1 = ref_ddq.x + kdx * (ref_dq.x - dx) + kx * (ref_q.x - x);
        let u2 = ref_ddq.y + kdy * (ref_dq.y - dy) + ky * (ref_q.y - y);
        let du1 = ref_dddq.x + kdx * (ref_ddq.x - ddx) + kx * (ref_dq.x - dx);
        let du2 = ref_dddq.y + kdy * (ref_ddq.y - ddy) + ky * (ref_dq.y - dy);
        let d_xi = u1 * cos_th_r + u2 * sin_th_r;

        self.xi += d_xi * self.config.ts;

        if self.xi.abs() < self.config.xi_threshold {
            let b = self.gain.low_b;
            let zeta = self.gain.low_zeta;
            let v_d = ref_dq.x * cos_th_r + ref_dq.y * sin_th_r;
            let w_d = ref_dq.th;
            let k1 = 2.0 * zeta * (w_d * w_d + b * v_d * v_d).sqrt();
            let k2 = b;
            let k3 = k1;
            let e_x = ref_q.x - x;
            let e_y = ref_q.y - y;
            let e_th = ref_q.th - theta;
            TrackerOutput {
                v: v_d * e_th.cos() + k1 * (cos_theta * e_x + sin_theta * e_y),
                w: w_d + k2 * v_d * sinc(e_th) * (-sin_theta * e_x + cos_theta * e_y) + k3 * e_th,
                dv: ref_ddq.x * cos_th_r + ref_ddq.y * sin_th_r,
                dw: ref_ddq.th,
            }
        } else {
            let w = (u2 * cos_th_r - u1 * sin_th_r) / self.xi;
            TrackerOutput {
                v: self.xi,
                w,
                dv: d_xi,
                dw: -(2.0 * d_xi * w + du1 * sin_th_r - du2 * cos_th_r) / self.xi,
            }
        }
    }
}
