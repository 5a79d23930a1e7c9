//! CSV output of profiles and trajectories
//!
//! Rows are comma separated, without header, in SI units:
//! - profiles: `t, jerk, accel, velocity, position`
//! - trajectories: `t, dddth, ddth, dth, th, dddx, ddx, dx, x, dddy, ddy, dy, y`

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::common::error::ensure_positive;
use crate::common::{MotionProfile, MotionResult, State, StateTrajectory};

/// Write one profile row at time `t`
pub fn write_profile_row<W: Write, P: MotionProfile + ?Sized>(
    w: &mut W,
    profile: &P,
    t: f64,
) -> MotionResult<()> {
    writeln!(
        w,
        "{},{},{},{},{}",
        t,
        profile.j(t),
        profile.a(t),
        profile.v(t),
        profile.x(t)
    )?;
    Ok(())
}

/// Write one trajectory row
pub fn write_state_row<W: Write>(w: &mut W, t: f64, s: &State) -> MotionResult<()> {
    writeln!(
        w,
        "{},{},{},{},{},{},{},{},{},{},{},{},{}",
        t,
        s.dddq.th,
        s.ddq.th,
        s.dq.th,
        s.q.th,
        s.dddq.x,
        s.ddq.x,
        s.dq.x,
        s.q.x,
        s.dddq.y,
        s.ddq.y,
        s.dq.y,
        s.q.y
    )?;
    Ok(())
}

/// Sample `profile` every `ts` over its whole range, end point included
///
/// Returns the number of rows written.
pub fn write_profile<W: Write, P: MotionProfile + ?Sized>(
    w: &mut W,
    profile: &P,
    ts: f64,
) -> MotionResult<usize> {
    ensure_positive("ts", ts)?;
    let t_end = profile.t_end();
    let mut rows = 0;
    let mut i = 0;
    loop {
        let t = profile.t_start() + i as f64 * ts;
        if t >= t_end {
            break;
        }
        write_profile_row(w, profile, t)?;
        rows += 1;
        i += 1;
    }
    write_profile_row(w, profile, t_end)?;
    Ok(rows + 1)
}

/// Integrate `trajectory` from the origin every `ts` over its time range
///
/// Returns the number of rows written.
pub fn write_trajectory<W: Write, T: StateTrajectory + ?Sized>(
    w: &mut W,
    trajectory: &T,
    ts: f64,
) -> MotionResult<usize> {
    ensure_positive("ts", ts)?;
    let (t_start, t_end) = trajectory.time_range();
    let mut s = State::origin();
    let mut t = t_start;
    let mut rows = 0;
    while t < t_end {
        let dt = ts.min(t_end - t);
        s = trajectory.next_state(&s, t, dt);
        t += dt;
        write_state_row(w, t, &s)?;
        rows += 1;
    }
    Ok(rows)
}

/// Write `profile` to one file per phase, `{base}_{i}.csv`
///
/// Phase `i` ends at the `i`-th time stamp, so the first file holds only the
/// start point.
pub fn save_profile_phases<P: MotionProfile + ?Sized>(
    base: &str,
    profile: &P,
    ts: f64,
) -> MotionResult<()> {
    ensure_positive("ts", ts)?;
    let mut t = profile.t_start();
    for (i, &tick) in profile.time_stamps().iter().enumerate() {
        let path = format!("{}_{}.csv", base, i);
        let mut w = BufWriter::new(File::create(&path)?);
        write_profile_row(&mut w, profile, t)?;
        while t + ts < tick {
            t += ts;
            write_profile_row(&mut w, profile, t)?;
        }
        w.flush()?;
        info!(path = path.as_str(), "profile phase written");
    }
    Ok(())
}

/// Write `trajectory` to a single CSV file
pub fn save_trajectory<T: StateTrajectory + ?Sized, Q: AsRef<Path>>(
    path: Q,
    trajectory: &T,
    ts: f64,
) -> MotionResult<()> {
    let mut w = BufWriter::new(File::create(path.as_ref())?);
    let rows = write_trajectory(&mut w, trajectory, ts)?;
    w.flush()?;
    info!(path = %path.as_ref().display(), rows, "trajectory written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Pose;
    use crate::motion_profile::AccelCurve;
    use crate::straight;

    #[test]
    fn test_profile_rows() {
        let c = AccelCurve::new(100.0, 10.0, 0.0, 1.0).unwrap();
        let mut buf = Vec::new();
        let rows = write_profile(&mut buf, &c, 0.05).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(rows, lines.len());
        assert_eq!(lines[0], "0,0,0,0,0");
        for line in &lines {
            assert_eq!(line.split(',').count(), 5);
        }
        let last: Vec<f64> = lines[lines.len() - 1]
            .split(',')
            .map(|v| v.parse().unwrap())
            .collect();
        assert_eq!(last[0], c.t_end());
        assert_eq!(last[3], 1.0);
    }

    #[test]
    fn test_state_row() {
        let s = State::new(
            Pose::new(1.0, 2.0, 3.0),
            Pose::new(4.0, 5.0, 6.0),
            Pose::new(7.0, 8.0, 9.0),
            Pose::new(10.0, 11.0, 12.0),
        );
        let mut buf = Vec::new();
        write_state_row(&mut buf, 0.5, &s).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "0.5,12,9,6,3,10,7,4,1,11,8,5,2\n"
        );
    }

    #[test]
    fn test_trajectory_rows() {
        let tr = straight::Trajectory::design(100.0, 10.0, 4.0, 0.0, 0.0, 1.0).unwrap();
        let mut buf = Vec::new();
        let rows = write_trajectory(&mut buf, &tr, 0.01).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), rows);
        let last: Vec<f64> = text
            .lines()
            .last()
            .unwrap()
            .split(',')
            .map(|v| v.parse().unwrap())
            .collect();
        assert_eq!(last.len(), 13);
        assert!((last[0] - tr.accel_designer().t_end()).abs() < 1e-12);
        // x position of a 1 m run
        assert!((last[8] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_step() {
        let c = AccelCurve::new(100.0, 10.0, 0.0, 1.0).unwrap();
        assert!(write_profile(&mut Vec::new(), &c, 0.0).is_err());
    }
}
