//! Common types used throughout rust_slalom

use nalgebra::{Rotation2, Vector2, Vector3};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};

/// 2D pose (position + heading)
///
/// The heading is not wrapped; a full turn accumulates to `2 * PI`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// x [m]
    pub x: f64,
    /// y [m]
    pub y: f64,
    /// heading [rad]
    pub th: f64,
}

impl Pose {
    pub fn new(x: f64, y: f64, th: f64) -> Self {
        Self { x, y, th }
    }

    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0, th: 0.0 }
    }

    /// Pure translation along the x axis
    pub fn straight(x: f64) -> Self {
        Self { x, y: 0.0, th: 0.0 }
    }

    /// Reflect across the x axis (left turn <-> right turn)
    pub fn mirror_x(&self) -> Self {
        Self::new(self.x, -self.y, -self.th)
    }

    /// Rotate the position by `angle`, keeping the heading
    pub fn rotate(&self, angle: f64) -> Self {
        let p = Rotation2::new(angle) * Vector2::new(self.x, self.y);
        Self::new(p[0], p[1], self.th)
    }

    /// Express this pose, given in the frame of `offset`, in the parent frame
    pub fn homogeneous(&self, offset: &Pose) -> Self {
        *offset + self.rotate(offset.th)
    }

    pub fn to_vector(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.th)
    }
}

impl From<Vector3<f64>> for Pose {
    fn from(v: Vector3<f64>) -> Self {
        Self { x: v[0], y: v[1], th: v[2] }
    }
}

impl Add for Pose {
    type Output = Pose;

    fn add(self, rhs: Pose) -> Pose {
        Pose::new(self.x + rhs.x, self.y + rhs.y, self.th + rhs.th)
    }
}

impl Sub for Pose {
    type Output = Pose;

    fn sub(self, rhs: Pose) -> Pose {
        Pose::new(self.x - rhs.x, self.y - rhs.y, self.th - rhs.th)
    }
}

impl AddAssign for Pose {
    fn add_assign(&mut self, rhs: Pose) {
        *self = *self + rhs;
    }
}

impl SubAssign for Pose {
    fn sub_assign(&mut self, rhs: Pose) {
        *self = *self - rhs;
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.th)
    }
}

/// Trajectory state: pose and its first three time derivatives
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct State {
    pub q: Pose,
    pub dq: Pose,
    pub ddq: Pose,
    pub dddq: Pose,
}

impl State {
    pub fn new(q: Pose, dq: Pose, ddq: Pose, dddq: Pose) -> Self {
        Self { q, dq, ddq, dddq }
    }

    pub fn origin() -> Self {
        Self::default()
    }

    /// State resting at `q`
    pub fn at(q: Pose) -> Self {
        Self { q, ..Self::default() }
    }
}

/// Translational and rotational pair
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Polar {
    /// translation [m]
    pub tra: f64,
    /// rotation [rad]
    pub rot: f64,
}

impl Polar {
    pub fn new(tra: f64, rot: f64) -> Self {
        Self { tra, rot }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

impl Add for Polar {
    type Output = Polar;

    fn add(self, rhs: Polar) -> Polar {
        Polar::new(self.tra + rhs.tra, self.rot + rhs.rot)
    }
}

impl Sub for Polar {
    type Output = Polar;

    fn sub(self, rhs: Polar) -> Polar {
        Polar::new(self.tra - rhs.tra, self.rot - rhs.rot)
    }
}

impl Mul<f64> for Polar {
    type Output = Polar;

    fn mul(self, k: f64) -> Polar {
        Polar::new(self.tra * k, self.rot * k)
    }
}

impl Div<f64> for Polar {
    type Output = Polar;

    fn div(self, k: f64) -> Polar {
        Polar::new(self.tra / k, self.rot / k)
    }
}

impl fmt::Display for Polar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.tra, self.rot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_pose_arithmetic() {
        let mut p = Pose::new(1.0, 2.0, 0.5);
        p += Pose::new(0.5, -1.0, 0.25);
        assert_eq!(p, Pose::new(1.5, 1.0, 0.75));
        p -= Pose::new(1.5, 1.0, 0.75);
        assert_eq!(p, Pose::origin());
    }

    #[test]
    fn test_pose_rotate_keeps_heading() {
        let p = Pose::new(1.0, 0.0, 0.3).rotate(PI / 2.0);
        assert!(p.x.abs() < 1e-12);
        assert!((p.y - 1.0).abs() < 1e-12);
        assert_eq!(p.th, 0.3);
    }

    #[test]
    fn test_pose_mirror_and_homogeneous() {
        let p = Pose::new(1.0, 2.0, 0.5);
        assert_eq!(p.mirror_x(), Pose::new(1.0, -2.0, -0.5));

        let offset = Pose::new(10.0, 0.0, PI / 2.0);
        let q = Pose::new(1.0, 0.0, 0.0).homogeneous(&offset);
        assert!((q.x - 10.0).abs() < 1e-12);
        assert!((q.y - 1.0).abs() < 1e-12);
        assert!((q.th - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_pose_vector_conversion() {
        let p = Pose::new(1.0, -2.0, 3.0);
        assert_eq!(Pose::from(p.to_vector()), p);
        assert_eq!(format!("{}", Pose::new(1.0, 2.0, 0.5)), "(1, 2, 0.5)");
    }

    #[test]
    fn test_polar_arithmetic() {
        let a = Polar::new(1.0, 2.0);
        let b = Polar::new(0.5, 0.5);
        assert_eq!(a + b, Polar::new(1.5, 2.5));
        assert_eq!(a - b, Polar::new(0.5, 1.5));
        assert_eq!(a * 2.0, Polar::new(2.0, 4.0));
        assert_eq!(a / 2.0, Polar::new(0.5, 1.0));
    }
}
