// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::math::{Vec3, EPSILON};

/// Quaternion stored as `(x, y, z, w)`.
///
/// Angles are in radians. Camera orientations handed out by drivers are
/// always unit quaternions; use [`Quat::normalize`] after composing.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Quat {
    data: [f64; 4],
}

impl Quat {
    /// Creates a quaternion from components.
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { data: [x, y, z, w] }
    }

    /// Returns the identity quaternion.
    pub const fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    /// Returns the quaternion as an `(x, y, z, w)` array.
    pub fn to_array(self) -> [f64; 4] {
        self.data
    }

    fn component(&self, idx: usize) -> f64 {
        self.data[idx]
    }

    /// Constructs a rotation of `angle` radians about `axis`.
    ///
    /// The axis is normalised internally; a degenerate axis yields identity.
    pub fn from_axis_angle(axis: Vec3, angle: f64) -> Self {
        let len_sq = axis.length_squared();
        if len_sq <= EPSILON * EPSILON {
            return Self::identity();
        }
        let norm_axis = axis.scale(1.0 / len_sq.sqrt());
        let (sin_half, cos_half) = (angle * 0.5).sin_cos();
        let scaled = norm_axis.scale(sin_half);
        Self::new(
            scaled.component(0),
            scaled.component(1),
            scaled.component(2),
            cos_half,
        )
    }

    /// Hamilton product (`self * other`).
    ///
    /// With `self` as a frame's orientation, `other` is applied in that
    /// frame's local coordinates. Non-commutative.
    pub fn multiply(&self, other: &Self) -> Self {
        let [ax, ay, az, aw] = self.data;
        let [bx, by, bz, bw] = other.data;

        Self::new(
            aw * bx + ax * bw + ay * bz - az * by,
            aw * by - ax * bz + ay * bw + az * bx,
            aw * bz + ax * by - ay * bx + az * bw,
            aw * bw - ax * bx - ay * by - az * bz,
        )
    }

    /// Euclidean norm of the four components.
    pub fn length(&self) -> f64 {
        self.data.iter().map(|c| c * c).sum::<f64>().sqrt()
    }

    /// Normalises the quaternion; returns identity when the norm is ~0.
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len <= EPSILON {
            return Self::identity();
        }
        let inv = 1.0 / len;
        Self::new(
            self.component(0) * inv,
            self.component(1) * inv,
            self.component(2) * inv,
            self.component(3) * inv,
        )
    }

    /// True when the norm is within `tolerance` of one.
    pub fn is_normalized(&self, tolerance: f64) -> bool {
        (self.length() - 1.0).abs() <= tolerance
    }

    /// Rotates a direction by this (unit) quaternion.
    pub fn rotate(&self, v: &Vec3) -> Vec3 {
        let [x, y, z, w] = self.data;
        let u = Vec3::new(x, y, z);
        // v' = v + 2w(u × v) + 2(u × (u × v))
        let uv = cross(&u, v);
        let uuv = cross(&u, &uv);
        Vec3::new(
            v.component(0) + 2.0 * (w * uv.component(0) + uuv.component(0)),
            v.component(1) + 2.0 * (w * uv.component(1) + uuv.component(1)),
            v.component(2) + 2.0 * (w * uv.component(2) + uuv.component(2)),
        )
    }
}

fn cross(a: &Vec3, b: &Vec3) -> Vec3 {
    let [ax, ay, az] = a.to_array();
    let [bx, by, bz] = b.to_array();
    Vec3::new(ay * bz - az * by, az * bx - ax * bz, ax * by - ay * bx)
}

impl Default for Quat {
    fn default() -> Self {
        Self::identity()
    }
}

/// Components are taken verbatim; normalisation is not enforced.
impl From<[f64; 4]> for Quat {
    fn from(value: [f64; 4]) -> Self {
        Self { data: value }
    }
}
