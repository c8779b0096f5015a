// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Provides a Quaternion type for representing tracked orientations.

use serde::{Deserialize, Serialize};

use super::{Vec3, EPSILON};
use std::ops::{Mul, Neg};

/// A unit quaternion stored as `(x, y, z, w)`, `w` being the scalar part.
///
/// Tracking runtimes report every orientation in this layout, so it is kept
/// `#[repr(C)]` and copied straight out of the pose structures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Quaternion {
    /// The x component of the vector part.
    pub x: f32,
    /// The y component of the vector part.
    pub y: f32,
    /// The z component of the vector part.
    pub z: f32,
    /// The scalar (real) part.
    pub w: f32,
}

impl Quaternion {
    /// The identity quaternion, representing no rotation.
    pub const IDENTITY: Quaternion = Quaternion {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Creates a new quaternion from its raw components.
    #[inline]
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Creates a rotation of `angle_radians` around `axis`.
    #[inline]
    pub fn from_axis_angle(axis: Vec3, angle_radians: f32) -> Self {
        let axis = axis.normalize();
        let (s, c) = (angle_radians * 0.5).sin_cos();
        Self::new(axis.x * s, axis.y * s, axis.z * s, c)
    }

    /// Calculates the squared length (magnitude) of the quaternion.
    #[inline]
    pub fn magnitude_squared(&self) -> f32 {
        self.dot(*self)
    }

    /// Returns a normalized version of the quaternion.
    /// If the quaternion has a near-zero magnitude, it returns the identity.
    pub fn normalize(&self) -> Self {
        let mag_sq = self.magnitude_squared();
        if mag_sq > EPSILON {
            let inv = 1.0 / mag_sq.sqrt();
            Self::new(self.x * inv, self.y * inv, self.z * inv, self.w * inv)
        } else {
            Self::IDENTITY
        }
    }

    /// Computes the 4D dot product of two quaternions.
    #[inline]
    pub fn dot(&self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Rotates a 3D vector by this quaternion.
    pub fn rotate_vec3(&self, v: Vec3) -> Vec3 {
        let u = Vec3::new(self.x, self.y, self.z);
        let s = self.w;
        2.0 * u.dot(v) * u + (s * s - u.dot(u)) * v + 2.0 * s * u.cross(v)
    }

    /// Averages two orientations.
    ///
    /// `q` and `-q` encode the same rotation, so `b` is flipped into the
    /// hemisphere of `a` before the components are summed. A degenerate sum
    /// falls back to `a`.
    pub fn average(a: Self, b: Self) -> Self {
        let b = if a.dot(b) < 0.0 { -b } else { b };
        let sum = Self::new(a.x + b.x, a.y + b.y, a.z + b.z, a.w + b.w);
        if sum.magnitude_squared() > EPSILON {
            sum.normalize()
        } else {
            a
        }
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Quaternion {
    type Output = Self;
    /// Hamilton product: `self * rhs` applies `rhs` first.
    fn mul(self, rhs: Self) -> Self {
        Self {
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        }
    }
}

impl Mul<Vec3> for Quaternion {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: Vec3) -> Vec3 {
        self.rotate_vec3(rhs)
    }
}

impl Neg for Quaternion {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::PI;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_identity_leaves_vectors_untouched() {
        let v = Vec3::new(0.3, -1.2, 4.0);
        assert_abs_diff_eq!(Quaternion::IDENTITY * v, v);
    }

    #[test]
    fn test_yaw_quarter_turn_maps_forward_to_left() {
        let q = Quaternion::from_axis_angle(Vec3::Y, PI / 2.0);
        assert_abs_diff_eq!(q * Vec3::FORWARD, Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(q.magnitude_squared(), 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_composition_applies_right_operand_first() {
        let yaw = Quaternion::from_axis_angle(Vec3::Y, PI / 2.0);
        let pitch = Quaternion::from_axis_angle(Vec3::X, PI / 2.0);
        let v = Vec3::FORWARD;
        assert_abs_diff_eq!((yaw * pitch) * v, yaw * (pitch * v), epsilon = 1e-5);
    }

    #[test]
    fn test_average_handles_opposite_hemispheres() {
        let q = Quaternion::from_axis_angle(Vec3::Y, 0.2);
        let avg = Quaternion::average(q, -q);
        assert_relative_eq!(avg.dot(q).abs(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_average_of_two_yaws_is_halfway() {
        let a = Quaternion::from_axis_angle(Vec3::Y, 0.1);
        let b = Quaternion::from_axis_angle(Vec3::Y, 0.3);
        let expected = Quaternion::from_axis_angle(Vec3::Y, 0.2);
        let avg = Quaternion::average(a, b);
        assert_relative_eq!(avg.dot(expected), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_normalize_degenerate_returns_identity() {
        let q = Quaternion::new(0.0, 0.0, 0.0, 0.0).normalize();
        assert_eq!(q, Quaternion::IDENTITY);
    }
}
