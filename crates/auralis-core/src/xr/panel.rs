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

//! Geometry of the floating HUD panel.

use crate::math::{Pose, Vec2, Vec3};

/// Denominator below which a ray is treated as parallel to the panel.
pub const RAY_PARALLEL_EPSILON: f32 = 1e-5;

/// The HUD panel's placement for one frame.
///
/// `right`, `up` and `normal` form an orthonormal basis; `normal` points back
/// towards the viewer. Panel-space UV has its origin at the bottom left
/// corner: `u = dot(p - center, right) / width + 0.5`, likewise for `v`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelFrame {
    /// Centre of the panel in tracking space.
    pub center: Vec3,
    /// Unit vector along increasing `u`.
    pub right: Vec3,
    /// Unit vector along increasing `v`.
    pub up: Vec3,
    /// Unit vector facing the viewer.
    pub normal: Vec3,
    /// Panel width in metres.
    pub width: f32,
    /// Panel height in metres.
    pub height: f32,
}

impl PanelFrame {
    /// Places a `width` x `height` panel in front of `head`.
    ///
    /// The centre sits `distance` metres ahead and `v_offset` metres above
    /// (negative is below) the head, in the head's own frame.
    pub fn in_front_of(head: &Pose, distance: f32, v_offset: f32, width: f32, height: f32) -> Self {
        let q = head.orientation;
        Self {
            center: head.transform_point(Vec3::new(0.0, v_offset, -distance)),
            right: (q * Vec3::X).normalize(),
            up: (q * Vec3::Y).normalize(),
            normal: (q * Vec3::Z).normalize(),
            width,
            height,
        }
    }

    /// Projects `point` onto the panel.
    ///
    /// ## Returns
    /// The panel UV and the signed distance along the normal (positive in
    /// front of the panel), or `None` if the projection falls outside the
    /// panel rectangle.
    pub fn project_point(&self, point: Vec3) -> Option<(Vec2, f32)> {
        let local = point - self.center;
        let uv = self.local_to_uv(local)?;
        Some((uv, local.dot(self.normal)))
    }

    /// Intersects the ray `origin + t * direction` with the panel plane.
    ///
    /// Rays nearly parallel to the plane, hits behind the origin, non-finite
    /// results and hits outside the panel rectangle all yield `None`.
    pub fn raycast(&self, origin: Vec3, direction: Vec3) -> Option<Vec2> {
        let direction = direction.normalize();
        let denom = direction.dot(self.normal);
        if denom.abs() < RAY_PARALLEL_EPSILON {
            return None;
        }

        let t = (self.center - origin).dot(self.normal) / denom;
        if !t.is_finite() || t <= 0.0 {
            return None;
        }

        let hit = origin + direction * t;
        if !hit.is_finite() {
            return None;
        }
        self.local_to_uv(hit - self.center)
    }

    /// Casts the forward ray of an aim pose onto the panel.
    pub fn raycast_pose(&self, aim: &Pose) -> Option<Vec2> {
        self.raycast(aim.position, aim.forward())
    }

    fn local_to_uv(&self, local: Vec3) -> Option<Vec2> {
        let uv = Vec2::new(
            local.dot(self.right) / self.width + 0.5,
            local.dot(self.up) / self.height + 0.5,
        );
        uv.in_unit_square().then_some(uv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Quaternion, PI};
    use approx::assert_abs_diff_eq;

    fn origin_panel() -> PanelFrame {
        PanelFrame {
            center: Vec3::ZERO,
            right: Vec3::X,
            up: Vec3::Y,
            normal: Vec3::Z,
            width: 0.68,
            height: 0.36,
        }
    }

    #[test]
    fn ray_through_centre_hits_panel_centre() {
        let panel = origin_panel();
        let uv = panel.raycast(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert_abs_diff_eq!(uv.expect("centre hit"), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn parallel_ray_misses() {
        let panel = origin_panel();
        assert!(panel
            .raycast(Vec3::new(0.0, 0.0, 5.0), Vec3::new(1.0, 0.0, 0.0))
            .is_none());
    }

    #[test]
    fn ray_pointing_away_misses() {
        let panel = origin_panel();
        assert!(panel
            .raycast(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0))
            .is_none());
    }

    #[test]
    fn ray_outside_rectangle_misses() {
        let panel = origin_panel();
        assert!(panel
            .raycast(Vec3::new(0.5, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0))
            .is_none());
    }

    #[test]
    fn off_centre_hit_maps_to_uv() {
        let panel = origin_panel();
        let uv = panel
            .raycast(Vec3::new(0.17, -0.09, 1.0), Vec3::new(0.0, 0.0, -1.0))
            .expect("hit");
        assert_abs_diff_eq!(uv, Vec2::new(0.75, 0.25), epsilon = 1e-5);
    }

    #[test]
    fn project_point_reports_signed_distance() {
        let panel = origin_panel();
        let (uv, d) = panel.project_point(Vec3::new(0.0, 0.0, 0.02)).expect("inside");
        assert_abs_diff_eq!(uv, Vec2::new(0.5, 0.5));
        assert_abs_diff_eq!(d, 0.02, epsilon = 1e-6);

        let (_, behind) = panel.project_point(Vec3::new(0.0, 0.0, -0.01)).expect("inside");
        assert!(behind < 0.0);
        assert!(panel.project_point(Vec3::new(1.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn panel_follows_head_yaw() {
        let head = Pose::new(
            Vec3::new(0.0, 1.6, 0.0),
            Quaternion::from_axis_angle(Vec3::Y, PI / 2.0),
        );
        let panel = PanelFrame::in_front_of(&head, 0.72, -0.27, 0.68, 0.36);
        // Facing -X after a quarter turn to the left.
        assert_abs_diff_eq!(panel.center, Vec3::new(-0.72, 1.33, 0.0), epsilon = 1e-5);
        assert_abs_diff_eq!(panel.normal, Vec3::X, epsilon = 1e-5);

        let aim = Pose::new(head.position + Vec3::new(0.0, -0.27, 0.0), head.orientation);
        let uv = panel.raycast_pose(&aim).expect("gaze hits panel");
        assert_abs_diff_eq!(uv, Vec2::new(0.5, 0.5), epsilon = 1e-5);
    }
}
