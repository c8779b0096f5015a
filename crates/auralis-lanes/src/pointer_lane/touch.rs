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

use auralis_core::math::{Vec3, EPSILON};
use auralis_core::xr::{HandJoint, HandSkeleton};

/// How far past the index tip the touch point sits, in meters.
pub const TOUCH_TIP_PUSH: f32 = 0.007;

/// A closed range of signed distances from the panel plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchBand {
    /// Deepest accepted distance (behind the panel is negative).
    pub min: f32,
    /// Farthest accepted distance in front of the panel.
    pub max: f32,
}

impl TouchBand {
    /// Creates a band covering `[min, max]`.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Whether `distance` lies within the band.
    pub fn contains(&self, distance: f32) -> bool {
        distance <= self.max && distance >= self.min
    }
}

/// Distance bands of direct touch.
///
/// Pressing starts inside `acquire` and only ends when the fingertip leaves
/// the wider `release` band, so a finger resting on the surface does not
/// chatter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchBands {
    /// Where the fingertip is drawn as hovering.
    pub hover: TouchBand,
    /// Where an unlatched fingertip starts pressing.
    pub acquire: TouchBand,
    /// Where a latched fingertip keeps pressing.
    pub release: TouchBand,
}

impl Default for TouchBands {
    fn default() -> Self {
        Self {
            hover: TouchBand::new(-0.015, 0.030),
            acquire: TouchBand::new(-0.015, 0.010),
            release: TouchBand::new(-0.028, 0.018),
        }
    }
}

/// Press hysteresis of one fingertip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TouchLatch {
    latched: bool,
}

impl TouchLatch {
    /// Feeds the current signed distance and returns whether the fingertip presses.
    pub fn update(&mut self, distance: f32, bands: &TouchBands) -> bool {
        let active = if self.latched {
            bands.release.contains(distance)
        } else {
            bands.acquire.contains(distance)
        };
        self.latched = active;
        active
    }

    /// Whether the fingertip is currently pressing.
    pub fn is_latched(&self) -> bool {
        self.latched
    }

    /// Forgets any press in progress.
    pub fn reset(&mut self) {
        self.latched = false;
    }
}

/// The point used for direct touch: the index tip, pushed slightly along
/// the finger when the distal joint is tracked.
pub fn touch_point(skeleton: &HandSkeleton) -> Option<Vec3> {
    let tip = skeleton.joint(HandJoint::IndexTip)?;
    if let Some(distal) = skeleton.joint(HandJoint::IndexDistal) {
        let along = tip - distal;
        let length = along.length();
        if length > EPSILON {
            return Some(tip + along * (TOUCH_TIP_PUSH / length));
        }
    }
    Some(tip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn latch_holds_through_the_release_band() {
        let bands = TouchBands::default();
        let mut latch = TouchLatch::default();
        let pressed: Vec<bool> = [0.005, 0.012, 0.020]
            .iter()
            .map(|&d| latch.update(d, &bands))
            .collect();
        assert_eq!(pressed, vec![true, true, false]);
    }

    #[test]
    fn unlatched_finger_needs_the_acquire_band() {
        let bands = TouchBands::default();
        let mut latch = TouchLatch::default();
        assert!(!latch.update(0.012, &bands));
        assert!(!latch.update(-0.020, &bands));
        assert!(latch.update(-0.010, &bands));
        // Deeper than acquire but still inside release.
        assert!(latch.update(-0.025, &bands));
        assert!(!latch.update(-0.030, &bands));
    }

    #[test]
    fn hover_band_is_wider_than_acquire() {
        let bands = TouchBands::default();
        assert!(bands.hover.contains(0.025));
        assert!(!bands.acquire.contains(0.025));
        assert!(!bands.hover.contains(0.031));
    }

    #[test]
    fn touch_point_extends_past_the_tip() {
        let skeleton = HandSkeleton::default()
            .with_joint(HandJoint::IndexDistal, Vec3::new(0.0, 0.0, 0.0))
            .with_joint(HandJoint::IndexTip, Vec3::new(0.0, 0.0, -0.02));
        let point = touch_point(&skeleton).expect("tip is tracked");
        assert_relative_eq!(point, Vec3::new(0.0, 0.0, -0.027), epsilon = 1e-6);
    }

    #[test]
    fn touch_point_without_distal_is_the_tip() {
        let tip = Vec3::new(0.1, 0.2, 0.3);
        let skeleton = HandSkeleton::default().with_joint(HandJoint::IndexTip, tip);
        assert_eq!(touch_point(&skeleton), Some(tip));
        assert_eq!(touch_point(&HandSkeleton::default()), None);
    }
}
