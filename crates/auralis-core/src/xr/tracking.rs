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

//! Hand and controller tracking contracts.

use super::{Limb, XrError};
use crate::math::{Pose, Vec3};

/// Interaction profile reported while the runtime drives a limb from hand tracking.
pub const HAND_INTERACTION_PROFILE: &str = "/interaction_profiles/ext/hand_interaction_ext";

/// Interaction profiles of the supported motion controllers.
pub const CONTROLLER_PROFILES: [&str; 3] = [
    "/interaction_profiles/meta/touch_controller_plus",
    "/interaction_profiles/meta/touch_controller_pro",
    "/interaction_profiles/oculus/touch_controller",
];

/// Decides whether a reported interaction profile means direct hand input.
///
/// The hand profile is hand input. Some runtime builds expose other,
/// non-controller paths while hands are tracked, so anything that is not a
/// known controller also counts. No profile at all is not hand input.
pub fn classify_profile(profile: Option<&str>) -> bool {
    match profile {
        None => false,
        Some(HAND_INTERACTION_PROFILE) => true,
        Some(path) => !CONTROLLER_PROFILES.contains(&path),
    }
}

/// The hand joints the interaction core reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandJoint {
    /// Centre of the palm.
    Palm,
    /// The wrist.
    Wrist,
    /// Tip of the thumb.
    ThumbTip,
    /// Last joint before the index fingertip.
    IndexDistal,
    /// Tip of the index finger.
    IndexTip,
}

impl HandJoint {
    /// Number of joints in a [`HandSkeleton`].
    pub const COUNT: usize = 5;

    /// Index into [`HandSkeleton::joints`].
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Located joints of one hand; `None` marks a joint without a valid position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HandSkeleton {
    /// Joint positions in tracking space, indexed by [`HandJoint::index`].
    pub joints: [Option<Vec3>; HandJoint::COUNT],
}

impl HandSkeleton {
    /// Position of `joint`, if tracked.
    pub fn joint(&self, joint: HandJoint) -> Option<Vec3> {
        self.joints[joint.index()]
    }

    /// Sets the position of `joint`.
    pub fn with_joint(mut self, joint: HandJoint, position: Vec3) -> Self {
        self.joints[joint.index()] = Some(position);
        self
    }
}

/// Optional articulated hand tracking capability.
pub trait HandTracker {
    /// Locates the joints of `limb` at `time`.
    ///
    /// ## Returns
    /// `Ok(None)` while the hand is not tracked.
    fn locate_joints(&mut self, limb: Limb, time: i64) -> Result<Option<HandSkeleton>, XrError>;
}

/// Current state of a controller's inputs.
///
/// The trigger is a level. The button flags are presses: each is set only on
/// the first synchronization after the button went down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActionSnapshot {
    /// Analog trigger value in `[0, 1]`.
    pub trigger: f32,
    /// A on the right controller, X on the left.
    pub primary: bool,
    /// B on the right controller, Y on the left.
    pub secondary: bool,
    /// Thumbstick click.
    pub thumbstick: bool,
}

impl ActionSnapshot {
    /// The same state with every button press consumed.
    pub fn released(self) -> Self {
        Self {
            trigger: self.trigger,
            ..Self::default()
        }
    }
}

/// The runtime's input system.
pub trait TrackingSystem {
    /// Synchronizes action state for this frame.
    fn sync_actions(&mut self) -> Result<(), XrError>;

    /// The interaction profile currently bound to `limb`.
    fn interaction_profile(&mut self, limb: Limb) -> Option<String>;

    /// The aim pose of `limb` at `time`, if both position and orientation are valid.
    fn aim_pose(&mut self, limb: Limb, time: i64) -> Option<Pose>;

    /// Button and trigger state of `limb`'s controller as of the last
    /// `sync_actions`.
    fn actions(&mut self, limb: Limb) -> ActionSnapshot;

    /// The articulated hand tracker, when the runtime provides one.
    fn hand_tracker(&mut self) -> Option<&mut dyn HandTracker> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_classification() {
        assert!(!classify_profile(None));
        assert!(classify_profile(Some(HAND_INTERACTION_PROFILE)));
        for controller in CONTROLLER_PROFILES {
            assert!(!classify_profile(Some(controller)));
        }
        assert!(classify_profile(Some("/interaction_profiles/vendor/unknown_hand")));
    }

    #[test]
    fn test_released_keeps_only_the_trigger() {
        let snapshot = ActionSnapshot {
            trigger: 0.8,
            primary: true,
            secondary: true,
            thumbstick: true,
        };
        assert_eq!(
            snapshot.released(),
            ActionSnapshot {
                trigger: 0.8,
                ..ActionSnapshot::default()
            }
        );
    }

    #[test]
    fn test_skeleton_joint_lookup() {
        let skeleton = HandSkeleton::default().with_joint(HandJoint::IndexTip, Vec3::X);
        assert_eq!(skeleton.joint(HandJoint::IndexTip), Some(Vec3::X));
        assert_eq!(skeleton.joint(HandJoint::IndexDistal), None);
    }
}
