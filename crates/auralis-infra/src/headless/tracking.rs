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

use super::lock;
use auralis_core::math::Pose;
use auralis_core::xr::tracking::{CONTROLLER_PROFILES, HAND_INTERACTION_PROFILE};
use auralis_core::xr::{
    ActionSnapshot, HandSkeleton, HandTracker, Limb, TrackingSystem, XrCall, XrError,
};
use std::sync::{Arc, Mutex};

/// Scripted state of one limb.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LimbScript {
    /// Interaction profile reported for the limb.
    pub profile: Option<String>,
    /// Aim pose; `None` when the limb is not located.
    pub aim: Option<Pose>,
    /// Button and trigger state. Button flags set here are reported for one
    /// synchronized frame and then cleared.
    pub actions: ActionSnapshot,
    /// Joint positions for the hand tracker.
    pub skeleton: Option<HandSkeleton>,
}

impl LimbScript {
    /// A controller aimed along `aim`.
    pub fn controller(aim: Pose) -> Self {
        Self {
            profile: Some(CONTROLLER_PROFILES[2].to_string()),
            aim: Some(aim),
            ..Self::default()
        }
    }

    /// A tracked hand with the given joints.
    pub fn hand(skeleton: HandSkeleton) -> Self {
        Self {
            profile: Some(HAND_INTERACTION_PROFILE.to_string()),
            skeleton: Some(skeleton),
            ..Self::default()
        }
    }
}

#[derive(Debug)]
struct Shared {
    limbs: [LimbScript; 2],
    synced: [ActionSnapshot; 2],
    hand_tracking: bool,
    fail_sync: bool,
    syncs: u64,
}

/// An input system replaying scripted limb state.
///
/// Hand tracking is available by default; without it the frame loop has
/// to fall back to controller input.
#[derive(Debug)]
pub struct HeadlessTracking {
    shared: Arc<Mutex<Shared>>,
}

impl HeadlessTracking {
    /// Creates an input system with nothing tracked.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                limbs: [LimbScript::default(), LimbScript::default()],
                synced: [ActionSnapshot::default(); 2],
                hand_tracking: true,
                fail_sync: false,
                syncs: 0,
            })),
        }
    }

    /// A handle for scripting this input system.
    pub fn probe(&self) -> TrackingProbe {
        TrackingProbe {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl Default for HeadlessTracking {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackingSystem for HeadlessTracking {
    fn sync_actions(&mut self) -> Result<(), XrError> {
        let mut shared = lock(&self.shared);
        if shared.fail_sync {
            return Err(XrError::call(XrCall::SyncActions, "session not focused"));
        }
        let Shared { limbs, synced, .. } = &mut *shared;
        for (snapshot, limb) in synced.iter_mut().zip(limbs.iter_mut()) {
            *snapshot = limb.actions;
            limb.actions = limb.actions.released();
        }
        shared.syncs += 1;
        Ok(())
    }

    fn interaction_profile(&mut self, limb: Limb) -> Option<String> {
        lock(&self.shared).limbs[limb.index()].profile.clone()
    }

    fn aim_pose(&mut self, limb: Limb, _time: i64) -> Option<Pose> {
        lock(&self.shared).limbs[limb.index()].aim
    }

    fn actions(&mut self, limb: Limb) -> ActionSnapshot {
        lock(&self.shared).synced[limb.index()]
    }

    fn hand_tracker(&mut self) -> Option<&mut dyn HandTracker> {
        let available = lock(&self.shared).hand_tracking;
        if available {
            Some(self as &mut dyn HandTracker)
        } else {
            None
        }
    }
}

impl HandTracker for HeadlessTracking {
    fn locate_joints(&mut self, limb: Limb, _time: i64) -> Result<Option<HandSkeleton>, XrError> {
        Ok(lock(&self.shared).limbs[limb.index()].skeleton)
    }
}

/// Scripts a [`HeadlessTracking`].
#[derive(Debug, Clone)]
pub struct TrackingProbe {
    shared: Arc<Mutex<Shared>>,
}

impl TrackingProbe {
    /// Replaces the state of `limb`.
    pub fn set_limb(&self, limb: Limb, script: LimbScript) {
        lock(&self.shared).limbs[limb.index()] = script;
    }

    /// Edits the state of `limb` in place.
    pub fn update_limb(&self, limb: Limb, edit: impl FnOnce(&mut LimbScript)) {
        edit(&mut lock(&self.shared).limbs[limb.index()]);
    }

    /// Current state of `limb`.
    pub fn limb(&self, limb: Limb) -> LimbScript {
        lock(&self.shared).limbs[limb.index()].clone()
    }

    /// Turns the articulated hand tracker on or off.
    pub fn set_hand_tracking(&self, available: bool) {
        lock(&self.shared).hand_tracking = available;
    }

    /// Makes action synchronization fail until cleared.
    pub fn set_sync_failure(&self, fail: bool) {
        lock(&self.shared).fail_sync = fail;
    }

    /// Successful action synchronizations.
    pub fn syncs(&self) -> u64 {
        lock(&self.shared).syncs
    }
}
