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

//! Rigid poses reported by the tracking runtime.

use serde::{Deserialize, Serialize};

use super::{Quaternion, Vec3};

/// A position plus orientation in tracking space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    /// Position in metres.
    pub position: Vec3,
    /// Orientation as a unit quaternion.
    pub orientation: Quaternion,
}

impl Pose {
    /// Creates a pose from its parts.
    pub fn new(position: Vec3, orientation: Quaternion) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// The direction this pose points at (`orientation * -Z`).
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::FORWARD
    }

    /// Transforms a point given in this pose's local frame into tracking space.
    #[inline]
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.orientation * local
    }

    /// Builds the head pose that sits between two eye poses.
    pub fn center_of(left: &Pose, right: &Pose) -> Pose {
        Pose {
            position: left.position.midpoint(right.position),
            orientation: Quaternion::average(left.orientation, right.orientation),
        }
    }
}
