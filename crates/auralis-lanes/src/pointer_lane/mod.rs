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

//! Resolves where each limb points on the HUD panel.

mod resolver;
mod touch;

pub use resolver::{hud_panel, LimbInput, PointerResolver, HAND_MAX_DISTANCE, HAND_MIN_V_OFFSET};
pub use touch::{touch_point, TouchBand, TouchBands, TouchLatch, TOUCH_TIP_PUSH};

use auralis_core::math::Vec2;
use auralis_core::xr::PointerMarker;

/// What a single limb is doing on the panel this frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PointerState {
    /// Not pointing at the panel.
    #[default]
    None,
    /// A controller ray hits the panel.
    Ray {
        /// Hit position in panel space.
        uv: Vec2,
    },
    /// A fingertip hovers over or touches the panel.
    Touch {
        /// Fingertip position in panel space.
        uv: Vec2,
        /// Whether the fingertip is pressing.
        active: bool,
    },
}

impl PointerState {
    /// Whether the pointer should be drawn.
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Panel-space position, if visible.
    pub fn uv(&self) -> Option<Vec2> {
        match *self {
            Self::None => None,
            Self::Ray { uv } | Self::Touch { uv, .. } => Some(uv),
        }
    }

    /// Whether this is a pressing fingertip.
    pub fn is_touch_active(&self) -> bool {
        matches!(self, Self::Touch { active: true, .. })
    }

    /// The marker handed to the compositor.
    pub fn marker(&self) -> Option<PointerMarker> {
        self.uv().map(|uv| PointerMarker {
            uv,
            pressed: self.is_touch_active(),
        })
    }
}
