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

use auralis_core::math::Vec2;

/// The HUD element that lights up when an action fires.
///
/// Controller buttons and panel buttons share these so the panel mirrors
/// whichever input was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlashKey {
    /// A button or next preset.
    A,
    /// B button or next track.
    B,
    /// X button or previous preset.
    X,
    /// Y button or play/pause.
    Y,
    /// Right trigger or projection toggle.
    RightTrigger,
    /// Left trigger or pack request.
    LeftTrigger,
    /// Thumbstick clicks and the audio input button.
    Menu,
}

impl FlashKey {
    /// Number of flash keys.
    pub const COUNT: usize = 7;

    /// Every key, in flash-array order.
    pub const ALL: [FlashKey; Self::COUNT] = [
        Self::A,
        Self::B,
        Self::X,
        Self::Y,
        Self::RightTrigger,
        Self::LeftTrigger,
        Self::Menu,
    ];

    /// Slot of this key in the flash array.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A button drawn on the HUD panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HudButton {
    /// Loads the previous preset.
    PrevPreset,
    /// Loads the next preset.
    NextPreset,
    /// Toggles media playback.
    TogglePlay,
    /// Skips to the next track.
    NextTrack,
    /// Requests the optional preset pack.
    OptionalPack,
    /// Cycles the audio input path.
    CycleAudio,
    /// Switches between full sphere and front dome.
    ToggleProjection,
}

impl HudButton {
    /// The flash lit when the button fires.
    pub fn flash_key(self) -> FlashKey {
        match self {
            Self::PrevPreset => FlashKey::X,
            Self::NextPreset => FlashKey::A,
            Self::TogglePlay => FlashKey::Y,
            Self::NextTrack => FlashKey::B,
            Self::OptionalPack => FlashKey::LeftTrigger,
            Self::CycleAudio => FlashKey::Menu,
            Self::ToggleProjection => FlashKey::RightTrigger,
        }
    }

    /// The caption drawn on the button.
    pub fn caption(self) -> &'static str {
        match self {
            Self::PrevPreset => "PREV PRESET",
            Self::NextPreset => "NEXT PRESET",
            Self::TogglePlay => "PLAY PAUSE",
            Self::NextTrack => "NEXT TRACK",
            Self::OptionalPack => "PACK",
            Self::CycleAudio => "AUDIO MODE",
            Self::ToggleProjection => "PROJECTION",
        }
    }
}

/// A button's rectangle in panel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HotZone {
    /// The button occupying the rectangle.
    pub button: HudButton,
    /// Lower-left corner.
    pub min: Vec2,
    /// Upper-right corner.
    pub max: Vec2,
}

impl HotZone {
    const fn new(button: HudButton, u: (f32, f32), v: (f32, f32)) -> Self {
        Self {
            button,
            min: Vec2::new(u.0, v.0),
            max: Vec2::new(u.1, v.1),
        }
    }

    /// Whether `uv` lies inside the rectangle, edges included.
    pub fn contains(&self, uv: Vec2) -> bool {
        uv.x >= self.min.x && uv.x <= self.max.x && uv.y >= self.min.y && uv.y <= self.max.y
    }
}

/// Button layout, top row first. `v` grows upwards.
pub const HOT_ZONES: [HotZone; 7] = [
    HotZone::new(HudButton::PrevPreset, (0.07, 0.46), (0.60, 0.82)),
    HotZone::new(HudButton::NextPreset, (0.54, 0.93), (0.60, 0.82)),
    HotZone::new(HudButton::TogglePlay, (0.07, 0.46), (0.30, 0.52)),
    HotZone::new(HudButton::NextTrack, (0.54, 0.93), (0.30, 0.52)),
    HotZone::new(HudButton::OptionalPack, (0.07, 0.33), (0.08, 0.24)),
    HotZone::new(HudButton::CycleAudio, (0.37, 0.63), (0.08, 0.24)),
    HotZone::new(HudButton::ToggleProjection, (0.67, 0.93), (0.08, 0.24)),
];

/// The button under `uv`, first match wins.
pub fn hit_test(uv: Vec2) -> Option<HudButton> {
    HOT_ZONES
        .iter()
        .find(|zone| zone.contains(uv))
        .map(|zone| zone.button)
}
