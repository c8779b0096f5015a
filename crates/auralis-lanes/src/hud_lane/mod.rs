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

//! The head-locked control panel: button layout, visibility, flashes and text.

mod buttons;
mod labels;
mod state;

pub use buttons::{hit_test, FlashKey, HotZone, HudButton, HOT_ZONES};
pub use labels::{preset_label, sanitize_hud_text, track_label, LABEL_MAX_CHARS};
pub use state::{
    HudState, FEEDBACK_SECONDS, FLASH_PEAK, VISIBLE_AFTER_INTERACTION, VISIBLE_AFTER_STATUS_CHANGE,
    VISIBLE_ON_START,
};
