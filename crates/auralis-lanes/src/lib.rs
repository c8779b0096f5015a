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

//! # Auralis Lanes
//!
//! The hot-path work done once per frame by the scheduler. Each lane owns its
//! state and exposes a single step-style entry point:
//!
//! - [`pointer_lane`] turns tracked hands and controllers into HUD pointers.
//! - [`hud_lane`] holds the HUD's buttons, visibility, flashes and text.
//! - [`audio_lane`] moves queued PCM into the engine, synthesizing a tone
//!   when the host goes quiet.

#![warn(missing_docs)]

pub mod audio_lane;
pub mod hud_lane;
pub mod pointer_lane;

pub use audio_lane::{AudioLane, AudioStep};
pub use hud_lane::{FlashKey, HudButton, HudState};
pub use pointer_lane::{LimbInput, PointerResolver, PointerState};
