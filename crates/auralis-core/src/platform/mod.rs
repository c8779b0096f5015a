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

//! Platform-facing types: lifecycle signals coming in, host requests going out.

use crate::audio::AudioSourceKind;
use serde::{Deserialize, Serialize};

/// A lifecycle notification delivered by the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleSignal {
    /// The application moved to the foreground.
    Resumed,
    /// The application moved to the background.
    Paused,
    /// A presentation surface became available.
    WindowCreated,
    /// The presentation surface went away.
    WindowDestroyed,
    /// The host is tearing the application down.
    Destroy,
}

/// The latest playback state reported by the host's media layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UiSnapshot {
    /// Which audio path is active.
    pub audio_source: AudioSourceKind,
    /// Whether media playback is running.
    pub is_playing: bool,
    /// Title, path or URL of the current track.
    pub track_label: String,
}

/// Requests the visualizer sends back to its host.
///
/// Implementations forward these to the media layer; they must return
/// quickly since they are called from the frame loop.
pub trait PlatformControl {
    /// Toggles media playback.
    fn toggle_playback(&mut self);
    /// Skips to the next track.
    fn next_track(&mut self);
    /// Returns to the previous track.
    fn previous_track(&mut self);
    /// Asks the host to fetch the optional preset pack.
    fn request_optional_pack(&mut self);
    /// Switches to the next audio input path.
    fn cycle_audio_input(&mut self);
}
