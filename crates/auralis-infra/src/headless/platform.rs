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
use auralis_core::platform::PlatformControl;
use std::sync::{Arc, Mutex};

/// A request sent to the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformRequest {
    /// Toggle media playback.
    TogglePlayback,
    /// Skip to the next track.
    NextTrack,
    /// Return to the previous track.
    PreviousTrack,
    /// Fetch the optional preset pack.
    RequestOptionalPack,
    /// Switch audio input path.
    CycleAudioInput,
}

/// A host platform that only records what it was asked to do.
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    requests: Arc<Mutex<Vec<PlatformRequest>>>,
}

impl HeadlessPlatform {
    /// Creates a platform with no requests recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle for reading the recorded requests.
    pub fn probe(&self) -> PlatformProbe {
        PlatformProbe {
            requests: Arc::clone(&self.requests),
        }
    }

    fn push(&self, request: PlatformRequest) {
        log::debug!("Platform request: {request:?}");
        lock(&self.requests).push(request);
    }
}

impl PlatformControl for HeadlessPlatform {
    fn toggle_playback(&mut self) {
        self.push(PlatformRequest::TogglePlayback);
    }

    fn next_track(&mut self) {
        self.push(PlatformRequest::NextTrack);
    }

    fn previous_track(&mut self) {
        self.push(PlatformRequest::PreviousTrack);
    }

    fn request_optional_pack(&mut self) {
        self.push(PlatformRequest::RequestOptionalPack);
    }

    fn cycle_audio_input(&mut self) {
        self.push(PlatformRequest::CycleAudioInput);
    }
}

/// Reads the requests a [`HeadlessPlatform`] received.
#[derive(Debug, Clone)]
pub struct PlatformProbe {
    requests: Arc<Mutex<Vec<PlatformRequest>>>,
}

impl PlatformProbe {
    /// Every request so far, oldest first.
    pub fn requests(&self) -> Vec<PlatformRequest> {
        lock(&self.requests).clone()
    }

    /// How many times `request` was made.
    pub fn count(&self, request: PlatformRequest) -> usize {
        lock(&self.requests).iter().filter(|&&r| r == request).count()
    }
}
