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

//! Audio ingestion primitives shared between the capture thread and the frame loop.

pub mod device;
pub mod ring_buffer;
pub mod tone;

pub use device::{AudioInput, StreamInfo};
pub use ring_buffer::{AudioRingBuffer, CHANNELS};
pub use tone::SyntheticTone;

use serde::{Deserialize, Serialize};

/// Sample rate the visualizer expects from every audio producer.
pub const SAMPLE_RATE: u32 = 48_000;

/// The audio path currently feeding the visualizer, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AudioSourceKind {
    /// The built-in fallback tone.
    #[default]
    Synthetic,
    /// System-wide playback capture.
    GlobalCapture,
    /// Capture of the host's own media player.
    MediaFallback,
    /// A microphone input.
    Microphone,
}

impl AudioSourceKind {
    /// Maps the integer code used by host bindings.
    ///
    /// Anything at or below zero is synthetic, anything above two is the
    /// microphone.
    pub fn from_code(code: i32) -> Self {
        match code {
            i32::MIN..=0 => Self::Synthetic,
            1 => Self::GlobalCapture,
            2 => Self::MediaFallback,
            _ => Self::Microphone,
        }
    }

    /// Upper-case label shown on the HUD.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Synthetic => "SYNTHETIC",
            Self::GlobalCapture => "GLOBAL CAPTURE",
            Self::MediaFallback => "MEDIA FALLBACK",
            Self::Microphone => "MICROPHONE",
        }
    }
}
