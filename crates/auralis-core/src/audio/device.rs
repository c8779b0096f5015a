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

//! Defines the contract for audio capture backends.

use anyhow::Result;

/// Describes the format of a running audio stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamInfo {
    /// Number of interleaved channels per frame.
    pub channels: u16,
    /// Frames per second.
    pub sample_rate: u32,
}

/// A source of live audio, such as a capture device.
///
/// The backend owns its delivery thread and calls `on_samples` with every
/// block it receives. The callback runs off the frame loop and must not block.
pub trait AudioInput: Send {
    /// Starts delivering audio until the process exits.
    fn start(self: Box<Self>, on_samples: Box<dyn FnMut(&[f32], &StreamInfo) + Send>)
        -> Result<()>;
}
