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

//! State shared between the frame loop and the host's threads.

use auralis_core::audio::{AudioInput, StreamInfo, CHANNELS, SAMPLE_RATE};
use auralis_core::platform::UiSnapshot;
use auralis_core::{AudioRingBuffer, AudioSourceKind};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Audio and playback state written by the host and read by the frame loop.
///
/// Each part has its own lock and no code path holds both.
#[derive(Debug)]
pub struct SharedState {
    ring: AudioRingBuffer,
    ui: Mutex<UiSnapshot>,
}

impl SharedState {
    /// Creates the shared state with a ring of `ring_capacity_frames`.
    pub fn new(ring_capacity_frames: usize) -> Self {
        Self {
            ring: AudioRingBuffer::new(ring_capacity_frames),
            ui: Mutex::new(UiSnapshot::default()),
        }
    }

    /// The audio ingestion buffer.
    pub fn ring(&self) -> &AudioRingBuffer {
        &self.ring
    }

    /// A copy of the latest playback state.
    pub fn ui_snapshot(&self) -> UiSnapshot {
        self.lock_ui().clone()
    }

    fn lock_ui(&self) -> MutexGuard<'_, UiSnapshot> {
        self.ui.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A cloneable handle through which a host feeds a running visualizer.
///
/// Every method may be called from any thread.
#[derive(Debug, Clone)]
pub struct VisualizerHandle {
    shared: Arc<SharedState>,
}

impl VisualizerHandle {
    pub(crate) fn new(shared: Arc<SharedState>) -> Self {
        Self { shared }
    }

    /// Queues interleaved stereo audio.
    ///
    /// Input with fewer than one stereo frame or a zero frame count is
    /// dropped.
    ///
    /// ## Returns
    /// The number of frames accepted.
    pub fn push_audio(&self, samples: &[f32], frame_count: usize) -> usize {
        if samples.len() < CHANNELS || frame_count == 0 {
            return 0;
        }
        self.shared.ring.enqueue(samples, frame_count)
    }

    /// Reports the host's playback state.
    pub fn update_ui_state(
        &self,
        audio_source: AudioSourceKind,
        is_playing: bool,
        track_label: impl Into<String>,
    ) {
        let snapshot = UiSnapshot {
            audio_source,
            is_playing,
            track_label: track_label.into(),
        };
        *self.shared.lock_ui() = snapshot;
    }

    /// The latest playback state reported through this handle.
    pub fn ui_snapshot(&self) -> UiSnapshot {
        self.shared.ui_snapshot()
    }

    /// Stereo frames waiting for the frame loop.
    pub fn queued_frames(&self) -> usize {
        self.shared.ring.len_frames()
    }

    /// Starts `input` and routes everything it captures into the visualizer.
    ///
    /// Blocks are converted to stereo on the capture thread. A stream whose
    /// rate differs from the visualizer's is still accepted, with a warning.
    pub fn attach_input(&self, input: Box<dyn AudioInput>) -> anyhow::Result<()> {
        let handle = self.clone();
        let mut stereo = Vec::new();
        let mut rate_warned = false;
        input.start(Box::new(move |samples: &[f32], info: &StreamInfo| {
            if info.sample_rate != SAMPLE_RATE && !rate_warned {
                log::warn!(
                    "Audio input runs at {} Hz, the visualizer expects {SAMPLE_RATE} Hz.",
                    info.sample_rate
                );
                rate_warned = true;
            }
            let frames = to_stereo(samples, info.channels, &mut stereo);
            handle.push_audio(&stereo, frames);
        }))
    }
}

/// Converts interleaved audio with `channels` channels to interleaved stereo.
///
/// Mono is duplicated into both channels; anything wider keeps its first
/// two channels.
///
/// ## Returns
/// The number of frames written to `out`.
pub fn to_stereo(samples: &[f32], channels: u16, out: &mut Vec<f32>) -> usize {
    out.clear();
    match channels {
        0 => 0,
        1 => {
            out.extend(samples.iter().flat_map(|&s| [s, s]));
            samples.len()
        }
        n => {
            let width = usize::from(n);
            for frame in samples.chunks_exact(width) {
                out.extend_from_slice(&frame[..CHANNELS]);
            }
            out.len() / CHANNELS
        }
    }
}
