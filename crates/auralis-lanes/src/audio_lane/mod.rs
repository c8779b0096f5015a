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

//! Feeds the rendering engine with PCM once per frame.

use auralis_core::audio::ring_buffer::CHANNELS;
use auralis_core::audio::tone::SyntheticTone;
use auralis_core::audio::{AudioRingBuffer, SAMPLE_RATE};
use auralis_core::engine::VisualizerEngine;

/// Frames moved into the engine per render frame.
pub const DEFAULT_QUANTUM_FRAMES: usize = 512;
/// Seconds without external audio before the fallback tone starts.
pub const DEFAULT_GRACE_SECONDS: f64 = 3.0;

/// What the audio lane did this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioStep {
    /// Host audio was forwarded.
    External(usize),
    /// The fallback tone was forwarded.
    Synthetic(usize),
    /// Nothing queued, still inside the grace period.
    Silent,
}

/// A lane that drains the ingestion buffer into the engine.
#[derive(Debug)]
pub struct AudioLane {
    quantum_frames: usize,
    grace_seconds: f64,
    last_external: f64,
    tone: SyntheticTone,
    scratch: Vec<f32>,
}

impl AudioLane {
    /// Creates a lane moving `quantum_frames` per step.
    pub fn new(quantum_frames: usize, grace_seconds: f64) -> Self {
        let quantum_frames = quantum_frames.max(1);
        Self {
            quantum_frames,
            grace_seconds,
            last_external: -1000.0,
            tone: SyntheticTone::new(SAMPLE_RATE),
            scratch: vec![0.0; quantum_frames * CHANNELS],
        }
    }

    /// Time external audio was last seen.
    pub fn last_external(&self) -> f64 {
        self.last_external
    }

    /// Moves one quantum of audio into `engine`.
    pub fn step(
        &mut self,
        now: f64,
        ring: &AudioRingBuffer,
        engine: &mut dyn VisualizerEngine,
    ) -> AudioStep {
        let frames = ring.dequeue(&mut self.scratch, self.quantum_frames);
        if frames > 0 {
            engine.push_pcm(&self.scratch[..frames * CHANNELS], frames);
            self.last_external = now;
            return AudioStep::External(frames);
        }

        if now - self.last_external <= self.grace_seconds {
            return AudioStep::Silent;
        }

        let frames = self.tone.fill(&mut self.scratch, self.quantum_frames);
        engine.push_pcm(&self.scratch[..frames * CHANNELS], frames);
        log::trace!(
            "No external audio for {:.1}s, fed {frames} synthetic frames.",
            now - self.last_external
        );
        AudioStep::Synthetic(frames)
    }
}

impl Default for AudioLane {
    fn default() -> Self {
        Self::new(DEFAULT_QUANTUM_FRAMES, DEFAULT_GRACE_SECONDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auralis_core::engine::EngineSettings;

    #[derive(Default)]
    struct RecordingEngine {
        pushed: Vec<usize>,
        first_sample: Vec<f32>,
    }

    impl VisualizerEngine for RecordingEngine {
        fn configure(&mut self, _settings: &EngineSettings) {}
        fn push_pcm(&mut self, samples: &[f32], frames: usize) {
            assert_eq!(samples.len(), frames * CHANNELS);
            self.pushed.push(frames);
            self.first_sample.push(samples[0]);
        }
        fn render(&mut self, _target_fps: u32) {}
        fn load_preset_file(&mut self, _path: &str, _smooth: bool) -> bool {
            true
        }
        fn load_preset_data(&mut self, _data: &str, _smooth: bool) -> bool {
            true
        }
        fn set_mesh_size(&mut self, _width: u32, _height: u32) {}
    }

    #[test]
    fn synthesizes_from_the_start_without_host_audio() {
        let ring = AudioRingBuffer::new(1024);
        let mut engine = RecordingEngine::default();
        let mut lane = AudioLane::default();
        assert_eq!(lane.step(0.0, &ring, &mut engine), AudioStep::Synthetic(512));
    }

    #[test]
    fn external_audio_is_forwarded_and_holds_off_the_tone() {
        let ring = AudioRingBuffer::new(4096);
        let mut engine = RecordingEngine::default();
        let mut lane = AudioLane::default();

        ring.enqueue(&vec![0.5; 300 * CHANNELS], 300);
        assert_eq!(lane.step(10.0, &ring, &mut engine), AudioStep::External(300));
        assert_eq!(engine.first_sample[0], 0.5);

        assert_eq!(lane.step(12.0, &ring, &mut engine), AudioStep::Silent);
        assert_eq!(lane.step(13.0, &ring, &mut engine), AudioStep::Silent);
        assert_eq!(lane.step(13.1, &ring, &mut engine), AudioStep::Synthetic(512));
        assert_eq!(engine.pushed, vec![300, 512]);
    }

    #[test]
    fn large_backlog_drains_one_quantum_per_step() {
        let ring = AudioRingBuffer::new(4096);
        let mut engine = RecordingEngine::default();
        let mut lane = AudioLane::new(256, 3.0);

        ring.enqueue(&vec![0.1; 600 * CHANNELS], 600);
        assert_eq!(lane.step(1.0, &ring, &mut engine), AudioStep::External(256));
        assert_eq!(lane.step(1.1, &ring, &mut engine), AudioStep::External(256));
        assert_eq!(lane.step(1.2, &ring, &mut engine), AudioStep::External(88));
        assert!(ring.is_empty());
    }
}
