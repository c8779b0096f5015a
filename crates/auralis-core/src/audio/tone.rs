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

//! The amplitude-modulated fallback tone used when no external audio arrives.

use super::{CHANNELS, SAMPLE_RATE};
use crate::math::wrap_phase;
use std::f64::consts::TAU;

/// Carrier frequency of the fallback tone, in Hz.
pub const CARRIER_HZ: f64 = 220.0;
/// Frequency of the amplitude envelope, in Hz.
pub const BEAT_HZ: f64 = 1.9;

/// A phase-continuous oscillator producing a pulsing sine.
///
/// `envelope = 0.25 + 0.35 * (0.5 + 0.5 * sin(beat))` and
/// `sample = envelope * sin(carrier)`, written identically to both channels.
/// Both phases persist across calls so consecutive blocks join without clicks.
#[derive(Debug, Clone)]
pub struct SyntheticTone {
    carrier_step: f64,
    beat_step: f64,
    carrier_phase: f64,
    beat_phase: f64,
}

impl SyntheticTone {
    /// Creates a tone for the given sample rate.
    pub fn new(sample_rate: u32) -> Self {
        let rate = f64::from(sample_rate.max(1));
        Self {
            carrier_step: TAU * CARRIER_HZ / rate,
            beat_step: TAU * BEAT_HZ / rate,
            carrier_phase: 0.0,
            beat_phase: 0.0,
        }
    }

    /// Writes `frames` interleaved stereo frames into `out`.
    ///
    /// ## Returns
    /// The number of frames written, capped by `out`'s length.
    pub fn fill(&mut self, out: &mut [f32], frames: usize) -> usize {
        let frames = frames.min(out.len() / CHANNELS);
        for frame in out.chunks_exact_mut(CHANNELS).take(frames) {
            self.carrier_phase = wrap_phase(self.carrier_phase + self.carrier_step);
            self.beat_phase = wrap_phase(self.beat_phase + self.beat_step);

            let envelope = 0.25 + 0.35 * (0.5 + 0.5 * self.beat_phase.sin());
            let sample = (envelope * self.carrier_phase.sin()) as f32;
            frame.fill(sample);
        }
        frames
    }

    /// Current carrier phase, in `[0, TAU)`.
    pub fn carrier_phase(&self) -> f64 {
        self.carrier_phase
    }

    /// Current envelope phase, in `[0, TAU)`.
    pub fn beat_phase(&self) -> f64 {
        self.beat_phase
    }
}

impl Default for SyntheticTone {
    fn default() -> Self {
        Self::new(SAMPLE_RATE)
    }
}
