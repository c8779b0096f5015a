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

use anyhow::{Context, Result};
use auralis_core::audio::device::{AudioInput, StreamInfo};
use auralis_core::math::wrap_phase;
use std::f64::consts::TAU;
use std::thread;
use std::time::Duration;

/// An audio producer that plays a mono sine wave from a background thread,
/// the way a capture device would deliver blocks.
#[derive(Debug, Clone)]
pub struct TestToneInput {
    frequency: f64,
    amplitude: f32,
    sample_rate: u32,
    block_frames: usize,
    /// Stops after this many blocks; `None` runs forever.
    max_blocks: Option<usize>,
}

impl TestToneInput {
    /// Creates a 10 ms block producer at 48 kHz.
    pub fn new(frequency: f64, amplitude: f32) -> Self {
        Self {
            frequency,
            amplitude,
            sample_rate: 48_000,
            block_frames: 480,
            max_blocks: None,
        }
    }

    /// Limits the producer to `blocks` deliveries.
    pub fn with_max_blocks(mut self, blocks: usize) -> Self {
        self.max_blocks = Some(blocks);
        self
    }
}

impl AudioInput for TestToneInput {
    fn start(
        self: Box<Self>,
        mut on_samples: Box<dyn FnMut(&[f32], &StreamInfo) + Send>,
    ) -> Result<()> {
        let info = StreamInfo {
            channels: 1,
            sample_rate: self.sample_rate,
        };
        let step = TAU * self.frequency / f64::from(self.sample_rate);
        let period = Duration::from_secs_f64(self.block_frames as f64 / f64::from(self.sample_rate));

        thread::Builder::new()
            .name("test-tone".into())
            .spawn(move || {
                let mut phase = 0.0f64;
                let mut block = vec![0.0f32; self.block_frames];
                let mut delivered = 0usize;
                while !matches!(self.max_blocks, Some(max) if delivered >= max) {
                    for sample in &mut block {
                        phase = wrap_phase(phase + step);
                        *sample = self.amplitude * phase.sin() as f32;
                    }
                    on_samples(&block, &info);
                    delivered += 1;
                    thread::sleep(period);
                }
            })
            .context("Failed to spawn test tone thread")?;
        Ok(())
    }
}
