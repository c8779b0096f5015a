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

//! Contains the `CpalAudioCapture` struct.

use anyhow::{anyhow, Result};
use auralis_core::audio::device::{AudioInput, StreamInfo};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

/// An `AudioInput` that records from the host's default input device via CPAL.
#[derive(Default)]
pub struct CpalAudioCapture;

impl CpalAudioCapture {
    /// Creates a new instance of the CPAL capture backend.
    pub fn new() -> Self {
        Self
    }
}

impl AudioInput for CpalAudioCapture {
    fn start(
        self: Box<Self>,
        mut on_samples: Box<dyn FnMut(&[f32], &StreamInfo) + Send>,
    ) -> Result<()> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| anyhow!("No default input device available"))?;
        let config = device.default_input_config()?;

        let stream_info = StreamInfo {
            channels: config.channels(),
            sample_rate: config.sample_rate(),
        };
        log::info!(
            "Capturing audio: {} channels at {} Hz.",
            stream_info.channels,
            stream_info.sample_rate
        );

        let audio_callback = move |input: &[f32], _: &cpal::InputCallbackInfo| {
            on_samples(input, &stream_info);
        };

        let error_callback = |err| {
            log::error!("An error occurred on the capture stream: {}", err);
        };

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                device.build_input_stream(&config.into(), audio_callback, error_callback, None)?
            }
            format => return Err(anyhow!("Unsupported sample format: {}", format)),
        };

        stream.play()?;

        // Detach the stream to keep it running for the lifetime of the application.
        std::mem::forget(stream);

        Ok(())
    }
}
