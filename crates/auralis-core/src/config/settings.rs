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

//! Static settings fixed for the lifetime of a visualizer instance.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::audio::AudioRingBuffer;

/// Startup configuration of the visualizer.
///
/// Every field has a default, so a configuration file only needs to name
/// what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    /// Directory scanned for `*.milk` presets.
    pub preset_dir: PathBuf,
    /// File persisting the slow-preset denylist; `None` keeps it in memory.
    pub denylist_path: Option<PathBuf>,
    /// TOML file polled for runtime tunables.
    pub tunables_path: Option<PathBuf>,
    /// Capacity of the audio ingestion buffer, in stereo frames.
    pub ring_capacity_frames: usize,
    /// Audio frames fed to the engine per rendered frame.
    pub audio_quantum_frames: usize,
    /// Seconds without external audio before the fallback tone starts.
    pub audio_grace_seconds: f64,
    /// Seconds between preset directory rescans.
    pub rescan_interval_seconds: f64,
    /// Seconds between automatic preset rotations.
    pub auto_advance_seconds: f64,
    /// Seconds between telemetry summaries in the log.
    pub telemetry_interval_seconds: f64,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            preset_dir: PathBuf::from("presets"),
            denylist_path: Some(PathBuf::from("slow_presets.txt")),
            tunables_path: None,
            ring_capacity_frames: AudioRingBuffer::DEFAULT_CAPACITY_FRAMES,
            audio_quantum_frames: 512,
            audio_grace_seconds: 3.0,
            rescan_interval_seconds: 10.0,
            auto_advance_seconds: 20.0,
            telemetry_interval_seconds: 5.0,
        }
    }
}
