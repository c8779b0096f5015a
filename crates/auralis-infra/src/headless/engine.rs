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
use auralis_core::engine::{EngineSettings, VisualizerEngine};
use auralis_core::utils::timer::ManualClock;
use std::sync::{Arc, Mutex};

/// What the frame loop asked of the engine so far.
#[derive(Debug, Clone, Default)]
pub struct EngineRecord {
    /// Settings passed to `configure`.
    pub settings: Option<EngineSettings>,
    /// Total PCM frames received.
    pub pcm_frames: u64,
    /// Number of PCM pushes.
    pub pcm_pushes: u64,
    /// Frames rendered.
    pub renders: u64,
    /// Target frame rate of the last render.
    pub last_target_fps: u32,
    /// Every preset file load, with its smooth flag.
    pub loaded_files: Vec<(String, bool)>,
    /// Inline preset loads.
    pub data_loads: u64,
    /// The preset file currently shown; `None` for inline content.
    pub current: Option<String>,
    /// Last mesh size set.
    pub mesh: Option<(u32, u32)>,
}

#[derive(Debug, Default)]
struct Shared {
    record: EngineRecord,
    render_costs: Vec<(String, f64)>,
    rejected: Vec<String>,
}

/// An engine that renders nothing but costs simulated time.
///
/// Presets whose path contains a registered pattern advance the shared
/// clock on every render, which the frame loop sees as slow frames.
#[derive(Debug)]
pub struct HeadlessEngine {
    clock: ManualClock,
    shared: Arc<Mutex<Shared>>,
}

impl HeadlessEngine {
    /// Creates an engine charging render time to `clock`.
    pub fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            shared: Arc::new(Mutex::new(Shared::default())),
        }
    }

    /// A handle for scripting and inspecting this engine.
    pub fn probe(&self) -> EngineProbe {
        EngineProbe {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl VisualizerEngine for HeadlessEngine {
    fn configure(&mut self, settings: &EngineSettings) {
        lock(&self.shared).record.settings = Some(*settings);
    }

    fn push_pcm(&mut self, _samples: &[f32], frames: usize) {
        let mut shared = lock(&self.shared);
        shared.record.pcm_frames += frames as u64;
        shared.record.pcm_pushes += 1;
    }

    fn render(&mut self, target_fps: u32) {
        let mut shared = lock(&self.shared);
        shared.record.renders += 1;
        shared.record.last_target_fps = target_fps;

        let cost: f64 = match &shared.record.current {
            Some(current) => shared
                .render_costs
                .iter()
                .filter(|(pattern, _)| current.contains(pattern.as_str()))
                .map(|(_, seconds)| seconds)
                .sum(),
            None => 0.0,
        };
        if cost > 0.0 {
            self.clock.advance(cost);
        }
    }

    fn load_preset_file(&mut self, path: &str, smooth: bool) -> bool {
        let mut shared = lock(&self.shared);
        if shared.rejected.iter().any(|pattern| path.contains(pattern.as_str())) {
            return false;
        }
        shared.record.loaded_files.push((path.to_string(), smooth));
        shared.record.current = Some(path.to_string());
        true
    }

    fn load_preset_data(&mut self, _data: &str, _smooth: bool) -> bool {
        let mut shared = lock(&self.shared);
        shared.record.data_loads += 1;
        shared.record.current = None;
        true
    }

    fn set_mesh_size(&mut self, width: u32, height: u32) {
        lock(&self.shared).record.mesh = Some((width, height));
    }
}

/// Scripts a [`HeadlessEngine`] and reads back its record.
#[derive(Debug, Clone)]
pub struct EngineProbe {
    shared: Arc<Mutex<Shared>>,
}

impl EngineProbe {
    /// Makes every render of a preset whose path contains `pattern` cost
    /// `seconds` of simulated time.
    pub fn set_render_cost(&self, pattern: impl Into<String>, seconds: f64) {
        lock(&self.shared)
            .render_costs
            .push((pattern.into(), seconds));
    }

    /// Makes loading presets whose path contains `pattern` fail.
    pub fn reject(&self, pattern: impl Into<String>) {
        lock(&self.shared).rejected.push(pattern.into());
    }

    /// A copy of the record.
    pub fn record(&self) -> EngineRecord {
        lock(&self.shared).record.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auralis_core::utils::timer::Clock;

    #[test]
    fn expensive_presets_cost_time() {
        let clock = ManualClock::new(0.0);
        let mut engine = HeadlessEngine::new(clock.clone());
        engine.probe().set_render_cost("heavy", 0.05);

        engine.load_preset_file("presets/light.milk", false);
        engine.render(72);
        assert_eq!(clock.now(), 0.0);

        engine.load_preset_file("presets/heavy_1.milk", true);
        engine.render(72);
        assert!((clock.now() - 0.05).abs() < 1e-12);
        assert_eq!(engine.probe().record().renders, 2);
    }

    #[test]
    fn rejected_presets_keep_the_current_one() {
        let mut engine = HeadlessEngine::new(ManualClock::default());
        engine.probe().reject("broken");
        assert!(engine.load_preset_file("a.milk", false));
        assert!(!engine.load_preset_file("broken.milk", false));
        assert_eq!(engine.probe().record().current.as_deref(), Some("a.milk"));
    }
}
