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

//! The contract of the external audio-reactive rendering engine.

use serde::{Deserialize, Serialize};

/// Width of the engine's render target, in pixels.
pub const RENDER_TARGET_WIDTH: u32 = 2048;
/// Height of the engine's render target, in pixels.
pub const RENDER_TARGET_HEIGHT: u32 = 1024;
/// Frame rate the engine animates at unless told otherwise.
pub const DEFAULT_ENGINE_FPS: u32 = 72;
/// Seconds between beat-driven hard cuts.
pub const HARD_CUT_DURATION: f32 = 15.0;
/// Beat sensitivity of hard cuts.
pub const HARD_CUT_SENSITIVITY: f32 = 1.4;
/// Near clip plane of the projection surface.
pub const NEAR_PLANE: f32 = 0.05;
/// Far clip plane of the projection surface.
pub const FAR_PLANE: f32 = 100.0;

/// Inline preset shown when no preset file is available.
pub const FALLBACK_PRESET: &str = "[preset00]\n\
fDecay=0.98\n\
zoom=0.99\n\
rot=0.01*sin(time*0.5)\n\
warp=0.05\n\
wave_mode=7\n\
wave_r=1\n\
wave_g=0.6\n\
wave_b=0.2\n\
wave_a=1\n\
ob_size=0\n\
ib_size=0\n\
per_frame_1=zoom=1.0+0.03*sin(time*0.33);\n\
per_frame_2=wave_x=0.5+0.25*sin(time*0.71);\n\
per_frame_3=wave_y=0.5+0.2*cos(time*0.47);\n";

/// How the engine's equirectangular output is wrapped around the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectionMode {
    /// A full sphere surrounding the viewer.
    #[default]
    FullSphere,
    /// A dome covering the front hemisphere.
    FrontDome,
}

impl ProjectionMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Self::FullSphere => Self::FrontDome,
            Self::FrontDome => Self::FullSphere,
        }
    }

    /// Upper-case label shown on the HUD.
    pub fn label(self) -> &'static str {
        match self {
            Self::FullSphere => "SPHERE",
            Self::FrontDome => "DOME",
        }
    }
}

/// Static settings applied to the engine once at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    /// Render target width.
    pub width: u32,
    /// Render target height.
    pub height: u32,
    /// Target animation frame rate.
    pub fps: u32,
    /// Whether beat-driven hard cuts are enabled.
    pub hard_cut_enabled: bool,
    /// See [`HARD_CUT_DURATION`].
    pub hard_cut_duration: f32,
    /// See [`HARD_CUT_SENSITIVITY`].
    pub hard_cut_sensitivity: f32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            width: RENDER_TARGET_WIDTH,
            height: RENDER_TARGET_HEIGHT,
            fps: DEFAULT_ENGINE_FPS,
            hard_cut_enabled: true,
            hard_cut_duration: HARD_CUT_DURATION,
            hard_cut_sensitivity: HARD_CUT_SENSITIVITY,
        }
    }
}

/// An opaque, audio-reactive frame producer.
///
/// Load calls report failure with `false`; the caller keeps its previous
/// selection state and carries on.
pub trait VisualizerEngine {
    /// Applies the static settings.
    fn configure(&mut self, settings: &EngineSettings);

    /// Feeds interleaved stereo frames.
    fn push_pcm(&mut self, samples: &[f32], frames: usize);

    /// Renders one frame into the engine's render target.
    ///
    /// `target_fps` is the frame rate the caller currently achieves; the
    /// engine paces its animation against it.
    fn render(&mut self, target_fps: u32);

    /// Loads a preset file, blending into it when `smooth` is set.
    fn load_preset_file(&mut self, path: &str, smooth: bool) -> bool;

    /// Loads preset text directly.
    fn load_preset_data(&mut self, data: &str, smooth: bool) -> bool;

    /// Changes the warp mesh resolution.
    fn set_mesh_size(&mut self, width: u32, height: u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_toggle_and_labels() {
        let mode = ProjectionMode::default();
        assert_eq!(mode, ProjectionMode::FullSphere);
        assert_eq!(mode.toggled(), ProjectionMode::FrontDome);
        assert_eq!(mode.toggled().toggled(), mode);
        assert_eq!(ProjectionMode::FrontDome.label(), "DOME");
    }

    #[test]
    fn test_fallback_preset_is_well_formed() {
        assert!(FALLBACK_PRESET.starts_with("[preset00]\n"));
        assert_eq!(FALLBACK_PRESET.lines().count(), 15);
    }
}
