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

//! Runtime tunables and the once-per-second poller that watches them.

use super::parse::{parse_bool, parse_f32, parse_int_pair};
use super::PropertySource;

/// Seconds between two reads of the property source.
pub const POLL_INTERVAL_SECONDS: f64 = 1.0;
/// Panel geometry changes smaller than this are ignored.
const HUD_CHANGE_EPSILON: f32 = 0.0005;

/// Base panel width before scaling, in metres.
pub const HUD_BASE_WIDTH: f32 = 0.68;
/// Base panel height before scaling, in metres.
pub const HUD_BASE_HEIGHT: f32 = 0.36;

/// HUD placement and visibility settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudTunables {
    /// Whether the HUD is shown and accepts input.
    pub enabled: bool,
    /// Distance from the head to the panel, in metres.
    pub distance: f32,
    /// Vertical offset of the panel relative to the head, in metres.
    pub v_offset: f32,
    /// Uniform panel scale.
    pub scale: f32,
}

impl HudTunables {
    /// Scaled panel width.
    pub fn width(&self) -> f32 {
        HUD_BASE_WIDTH * self.scale
    }

    /// Scaled panel height.
    pub fn height(&self) -> f32 {
        HUD_BASE_HEIGHT * self.scale
    }

    fn differs_from(&self, other: &Self) -> bool {
        let moved = |a: f32, b: f32| (a - b).abs() > HUD_CHANGE_EPSILON;
        self.enabled != other.enabled
            || moved(self.distance, other.distance)
            || moved(self.v_offset, other.v_offset)
            || moved(self.width(), other.width())
            || moved(self.height(), other.height())
    }
}

impl Default for HudTunables {
    fn default() -> Self {
        Self {
            enabled: true,
            distance: 0.72,
            v_offset: -0.27,
            scale: 1.0,
        }
    }
}

/// Performance governor and quality settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerfTunables {
    /// Whether sustained low frame rates skip the current preset.
    pub auto_skip: bool,
    /// Whether rotation avoids presets marked slow.
    pub skip_marked: bool,
    /// Frame rate floor of the governor.
    pub min_fps: f32,
    /// Seconds below the floor before a skip.
    pub bad_seconds: f32,
    /// Seconds after a skip during which the governor stays quiet.
    pub cooldown_seconds: f32,
    /// Engine warp mesh resolution.
    pub mesh: (u32, u32),
}

impl Default for PerfTunables {
    fn default() -> Self {
        Self {
            auto_skip: true,
            skip_marked: true,
            min_fps: 42.0,
            bad_seconds: 2.0,
            cooldown_seconds: 8.0,
            mesh: (64, 48),
        }
    }
}

/// A full set of tunable values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tunables {
    /// HUD settings.
    pub hud: HudTunables,
    /// Performance settings.
    pub perf: PerfTunables,
    /// Level of the "clear slow marks" request.
    pub clear_marked: bool,
}

impl Tunables {
    /// Reads every tunable from `source`, clamping ranges and falling back to
    /// defaults for unset or unparsable values.
    pub fn read(source: &dyn PropertySource) -> Self {
        let hud_defaults = HudTunables::default();
        let perf_defaults = PerfTunables::default();

        let bool_or = |key: &str, default: bool| {
            source.get(key).and_then(|t| parse_bool(&t)).unwrap_or(default)
        };
        let float_or = |key: &str, default: f32, min: f32, max: f32| {
            source
                .get(key)
                .and_then(|t| parse_f32(&t))
                .unwrap_or(default)
                .clamp(min, max)
        };

        let mesh = source
            .get("perf.mesh")
            .and_then(|t| parse_int_pair(&t))
            .map(|(w, h)| (w.clamp(16, 128) as u32, h.clamp(12, 128) as u32))
            .unwrap_or(perf_defaults.mesh);

        Self {
            hud: HudTunables {
                enabled: bool_or("hud.enabled", hud_defaults.enabled),
                distance: float_or("hud.distance", hud_defaults.distance, 0.40, 3.0),
                v_offset: float_or("hud.v_offset", hud_defaults.v_offset, -1.2, 1.2),
                scale: float_or("hud.scale", hud_defaults.scale, 0.5, 2.0),
            },
            perf: PerfTunables {
                auto_skip: bool_or("perf.auto_skip", perf_defaults.auto_skip),
                skip_marked: bool_or("perf.skip_marked", perf_defaults.skip_marked),
                min_fps: float_or("perf.min_fps", perf_defaults.min_fps, 15.0, 90.0),
                bad_seconds: float_or("perf.bad_seconds", perf_defaults.bad_seconds, 0.3, 10.0),
                cooldown_seconds: float_or(
                    "perf.cooldown_seconds",
                    perf_defaults.cooldown_seconds,
                    1.0,
                    60.0,
                ),
                mesh,
            },
            clear_marked: bool_or("perf.clear_marked", false),
        }
    }
}

/// What changed in a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TunableChanges {
    /// HUD enable state or geometry changed.
    pub hud_changed: bool,
    /// The mesh resolution changed to this value.
    pub mesh_changed: Option<(u32, u32)>,
    /// The clear request went from low to high.
    pub clear_requested: bool,
}

/// Polls a [`PropertySource`] at a fixed cadence and reports edges.
#[derive(Debug, Clone)]
pub struct TunablePoller {
    current: Tunables,
    last_poll: Option<f64>,
    clear_latch: bool,
}

impl TunablePoller {
    /// Creates a poller holding the defaults; the first call to `poll` reads immediately.
    pub fn new() -> Self {
        Self {
            current: Tunables::default(),
            last_poll: None,
            clear_latch: false,
        }
    }

    /// The values from the last poll.
    pub fn current(&self) -> &Tunables {
        &self.current
    }

    /// Reads `source` if a poll interval elapsed since the last read.
    ///
    /// ## Returns
    /// `None` when the interval has not elapsed, otherwise the changes
    /// relative to the previous values.
    pub fn poll(&mut self, now: f64, source: &dyn PropertySource) -> Option<TunableChanges> {
        if let Some(last) = self.last_poll {
            if now - last < POLL_INTERVAL_SECONDS {
                return None;
            }
        }
        self.last_poll = Some(now);

        let next = Tunables::read(source);
        let mut changes = TunableChanges {
            hud_changed: next.hud.differs_from(&self.current.hud),
            ..TunableChanges::default()
        };
        if next.perf.mesh != self.current.perf.mesh {
            changes.mesh_changed = Some(next.perf.mesh);
        }
        if next.clear_marked && !self.clear_latch {
            changes.clear_requested = true;
        }
        self.clear_latch = next.clear_marked;

        if changes.hud_changed {
            log::info!(
                "HUD tuning updated: enabled={} distance={:.2} v_offset={:.2} scale={:.2}",
                next.hud.enabled,
                next.hud.distance,
                next.hud.v_offset,
                next.hud.scale
            );
            self.current.hud = next.hud;
        }
        // Sub-epsilon HUD drift keeps the geometry the panel was laid out with.
        self.current.perf = next.perf;
        self.current.clear_marked = next.clear_marked;
        Some(changes)
    }
}

impl Default for TunablePoller {
    fn default() -> Self {
        Self::new()
    }
}
