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

//! The adaptive performance governor.
//!
//! Some presets are simply too heavy for the device. The governor watches a
//! smoothed frame time and, when it stays under the frame rate floor for a
//! sustained interval, asks the caller to mark the current preset slow and
//! move on. It then stays quiet for a cooldown so one bad stretch cannot
//! skip through the whole catalog.

use auralis_core::config::PerfTunables;

/// Shortest frame duration fed to the average, in seconds.
const MIN_FRAME_SECONDS: f64 = 1.0 / 240.0;
/// Longest frame duration fed to the average, in seconds.
const MAX_FRAME_SECONDS: f64 = 0.5;
/// Weight kept from the previous average on every update.
const EMA_RETAIN: f64 = 0.92;
/// Average seeded on every session start.
const SESSION_START_FRAME_SECONDS: f64 = 1.0 / 72.0;
/// Seconds after any preset switch during which frame times are ignored.
pub const SWITCH_GRACE_SECONDS: f64 = 4.0;

/// Thresholds of the governor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GovernorConfig {
    /// Whether skipping is enabled at all.
    pub enabled: bool,
    /// Frame rate floor.
    pub min_fps: f64,
    /// Seconds below the floor before a skip.
    pub hold_seconds: f64,
    /// Seconds after a skip before the next one may happen.
    pub cooldown_seconds: f64,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self::from(&PerfTunables::default())
    }
}

impl From<&PerfTunables> for GovernorConfig {
    fn from(perf: &PerfTunables) -> Self {
        Self {
            enabled: perf.auto_skip,
            min_fps: f64::from(perf.min_fps),
            hold_seconds: f64::from(perf.bad_seconds),
            cooldown_seconds: f64::from(perf.cooldown_seconds),
        }
    }
}

/// Catalog facts the governor needs each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GovernorInputs {
    /// Number of presets in the catalog.
    pub item_count: usize,
    /// Whether the inline fallback preset is showing.
    pub fallback_active: bool,
    /// Time of the last preset switch, for the post-switch grace period.
    pub last_switch: f64,
}

/// Outcome of one governor update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GovernorDecision {
    /// No usable frame time this frame.
    NoSample,
    /// Skipping is disabled or there is nothing to skip to.
    Inactive,
    /// Inside the post-switch grace period or the post-skip cooldown.
    Cooldown,
    /// Frame rate is at or above the floor.
    Healthy,
    /// Below the floor, but not for long enough yet.
    Observing,
    /// Mark the current preset slow and advance to the next one.
    Skip {
        /// The smoothed frame rate that triggered the skip.
        smoothed_fps: f64,
    },
}

/// Smoothed frame time tracker with the skip policy on top.
#[derive(Debug, Clone)]
pub struct PerformanceGovernor {
    config: GovernorConfig,
    smoothed_seconds: Option<f64>,
    low_since: Option<f64>,
    last_action: f64,
}

impl PerformanceGovernor {
    /// Creates a governor with no samples yet.
    pub fn new(config: GovernorConfig) -> Self {
        Self {
            config,
            smoothed_seconds: None,
            low_since: None,
            last_action: -1000.0,
        }
    }

    /// Replaces the thresholds, keeping the measurements.
    pub fn set_config(&mut self, config: GovernorConfig) {
        self.config = config;
    }

    /// Current thresholds.
    pub fn config(&self) -> &GovernorConfig {
        &self.config
    }

    /// Smoothed frame rate, if any sample was taken.
    pub fn smoothed_fps(&self) -> Option<f64> {
        self.smoothed_seconds.map(|s| 1.0 / s.max(1e-4))
    }

    /// Whether a low frame rate is currently being observed.
    pub fn is_observing(&self) -> bool {
        self.low_since.is_some()
    }

    /// Re-seeds the average and forgets past actions for a new session.
    pub fn reset_session(&mut self) {
        self.smoothed_seconds = Some(SESSION_START_FRAME_SECONDS);
        self.low_since = None;
        self.last_action = -1000.0;
    }

    /// Feeds one frame duration.
    pub fn update(&mut self, now: f64, delta: f64, inputs: &GovernorInputs) -> GovernorDecision {
        if delta <= 0.0 || !delta.is_finite() {
            return GovernorDecision::NoSample;
        }

        let sample = delta.clamp(MIN_FRAME_SECONDS, MAX_FRAME_SECONDS);
        let smoothed = match self.smoothed_seconds {
            Some(avg) => avg * EMA_RETAIN + sample * (1.0 - EMA_RETAIN),
            None => sample,
        };
        self.smoothed_seconds = Some(smoothed);

        if !self.config.enabled || inputs.item_count <= 1 || inputs.fallback_active {
            self.low_since = None;
            return GovernorDecision::Inactive;
        }

        if now - inputs.last_switch < SWITCH_GRACE_SECONDS
            || now - self.last_action < self.config.cooldown_seconds
        {
            self.low_since = None;
            return GovernorDecision::Cooldown;
        }

        let smoothed_fps = 1.0 / smoothed.max(1e-4);
        if smoothed_fps >= self.config.min_fps {
            self.low_since = None;
            return GovernorDecision::Healthy;
        }

        let Some(since) = self.low_since else {
            self.low_since = Some(now);
            return GovernorDecision::Observing;
        };

        if now - since < self.config.hold_seconds {
            return GovernorDecision::Observing;
        }

        self.last_action = now;
        self.low_since = None;
        log::warn!(
            "Sustained low frame rate ({smoothed_fps:.1} < {:.1} FPS); skipping preset.",
            self.config.min_fps
        );
        GovernorDecision::Skip { smoothed_fps }
    }
}

impl Default for PerformanceGovernor {
    fn default() -> Self {
        Self::new(GovernorConfig::default())
    }
}
