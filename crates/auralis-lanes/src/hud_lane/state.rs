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

use super::buttons::FlashKey;
use super::labels::{preset_label, sanitize_hud_text, track_label};
use auralis_core::audio::AudioSourceKind;
use auralis_core::engine::ProjectionMode;
use auralis_core::platform::UiSnapshot;

/// Seconds the HUD stays up after a session starts.
pub const VISIBLE_ON_START: f64 = 8.0;
/// Seconds the HUD stays up after any handled input.
pub const VISIBLE_AFTER_INTERACTION: f64 = 6.0;
/// Seconds the HUD stays up after a status or tunable change.
pub const VISIBLE_AFTER_STATUS_CHANGE: f64 = 3.0;
/// Seconds an input feedback label replaces the track line.
pub const FEEDBACK_SECONDS: f64 = 1.4;
/// Flash intensity right after an activation.
pub const FLASH_PEAK: f32 = 1.35;

const FLASH_DECAY_PER_SECOND: f32 = 2.2;
const FLASH_MIN_DECAY: f32 = 0.01;
const AUDIO_LABEL_MAX_CHARS: usize = 18;

/// The labels behind the HUD text, compared to detect changes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Labels {
    audio: String,
    projection: String,
    playback: String,
    preset: String,
    center: String,
}

impl Labels {
    fn lines(&self) -> Vec<String> {
        vec![
            format!("AUD {}", self.audio),
            format!("PROJ {}", self.projection),
            format!("PLAY {}", self.playback),
            format!("PRESET {}", self.preset),
            self.center.clone(),
        ]
    }
}

/// Everything the HUD shows, plus when it shows it.
///
/// The scheduler owns one `HudState`; input handling, the governor and the
/// catalog write to it, and the compositor reads text and flashes from it.
#[derive(Debug, Clone)]
pub struct HudState {
    visible_until: f64,
    feedback: String,
    feedback_until: f64,
    flashes: [f32; FlashKey::COUNT],

    last_snapshot: Option<UiSnapshot>,
    audio_source: AudioSourceKind,
    is_playing: bool,
    track: String,
    preset: String,
    projection: ProjectionMode,

    dirty: bool,
    rendered: Option<Labels>,
    lines: Vec<String>,
}

impl HudState {
    /// Creates the HUD state as it is at startup.
    pub fn new() -> Self {
        Self {
            visible_until: VISIBLE_ON_START,
            feedback: "READY".to_string(),
            feedback_until: 0.0,
            flashes: [0.0; FlashKey::COUNT],
            last_snapshot: None,
            audio_source: AudioSourceKind::default(),
            is_playing: false,
            track: String::new(),
            preset: String::new(),
            projection: ProjectionMode::default(),
            dirty: true,
            rendered: None,
            lines: Vec::new(),
        }
    }

    /// Keeps the HUD visible until at least `now + seconds`.
    pub fn extend_visibility(&mut self, now: f64, seconds: f64) {
        self.visible_until = self.visible_until.max(now + seconds);
    }

    /// Whether the HUD is up at `now`.
    pub fn is_visible(&self, now: f64) -> bool {
        now <= self.visible_until
    }

    /// The time the HUD hides.
    pub fn visible_until(&self) -> f64 {
        self.visible_until
    }

    /// Shows `label` in place of the track line for a moment.
    pub fn set_feedback(&mut self, now: f64, label: &str) {
        self.feedback = label.to_string();
        self.feedback_until = now + FEEDBACK_SECONDS;
        self.dirty = true;
    }

    /// The feedback label, while it is still showing.
    pub fn feedback(&self, now: f64) -> Option<&str> {
        (now < self.feedback_until).then_some(self.feedback.as_str())
    }

    /// Lights `key` at full intensity.
    pub fn flash(&mut self, key: FlashKey) {
        self.flashes[key.index()] = FLASH_PEAK;
    }

    /// Current intensity of `key`.
    pub fn flash_level(&self, key: FlashKey) -> f32 {
        self.flashes[key.index()]
    }

    /// All flash intensities, in [`FlashKey::ALL`] order.
    pub fn flashes(&self) -> &[f32] {
        &self.flashes
    }

    /// Fades every flash by one frame's worth.
    pub fn decay_flashes(&mut self, delta: f32) {
        let decay = (delta * FLASH_DECAY_PER_SECOND).max(FLASH_MIN_DECAY);
        for flash in &mut self.flashes {
            *flash = (*flash - decay).max(0.0);
        }
    }

    /// Forces the next [`refresh`](Self::refresh) to redraw.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Applies the host's latest playback state.
    ///
    /// Returns `true` and extends visibility when it differs from the last
    /// state seen.
    pub fn apply_snapshot(&mut self, now: f64, snapshot: &UiSnapshot) -> bool {
        if self.last_snapshot.as_ref() == Some(snapshot) {
            return false;
        }
        self.audio_source = snapshot.audio_source;
        self.is_playing = snapshot.is_playing;
        self.track = snapshot.track_label.clone();
        self.last_snapshot = Some(snapshot.clone());
        self.dirty = true;
        self.extend_visibility(now, VISIBLE_AFTER_STATUS_CHANGE);
        true
    }

    /// Shows the synthetic source as active and playback as stopped.
    ///
    /// The host's own report is left alone so [`Self::show_host_audio`] can
    /// put it back.
    pub fn show_synthetic_audio(&mut self) {
        if self.audio_source != AudioSourceKind::Synthetic || self.is_playing {
            self.audio_source = AudioSourceKind::Synthetic;
            self.is_playing = false;
            self.dirty = true;
        }
    }

    /// Shows the host's last reported audio state again after a synthetic
    /// override.
    ///
    /// Returns `true` and extends visibility when the display changed.
    pub fn show_host_audio(&mut self, now: f64) -> bool {
        let Some(snapshot) = self.last_snapshot.as_ref() else {
            return false;
        };
        if self.audio_source == snapshot.audio_source && self.is_playing == snapshot.is_playing {
            return false;
        }
        self.audio_source = snapshot.audio_source;
        self.is_playing = snapshot.is_playing;
        self.dirty = true;
        self.extend_visibility(now, VISIBLE_AFTER_STATUS_CHANGE);
        true
    }

    /// The audio source currently shown.
    pub fn audio_source(&self) -> AudioSourceKind {
        self.audio_source
    }

    /// Whether playback is shown as running.
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Sets the preset line from a preset path, or a literal label for
    /// built-in content.
    pub fn set_preset(&mut self, path_or_label: &str) {
        self.preset = preset_label(path_or_label);
        self.dirty = true;
    }

    /// The preset line as shown.
    pub fn preset(&self) -> &str {
        &self.preset
    }

    /// Sets the projection line.
    pub fn set_projection(&mut self, mode: ProjectionMode) {
        self.projection = mode;
        self.dirty = true;
    }

    /// Recomputes the HUD text.
    ///
    /// ## Returns
    /// The text lines when they changed since the last call, `None` when the
    /// surface can keep what it has.
    pub fn refresh(&mut self, now: f64) -> Option<&[String]> {
        let center = match self.feedback(now) {
            Some(feedback) => feedback.to_string(),
            None => format!("TRACK: {}", track_label(&self.track)),
        };
        let labels = Labels {
            audio: sanitize_hud_text(self.audio_source.label(), AUDIO_LABEL_MAX_CHARS),
            projection: self.projection.label().to_string(),
            playback: if self.is_playing { "PLAYING" } else { "PAUSED" }.to_string(),
            preset: self.preset.clone(),
            center,
        };

        if !self.dirty && self.rendered.as_ref() == Some(&labels) {
            return None;
        }

        self.lines = labels.lines();
        self.rendered = Some(labels);
        self.dirty = false;
        Some(&self.lines)
    }

    /// The text drawn by the last [`refresh`](Self::refresh) that returned lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl Default for HudState {
    fn default() -> Self {
        Self::new()
    }
}
