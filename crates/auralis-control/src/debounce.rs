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

//! Per-limb input modality debouncing.
//!
//! Runtimes sometimes report a different interaction profile for a frame or
//! two while a hand is picked up or a controller is put down. The debouncer
//! only commits a new modality once the raw observation held long enough.

/// Seconds a raw hand observation must hold before switching to hand input.
pub const SWITCH_TO_HAND_DELAY: f64 = 0.08;
/// Seconds a raw controller observation must hold before switching back.
pub const SWITCH_TO_CONTROLLER_DELAY: f64 = 0.16;

/// The input modality of a limb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    /// A motion controller; the limb points with a ray.
    Controller,
    /// A tracked hand; the limb touches the panel directly.
    Hand,
}

impl InteractionMode {
    /// Maps a raw "hand tracking" flag.
    pub fn from_hand_flag(is_hand: bool) -> Self {
        if is_hand {
            Self::Hand
        } else {
            Self::Controller
        }
    }

    /// Seconds an observation of `self` must hold before it is committed.
    pub fn required_delay(self) -> f64 {
        match self {
            Self::Hand => SWITCH_TO_HAND_DELAY,
            Self::Controller => SWITCH_TO_CONTROLLER_DELAY,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Observed {
    raw: InteractionMode,
    debounced: InteractionMode,
    raw_since: f64,
}

/// Debounces the modality of one limb. Starts uninitialized.
#[derive(Debug, Clone, Default)]
pub struct ModeDebouncer {
    observed: Option<Observed>,
}

impl ModeDebouncer {
    /// Creates an uninitialized debouncer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds this frame's raw observation.
    ///
    /// ## Returns
    /// The debounced modality.
    pub fn observe(&mut self, raw: InteractionMode, now: f64) -> InteractionMode {
        let state = self.observed.get_or_insert(Observed {
            raw,
            debounced: raw,
            raw_since: now,
        });

        if state.raw != raw {
            state.raw = raw;
            state.raw_since = now;
        }

        if state.debounced != state.raw && now - state.raw_since >= state.raw.required_delay() {
            log::debug!("Input modality switched to {:?}.", state.raw);
            state.debounced = state.raw;
        }

        state.debounced
    }

    /// The committed modality, if anything was observed yet.
    pub fn current(&self) -> Option<InteractionMode> {
        self.observed.map(|o| o.debounced)
    }

    /// Forgets all observations.
    pub fn reset(&mut self) {
        self.observed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use InteractionMode::{Controller, Hand};

    #[test]
    fn first_observation_is_committed_immediately() {
        let mut d = ModeDebouncer::new();
        assert_eq!(d.current(), None);
        assert_eq!(d.observe(Hand, 10.0), Hand);
        assert_eq!(d.current(), Some(Hand));
    }

    #[test]
    fn switch_to_hand_after_short_delay() {
        let mut d = ModeDebouncer::new();
        d.observe(Controller, 0.0);
        assert_eq!(d.observe(Hand, 1.0), Controller);
        assert_eq!(d.observe(Hand, 1.05), Controller);
        assert_eq!(d.observe(Hand, 1.09), Hand);
    }

    #[test]
    fn switch_to_controller_uses_longer_delay() {
        let mut d = ModeDebouncer::new();
        d.observe(Hand, 0.0);
        assert_eq!(d.observe(Controller, 1.0), Hand);
        assert_eq!(d.observe(Controller, 1.1), Hand);
        assert_eq!(d.observe(Controller, 1.17), Controller);
    }

    #[test]
    fn brief_flip_never_changes_debounced_mode() {
        let mut d = ModeDebouncer::new();
        d.observe(Controller, 0.0);
        let mut t = 1.0;
        // Flip to hand and back within less than the hand delay, repeatedly.
        for _ in 0..20 {
            assert_eq!(d.observe(Hand, t), Controller);
            assert_eq!(d.observe(Hand, t + 0.03), Controller);
            assert_eq!(d.observe(Controller, t + 0.06), Controller);
            t += 0.1;
        }
    }

    #[test]
    fn raw_change_restarts_the_pending_timer() {
        let mut d = ModeDebouncer::new();
        d.observe(Controller, 0.0);
        d.observe(Hand, 1.0);
        d.observe(Controller, 1.05);
        d.observe(Hand, 1.07);
        // Long after the first hand report but only 0.03s after the latest.
        assert_eq!(d.observe(Hand, 1.10), Controller);
        assert_eq!(d.observe(Hand, 1.16), Hand);
    }

    #[test]
    fn reset_returns_to_uninitialized() {
        let mut d = ModeDebouncer::new();
        d.observe(Hand, 0.0);
        d.reset();
        assert_eq!(d.current(), None);
        assert_eq!(d.observe(Controller, 5.0), Controller);
    }
}
