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

//! Turns tracked limbs and controller state into input events.
//!
//! The router owns all per-limb interaction state that lives across frames:
//! modality debouncers, touch latches (inside the pointer resolver), trigger
//! and touch press edges. It does not act on anything itself; the scheduler
//! executes the [`InputEvent`]s it returns.

use auralis_control::{InteractionMode, ModeDebouncer};
use auralis_core::config::HudTunables;
use auralis_core::math::Pose;
use auralis_core::xr::{
    classify_profile, HandSkeleton, Limb, PanelFrame, PointerMarker, TrackingSystem,
};
use auralis_lanes::hud_lane::hit_test;
use auralis_lanes::pointer_lane::hud_panel;
use auralis_lanes::{FlashKey, HudButton, LimbInput, PointerResolver, PointerState};

/// Trigger value at which a pull counts as a press.
pub const TRIGGER_PRESS_THRESHOLD: f32 = 0.75;

/// A controller button with a fixed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerButton {
    /// Right primary: next preset.
    A,
    /// Right secondary: next track.
    B,
    /// Left primary: previous preset.
    X,
    /// Left secondary: play or pause.
    Y,
    /// Left thumbstick click: previous track.
    LeftStick,
    /// Right thumbstick click: cycle the audio input.
    RightStick,
}

impl ControllerButton {
    /// The HUD flash lit by this button.
    pub fn flash_key(self) -> FlashKey {
        match self {
            Self::A => FlashKey::A,
            Self::B => FlashKey::B,
            Self::X => FlashKey::X,
            Self::Y => FlashKey::Y,
            Self::LeftStick | Self::RightStick => FlashKey::Menu,
        }
    }

    /// Feedback shown on the HUD when the button fires.
    pub fn feedback(self) -> &'static str {
        match self {
            Self::A => "A NEXT PRESET",
            Self::B => "B NEXT TRACK",
            Self::X => "X PREV PRESET",
            Self::Y => "Y PLAY PAUSE",
            Self::LeftStick => "L3 PREV TRACK",
            Self::RightStick => "R3 AUDIO INPUT",
        }
    }
}

/// Something the user did this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A controller button was pressed.
    Button(ControllerButton),
    /// A HUD button was pressed by touch or by a trigger aimed at it.
    Panel(HudButton),
    /// A trigger was pulled without hitting a HUD button.
    Trigger(Limb),
    /// A press arrived while the HUD was hidden; it only brings the HUD back.
    MenuShown,
}

/// What the router needs to know about the HUD.
#[derive(Debug, Clone, Copy)]
pub struct HudContext {
    /// Current placement and enable state.
    pub tunables: HudTunables,
    /// Whether the HUD is currently shown.
    pub visible: bool,
}

/// Result of one input poll.
#[derive(Debug, Clone)]
pub struct InputFrame {
    /// Events in the order they must be executed.
    pub events: Vec<InputEvent>,
    /// Where the HUD panel sits this frame.
    pub panel: PanelFrame,
}

/// Per-limb interaction state carried across frames.
#[derive(Debug, Default)]
pub struct InputRouter {
    debouncers: [ModeDebouncer; 2],
    resolver: PointerResolver,
    trigger_held: [bool; 2],
    touch_held: [bool; 2],
    skeletons: [Option<HandSkeleton>; 2],
    hand_tracking_disabled: bool,
}

impl InputRouter {
    /// Creates a router with nothing observed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets modalities, pointers and press edges.
    pub fn reset(&mut self) {
        for debouncer in &mut self.debouncers {
            debouncer.reset();
        }
        self.resolver.reset();
        self.trigger_held = [false; 2];
        self.touch_held = [false; 2];
        self.skeletons = [None; 2];
    }

    /// Resets everything and queries hand tracking again, for a new session.
    pub fn reset_session(&mut self) {
        self.reset();
        self.hand_tracking_disabled = false;
    }

    /// Whether either limb is in hand mode.
    pub fn hand_active(&self) -> bool {
        self.debouncers
            .iter()
            .any(|d| d.current() == Some(InteractionMode::Hand))
    }

    /// Both pointers, left first.
    pub fn pointers(&self) -> &[PointerState; 2] {
        self.resolver.pointers()
    }

    /// Both pointers as the compositor draws them.
    pub fn markers(&self) -> [Option<PointerMarker>; 2] {
        self.resolver.pointers().map(|p| p.marker())
    }

    /// Joint positions located this frame for hand-mode limbs.
    pub fn skeletons(&self) -> &[Option<HandSkeleton>; 2] {
        &self.skeletons
    }

    /// Synchronizes controller state and resolves this frame's input.
    ///
    /// A failed synchronization drops all interaction state and yields no
    /// events.
    pub fn poll(
        &mut self,
        now: f64,
        time: i64,
        head: &Pose,
        hud: &HudContext,
        tracking: &mut dyn TrackingSystem,
    ) -> InputFrame {
        if let Err(e) = tracking.sync_actions() {
            log::debug!("{e}; dropping interaction state.");
            self.reset();
            return InputFrame {
                events: Vec::new(),
                panel: hud_panel(head, &hud.tunables, false),
            };
        }

        let mut modes = [InteractionMode::Controller; 2];
        for limb in Limb::ALL {
            let profile = tracking.interaction_profile(limb);
            let raw = InteractionMode::from_hand_flag(classify_profile(profile.as_deref()));
            modes[limb.index()] = self.debouncers[limb.index()].observe(raw, now);
        }
        let panel = hud_panel(head, &hud.tunables, modes.contains(&InteractionMode::Hand));

        self.locate_hands(&modes, time, tracking);
        let aims = Limb::ALL.map(|limb| match modes[limb.index()] {
            InteractionMode::Controller => tracking.aim_pose(limb, time),
            InteractionMode::Hand => None,
        });
        let limbs = Limb::ALL.map(|limb| {
            let i = limb.index();
            LimbInput {
                mode: modes[i],
                skeleton: self.skeletons[i].as_ref(),
                aim: aims[i],
            }
        });
        let target = hud.tunables.enabled.then_some(&panel);
        self.resolver.resolve(target, &limbs);

        let mut events = Vec::new();
        let mut visible = hud.visible;
        let enabled = hud.tunables.enabled;
        let mut push = |event: InputEvent, visible: &mut bool| {
            if event == InputEvent::MenuShown {
                *visible = true;
            }
            events.push(event);
        };

        for limb in Limb::ALL {
            if let Some(event) = self.touch_press(limb, enabled, visible) {
                push(event, &mut visible);
            }
        }

        let left = tracking.actions(Limb::Left);
        let right = tracking.actions(Limb::Right);
        let presses = [
            (right.primary, ControllerButton::A),
            (left.primary, ControllerButton::X),
            (left.secondary, ControllerButton::Y),
            (right.secondary, ControllerButton::B),
            (left.thumbstick, ControllerButton::LeftStick),
            (right.thumbstick, ControllerButton::RightStick),
        ];
        for (pressed, button) in presses {
            if pressed {
                push(InputEvent::Button(button), &mut visible);
            }
        }

        for (limb, trigger) in [(Limb::Right, right.trigger), (Limb::Left, left.trigger)] {
            let i = limb.index();
            if modes[i] == InteractionMode::Hand {
                self.trigger_held[i] = false;
                continue;
            }
            let pressed = trigger >= TRIGGER_PRESS_THRESHOLD;
            let was_held = std::mem::replace(&mut self.trigger_held[i], pressed);
            if pressed && !was_held {
                let event = self
                    .pointer_press(limb, enabled, visible)
                    .unwrap_or(InputEvent::Trigger(limb));
                push(event, &mut visible);
            }
        }

        InputFrame { events, panel }
    }

    fn locate_hands(
        &mut self,
        modes: &[InteractionMode; 2],
        time: i64,
        tracking: &mut dyn TrackingSystem,
    ) {
        self.skeletons = [None; 2];
        if self.hand_tracking_disabled || !modes.contains(&InteractionMode::Hand) {
            return;
        }
        let Some(tracker) = tracking.hand_tracker() else {
            log::warn!("Hand tracking is unavailable; direct touch is disabled for this session.");
            self.hand_tracking_disabled = true;
            return;
        };
        for limb in Limb::ALL {
            if modes[limb.index()] != InteractionMode::Hand {
                continue;
            }
            match tracker.locate_joints(limb, time) {
                Ok(skeleton) => self.skeletons[limb.index()] = skeleton,
                Err(e) => log::debug!("Locating {limb:?} hand joints failed: {e}"),
            }
        }
    }

    /// A rising edge of an active touch on `limb`.
    fn touch_press(&mut self, limb: Limb, enabled: bool, visible: bool) -> Option<InputEvent> {
        if !enabled {
            return None;
        }
        let i = limb.index();
        let pointer = self.resolver.pointer(limb);
        if !pointer.is_touch_active() {
            self.touch_held[i] = false;
            return None;
        }
        if std::mem::replace(&mut self.touch_held[i], true) {
            return None;
        }
        if !visible {
            return Some(InputEvent::MenuShown);
        }
        pointer.uv().and_then(hit_test).map(InputEvent::Panel)
    }

    /// The HUD's answer to a trigger pulled on `limb`, if it takes the press.
    fn pointer_press(&self, limb: Limb, enabled: bool, visible: bool) -> Option<InputEvent> {
        if !enabled {
            return None;
        }
        if !visible {
            return Some(InputEvent::MenuShown);
        }
        self.resolver
            .pointer(limb)
            .uv()
            .and_then(hit_test)
            .map(InputEvent::Panel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auralis_core::math::{Quaternion, Vec3};
    use auralis_core::xr::HandJoint;
    use auralis_infra::headless::{HeadlessTracking, LimbScript, TrackingProbe};

    fn visible_hud() -> HudContext {
        HudContext {
            tunables: HudTunables::default(),
            visible: true,
        }
    }

    fn setup() -> (InputRouter, HeadlessTracking, TrackingProbe) {
        let tracking = HeadlessTracking::new();
        let probe = tracking.probe();
        (InputRouter::new(), tracking, probe)
    }

    fn poll(
        router: &mut InputRouter,
        tracking: &mut HeadlessTracking,
        hud: &HudContext,
    ) -> Vec<InputEvent> {
        router.poll(0.0, 0, &Pose::default(), hud, tracking).events
    }

    /// A fingertip just in front of the TogglePlay button of a panel pulled
    /// in for hand use.
    fn fingertip_on_play_button(gap: f32) -> HandSkeleton {
        HandSkeleton::default()
            .with_joint(HandJoint::IndexTip, Vec3::new(-0.1598, -0.1124, -0.55 + gap))
    }

    #[test]
    fn buttons_fire_in_a_fixed_order() {
        let (mut router, mut tracking, probe) = setup();
        probe.set_limb(Limb::Right, LimbScript::controller(Pose::default()));
        probe.set_limb(Limb::Left, LimbScript::controller(Pose::default()));
        probe.update_limb(Limb::Left, |l| l.actions.thumbstick = true);
        probe.update_limb(Limb::Right, |l| l.actions.primary = true);

        let events = poll(&mut router, &mut tracking, &visible_hud());
        assert_eq!(
            events,
            vec![
                InputEvent::Button(ControllerButton::A),
                InputEvent::Button(ControllerButton::LeftStick),
            ]
        );
        assert!(poll(&mut router, &mut tracking, &visible_hud()).is_empty());
    }

    #[test]
    fn trigger_fires_once_per_pull() {
        let (mut router, mut tracking, probe) = setup();
        let mut script = LimbScript::controller(Pose::default());
        script.aim = None;
        script.actions.trigger = 0.9;
        probe.set_limb(Limb::Right, script);

        let hud = visible_hud();
        assert_eq!(
            poll(&mut router, &mut tracking, &hud),
            vec![InputEvent::Trigger(Limb::Right)]
        );
        assert!(poll(&mut router, &mut tracking, &hud).is_empty());

        probe.update_limb(Limb::Right, |l| l.actions.trigger = 0.2);
        assert!(poll(&mut router, &mut tracking, &hud).is_empty());
        probe.update_limb(Limb::Right, |l| l.actions.trigger = 0.75);
        assert_eq!(
            poll(&mut router, &mut tracking, &hud),
            vec![InputEvent::Trigger(Limb::Right)]
        );
    }

    #[test]
    fn trigger_on_hidden_hud_only_shows_it() {
        let (mut router, mut tracking, probe) = setup();
        let mut script = LimbScript::controller(Pose::default());
        script.actions.trigger = 1.0;
        probe.set_limb(Limb::Left, script);

        let hud = HudContext {
            visible: false,
            ..visible_hud()
        };
        assert_eq!(
            poll(&mut router, &mut tracking, &hud),
            vec![InputEvent::MenuShown]
        );
    }

    #[test]
    fn aimed_trigger_presses_the_button_under_the_ray() {
        let (mut router, mut tracking, probe) = setup();
        // Straight at the centre of NextPreset on the default panel.
        let aim = Pose::new(Vec3::new(0.1598, -0.1944, 0.0), Quaternion::IDENTITY);
        let mut script = LimbScript::controller(aim);
        script.actions.trigger = 1.0;
        probe.set_limb(Limb::Right, script);

        assert_eq!(
            poll(&mut router, &mut tracking, &visible_hud()),
            vec![InputEvent::Panel(HudButton::NextPreset)]
        );
        assert!(matches!(router.pointers()[1], PointerState::Ray { .. }));
    }

    #[test]
    fn hand_mode_ignores_the_trigger() {
        let (mut router, mut tracking, probe) = setup();
        let mut script = LimbScript::hand(HandSkeleton::default());
        script.actions.trigger = 1.0;
        probe.set_limb(Limb::Right, script);

        assert!(poll(&mut router, &mut tracking, &visible_hud()).is_empty());
        assert!(router.hand_active());
    }

    #[test]
    fn touch_presses_once_until_released() {
        let (mut router, mut tracking, probe) = setup();
        probe.set_limb(Limb::Right, LimbScript::hand(fingertip_on_play_button(0.005)));

        let hud = visible_hud();
        assert_eq!(
            poll(&mut router, &mut tracking, &hud),
            vec![InputEvent::Panel(HudButton::TogglePlay)]
        );
        assert!(router.pointers()[1].is_touch_active());
        assert!(poll(&mut router, &mut tracking, &hud).is_empty());

        probe.set_limb(Limb::Right, LimbScript::hand(fingertip_on_play_button(0.05)));
        assert!(poll(&mut router, &mut tracking, &hud).is_empty());
        probe.set_limb(Limb::Right, LimbScript::hand(fingertip_on_play_button(0.005)));
        assert_eq!(
            poll(&mut router, &mut tracking, &hud),
            vec![InputEvent::Panel(HudButton::TogglePlay)]
        );
    }

    #[test]
    fn missing_hand_tracker_disables_touch() {
        let (mut router, mut tracking, probe) = setup();
        probe.set_hand_tracking(false);
        probe.set_limb(Limb::Right, LimbScript::hand(fingertip_on_play_button(0.005)));

        assert!(poll(&mut router, &mut tracking, &visible_hud()).is_empty());
        assert_eq!(router.markers(), [None, None]);

        // Stays disabled for the session even if the tracker comes back.
        probe.set_hand_tracking(true);
        assert!(poll(&mut router, &mut tracking, &visible_hud()).is_empty());
        router.reset_session();
        assert_eq!(poll(&mut router, &mut tracking, &visible_hud()).len(), 1);
    }

    #[test]
    fn sync_failure_drops_interaction_state() {
        let (mut router, mut tracking, probe) = setup();
        probe.set_limb(Limb::Right, LimbScript::hand(fingertip_on_play_button(0.005)));
        poll(&mut router, &mut tracking, &visible_hud());
        assert!(router.hand_active());

        probe.set_sync_failure(true);
        probe.update_limb(Limb::Right, |l| l.actions.primary = true);
        assert!(poll(&mut router, &mut tracking, &visible_hud()).is_empty());
        assert!(!router.hand_active());
        assert_eq!(router.markers(), [None, None]);
    }

    #[test]
    fn stick_buttons_flash_the_menu_key() {
        assert_eq!(ControllerButton::LeftStick.flash_key(), FlashKey::Menu);
        assert_eq!(ControllerButton::RightStick.flash_key(), FlashKey::Menu);
        assert_eq!(ControllerButton::X.feedback(), "X PREV PRESET");
    }
}
