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

use super::touch::{touch_point, TouchBands, TouchLatch};
use super::PointerState;
use auralis_control::InteractionMode;
use auralis_core::config::HudTunables;
use auralis_core::math::Pose;
use auralis_core::xr::{HandSkeleton, Limb, PanelFrame};

/// Farthest panel distance while a hand is used, so it stays within reach.
pub const HAND_MAX_DISTANCE: f32 = 0.55;
/// Lowest panel offset while a hand is used.
pub const HAND_MIN_V_OFFSET: f32 = -0.08;

/// Places the HUD panel in front of the head for this frame.
///
/// When any limb is in hand mode the panel is pulled closer and raised.
pub fn hud_panel(head: &Pose, hud: &HudTunables, hand_active: bool) -> PanelFrame {
    let (distance, v_offset) = if hand_active {
        (
            hud.distance.min(HAND_MAX_DISTANCE),
            hud.v_offset.max(HAND_MIN_V_OFFSET),
        )
    } else {
        (hud.distance, hud.v_offset)
    };
    PanelFrame::in_front_of(head, distance, v_offset, hud.width(), hud.height())
}

/// The tracking data of one limb for a single frame.
#[derive(Debug, Clone, Copy)]
pub struct LimbInput<'a> {
    /// The debounced interaction mode.
    pub mode: InteractionMode,
    /// Joint positions, when hand tracking is available.
    pub skeleton: Option<&'a HandSkeleton>,
    /// The controller's aim pose, when located.
    pub aim: Option<Pose>,
}

impl LimbInput<'_> {
    /// A limb with nothing tracked.
    pub fn untracked(mode: InteractionMode) -> Self {
        Self {
            mode,
            skeleton: None,
            aim: None,
        }
    }
}

/// Resolves both limbs' pointers against the HUD panel.
#[derive(Debug, Clone, Default)]
pub struct PointerResolver {
    bands: TouchBands,
    pointers: [PointerState; 2],
    latches: [TouchLatch; 2],
}

impl PointerResolver {
    /// Creates a resolver with the default touch bands.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver with custom touch bands.
    pub fn with_bands(bands: TouchBands) -> Self {
        Self {
            bands,
            ..Self::default()
        }
    }

    /// The pointer of `limb` after the last resolution.
    pub fn pointer(&self, limb: Limb) -> PointerState {
        self.pointers[limb.index()]
    }

    /// Both pointers, left first.
    pub fn pointers(&self) -> &[PointerState; 2] {
        &self.pointers
    }

    /// Whether `limb`'s fingertip is latched in a press.
    pub fn is_latched(&self, limb: Limb) -> bool {
        self.latches[limb.index()].is_latched()
    }

    /// Clears pointers and any press in progress.
    pub fn reset(&mut self) {
        self.pointers = [PointerState::None; 2];
        for latch in &mut self.latches {
            latch.reset();
        }
    }

    /// Recomputes both pointers for this frame.
    ///
    /// `panel` is `None` while the HUD is disabled, which also drops any
    /// press in progress.
    pub fn resolve(&mut self, panel: Option<&PanelFrame>, limbs: &[LimbInput<'_>; 2]) {
        self.pointers = [PointerState::None; 2];

        let Some(panel) = panel else {
            for latch in &mut self.latches {
                latch.reset();
            }
            return;
        };

        for limb in Limb::ALL {
            let input = &limbs[limb.index()];
            match input.mode {
                InteractionMode::Hand => self.resolve_touch(limb, panel, input.skeleton),
                InteractionMode::Controller => self.resolve_ray(limb, panel, input.aim),
            }
        }
    }

    fn resolve_touch(&mut self, limb: Limb, panel: &PanelFrame, skeleton: Option<&HandSkeleton>) {
        let i = limb.index();
        let projected = skeleton
            .and_then(touch_point)
            .and_then(|point| panel.project_point(point));
        let Some((uv, distance)) = projected else {
            self.latches[i].reset();
            return;
        };

        let hover = self.bands.hover.contains(distance);
        let active = self.latches[i].update(distance, &self.bands);
        if hover || active {
            self.pointers[i] = PointerState::Touch { uv, active };
        }
    }

    fn resolve_ray(&mut self, limb: Limb, panel: &PanelFrame, aim: Option<Pose>) {
        let i = limb.index();
        self.latches[i].reset();
        let Some(aim) = aim else {
            return;
        };

        if let Some(uv) = panel.raycast_pose(&aim) {
            self.pointers[i] = PointerState::Ray { uv };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auralis_core::math::{Quaternion, Vec3};
    use auralis_core::xr::HandJoint;

    fn panel() -> PanelFrame {
        PanelFrame::in_front_of(&Pose::default(), 0.5, 0.0, 0.68, 0.36)
    }

    fn fingertip_at(z: f32) -> HandSkeleton {
        HandSkeleton::default().with_joint(HandJoint::IndexTip, Vec3::new(0.0, 0.0, z))
    }

    fn inputs<'a>(left: LimbInput<'a>, right: LimbInput<'a>) -> [LimbInput<'a>; 2] {
        [left, right]
    }

    #[test]
    fn controller_ray_hits_panel_centre() {
        let mut resolver = PointerResolver::new();
        let aim = Pose::new(Vec3::ZERO, Quaternion::IDENTITY);
        let right = LimbInput {
            aim: Some(aim),
            ..LimbInput::untracked(InteractionMode::Controller)
        };
        resolver.resolve(
            Some(&panel()),
            &inputs(LimbInput::untracked(InteractionMode::Controller), right),
        );

        assert_eq!(resolver.pointer(Limb::Left), PointerState::None);
        let uv = resolver.pointer(Limb::Right).uv().expect("ray hits");
        assert!((uv.x - 0.5).abs() < 1e-5 && (uv.y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn controller_ray_follows_the_aim_every_frame() {
        let mut resolver = PointerResolver::new();
        let aimed = |aim: Pose| LimbInput {
            aim: Some(aim),
            ..LimbInput::untracked(InteractionMode::Controller)
        };
        let left = LimbInput::untracked(InteractionMode::Controller);

        resolver.resolve(
            Some(&panel()),
            &inputs(left, aimed(Pose::new(Vec3::ZERO, Quaternion::IDENTITY))),
        );
        let centre = resolver.pointer(Limb::Right).uv().expect("ray hits");
        assert!((centre.x - 0.5).abs() < 1e-5);

        resolver.resolve(
            Some(&panel()),
            &inputs(
                LimbInput::untracked(InteractionMode::Controller),
                aimed(Pose::new(Vec3::new(0.17, 0.0, 0.0), Quaternion::IDENTITY)),
            ),
        );
        let moved = resolver.pointer(Limb::Right).uv().expect("ray hits");
        assert!((moved.x - 0.75).abs() < 1e-4);

        // Pointing along the panel misses it.
        let sideways = Quaternion::from_axis_angle(Vec3::Y, std::f32::consts::FRAC_PI_2);
        resolver.resolve(
            Some(&panel()),
            &inputs(
                LimbInput::untracked(InteractionMode::Controller),
                aimed(Pose::new(Vec3::ZERO, sideways)),
            ),
        );
        assert_eq!(resolver.pointer(Limb::Right), PointerState::None);
    }

    #[test]
    fn fingertip_presses_through_the_panel_and_releases() {
        let mut resolver = PointerResolver::new();
        let panel = panel();

        // Panel sits at z = -0.5 facing +z; distance is z + 0.5.
        let mut states = Vec::new();
        for z in [-0.48, -0.495, -0.485, -0.475] {
            let skeleton = fingertip_at(z);
            let left = LimbInput {
                skeleton: Some(&skeleton),
                ..LimbInput::untracked(InteractionMode::Hand)
            };
            resolver.resolve(
                Some(&panel),
                &inputs(left, LimbInput::untracked(InteractionMode::Controller)),
            );
            states.push(resolver.pointer(Limb::Left));
        }

        assert!(matches!(states[0], PointerState::Touch { active: false, .. }));
        assert!(states[1].is_touch_active());
        assert!(states[2].is_touch_active(), "held inside release band");
        assert!(matches!(states[3], PointerState::Touch { active: false, .. }));
    }

    #[test]
    fn far_fingertip_is_not_drawn() {
        let mut resolver = PointerResolver::new();
        let skeleton = fingertip_at(-0.3);
        let left = LimbInput {
            skeleton: Some(&skeleton),
            ..LimbInput::untracked(InteractionMode::Hand)
        };
        resolver.resolve(
            Some(&panel()),
            &inputs(left, LimbInput::untracked(InteractionMode::Hand)),
        );
        assert_eq!(resolver.pointers(), &[PointerState::None; 2]);
    }

    #[test]
    fn lost_hand_drops_the_latch() {
        let mut resolver = PointerResolver::new();
        let panel = panel();
        let skeleton = fingertip_at(-0.495);
        let pressed = LimbInput {
            skeleton: Some(&skeleton),
            ..LimbInput::untracked(InteractionMode::Hand)
        };
        let idle = LimbInput::untracked(InteractionMode::Hand);

        resolver.resolve(Some(&panel), &inputs(pressed, idle));
        assert!(resolver.is_latched(Limb::Left));

        resolver.resolve(Some(&panel), &inputs(idle, idle));
        assert!(!resolver.is_latched(Limb::Left));
        assert_eq!(resolver.pointer(Limb::Left), PointerState::None);
    }

    #[test]
    fn disabled_hud_clears_everything() {
        let mut resolver = PointerResolver::new();
        let skeleton = fingertip_at(-0.495);
        let pressed = LimbInput {
            skeleton: Some(&skeleton),
            ..LimbInput::untracked(InteractionMode::Hand)
        };
        let idle = LimbInput::untracked(InteractionMode::Controller);
        resolver.resolve(Some(&panel()), &inputs(pressed, idle));
        assert!(resolver.is_latched(Limb::Left));

        resolver.resolve(None, &inputs(pressed, idle));
        assert!(!resolver.is_latched(Limb::Left));
        assert!(!resolver.pointer(Limb::Left).is_visible());
    }

    #[test]
    fn hand_mode_pulls_the_panel_closer() {
        let hud = HudTunables::default();
        let far = hud_panel(&Pose::default(), &hud, false);
        let near = hud_panel(&Pose::default(), &hud, true);
        assert!((far.center.z + hud.distance).abs() < 1e-5);
        assert!((near.center.z + HAND_MAX_DISTANCE).abs() < 1e-5);
        assert!((near.center.y - HAND_MIN_V_OFFSET).abs() < 1e-5);
        assert_eq!(near.width, far.width);
    }
}
