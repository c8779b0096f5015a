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

//! Work done once per rendered frame.

use super::Visualizer;
use crate::input::{ControllerButton, HudContext, InputEvent};
use auralis_control::{GovernorConfig, GovernorDecision, GovernorInputs};
use auralis_core::engine::ProjectionMode;
use auralis_core::xr::{
    center_head_pose, Compositor, FrameTiming, HudOverlay, Limb, PanelFrame, View, ViewGuard,
    XrError,
};
use auralis_lanes::hud_lane::{VISIBLE_AFTER_INTERACTION, VISIBLE_AFTER_STATUS_CHANGE};
use auralis_lanes::pointer_lane::hud_panel;
use auralis_lanes::{AudioStep, FlashKey, HudButton};

/// Frame intervals shorter than this do not update the engine's frame rate hint.
const MIN_FPS_DELTA: f64 = 0.0001;

impl Visualizer {
    /// Paces, renders and submits one frame.
    ///
    /// The frame is always submitted once `begin_frame` succeeded, with
    /// whatever views were drawn, even when rendering was skipped or failed.
    pub(super) fn run_frame(&mut self) {
        let timing = match self.compositor.wait_frame() {
            Ok(timing) => timing,
            Err(e) => {
                self.fail(e);
                return;
            }
        };
        if let Err(e) = self.compositor.begin_frame() {
            self.fail(e);
            return;
        }

        let mut rendered = Vec::new();
        let mut failure = None;
        if timing.should_render && self.session.can_render() {
            match self.render_frame(&timing) {
                Ok(views) => rendered = views,
                Err(e) => failure = Some(e),
            }
        } else {
            self.telemetry.record_idle_frame();
        }

        if let Err(e) = self.compositor.end_frame(&timing, &rendered) {
            failure.get_or_insert(e);
        }
        if let Some(e) = failure {
            self.fail(e);
        }
    }

    fn render_frame(&mut self, timing: &FrameTiming) -> Result<Vec<usize>, XrError> {
        let now = self.clock.now();
        let delta = now - self.last_frame;
        self.last_frame = now;

        self.poll_tunables(now);
        let snapshot = self.shared.ui_snapshot();
        self.hud.apply_snapshot(now, &snapshot);
        self.hud.decay_flashes(delta.max(0.0) as f32);
        self.update_governor(now, delta);
        self.render_content(now, delta);

        let views = self.compositor.locate_views(timing)?;
        let head = center_head_pose(&views);
        let hud_tunables = self.tunables.current().hud;

        let panel = if views.is_empty() {
            self.input.reset();
            hud_panel(&head, &hud_tunables, false)
        } else {
            let context = HudContext {
                tunables: hud_tunables,
                visible: self.hud.is_visible(now),
            };
            let frame = self.input.poll(
                now,
                timing.predicted_display_time,
                &head,
                &context,
                self.tracking.as_mut(),
            );
            let interacted = !frame.events.is_empty();
            for event in frame.events {
                self.execute(now, event);
            }
            if interacted {
                self.hud.extend_visibility(now, VISIBLE_AFTER_INTERACTION);
            }
            frame.panel
        };

        let rendered = self.draw_views(now, &views, &panel)?;

        self.telemetry
            .record_frame(rendered.len(), views.len() - rendered.len());
        self.telemetry
            .set_gauges(self.governor.smoothed_fps(), self.shared.ring().len_frames());
        if self.telemetry.tick(now) {
            log::info!("{}", self.telemetry.summary());
        }
        Ok(rendered)
    }

    fn poll_tunables(&mut self, now: f64) {
        let Some(changes) = self.tunables.poll(now, self.properties.as_ref()) else {
            return;
        };
        let perf = self.tunables.current().perf;
        self.governor.set_config(GovernorConfig::from(&perf));
        self.catalog.set_skip_denylisted(perf.skip_marked);

        if changes.hud_changed {
            self.hud.extend_visibility(now, VISIBLE_AFTER_STATUS_CHANGE);
            self.hud.mark_dirty();
        }
        if let Some((width, height)) = changes.mesh_changed {
            self.engine.set_mesh_size(width, height);
            log::info!("Engine mesh set to {width}x{height}.");
            self.show_status(now, "QUALITY MESH UPDATED");
        }
        if changes.clear_requested {
            if let Err(e) = self.catalog.clear_denylist() {
                log::warn!("{e}");
            }
            self.show_status(now, "CLEARED SLOW PRESET MARKS");
        }
    }

    fn update_governor(&mut self, now: f64, delta: f64) {
        let inputs = GovernorInputs {
            item_count: self.catalog.len(),
            fallback_active: self.catalog.is_fallback_active(),
            last_switch: self.catalog.last_switch(),
        };
        let decision = self.governor.update(now, delta, &inputs);
        if !matches!(decision, GovernorDecision::Skip { .. }) {
            return;
        }

        if let Err(e) = self.catalog.mark_current_denylisted() {
            log::warn!("Could not remember the slow preset: {e}");
        }
        self.telemetry.record_auto_skip();
        self.hud.set_feedback(now, "AUTO-SKIP SLOW PRESET");
        self.hud.extend_visibility(now, VISIBLE_AFTER_INTERACTION);
        self.switch_preset(now, 1);
    }

    fn render_content(&mut self, now: f64, delta: f64) {
        let step = self
            .audio
            .step(now, self.shared.ring(), self.engine.as_mut());
        match step {
            AudioStep::Synthetic(_) => self.hud.show_synthetic_audio(),
            AudioStep::External(_) => {
                self.hud.show_host_audio(now);
            }
            AudioStep::Silent => {}
        }

        if self.catalog.rescan(now, self.engine.as_mut()) {
            self.hud.set_preset(self.catalog.label());
        }
        if self.catalog.auto_advance(now, self.engine.as_mut()) {
            self.hud.set_preset(self.catalog.label());
        }

        if delta > MIN_FPS_DELTA {
            self.engine_fps = (1.0 / delta) as u32;
        }
        self.engine.render(self.engine_fps);
    }

    fn draw_views(
        &mut self,
        now: f64,
        views: &[View],
        panel: &PanelFrame,
    ) -> Result<Vec<usize>, XrError> {
        let show_hud = self.tunables.current().hud.enabled && self.hud.is_visible(now);
        let text_changed = show_hud && self.hud.refresh(now).is_some();
        let overlay = show_hud.then(|| HudOverlay {
            panel,
            text: text_changed.then(|| self.hud.lines()),
            flash: self.hud.flashes(),
            pointers: self.input.markers(),
        });

        let mut rendered = Vec::with_capacity(views.len());
        for (eye, view) in views.iter().enumerate() {
            match draw_view(
                self.compositor.as_mut(),
                eye,
                view,
                self.projection,
                overlay.as_ref(),
            ) {
                Ok(()) => rendered.push(eye),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => log::debug!("Dropping view {eye} from this frame: {e}"),
            }
        }
        Ok(rendered)
    }

    fn execute(&mut self, now: f64, event: InputEvent) {
        match event {
            InputEvent::Button(button) => {
                match button {
                    ControllerButton::A => self.switch_preset(now, 1),
                    ControllerButton::X => self.switch_preset(now, -1),
                    ControllerButton::Y => self.platform.toggle_playback(),
                    ControllerButton::B => self.platform.next_track(),
                    ControllerButton::LeftStick => self.platform.previous_track(),
                    ControllerButton::RightStick => self.platform.cycle_audio_input(),
                }
                self.hud.flash(button.flash_key());
                self.hud.set_feedback(now, button.feedback());
            }
            InputEvent::Panel(button) => self.press_hud_button(now, button),
            InputEvent::Trigger(Limb::Right) => {
                let mode = self.toggle_projection();
                self.hud.flash(FlashKey::RightTrigger);
                self.hud
                    .set_feedback(now, &format!("RT PROJECTION {}", mode.label()));
            }
            InputEvent::Trigger(Limb::Left) => {
                self.request_optional_pack(now);
                self.hud.flash(FlashKey::LeftTrigger);
                self.hud.set_feedback(now, "LT REQUEST PACK");
            }
            InputEvent::MenuShown => {
                self.hud.set_feedback(now, "MENU SHOWN");
                self.hud.extend_visibility(now, VISIBLE_AFTER_INTERACTION);
            }
        }
    }

    fn press_hud_button(&mut self, now: f64, button: HudButton) {
        let feedback = match button {
            HudButton::PrevPreset => {
                self.switch_preset(now, -1);
                "UI PREV PRESET".to_owned()
            }
            HudButton::NextPreset => {
                self.switch_preset(now, 1);
                "UI NEXT PRESET".to_owned()
            }
            HudButton::TogglePlay => {
                self.platform.toggle_playback();
                "UI PLAY PAUSE".to_owned()
            }
            HudButton::NextTrack => {
                self.platform.next_track();
                "UI NEXT TRACK".to_owned()
            }
            HudButton::OptionalPack => {
                self.request_optional_pack(now);
                "UI REQUEST PACK".to_owned()
            }
            HudButton::CycleAudio => {
                self.platform.cycle_audio_input();
                "UI AUDIO INPUT".to_owned()
            }
            HudButton::ToggleProjection => {
                format!("UI PROJECTION {}", self.toggle_projection().label())
            }
        };
        self.hud.flash(button.flash_key());
        self.hud.set_feedback(now, &feedback);
        self.hud.extend_visibility(now, VISIBLE_AFTER_INTERACTION);
    }

    fn switch_preset(&mut self, now: f64, delta: i32) {
        if self.catalog.advance(now, delta, self.engine.as_mut()) {
            self.hud.set_preset(self.catalog.label());
        }
    }

    fn toggle_projection(&mut self) -> ProjectionMode {
        self.projection = self.projection.toggled();
        self.hud.set_projection(self.projection);
        log::info!("Projection set to {}.", self.projection.label());
        self.projection
    }

    fn request_optional_pack(&mut self, now: f64) {
        self.platform.request_optional_pack();
        self.catalog.force_rescan(now);
    }

    fn show_status(&mut self, now: f64, label: &str) {
        self.hud.set_feedback(now, label);
        self.hud.extend_visibility(now, VISIBLE_AFTER_STATUS_CHANGE);
    }
}

/// Draws one view into its acquired target.
///
/// The target is released on every path; a failure anywhere drops only
/// this view.
fn draw_view(
    compositor: &mut dyn Compositor,
    eye: usize,
    view: &View,
    projection: ProjectionMode,
    hud: Option<&HudOverlay<'_>>,
) -> Result<(), XrError> {
    let mut target = ViewGuard::acquire(compositor, eye)?;
    target.compositor().draw_projection(eye, view, projection)?;
    if let Some(hud) = hud {
        target.compositor().draw_hud(eye, view, hud)?;
    }
    target.compositor().draw_overlays(eye, view)?;
    target.release()
}
