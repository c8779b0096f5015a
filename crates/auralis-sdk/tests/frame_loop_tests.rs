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

//! Drives the full frame loop against the headless backends.

use auralis_core::config::{MapPropertySource, VisualizerConfig};
use auralis_core::engine::ProjectionMode;
use auralis_core::math::{Pose, Quaternion, Vec3};
use auralis_core::platform::LifecycleSignal;
use auralis_core::xr::{HandJoint, HandSkeleton, HardwareSessionState, Limb, XrCall};
use auralis_core::{AudioSourceKind, Clock, ManualClock};
use auralis_control::SessionState;
use auralis_infra::headless::{
    CompositorProbe, EngineProbe, HeadlessCompositor, HeadlessEngine, HeadlessPlatform,
    HeadlessTracking, LimbScript, PlatformProbe, PlatformRequest, TrackingProbe,
};
use auralis_lanes::FlashKey;
use auralis_sdk::{Backends, Visualizer};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

struct Rig {
    visualizer: Visualizer,
    clock: ManualClock,
    compositor: CompositorProbe,
    engine: EngineProbe,
    tracking: TrackingProbe,
    platform: PlatformProbe,
    properties: MapPropertySource,
    denylist: PathBuf,
    _dir: TempDir,
}

fn rig() -> Rig {
    rig_with(&[], |_| {})
}

/// Builds a visualizer over three presets, with `slow` already marked and
/// `tune` applied to the properties before the first frame.
fn rig_with(slow: &[&str], tune: impl FnOnce(&MapPropertySource)) -> Rig {
    let dir = tempfile::tempdir().unwrap();
    let presets = dir.path().join("presets");
    fs::create_dir(&presets).unwrap();
    for name in ["a_heavy.milk", "b_light.milk", "c_calm.milk"] {
        fs::write(presets.join(name), "[preset00]\n").unwrap();
    }
    let denylist = dir.path().join("slow.txt");
    if !slow.is_empty() {
        fs::write(&denylist, slow.join("\n")).unwrap();
    }

    let config = VisualizerConfig {
        preset_dir: presets,
        denylist_path: Some(denylist.clone()),
        tunables_path: None,
        ..VisualizerConfig::default()
    };

    let clock = ManualClock::new(0.0);
    let compositor = HeadlessCompositor::new(clock.clone());
    let engine = HeadlessEngine::new(clock.clone());
    let tracking = HeadlessTracking::new();
    let platform = HeadlessPlatform::new();
    let properties = MapPropertySource::new();
    tune(&properties);

    let probes = (
        compositor.probe(),
        engine.probe(),
        tracking.probe(),
        platform.probe(),
    );
    let visualizer = Visualizer::builder(config)
        .with_clock(clock.clone())
        .with_properties(properties.clone())
        .build(Backends {
            compositor: Box::new(compositor),
            tracking: Box::new(tracking),
            engine: Box::new(engine),
            platform: Box::new(platform),
        });
    visualizer.lifecycle().publish(LifecycleSignal::Resumed);
    visualizer.lifecycle().publish(LifecycleSignal::WindowCreated);

    Rig {
        visualizer,
        clock,
        compositor: probes.0,
        engine: probes.1,
        tracking: probes.2,
        platform: probes.3,
        properties,
        denylist,
        _dir: dir,
    }
}

impl Rig {
    fn step(&mut self) {
        assert!(self.visualizer.step(), "loop exited unexpectedly");
    }

    fn hud_text(&self) -> Vec<String> {
        self.compositor.record().hud_text
    }

    fn current_preset(&self) -> String {
        self.engine.record().current.unwrap_or_default()
    }
}

#[test]
fn session_start_renders_both_views() {
    let mut rig = rig();
    rig.step();

    assert_eq!(rig.visualizer.session_state(), SessionState::Running);
    let record = rig.compositor.record();
    assert_eq!(record.sessions_begun, 1);
    assert_eq!(record.frames_submitted, 1);
    assert_eq!(record.last_rendered, vec![0, 1]);
    assert_eq!(record.acquired, 2);
    assert_eq!(record.released, 2);
    assert_eq!(record.projection_draws, 2);
    assert_eq!(record.last_projection, Some(ProjectionMode::FullSphere));
    assert_eq!(record.hud_draws, 2);
    assert_eq!(record.hud_text_uploads, 2);

    let engine = rig.engine.record();
    assert_eq!(engine.renders, 1);
    assert!((71..=72).contains(&engine.last_target_fps));
    assert_eq!(engine.mesh, Some((64, 48)));
    assert!(rig.current_preset().ends_with("a_heavy.milk"));
}

#[test]
fn hud_text_is_uploaded_only_when_it_changes() {
    let mut rig = rig();
    rig.step();
    rig.step();
    rig.step();

    let record = rig.compositor.record();
    assert_eq!(record.hud_draws, 6);
    assert_eq!(record.hud_text_uploads, 2);
}

#[test]
fn pushed_audio_reaches_the_engine() {
    let mut rig = rig();
    let handle = rig.visualizer.handle();
    let samples = vec![0.25_f32; 512 * 2];
    assert_eq!(handle.push_audio(&samples, 512), 512);

    rig.step();

    let engine = rig.engine.record();
    assert_eq!(engine.pcm_frames, 512);
    assert_eq!(engine.pcm_pushes, 1);
    assert_eq!(handle.queued_frames(), 0);
}

#[test]
fn host_ui_state_is_shown_on_the_hud() {
    let mut rig = rig();
    let handle = rig.visualizer.handle();
    handle.update_ui_state(AudioSourceKind::Microphone, true, "Night Drive");
    handle.push_audio(&[0.1; 512 * 2], 512);

    rig.step();

    let text = rig.hud_text();
    assert_eq!(
        text[..4],
        [
            "AUD MICROPHONE".to_string(),
            "PROJ SPHERE".to_string(),
            "PLAY PLAYING".to_string(),
            "PRESET A HEAVY".to_string(),
        ]
    );
    assert!(text[4].starts_with("TRACK: "));
}

#[test]
fn silence_switches_the_hud_to_synthetic_audio() {
    let mut rig = rig();
    let handle = rig.visualizer.handle();
    handle.update_ui_state(AudioSourceKind::Microphone, true, "Night Drive");
    handle.push_audio(&[0.1; 512 * 2], 512);
    rig.step();
    assert_eq!(rig.hud_text()[0], "AUD MICROPHONE");

    rig.clock.set(5.0);
    rig.step();

    let text = rig.hud_text();
    assert_eq!(text[0], "AUD SYNTHETIC");
    assert_eq!(text[2], "PLAY PAUSED");
    assert_eq!(rig.engine.record().pcm_pushes, 2);
    // The host's own report is untouched.
    assert_eq!(handle.ui_snapshot().audio_source, AudioSourceKind::Microphone);
}

#[test]
fn host_audio_state_returns_when_audio_resumes() {
    let mut rig = rig();
    let handle = rig.visualizer.handle();
    handle.update_ui_state(AudioSourceKind::Microphone, true, "Night Drive");
    handle.push_audio(&[0.1; 512 * 2], 512);
    rig.step();

    rig.clock.set(5.0);
    rig.step();
    assert_eq!(rig.visualizer.hud().audio_source(), AudioSourceKind::Synthetic);

    for _ in 0..5 {
        handle.push_audio(&[0.1; 512 * 2], 512);
        rig.step();
    }

    assert_eq!(rig.visualizer.hud().audio_source(), AudioSourceKind::Microphone);
    assert!(rig.visualizer.hud().is_playing());
    let text = rig.hud_text();
    assert_eq!(text[0], "AUD MICROPHONE");
    assert_eq!(text[2], "PLAY PLAYING");
}

#[test]
fn controller_button_advances_the_preset() {
    let mut rig = rig();
    rig.tracking
        .set_limb(Limb::Right, LimbScript::controller(Pose::default()));
    rig.tracking
        .update_limb(Limb::Right, |l| l.actions.primary = true);

    rig.step();

    let (path, smooth) = rig.engine.record().loaded_files.last().cloned().unwrap();
    assert!(path.ends_with("b_light.milk"));
    assert!(smooth);
    assert!(rig.hud_text().contains(&"A NEXT PRESET".to_string()));
    assert!(rig.visualizer.hud().flash_level(FlashKey::A) > 0.0);

    // The press was consumed.
    rig.step();
    assert!(rig.current_preset().ends_with("b_light.milk"));
}

#[test]
fn right_trigger_toggles_projection_once_per_pull() {
    let mut rig = rig();
    let mut script = LimbScript::controller(Pose::default());
    script.aim = None;
    script.actions.trigger = 1.0;
    rig.tracking.set_limb(Limb::Right, script);

    rig.step();
    rig.step();

    assert_eq!(rig.visualizer.projection(), ProjectionMode::FrontDome);
    assert_eq!(
        rig.compositor.record().last_projection,
        Some(ProjectionMode::FrontDome)
    );
    assert!(rig.hud_text().contains(&"RT PROJECTION DOME".to_string()));
    assert_eq!(rig.hud_text()[1], "PROJ DOME");
}

#[test]
fn left_trigger_requests_the_optional_pack() {
    let mut rig = rig();
    let mut script = LimbScript::controller(Pose::default());
    script.aim = None;
    script.actions.trigger = 1.0;
    rig.tracking.set_limb(Limb::Left, script);

    rig.step();

    assert_eq!(rig.platform.count(PlatformRequest::RequestOptionalPack), 1);
    assert!(rig.hud_text().contains(&"LT REQUEST PACK".to_string()));
}

#[test]
fn aimed_trigger_presses_the_hud_button() {
    let mut rig = rig();
    let aim = Pose::new(Vec3::new(0.1598, -0.1944, 0.0), Quaternion::IDENTITY);
    let mut script = LimbScript::controller(aim);
    script.actions.trigger = 1.0;
    rig.tracking.set_limb(Limb::Right, script);

    rig.step();

    assert!(rig.current_preset().ends_with("b_light.milk"));
    assert!(rig.hud_text().contains(&"UI NEXT PRESET".to_string()));
    assert!(rig.compositor.record().last_pointers[1].is_some());
}

#[test]
fn fingertip_touch_toggles_playback_once() {
    let mut rig = rig();
    let fingertip = HandSkeleton::default().with_joint(
        HandJoint::IndexTip,
        Vec3::new(-0.1598, -0.1124, -0.55 + 0.005),
    );
    rig.tracking.set_limb(Limb::Right, LimbScript::hand(fingertip));

    rig.step();
    rig.step();

    assert_eq!(rig.platform.count(PlatformRequest::TogglePlayback), 1);
    assert!(rig.hud_text().contains(&"UI PLAY PAUSE".to_string()));
    let pointer = rig.compositor.record().last_pointers[1].unwrap();
    assert!(pointer.pressed);
}

#[test]
fn interaction_on_a_hidden_hud_only_shows_it() {
    let mut rig = rig();
    rig.step();
    rig.clock.set(15.0);
    rig.step();
    assert!(!rig.visualizer.hud().is_visible(15.1));

    let aim = Pose::new(Vec3::new(0.1598, -0.1944, 0.0), Quaternion::IDENTITY);
    let mut script = LimbScript::controller(aim);
    script.actions.trigger = 1.0;
    rig.tracking.set_limb(Limb::Right, script);
    rig.step();

    assert!(rig.hud_text().contains(&"MENU SHOWN".to_string()));
    assert!(rig.current_preset().ends_with("a_heavy.milk"));
    assert!(rig.platform.requests().is_empty());
}

#[test]
fn slow_preset_is_skipped_and_remembered() {
    let mut rig = rig();
    rig.engine.set_render_cost("a_heavy", 0.05);

    for _ in 0..400 {
        rig.step();
        if rig.current_preset().ends_with("b_light.milk") {
            break;
        }
    }

    assert!(rig.current_preset().ends_with("b_light.milk"));
    assert!(rig.clock.now() > 6.0);
    assert_eq!(rig.visualizer.telemetry().snapshot().auto_skips, 1);
    assert!(rig.hud_text().contains(&"AUTO-SKIP SLOW PRESET".to_string()));
    let marked = fs::read_to_string(&rig.denylist).unwrap();
    assert!(marked.contains("a_heavy.milk"));
}

#[test]
fn marked_presets_are_skipped_until_cleared() {
    let mut rig = rig_with(&["a_heavy.milk"], |_| {});
    rig.step();
    assert!(rig.current_preset().ends_with("b_light.milk"));

    rig.properties.set("perf.clear_marked", "1");
    rig.clock.advance(1.5);
    rig.step();

    assert_eq!(fs::read_to_string(&rig.denylist).unwrap(), "");
    assert!(rig
        .hud_text()
        .contains(&"CLEARED SLOW PRESET MARKS".to_string()));
}

#[test]
fn mesh_tunable_reaches_the_engine() {
    let mut rig = rig_with(&[], |props| props.set("perf.mesh", "96x64"));
    rig.step();

    assert_eq!(rig.engine.record().mesh, Some((96, 64)));
    assert!(rig.hud_text().contains(&"QUALITY MESH UPDATED".to_string()));
}

#[test]
fn failing_view_is_dropped_from_the_frame() {
    let mut rig = rig();
    rig.compositor.set_failing_eye(Some(1));

    rig.step();

    let record = rig.compositor.record();
    assert_eq!(record.last_rendered, vec![0]);
    assert_eq!(record.acquired, record.released);
    assert_eq!(rig.visualizer.telemetry().snapshot().dropped_views, 1);
    assert_eq!(rig.visualizer.session_state(), SessionState::Running);
}

#[test]
fn frames_without_views_are_still_submitted() {
    let mut rig = rig();
    rig.compositor.set_view_count(0);

    rig.step();

    let record = rig.compositor.record();
    assert_eq!(record.frames_submitted, 1);
    assert!(record.last_rendered.is_empty());
    assert_eq!(record.projection_draws, 0);
}

#[test]
fn frames_the_runtime_skips_are_submitted_empty() {
    let mut rig = rig();
    rig.compositor.set_should_render(false);

    rig.step();

    let record = rig.compositor.record();
    assert_eq!(record.frames_submitted, 1);
    assert!(record.last_rendered.is_empty());
    assert_eq!(rig.engine.record().renders, 0);
    assert_eq!(rig.visualizer.telemetry().snapshot().idle_frames, 1);
}

#[test]
fn paused_app_keeps_pacing_without_rendering() {
    let mut rig = rig();
    rig.step();
    rig.visualizer.lifecycle().publish(LifecycleSignal::Paused);

    rig.step();

    let record = rig.compositor.record();
    assert_eq!(record.frames_submitted, 2);
    assert!(record.last_rendered.is_empty());
    assert_eq!(rig.engine.record().renders, 1);
}

#[test]
fn stopping_then_ready_restarts_the_session() {
    let mut rig = rig();
    rig.step();

    rig.compositor.push_event(HardwareSessionState::Stopping);
    rig.step();
    assert_eq!(rig.visualizer.session_state(), SessionState::Idle);
    assert_eq!(rig.compositor.record().sessions_ended, 1);
    let waited = rig.compositor.record().frames_waited;

    rig.step();
    assert_eq!(rig.compositor.record().frames_waited, waited);

    rig.compositor.push_event(HardwareSessionState::Ready);
    rig.step();
    assert_eq!(rig.visualizer.session_state(), SessionState::Running);
    assert_eq!(rig.compositor.record().sessions_begun, 2);
    assert_eq!(rig.compositor.record().frames_waited, waited + 1);
}

#[test]
fn destroy_signal_ends_the_loop_cleanly() {
    let rig = rig();
    rig.visualizer.lifecycle().publish(LifecycleSignal::Destroy);
    let compositor = rig.compositor.clone();

    assert!(rig.visualizer.run().is_ok());
    assert_eq!(compositor.record().sessions_ended, 0);
}

#[test]
fn runtime_exit_ends_the_running_session() {
    let mut rig = rig();
    rig.step();
    rig.compositor.push_event(HardwareSessionState::Exiting);

    assert!(!rig.visualizer.step());
    assert_eq!(rig.visualizer.session_state(), SessionState::Exited);
    assert_eq!(rig.compositor.record().sessions_ended, 1);
}

#[test]
fn fatal_runtime_failure_stops_the_loop_with_an_error() {
    let rig = rig();
    rig.compositor.fail_once(XrCall::WaitFrame);
    let compositor = rig.compositor.clone();

    let err = rig.visualizer.run().unwrap_err();

    assert!(err.root_cause().to_string().contains("WaitFrame"));
    let record = compositor.record();
    assert_eq!(record.sessions_begun, 1);
    assert_eq!(record.sessions_ended, 1);
}
