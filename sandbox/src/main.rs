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

// Headless demo of the visualizer's control core.
// Run with: cargo run -p sandbox -- --frames 1200

use anyhow::{bail, Context, Result};
use auralis_core::config::VisualizerConfig;
use auralis_core::math::{Pose, Vec3};
use auralis_core::platform::LifecycleSignal;
use auralis_core::xr::{HandJoint, HandSkeleton, Limb};
use auralis_core::{AudioSourceKind, Clock, ManualClock};
use auralis_infra::audio::TestToneInput;
use auralis_infra::headless::{
    EngineProbe, HeadlessCompositor, HeadlessEngine, HeadlessPlatform, HeadlessTracking,
    LimbScript, TrackingProbe,
};
use auralis_io::load_config_or_default;
use auralis_sdk::{Backends, Visualizer};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const DEMO_PRESETS: [&str; 4] = [
    "01_aurora.milk",
    "02_heavy_nebula.milk",
    "03_pulse__tunnel.milk",
    "04_calm_waves.milk",
];

#[derive(Parser, Debug)]
#[command(name = "sandbox", about = "Runs the visualizer against simulated headset backends")]
struct Args {
    /// Frames to run before shutting down.
    #[arg(long, default_value_t = 1200)]
    frames: usize,

    /// TOML startup configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Preset directory. A generated demo set is used when omitted.
    #[arg(long)]
    presets: Option<PathBuf>,

    /// Simulated render cost, in seconds, of presets with "heavy" in their name.
    #[arg(long, default_value_t = 0.05)]
    heavy_cost: f64,

    /// Feed audio from the default input device instead of a test tone.
    #[cfg(feature = "capture")]
    #[arg(long)]
    capture: bool,

    /// Print the final frame counters as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    auralis_telemetry::init_logging();
    let args = Args::parse();

    let mut config = load_config_or_default(args.config.as_deref());
    let _demo_dir = match &args.presets {
        Some(dir) => {
            config.preset_dir = dir.clone();
            None
        }
        None => Some(write_demo_presets(&mut config)?),
    };

    let clock = ManualClock::new(0.0);
    let compositor = HeadlessCompositor::new(clock.clone());
    let engine = HeadlessEngine::new(clock.clone());
    let tracking = HeadlessTracking::new();
    let platform = HeadlessPlatform::new();
    let engine_probe = engine.probe();
    let tracking_probe = tracking.probe();
    let platform_probe = platform.probe();
    engine_probe.set_render_cost("heavy", args.heavy_cost);

    let mut visualizer = Visualizer::builder(config)
        .with_clock(clock.clone())
        .build(Backends {
            compositor: Box::new(compositor),
            tracking: Box::new(tracking),
            engine: Box::new(engine),
            platform: Box::new(platform),
        });

    let handle = visualizer.handle();
    start_audio(&args, &handle)?;
    handle.update_ui_state(AudioSourceKind::Microphone, true, "Sandbox Session");

    visualizer.lifecycle().publish(LifecycleSignal::Resumed);
    visualizer.lifecycle().publish(LifecycleSignal::WindowCreated);

    let mut frames_run = 0;
    while frames_run < args.frames {
        script_input(frames_run, &tracking_probe);
        if !visualizer.step() {
            break;
        }
        frames_run += 1;
    }

    log::info!(
        "Ran {frames_run} frames over {:.1} simulated seconds; now showing '{}'.",
        clock.now(),
        visualizer.catalog().label()
    );
    report_engine(&engine_probe);
    log::info!("Platform requests: {:?}", platform_probe.requests());

    if args.json {
        let json = visualizer
            .telemetry()
            .to_json()
            .context("Failed to serialize telemetry")?;
        println!("{json}");
    }

    if let Some(e) = visualizer.fatal_error() {
        bail!("The visualizer stopped on a runtime failure: {e}");
    }

    visualizer.lifecycle().publish(LifecycleSignal::Destroy);
    visualizer.step();
    Ok(())
}

/// Fills a temporary directory with demo presets and points `config` at it.
fn write_demo_presets(config: &mut VisualizerConfig) -> Result<TempDir> {
    let dir = tempfile::tempdir().context("Failed to create demo preset directory")?;
    let presets = dir.path().join("presets");
    fs::create_dir(&presets)?;
    for name in DEMO_PRESETS {
        fs::write(presets.join(name), "[preset00]\nfDecay=0.98\n")
            .with_context(|| format!("Failed to write demo preset '{name}'"))?;
    }
    log::info!("Generated {} demo presets.", DEMO_PRESETS.len());

    config.preset_dir = presets;
    config.denylist_path = Some(dir.path().join("slow_presets.txt"));
    Ok(dir)
}

#[cfg(feature = "capture")]
fn start_audio(args: &Args, handle: &auralis_sdk::VisualizerHandle) -> Result<()> {
    if args.capture {
        return handle.attach_input(Box::new(auralis_infra::audio::CpalAudioCapture::new()));
    }
    handle.attach_input(Box::new(TestToneInput::new(220.0, 0.3)))
}

#[cfg(not(feature = "capture"))]
fn start_audio(_args: &Args, handle: &auralis_sdk::VisualizerHandle) -> Result<()> {
    handle.attach_input(Box::new(TestToneInput::new(220.0, 0.3)))
}

/// A short sweep through the interaction paths, repeated every 600 frames.
fn script_input(frame: usize, tracking: &TrackingProbe) {
    let controller = || LimbScript::controller(Pose::default());
    match frame % 600 {
        0 => {
            tracking.set_limb(Limb::Left, controller());
            tracking.set_limb(Limb::Right, controller());
        }
        // A: next preset.
        60 => tracking.update_limb(Limb::Right, |l| l.actions.primary = true),
        // Right trigger with no pointer on the HUD: toggle projection.
        120 => tracking.update_limb(Limb::Right, |l| {
            l.aim = None;
            l.actions.trigger = 1.0;
        }),
        135 => tracking.set_limb(Limb::Right, controller()),
        // Right hand touching PLAY/PAUSE, then pulling back.
        200 => tracking.set_limb(Limb::Right, LimbScript::hand(fingertip(0.005))),
        220 => tracking.set_limb(Limb::Right, LimbScript::hand(fingertip(0.08))),
        240 => tracking.set_limb(Limb::Right, controller()),
        _ => {}
    }
}

/// A fingertip in front of the PLAY/PAUSE button, `gap` metres off the panel.
fn fingertip(gap: f32) -> HandSkeleton {
    HandSkeleton::default().with_joint(
        HandJoint::IndexTip,
        Vec3::new(-0.1598, -0.1124, -0.55 + gap),
    )
}

fn report_engine(engine: &EngineProbe) {
    let record = engine.record();
    log::info!(
        "Engine: {} renders, {} audio frames, {} preset loads, mesh {:?}.",
        record.renders,
        record.pcm_frames,
        record.loaded_files.len() + record.data_loads as usize,
        record.mesh
    );
}
