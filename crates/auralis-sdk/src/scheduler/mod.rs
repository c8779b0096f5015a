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

//! The frame scheduler that ties every lane together.
//!
//! [`Visualizer::step`] runs one outer iteration: it drains lifecycle
//! signals, drains the runtime's session events, and renders a frame while
//! the session is running. [`Visualizer::run`] repeats that until the
//! session machine asks to exit.

mod frame;

use crate::handle::{SharedState, VisualizerHandle};
use crate::input::InputRouter;
use auralis_control::{
    GovernorConfig, PerformanceGovernor, SessionEffect, SessionMachine, SessionState,
};
use auralis_core::config::{
    NoProperties, PerfTunables, PropertySource, TunablePoller, VisualizerConfig,
};
use auralis_core::engine::{
    EngineSettings, ProjectionMode, VisualizerEngine, DEFAULT_ENGINE_FPS,
};
use auralis_core::event::EventBus;
use auralis_core::platform::{LifecycleSignal, PlatformControl};
use auralis_core::xr::{Compositor, TrackingSystem, XrError};
use auralis_core::{Clock, MonotonicClock};
use auralis_io::{CatalogTiming, ContentCatalog, Denylist, TomlPropertySource};
use auralis_lanes::hud_lane::VISIBLE_ON_START;
use auralis_lanes::{AudioLane, HudState};
use auralis_telemetry::FrameTelemetry;
use std::sync::Arc;

/// The runtime and host services the visualizer drives.
pub struct Backends {
    /// Frame pacing and presentation.
    pub compositor: Box<dyn Compositor>,
    /// Poses and controller state.
    pub tracking: Box<dyn TrackingSystem>,
    /// The music visualization engine.
    pub engine: Box<dyn VisualizerEngine>,
    /// Media and content requests back to the host.
    pub platform: Box<dyn PlatformControl>,
}

/// Configures a [`Visualizer`] before it is built.
pub struct VisualizerBuilder {
    config: VisualizerConfig,
    clock: Option<Box<dyn Clock>>,
    properties: Option<Box<dyn PropertySource>>,
}

impl VisualizerBuilder {
    /// Starts from `config`.
    pub fn new(config: VisualizerConfig) -> Self {
        Self {
            config,
            clock: None,
            properties: None,
        }
    }

    /// Uses `clock` instead of the wall clock.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Reads tunables from `source` instead of the configured tunables file.
    pub fn with_properties(mut self, source: impl PropertySource + 'static) -> Self {
        self.properties = Some(Box::new(source));
        self
    }

    /// Builds the visualizer, configures the engine and loads the first preset.
    pub fn build(self, backends: Backends) -> Visualizer {
        let config = self.config;
        let clock = self
            .clock
            .unwrap_or_else(|| Box::new(MonotonicClock::new()) as Box<dyn Clock>);
        let properties: Box<dyn PropertySource> = match (self.properties, &config.tunables_path) {
            (Some(source), _) => source,
            (None, Some(path)) => Box::new(TomlPropertySource::new(path.clone())),
            (None, None) => Box::new(NoProperties),
        };

        let denylist = match &config.denylist_path {
            Some(path) => Denylist::load(path.clone()).unwrap_or_else(|e| {
                log::warn!("{e}. Slow preset marks start empty.");
                Denylist::in_memory()
            }),
            None => Denylist::in_memory(),
        };

        let Backends {
            compositor,
            tracking,
            mut engine,
            platform,
        } = backends;

        let perf = PerfTunables::default();
        engine.configure(&EngineSettings::default());
        engine.set_mesh_size(perf.mesh.0, perf.mesh.1);

        let now = clock.now();
        let timing = CatalogTiming {
            rescan_interval: config.rescan_interval_seconds,
            auto_advance: config.auto_advance_seconds,
        };
        let mut catalog = ContentCatalog::new(config.preset_dir.clone(), denylist, timing);
        catalog.initialize(now, engine.as_mut());
        catalog.set_skip_denylisted(perf.skip_marked);

        let mut hud = HudState::new();
        hud.set_preset(catalog.label());

        log::info!(
            "Visualizer created with {} preset(s) from {}.",
            catalog.len(),
            config.preset_dir.display()
        );

        Visualizer {
            compositor,
            tracking,
            engine,
            platform,
            clock,
            properties,
            lifecycle: EventBus::new(),
            shared: Arc::new(SharedState::new(config.ring_capacity_frames)),
            session: SessionMachine::new(),
            session_begun: false,
            fatal: None,
            tunables: TunablePoller::new(),
            governor: PerformanceGovernor::new(GovernorConfig::from(&perf)),
            catalog,
            audio: AudioLane::new(config.audio_quantum_frames, config.audio_grace_seconds),
            hud,
            input: InputRouter::new(),
            projection: ProjectionMode::default(),
            telemetry: FrameTelemetry::new(config.telemetry_interval_seconds),
            last_frame: now,
            engine_fps: DEFAULT_ENGINE_FPS,
        }
    }
}

/// The immersive visualizer's control core.
///
/// Owns the backends and every lane, and is driven from a single thread.
/// Other threads reach it only through [`VisualizerHandle`] and the
/// [`lifecycle`](Self::lifecycle) bus.
pub struct Visualizer {
    compositor: Box<dyn Compositor>,
    tracking: Box<dyn TrackingSystem>,
    engine: Box<dyn VisualizerEngine>,
    platform: Box<dyn PlatformControl>,
    clock: Box<dyn Clock>,
    properties: Box<dyn PropertySource>,
    lifecycle: EventBus<LifecycleSignal>,
    shared: Arc<SharedState>,

    session: SessionMachine,
    session_begun: bool,
    fatal: Option<XrError>,

    tunables: TunablePoller,
    governor: PerformanceGovernor,
    catalog: ContentCatalog,
    audio: AudioLane,
    hud: HudState,
    input: InputRouter,
    projection: ProjectionMode,
    telemetry: FrameTelemetry,

    last_frame: f64,
    engine_fps: u32,
}

impl Visualizer {
    /// Starts configuring a visualizer.
    pub fn builder(config: VisualizerConfig) -> VisualizerBuilder {
        VisualizerBuilder::new(config)
    }

    /// A handle for the audio producer and the host's media layer.
    pub fn handle(&self) -> VisualizerHandle {
        VisualizerHandle::new(Arc::clone(&self.shared))
    }

    /// The bus the host publishes lifecycle signals on.
    pub fn lifecycle(&self) -> &EventBus<LifecycleSignal> {
        &self.lifecycle
    }

    /// The session state.
    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    /// The active projection surface.
    pub fn projection(&self) -> ProjectionMode {
        self.projection
    }

    /// The preset catalog.
    pub fn catalog(&self) -> &ContentCatalog {
        &self.catalog
    }

    /// The HUD model.
    pub fn hud(&self) -> &HudState {
        &self.hud
    }

    /// Frame counters.
    pub fn telemetry(&self) -> &FrameTelemetry {
        &self.telemetry
    }

    /// The runtime failure that stopped the loop, if any.
    pub fn fatal_error(&self) -> Option<&XrError> {
        self.fatal.as_ref()
    }

    /// Runs one outer iteration of the loop.
    ///
    /// Blocks on the lifecycle bus while the application is in the background
    /// with no running session.
    ///
    /// ## Returns
    /// `false` once the loop should exit.
    pub fn step(&mut self) -> bool {
        if self.session.should_exit() {
            return false;
        }

        let signals = if self.session.resumed() || self.session.is_running() {
            self.lifecycle.drain()
        } else {
            self.lifecycle.wait_and_drain()
        };
        for signal in signals {
            let effects = self.session.on_lifecycle_signal(signal);
            self.apply_effects(effects);
        }

        self.poll_session_events();

        if self.session.is_running() {
            self.run_frame();
        }

        !self.session.should_exit()
    }

    /// Runs at most `iterations` outer iterations.
    ///
    /// ## Returns
    /// `false` if the loop asked to exit.
    pub fn run_for(&mut self, iterations: usize) -> bool {
        (0..iterations).all(|_| self.step())
    }

    /// Runs the loop until the session machine exits.
    ///
    /// ## Errors
    /// Returns the runtime failure that forced the exit, if there was one.
    pub fn run(mut self) -> anyhow::Result<()> {
        log::info!("Starting the visualizer frame loop...");
        while self.step() {}
        match self.fatal.take() {
            Some(e) => {
                Err(anyhow::Error::new(e).context("The visualizer stopped on a runtime failure"))
            }
            None => {
                log::info!("Visualizer frame loop finished.");
                Ok(())
            }
        }
    }

    fn poll_session_events(&mut self) {
        while !self.session.should_exit() {
            match self.compositor.poll_event() {
                Ok(Some(state)) => {
                    let effects = self.session.on_hardware_session_state(state);
                    self.apply_effects(effects);
                }
                Ok(None) => break,
                Err(e) if e.is_fatal() => {
                    self.fail(e);
                    break;
                }
                Err(e) => {
                    log::warn!("Could not poll runtime events: {e}");
                    break;
                }
            }
        }
    }

    fn apply_effects(&mut self, effects: Vec<SessionEffect>) {
        for effect in effects {
            match effect {
                SessionEffect::BeginSession => self.begin_session(),
                SessionEffect::EnteredRunning => self.on_session_started(),
                SessionEffect::EndSession => self.end_session(),
                SessionEffect::Exit => log::info!("Leaving the frame loop."),
            }
        }
    }

    fn begin_session(&mut self) {
        let started = match self.compositor.begin_session() {
            Ok(()) => {
                self.session_begun = true;
                true
            }
            Err(e) => {
                log::error!("{e}");
                self.fatal.get_or_insert(e);
                false
            }
        };
        let effects = self.session.confirm_begin(started);
        self.apply_effects(effects);
    }

    fn on_session_started(&mut self) {
        let now = self.clock.now();
        self.last_frame = now;
        self.catalog.restart_rotation(now);
        self.governor.reset_session();
        self.input.reset_session();
        self.hud.extend_visibility(now, VISIBLE_ON_START);
        log::info!("Session running, presenting '{}'.", self.catalog.label());
    }

    fn end_session(&mut self) {
        if self.session_begun {
            if let Err(e) = self.compositor.end_session() {
                log::warn!("{e}");
            }
            self.session_begun = false;
        }
        self.input.reset();
        self.session.confirm_end();
    }

    /// Records a runtime failure and asks the session machine to shut down.
    fn fail(&mut self, error: XrError) {
        log::error!("{error}");
        self.fatal.get_or_insert(error);
        let effects = self.session.fail();
        self.apply_effects(effects);
    }
}

impl Drop for Visualizer {
    fn drop(&mut self) {
        log::info!("Visualizer is being dropped. Performing controlled shutdown...");
        if self.session_begun {
            if let Err(e) = self.compositor.end_session() {
                log::warn!("{e}");
            }
            self.session_begun = false;
        }
        log::info!("{}", self.telemetry.summary());
        log::info!("Visualizer shutdown complete.");
    }
}
