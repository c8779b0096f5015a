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

//! The session lifecycle state machine.
//!
//! Two event streams drive it: platform lifecycle signals (foreground,
//! surface, teardown) and the runtime's session state changes. The machine
//! itself performs no I/O; it answers each event with the [`SessionEffect`]s
//! the frame loop has to carry out, and the loop reports back whether the
//! begin call succeeded.

use auralis_core::platform::LifecycleSignal;
use auralis_core::xr::HardwareSessionState;

/// Lifecycle state of the rendering session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No session is running; waiting for the runtime to become ready.
    #[default]
    Idle,
    /// The runtime is ready and the session is being started.
    Ready,
    /// Frames are produced.
    Running,
    /// The session is being ended; content and audio state are kept.
    Stopping,
    /// Terminal. The frame loop must tear down and return.
    Exited,
}

impl SessionState {
    /// Checks whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;
        match (self, next) {
            (Exited, _) => false,
            (_, Exited) => true,
            (Idle, Ready) => true,
            (Ready, Running) | (Ready, Idle) => true,
            (Running, Stopping) => true,
            (Stopping, Idle) => true,
            _ => false,
        }
    }
}

/// Work the frame loop performs in response to a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEffect {
    /// Call `begin_session` and report the result with
    /// [`SessionMachine::confirm_begin`].
    BeginSession,
    /// The session entered `Running`: reset frame timing, interaction state
    /// and the governor timer, and show the HUD.
    EnteredRunning,
    /// Call `end_session` and clear interaction state, then report with
    /// [`SessionMachine::confirm_end`].
    EndSession,
    /// Stop the loop after best-effort teardown.
    Exit,
}

/// Tracks the session state together with the platform foreground and
/// surface flags.
#[derive(Debug, Clone, Default)]
pub struct SessionMachine {
    state: SessionState,
    resumed: bool,
    has_window: bool,
}

impl SessionMachine {
    /// Creates an idle machine, backgrounded and without a surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether per-frame work runs.
    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    /// Whether the application is in the foreground.
    pub fn resumed(&self) -> bool {
        self.resumed
    }

    /// Whether a presentation surface exists.
    pub fn has_window(&self) -> bool {
        self.has_window
    }

    /// Whether the loop must stop.
    pub fn should_exit(&self) -> bool {
        self.state == SessionState::Exited
    }

    /// Whether a frame that the runtime asked for may actually be drawn.
    pub fn can_render(&self) -> bool {
        self.is_running() && self.resumed && self.has_window
    }

    /// Applies a platform lifecycle signal.
    pub fn on_lifecycle_signal(&mut self, signal: LifecycleSignal) -> Vec<SessionEffect> {
        log::info!("Lifecycle signal: {signal:?}");
        match signal {
            LifecycleSignal::Resumed => self.resumed = true,
            LifecycleSignal::Paused => self.resumed = false,
            LifecycleSignal::WindowCreated => self.has_window = true,
            LifecycleSignal::WindowDestroyed => self.has_window = false,
            LifecycleSignal::Destroy => return self.exit(),
        }
        Vec::new()
    }

    /// Applies a session state change reported by the runtime.
    pub fn on_hardware_session_state(&mut self, state: HardwareSessionState) -> Vec<SessionEffect> {
        log::debug!("Runtime session state: {state:?}");
        match state {
            HardwareSessionState::Ready if self.state == SessionState::Idle => {
                self.transition(SessionState::Ready);
                vec![SessionEffect::BeginSession]
            }
            HardwareSessionState::Stopping if self.state == SessionState::Running => {
                self.transition(SessionState::Stopping);
                vec![SessionEffect::EndSession]
            }
            HardwareSessionState::Exiting | HardwareSessionState::LossPending => {
                log::warn!("Runtime reported {state:?}; leaving the frame loop.");
                self.exit()
            }
            _ => Vec::new(),
        }
    }

    /// Reports the outcome of a requested `begin_session`.
    ///
    /// A failed begin is fatal.
    pub fn confirm_begin(&mut self, succeeded: bool) -> Vec<SessionEffect> {
        if self.state != SessionState::Ready {
            return Vec::new();
        }
        if succeeded {
            self.transition(SessionState::Running);
            log::info!("Session started.");
            vec![SessionEffect::EnteredRunning]
        } else {
            log::error!("Session begin failed.");
            self.exit()
        }
    }

    /// Reports that a requested `end_session` completed.
    pub fn confirm_end(&mut self) {
        if self.state == SessionState::Stopping {
            self.transition(SessionState::Idle);
            log::info!("Session stopped.");
        }
    }

    /// Forces the terminal state, e.g. after a fatal runtime error.
    pub fn fail(&mut self) -> Vec<SessionEffect> {
        self.exit()
    }

    fn exit(&mut self) -> Vec<SessionEffect> {
        if self.state == SessionState::Exited {
            return Vec::new();
        }
        let was_running = self.is_running();
        self.transition(SessionState::Exited);
        if was_running {
            vec![SessionEffect::EndSession, SessionEffect::Exit]
        } else {
            vec![SessionEffect::Exit]
        }
    }

    fn transition(&mut self, next: SessionState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal session transition {:?} -> {next:?}",
            self.state
        );
        self.state = next;
    }
}
