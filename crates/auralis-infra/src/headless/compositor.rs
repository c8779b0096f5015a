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

use super::{lock, DEFAULT_FRAME_SECONDS};
use auralis_core::engine::ProjectionMode;
use auralis_core::math::{Pose, Vec3};
use auralis_core::utils::timer::{Clock, ManualClock};
use auralis_core::xr::{
    Compositor, FrameTiming, Fov, HardwareSessionState, HudOverlay, PointerMarker, View, XrCall,
    XrError,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Distance between the simulated eyes, in metres.
pub const EYE_SEPARATION: f32 = 0.064;

const FOV_HALF_ANGLE: f32 = 0.9;

/// What the frame loop did to the compositor so far.
#[derive(Debug, Clone, Default)]
pub struct CompositorRecord {
    /// Successful `begin_session` calls.
    pub sessions_begun: u32,
    /// Successful `end_session` calls.
    pub sessions_ended: u32,
    /// Frames waited for.
    pub frames_waited: u64,
    /// Frames submitted.
    pub frames_submitted: u64,
    /// Views of the last submitted frame.
    pub last_rendered: Vec<usize>,
    /// Targets acquired.
    pub acquired: u64,
    /// Targets released.
    pub released: u64,
    /// Projection passes drawn.
    pub projection_draws: u64,
    /// Projection mode of the last pass.
    pub last_projection: Option<ProjectionMode>,
    /// HUD passes drawn.
    pub hud_draws: u64,
    /// Times new HUD text was handed over.
    pub hud_text_uploads: u64,
    /// The last HUD text handed over.
    pub hud_text: Vec<String>,
    /// Pointers of the last HUD pass.
    pub last_pointers: [Option<PointerMarker>; 2],
    /// Flash levels of the last HUD pass.
    pub last_flash: Vec<f32>,
}

#[derive(Debug)]
struct Script {
    events: VecDeque<HardwareSessionState>,
    failures: Vec<XrCall>,
    failing_eye: Option<usize>,
    frame_seconds: f64,
    should_render: bool,
    view_count: usize,
    head: Pose,
}

#[derive(Debug)]
struct Shared {
    script: Script,
    record: CompositorRecord,
}

impl Shared {
    fn check(&mut self, call: XrCall) -> Result<(), XrError> {
        match self.script.failures.iter().position(|&c| c == call) {
            Some(i) => {
                self.script.failures.remove(i);
                Err(XrError::call(call, "injected failure"))
            }
            None => Ok(()),
        }
    }
}

/// A compositor that paces frames on a [`ManualClock`].
///
/// It starts with the runtime asking for a session (`Ready` through
/// `Focused`) and two eye views straddling a head at the origin.
#[derive(Debug)]
pub struct HeadlessCompositor {
    clock: ManualClock,
    shared: Arc<Mutex<Shared>>,
}

impl HeadlessCompositor {
    /// Creates a compositor driving `clock`.
    pub fn new(clock: ManualClock) -> Self {
        let events = VecDeque::from([
            HardwareSessionState::Ready,
            HardwareSessionState::Synchronized,
            HardwareSessionState::Visible,
            HardwareSessionState::Focused,
        ]);
        let script = Script {
            events,
            failures: Vec::new(),
            failing_eye: None,
            frame_seconds: DEFAULT_FRAME_SECONDS,
            should_render: true,
            view_count: 2,
            head: Pose::default(),
        };
        Self {
            clock,
            shared: Arc::new(Mutex::new(Shared {
                script,
                record: CompositorRecord::default(),
            })),
        }
    }

    /// A handle for scripting and inspecting this compositor.
    pub fn probe(&self) -> CompositorProbe {
        CompositorProbe {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl Compositor for HeadlessCompositor {
    fn poll_event(&mut self) -> Result<Option<HardwareSessionState>, XrError> {
        Ok(lock(&self.shared).script.events.pop_front())
    }

    fn begin_session(&mut self) -> Result<(), XrError> {
        let mut shared = lock(&self.shared);
        shared.check(XrCall::BeginSession)?;
        shared.record.sessions_begun += 1;
        Ok(())
    }

    fn end_session(&mut self) -> Result<(), XrError> {
        let mut shared = lock(&self.shared);
        shared.check(XrCall::EndSession)?;
        shared.record.sessions_ended += 1;
        Ok(())
    }

    fn wait_frame(&mut self) -> Result<FrameTiming, XrError> {
        let mut shared = lock(&self.shared);
        shared.check(XrCall::WaitFrame)?;
        let period = shared.script.frame_seconds;
        self.clock.advance(period);
        shared.record.frames_waited += 1;
        Ok(FrameTiming {
            predicted_display_time: (self.clock.now() * 1e9) as i64,
            predicted_period: (period * 1e9) as i64,
            should_render: shared.script.should_render,
        })
    }

    fn begin_frame(&mut self) -> Result<(), XrError> {
        lock(&self.shared).check(XrCall::BeginFrame)
    }

    fn locate_views(&mut self, _timing: &FrameTiming) -> Result<Vec<View>, XrError> {
        let mut shared = lock(&self.shared);
        shared.check(XrCall::LocateViews)?;

        let head = shared.script.head;
        let right = head.orientation * Vec3::X;
        let fov = Fov {
            angle_left: -FOV_HALF_ANGLE,
            angle_right: FOV_HALF_ANGLE,
            angle_up: FOV_HALF_ANGLE,
            angle_down: -FOV_HALF_ANGLE,
        };
        let eye = |side: f32| View {
            pose: Pose::new(head.position + right * (side * EYE_SEPARATION * 0.5), head.orientation),
            fov,
        };
        Ok([eye(-1.0), eye(1.0)]
            .into_iter()
            .take(shared.script.view_count)
            .collect())
    }

    fn acquire_view(&mut self, eye: usize) -> Result<(), XrError> {
        let mut shared = lock(&self.shared);
        shared.check(XrCall::AcquireView)?;
        if shared.script.failing_eye == Some(eye) {
            return Err(XrError::call(XrCall::AcquireView, format!("eye {eye} unavailable")));
        }
        shared.record.acquired += 1;
        Ok(())
    }

    fn wait_view(&mut self, _eye: usize) -> Result<(), XrError> {
        lock(&self.shared).check(XrCall::WaitView)
    }

    fn release_view(&mut self, _eye: usize) -> Result<(), XrError> {
        let mut shared = lock(&self.shared);
        shared.check(XrCall::ReleaseView)?;
        shared.record.released += 1;
        Ok(())
    }

    fn draw_projection(
        &mut self,
        _eye: usize,
        _view: &View,
        mode: ProjectionMode,
    ) -> Result<(), XrError> {
        let mut shared = lock(&self.shared);
        shared.check(XrCall::DrawView)?;
        shared.record.projection_draws += 1;
        shared.record.last_projection = Some(mode);
        Ok(())
    }

    fn draw_hud(&mut self, _eye: usize, _view: &View, hud: &HudOverlay<'_>) -> Result<(), XrError> {
        let mut shared = lock(&self.shared);
        shared.check(XrCall::DrawView)?;
        let record = &mut shared.record;
        record.hud_draws += 1;
        if let Some(text) = hud.text {
            record.hud_text = text.to_vec();
            record.hud_text_uploads += 1;
        }
        record.last_pointers = hud.pointers;
        record.last_flash = hud.flash.to_vec();
        Ok(())
    }

    fn end_frame(&mut self, _timing: &FrameTiming, rendered: &[usize]) -> Result<(), XrError> {
        let mut shared = lock(&self.shared);
        shared.check(XrCall::EndFrame)?;
        shared.record.frames_submitted += 1;
        shared.record.last_rendered = rendered.to_vec();
        Ok(())
    }
}

/// Scripts a [`HeadlessCompositor`] and reads back its record.
#[derive(Debug, Clone)]
pub struct CompositorProbe {
    shared: Arc<Mutex<Shared>>,
}

impl CompositorProbe {
    /// Queues a session state change.
    pub fn push_event(&self, state: HardwareSessionState) {
        lock(&self.shared).script.events.push_back(state);
    }

    /// Makes the next `call` fail once.
    pub fn fail_once(&self, call: XrCall) {
        lock(&self.shared).script.failures.push(call);
    }

    /// Makes acquiring `eye`'s target fail until cleared.
    pub fn set_failing_eye(&self, eye: Option<usize>) {
        lock(&self.shared).script.failing_eye = eye;
    }

    /// Sets the display period.
    pub fn set_frame_seconds(&self, seconds: f64) {
        lock(&self.shared).script.frame_seconds = seconds;
    }

    /// Sets whether frames should be rendered.
    pub fn set_should_render(&self, should_render: bool) {
        lock(&self.shared).script.should_render = should_render;
    }

    /// Sets how many views are located per frame (at most two).
    pub fn set_view_count(&self, count: usize) {
        lock(&self.shared).script.view_count = count;
    }

    /// Moves the simulated head.
    pub fn set_head_pose(&self, head: Pose) {
        lock(&self.shared).script.head = head;
    }

    /// Session state changes not yet polled.
    pub fn pending_events(&self) -> usize {
        lock(&self.shared).script.events.len()
    }

    /// A copy of the record.
    pub fn record(&self) -> CompositorRecord {
        lock(&self.shared).record.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_a_ready_session() {
        let mut compositor = HeadlessCompositor::new(ManualClock::new(0.0));
        assert_eq!(compositor.poll_event(), Ok(Some(HardwareSessionState::Ready)));
        assert_eq!(compositor.probe().pending_events(), 3);
    }

    #[test]
    fn wait_frame_advances_the_shared_clock() {
        let clock = ManualClock::new(1.0);
        let mut compositor = HeadlessCompositor::new(clock.clone());
        compositor.probe().set_frame_seconds(0.5);
        let timing = compositor.wait_frame().unwrap();
        assert_eq!(clock.now(), 1.5);
        assert_eq!(timing.predicted_period, 500_000_000);
        assert!(timing.should_render);
    }

    #[test]
    fn eyes_straddle_the_head() {
        let mut compositor = HeadlessCompositor::new(ManualClock::default());
        let views = compositor.locate_views(&FrameTiming::default()).unwrap();
        assert_eq!(views.len(), 2);
        assert!((views[1].pose.position.x - views[0].pose.position.x - EYE_SEPARATION).abs() < 1e-6);
    }

    #[test]
    fn injected_failures_fire_once() {
        let mut compositor = HeadlessCompositor::new(ManualClock::default());
        compositor.probe().fail_once(XrCall::EndFrame);
        let timing = FrameTiming::default();
        assert!(compositor.end_frame(&timing, &[0]).unwrap_err().is_fatal());
        assert!(compositor.end_frame(&timing, &[0]).is_ok());
    }
}
