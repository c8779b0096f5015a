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

//! The frame pacing and presentation contract.

use super::{FrameTiming, HardwareSessionState, PanelFrame, View, XrError};
use crate::engine::ProjectionMode;
use crate::math::Vec2;

/// A pointer to draw on the HUD panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerMarker {
    /// Panel-space position.
    pub uv: Vec2,
    /// `true` for a fingertip touching the panel, `false` for a ray or hover.
    pub pressed: bool,
}

/// Everything the presentation surface needs to draw the HUD for a frame.
#[derive(Debug, Clone, Copy)]
pub struct HudOverlay<'a> {
    /// Panel placement.
    pub panel: &'a PanelFrame,
    /// Text lines to rasterize, present only when they changed since the
    /// last overlay.
    pub text: Option<&'a [String]>,
    /// Flash intensity per HUD button, in button order.
    pub flash: &'a [f32],
    /// Pointers of the left and right limb.
    pub pointers: [Option<PointerMarker>; 2],
}

/// The runtime's compositor: frame pacing, view poses and render targets.
///
/// Per frame the loop calls `wait_frame`, `begin_frame`, then for each view
/// acquires and waits for its target, draws, releases, and finally submits
/// with `end_frame`. `poll_event` is drained once per outer iteration.
pub trait Compositor {
    /// Pops the next pending session state change, if any.
    fn poll_event(&mut self) -> Result<Option<HardwareSessionState>, XrError>;

    /// Begins the session after the runtime reported it ready.
    fn begin_session(&mut self) -> Result<(), XrError>;

    /// Ends the running session.
    fn end_session(&mut self) -> Result<(), XrError>;

    /// Blocks until the runtime wants the next frame.
    fn wait_frame(&mut self) -> Result<FrameTiming, XrError>;

    /// Opens the frame returned by the last `wait_frame`.
    fn begin_frame(&mut self) -> Result<(), XrError>;

    /// Locates the eye views at the frame's display time.
    fn locate_views(&mut self, timing: &FrameTiming) -> Result<Vec<View>, XrError>;

    /// Acquires the render target of view `eye`.
    fn acquire_view(&mut self, eye: usize) -> Result<(), XrError>;

    /// Waits until the acquired target of view `eye` is writable.
    fn wait_view(&mut self, eye: usize) -> Result<(), XrError>;

    /// Hands the target of view `eye` back to the runtime.
    fn release_view(&mut self, eye: usize) -> Result<(), XrError>;

    /// Draws the engine output mapped onto the projection surface.
    fn draw_projection(
        &mut self,
        eye: usize,
        view: &View,
        mode: ProjectionMode,
    ) -> Result<(), XrError>;

    /// Draws the HUD panel and its pointers.
    fn draw_hud(&mut self, eye: usize, view: &View, hud: &HudOverlay<'_>) -> Result<(), XrError>;

    /// Draws supplementary overlays such as tracked hand joints.
    fn draw_overlays(&mut self, _eye: usize, _view: &View) -> Result<(), XrError> {
        Ok(())
    }

    /// Submits the frame with the views in `rendered`.
    fn end_frame(&mut self, timing: &FrameTiming, rendered: &[usize]) -> Result<(), XrError>;
}

/// An acquired view target that is released when dropped.
///
/// Acquisition also waits for the target; if that wait fails, the target is
/// released before the error is returned.
pub struct ViewGuard<'a, C: Compositor + ?Sized> {
    compositor: &'a mut C,
    eye: usize,
    released: bool,
}

impl<'a, C: Compositor + ?Sized> ViewGuard<'a, C> {
    /// Acquires and waits for the target of view `eye`.
    pub fn acquire(compositor: &'a mut C, eye: usize) -> Result<Self, XrError> {
        compositor.acquire_view(eye)?;
        let mut guard = Self {
            compositor,
            eye,
            released: false,
        };
        guard.compositor.wait_view(eye)?;
        Ok(guard)
    }

    /// The compositor, for drawing into the acquired target.
    pub fn compositor(&mut self) -> &mut C {
        &mut *self.compositor
    }

    /// The view this guard holds.
    pub fn eye(&self) -> usize {
        self.eye
    }

    /// Releases the target, reporting the runtime's answer.
    pub fn release(mut self) -> Result<(), XrError> {
        self.released = true;
        self.compositor.release_view(self.eye)
    }
}

impl<C: Compositor + ?Sized> Drop for ViewGuard<'_, C> {
    fn drop(&mut self) {
        if !self.released {
            if let Err(e) = self.compositor.release_view(self.eye) {
                log::warn!("Failed to release view {} target: {e}", self.eye);
            }
        }
    }
}
