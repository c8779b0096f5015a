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

//! Contracts for the head-mounted display runtime.
//!
//! The control core never talks to a vendor runtime directly. It drives a
//! [`Compositor`] for frame pacing and presentation and a [`TrackingSystem`]
//! for poses and controller state; backends implement both.

pub mod compositor;
pub mod panel;
pub mod tracking;

pub use compositor::{Compositor, HudOverlay, PointerMarker, ViewGuard};
pub use panel::PanelFrame;
pub use tracking::{
    classify_profile, ActionSnapshot, HandJoint, HandSkeleton, HandTracker, TrackingSystem,
};

use crate::math::Pose;
use std::fmt;

/// One side of the user, for hands and controllers alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Limb {
    /// The left hand or controller.
    Left,
    /// The right hand or controller.
    Right,
}

impl Limb {
    /// Both limbs, left first.
    pub const ALL: [Limb; 2] = [Limb::Left, Limb::Right];

    /// Index into per-limb arrays.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Limb::Left => 0,
            Limb::Right => 1,
        }
    }
}

/// Session states reported by the runtime's event queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareSessionState {
    /// The session exists but is not ready to begin.
    Idle,
    /// The runtime wants the session to begin.
    Ready,
    /// Frames are being synchronized with the display.
    Synchronized,
    /// Frames are visible to the user.
    Visible,
    /// Frames are visible and the application has input focus.
    Focused,
    /// The runtime wants the session to end.
    Stopping,
    /// The runtime is about to lose the session.
    LossPending,
    /// The runtime wants the application to exit.
    Exiting,
}

/// Frame pacing information returned by [`Compositor::wait_frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameTiming {
    /// Predicted time the frame will be displayed, in runtime nanoseconds.
    pub predicted_display_time: i64,
    /// Predicted interval between displayed frames, in nanoseconds.
    pub predicted_period: i64,
    /// Whether the runtime wants content for this frame.
    pub should_render: bool,
}

/// Field of view half-angles of a view, in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Fov {
    /// Angle of the left edge (negative).
    pub angle_left: f32,
    /// Angle of the right edge.
    pub angle_right: f32,
    /// Angle of the top edge.
    pub angle_up: f32,
    /// Angle of the bottom edge (negative).
    pub angle_down: f32,
}

/// One eye's pose and field of view for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct View {
    /// Eye pose in tracking space.
    pub pose: Pose,
    /// Eye field of view.
    pub fov: Fov,
}

/// Builds the head pose used to place the HUD panel from the located views.
///
/// Two or more views average the first pair, a single view is used as is,
/// and no views yield the identity pose at the origin.
pub fn center_head_pose(views: &[View]) -> Pose {
    match views {
        [] => Pose::default(),
        [only] => only.pose,
        [left, right, ..] => Pose::center_of(&left.pose, &right.pose),
    }
}

/// Runtime calls whose failure the frame loop has to classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XrCall {
    /// Starting the session.
    BeginSession,
    /// Ending the session.
    EndSession,
    /// Waiting for the frame timing hint.
    WaitFrame,
    /// Opening the frame.
    BeginFrame,
    /// Submitting the frame.
    EndFrame,
    /// Locating the eye views.
    LocateViews,
    /// Acquiring a view's render target.
    AcquireView,
    /// Waiting for a view's render target.
    WaitView,
    /// Releasing a view's render target.
    ReleaseView,
    /// Drawing into a view.
    DrawView,
    /// Synchronizing controller actions.
    SyncActions,
}

impl XrCall {
    /// Whether the frame loop cannot continue without this call.
    pub fn is_mandatory(self) -> bool {
        matches!(
            self,
            XrCall::BeginSession
                | XrCall::EndSession
                | XrCall::WaitFrame
                | XrCall::BeginFrame
                | XrCall::EndFrame
                | XrCall::LocateViews
        )
    }
}

/// An error reported by a compositor or tracking backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XrError {
    /// A runtime call returned a failure code.
    CallFailed {
        /// The failing call.
        call: XrCall,
        /// Backend-specific detail.
        reason: String,
    },
    /// The runtime instance is gone.
    InstanceLost,
}

impl XrError {
    /// Shorthand for [`XrError::CallFailed`].
    pub fn call(call: XrCall, reason: impl Into<String>) -> Self {
        XrError::CallFailed {
            call,
            reason: reason.into(),
        }
    }

    /// Whether this error must stop the frame loop.
    pub fn is_fatal(&self) -> bool {
        match self {
            XrError::CallFailed { call, .. } => call.is_mandatory(),
            XrError::InstanceLost => true,
        }
    }
}

impl fmt::Display for XrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XrError::CallFailed { call, reason } => {
                write!(f, "Runtime call {call:?} failed: {reason}")
            }
            XrError::InstanceLost => write!(f, "The runtime instance was lost"),
        }
    }
}

impl std::error::Error for XrError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Quaternion, Vec3};

    #[test]
    fn test_mandatory_failures_are_fatal() {
        assert!(XrError::call(XrCall::WaitFrame, "timeout").is_fatal());
        assert!(XrError::call(XrCall::LocateViews, "lost").is_fatal());
        assert!(XrError::InstanceLost.is_fatal());
    }

    #[test]
    fn test_per_view_failures_are_not_fatal() {
        assert!(!XrError::call(XrCall::AcquireView, "busy").is_fatal());
        assert!(!XrError::call(XrCall::WaitView, "timeout").is_fatal());
        assert!(!XrError::call(XrCall::DrawView, "oom").is_fatal());
        assert!(!XrError::call(XrCall::SyncActions, "unfocused").is_fatal());
    }

    #[test]
    fn test_error_display() {
        let err = XrError::call(XrCall::EndFrame, "validation");
        assert_eq!(err.to_string(), "Runtime call EndFrame failed: validation");
    }

    #[test]
    fn test_center_head_pose_view_counts() {
        assert_eq!(center_head_pose(&[]), Pose::default());

        let single = View {
            pose: Pose::new(Vec3::new(0.0, 1.7, 0.0), Quaternion::IDENTITY),
            fov: Fov::default(),
        };
        assert_eq!(center_head_pose(&[single]), single.pose);

        let mut left = single;
        let mut right = single;
        left.pose.position.x = -0.03;
        right.pose.position.x = 0.03;
        let center = center_head_pose(&[left, right]);
        assert!(center.position.x.abs() < 1e-6);
        assert!((center.position.y - 1.7).abs() < 1e-6);
    }

    #[test]
    fn test_limb_index() {
        assert_eq!(Limb::Left.index(), 0);
        assert_eq!(Limb::Right.index(), 1);
        assert_eq!(Limb::ALL.len(), 2);
    }
}
