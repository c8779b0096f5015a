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

//! Provides the small set of 3D math primitives the interaction core needs.
//!
//! Panel placement, ray casting and touch projection all work in the tracking
//! space of the headset: right-handed, `+Y` up, `-Z` forward, metres.
//! Angles are in **radians**.

// --- Fundamental Constants ---

/// A small constant for floating-point comparisons.
pub const EPSILON: f32 = 1e-5;

pub use std::f32::consts::{PI, TAU};

// --- Declare Sub-Modules ---

pub mod pose;
pub mod quaternion;
pub mod vector;

// --- Re-export Principal Types ---

pub use self::pose::Pose;
pub use self::quaternion::Quaternion;
pub use self::vector::{Vec2, Vec3};

// --- Utility Functions ---

/// Checks if two floating-point numbers are approximately equal using [`EPSILON`].
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// Clamps a value to the `[0.0, 1.0]` range.
#[inline]
pub fn saturate(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// Wraps an accumulated phase back into `[0, TAU)`.
///
/// Oscillators call this after every increment so the accumulator never grows
/// large enough to lose precision.
#[inline]
pub fn wrap_phase(phase: f64) -> f64 {
    let tau = std::f64::consts::TAU;
    if phase >= tau || phase < 0.0 {
        phase.rem_euclid(tau)
    } else {
        phase
    }
}
