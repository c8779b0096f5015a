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

//! Simulated backends for running the visualizer without a headset.
//!
//! Each backend is owned by the frame loop and paired with a cloneable
//! probe that scripts its behaviour and records what the loop did to it.
//! All of them share one [`ManualClock`](auralis_core::ManualClock): the
//! compositor advances it by one display period per frame, and the engine
//! adds the simulated cost of expensive presets.

mod compositor;
mod engine;
mod platform;
mod tracking;

pub use compositor::{CompositorProbe, CompositorRecord, HeadlessCompositor, EYE_SEPARATION};
pub use engine::{EngineProbe, EngineRecord, HeadlessEngine};
pub use platform::{HeadlessPlatform, PlatformProbe, PlatformRequest};
pub use tracking::{HeadlessTracking, LimbScript, TrackingProbe};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Display period of the simulated headset.
pub const DEFAULT_FRAME_SECONDS: f64 = 1.0 / 72.0;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
