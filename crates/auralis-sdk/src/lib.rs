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

//! # Auralis SDK
//!
//! The public entry point of the visualizer's control core.
//!
//! A host builds a [`Visualizer`] from a [`VisualizerConfig`](auralis_core::config::VisualizerConfig)
//! and a set of [`Backends`], hands [`VisualizerHandle`] clones to its audio
//! and media threads, publishes lifecycle signals on
//! [`Visualizer::lifecycle`], and drives the loop with [`Visualizer::run`].

#![warn(missing_docs)]

pub mod handle;
pub mod input;
pub mod scheduler;

pub use handle::{to_stereo, SharedState, VisualizerHandle};
pub use input::{ControllerButton, InputEvent, InputRouter};
pub use scheduler::{Backends, Visualizer, VisualizerBuilder};

/// The types a host needs to embed the visualizer.
pub mod prelude {
    pub use crate::{Backends, Visualizer, VisualizerBuilder, VisualizerHandle};
    pub use auralis_core::audio::AudioInput;
    pub use auralis_core::config::{MapPropertySource, PropertySource, VisualizerConfig};
    pub use auralis_core::engine::{ProjectionMode, VisualizerEngine};
    pub use auralis_core::platform::{LifecycleSignal, PlatformControl, UiSnapshot};
    pub use auralis_core::xr::{Compositor, TrackingSystem};
    pub use auralis_core::{AudioSourceKind, Clock, ManualClock, MonotonicClock};
}
