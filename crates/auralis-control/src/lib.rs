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

//! # Auralis Control
//!
//! The decision-making state machines of the frame loop: the session
//! lifecycle, the per-limb input modality debouncer and the performance
//! governor that retires presets the device cannot render fast enough.

#![warn(missing_docs)]

pub mod debounce;
pub mod governor;
pub mod session;

pub use debounce::{InteractionMode, ModeDebouncer};
pub use governor::{GovernorConfig, GovernorDecision, GovernorInputs, PerformanceGovernor};
pub use session::{SessionEffect, SessionMachine, SessionState};
