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

//! # Auralis Infra
//!
//! Concrete implementations of the contracts defined in `auralis-core`.
//!
//! The [`headless`] backends stand in for the XR runtime, the rendering
//! engine and the host platform. They run the full control core on a
//! simulated clock, which is what the sandbox and the integration tests use.
//! [`audio`] holds audio producers, including a capture device behind the
//! `cpal-capture` feature.

#![warn(missing_docs)]

pub mod audio;
pub mod headless;
