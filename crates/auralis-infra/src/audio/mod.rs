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

//! Audio producers implementing [`AudioInput`](auralis_core::audio::device::AudioInput).

#[cfg(feature = "cpal-capture")]
mod cpal_capture;
mod test_tone;

#[cfg(feature = "cpal-capture")]
pub use cpal_capture::CpalAudioCapture;
pub use test_tone::TestToneInput;
