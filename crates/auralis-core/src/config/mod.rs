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

//! Configuration: static settings loaded at startup and runtime tunables
//! polled while the visualizer runs.

pub mod parse;
pub mod settings;
pub mod tunables;

pub use settings::VisualizerConfig;
pub use tunables::{HudTunables, PerfTunables, TunableChanges, TunablePoller, Tunables};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// A key/value store of externally supplied tunable values.
///
/// Lookups happen on the frame thread once per poll interval, so sources
/// must answer without blocking on I/O for long.
pub trait PropertySource {
    /// Returns the raw text of `key`, or `None` if it is unset.
    fn get(&self, key: &str) -> Option<String>;
}

/// An in-memory property source that can be shared and edited from any thread.
#[derive(Debug, Clone, Default)]
pub struct MapPropertySource {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MapPropertySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
    }

    /// Unsets `key`.
    pub fn remove(&self, key: &str) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

impl PropertySource for MapPropertySource {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

/// A source with nothing set; every tunable keeps its default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProperties;

impl PropertySource for NoProperties {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }
}
