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

//! The preset catalog: discovery, rotation and slow-preset avoidance.

mod denylist;

pub use denylist::Denylist;

use crate::error::CatalogError;
use auralis_core::engine::{VisualizerEngine, FALLBACK_PRESET};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File suffix of loadable presets.
pub const PRESET_EXTENSION: &str = ".milk";
/// Label shown while the built-in preset is active.
pub const FALLBACK_LABEL: &str = "FALLBACK";

/// Lists the presets directly inside `dir`, sorted.
///
/// Hidden files and anything without the preset suffix are skipped.
pub fn scan_presets(dir: &Path) -> Result<Vec<String>, CatalogError> {
    let mut presets = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|source| CatalogError::Scan {
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') || !name.ends_with(PRESET_EXTENSION) {
            continue;
        }
        presets.push(entry.path().to_string_lossy().into_owned());
    }
    presets.sort();
    Ok(presets)
}

/// Timing of the catalog's background work.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogTiming {
    /// Minimum seconds between directory rescans.
    pub rescan_interval: f64,
    /// Seconds a preset stays up before rotating to the next one.
    pub auto_advance: f64,
}

impl Default for CatalogTiming {
    fn default() -> Self {
        Self {
            rescan_interval: 10.0,
            auto_advance: 20.0,
        }
    }
}

/// The ordered preset list and the position within it.
#[derive(Debug)]
pub struct ContentCatalog {
    dir: PathBuf,
    timing: CatalogTiming,
    items: Vec<String>,
    current: usize,
    denylist: Denylist,
    skip_denylisted: bool,
    fallback_active: bool,
    last_switch: f64,
    last_scan: f64,
}

impl ContentCatalog {
    /// Creates an empty catalog over `dir`. Nothing is loaded until
    /// [`initialize`](Self::initialize).
    pub fn new(dir: impl Into<PathBuf>, denylist: Denylist, timing: CatalogTiming) -> Self {
        Self {
            dir: dir.into(),
            timing,
            items: Vec::new(),
            current: 0,
            denylist,
            skip_denylisted: true,
            fallback_active: true,
            last_switch: 0.0,
            last_scan: 0.0,
        }
    }

    /// Scans the directory and loads the first preset, or the built-in one
    /// when there is none.
    pub fn initialize(&mut self, now: f64, engine: &mut dyn VisualizerEngine) {
        self.items = self.scan();
        self.last_scan = now;
        self.last_switch = now;

        if self.items.is_empty() {
            engine.load_preset_data(FALLBACK_PRESET, false);
            self.fallback_active = true;
            log::warn!(
                "No presets found in '{}', using built-in fallback preset.",
                self.dir.display()
            );
            return;
        }

        self.current = 0;
        if self.skip_denylisted {
            if let Some(i) = self.items.iter().position(|id| !self.denylist.contains(id)) {
                self.current = i;
            }
        }
        self.load_current(engine, false);
        self.fallback_active = false;
        log::info!("Loaded first preset: {}", self.items[self.current]);
    }

    fn scan(&self) -> Vec<String> {
        match scan_presets(&self.dir) {
            Ok(items) => items,
            Err(e) => {
                log::debug!("{e}");
                Vec::new()
            }
        }
    }

    fn load_current(&self, engine: &mut dyn VisualizerEngine, smooth: bool) {
        let id = &self.items[self.current];
        if !engine.load_preset_file(id, smooth) {
            log::warn!("Engine rejected preset '{id}'.");
        }
    }

    /// Whether denylisted presets are skipped when rotating.
    pub fn set_skip_denylisted(&mut self, skip: bool) {
        self.skip_denylisted = skip;
    }

    /// Makes the next [`rescan`](Self::rescan) run regardless of the interval.
    pub fn force_rescan(&mut self, now: f64) {
        self.last_scan = now - self.timing.rescan_interval;
    }

    /// Picks up presets added to or removed from the directory.
    ///
    /// Runs at most once per rescan interval. An empty or unchanged listing
    /// is ignored. The current preset keeps its place when it is still
    /// listed.
    ///
    /// ## Returns
    /// `true` when the list changed.
    pub fn rescan(&mut self, now: f64, engine: &mut dyn VisualizerEngine) -> bool {
        if now - self.last_scan < self.timing.rescan_interval {
            return false;
        }
        self.last_scan = now;

        let scanned = self.scan();
        if scanned.is_empty() || scanned == self.items {
            return false;
        }

        let previous = self.current().map(str::to_string);
        self.items = scanned;
        self.current = previous
            .as_deref()
            .and_then(|id| self.items.iter().position(|item| item == id))
            .unwrap_or(0);

        if self.skip_denylisted && self.denylist.contains(&self.items[self.current]) {
            if let Some(i) = self.find_relative(1, true) {
                self.current = i;
            }
        }

        let moved = previous.as_deref() != Some(self.items[self.current].as_str());
        if self.fallback_active || moved {
            self.load_current(engine, false);
            self.fallback_active = false;
        }

        log::info!("Preset list updated ({} presets).", self.items.len());
        true
    }

    /// Index `delta` steps away from the current one.
    ///
    /// Steps one position at a time in the direction of `delta`, wrapping
    /// around, for at most one full lap. With `prefer_allowed`, denylisted
    /// presets are stepped over.
    pub fn find_relative(&self, delta: i32, prefer_allowed: bool) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        if delta == 0 {
            return Some(self.current);
        }

        let count = self.items.len();
        let mut index = self.current;
        for _ in 0..count {
            index = if delta > 0 {
                (index + 1) % count
            } else {
                (index + count - 1) % count
            };
            if prefer_allowed && self.denylist.contains(&self.items[index]) {
                continue;
            }
            return Some(index);
        }
        None
    }

    /// Moves to the neighbouring preset in the direction of `delta` and
    /// loads it with a smooth transition.
    ///
    /// ## Returns
    /// `false` when the catalog is empty.
    pub fn advance(&mut self, now: f64, delta: i32, engine: &mut dyn VisualizerEngine) -> bool {
        let Some(next) = self
            .find_relative(delta, self.skip_denylisted)
            .or_else(|| self.find_relative(delta, false))
        else {
            return false;
        };

        self.current = next;
        self.load_current(engine, true);
        self.fallback_active = false;
        self.last_switch = now;
        log::debug!("Switched to preset {}.", self.items[self.current]);
        true
    }

    /// Rotates to the next preset once the current one has been up long
    /// enough.
    pub fn auto_advance(&mut self, now: f64, engine: &mut dyn VisualizerEngine) -> bool {
        if self.items.len() > 1 && now - self.last_switch > self.timing.auto_advance {
            return self.advance(now, 1, engine);
        }
        false
    }

    /// Denylists the current preset.
    ///
    /// ## Returns
    /// `true` when it was not denylisted before.
    pub fn mark_current_denylisted(&mut self) -> Result<bool, CatalogError> {
        if self.fallback_active {
            return Ok(false);
        }
        let Some(id) = self.items.get(self.current) else {
            return Ok(false);
        };
        let added = self.denylist.insert(id)?;
        if added {
            log::warn!("Marked preset as slow: {id}");
        }
        Ok(added)
    }

    /// Empties the denylist.
    pub fn clear_denylist(&mut self) -> Result<(), CatalogError> {
        self.denylist.clear()?;
        log::info!("Cleared marked slow presets.");
        Ok(())
    }

    /// Identifier of the current preset; `None` while the fallback is up.
    pub fn current(&self) -> Option<&str> {
        if self.fallback_active {
            return None;
        }
        self.items.get(self.current).map(String::as_str)
    }

    /// Index of the current preset.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// What the HUD shows for the current preset.
    pub fn label(&self) -> &str {
        self.current().unwrap_or(FALLBACK_LABEL)
    }

    /// All known presets, sorted.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Number of known presets.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no presets are known.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the built-in preset is showing.
    pub fn is_fallback_active(&self) -> bool {
        self.fallback_active
    }

    /// Time of the last switch.
    pub fn last_switch(&self) -> f64 {
        self.last_switch
    }

    /// Restarts the rotation timer, as done when a session starts.
    pub fn restart_rotation(&mut self, now: f64) {
        self.last_switch = now;
    }

    /// The denylist.
    pub fn denylist(&self) -> &Denylist {
        &self.denylist
    }

    #[cfg(test)]
    fn with_items(items: &[&str], denylisted: &[&str]) -> Self {
        let mut denylist = Denylist::in_memory();
        for id in denylisted {
            denylist.insert(id).unwrap();
        }
        let mut catalog = Self::new("unused", denylist, CatalogTiming::default());
        catalog.items = items.iter().map(|s| s.to_string()).collect();
        catalog.fallback_active = false;
        catalog
    }
}
