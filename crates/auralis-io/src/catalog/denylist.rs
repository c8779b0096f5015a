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

//! The persisted list of presets too slow for the device.
//!
//! Stored as plain text, one identifier per line. Blank lines and lines
//! starting with `#` are ignored. The file is rewritten in full after every
//! change.

use crate::error::DenylistError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Last path segment of an identifier, accepting either separator.
pub(crate) fn basename(id: &str) -> &str {
    id.rsplit(['/', '\\']).next().unwrap_or(id)
}

/// Ordered set of denylisted preset identifiers.
#[derive(Debug, Clone, Default)]
pub struct Denylist {
    entries: Vec<String>,
    path: Option<PathBuf>,
}

impl Denylist {
    /// Creates an empty denylist that is never persisted.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads the denylist stored at `path`.
    ///
    /// A missing file is an empty denylist; it is created on the first
    /// change.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, DenylistError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => parse_entries(&text),
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(source) => return Err(DenylistError::Read { path, source }),
        };
        if !entries.is_empty() {
            log::info!("Loaded {} marked slow presets.", entries.len());
        }
        Ok(Self {
            entries,
            path: Some(path),
        })
    }

    /// Whether `id` is denylisted, by full identifier or by file name.
    pub fn contains(&self, id: &str) -> bool {
        if id.is_empty() {
            return false;
        }
        let name = basename(id);
        self.entries.iter().any(|entry| entry == id || entry == name)
    }

    /// Adds `id` and persists the list.
    ///
    /// Returns `false` without touching the file when `id` is already
    /// covered.
    pub fn insert(&mut self, id: &str) -> Result<bool, DenylistError> {
        if self.contains(id) {
            return Ok(false);
        }
        self.entries.push(id.to_string());
        self.persist()?;
        Ok(true)
    }

    /// Removes every entry and persists the empty list.
    pub fn clear(&mut self) -> Result<(), DenylistError> {
        self.entries.clear();
        self.persist()
    }

    /// Writes the whole list to its file, if it has one.
    pub fn persist(&self) -> Result<(), DenylistError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let mut text = String::new();
        for entry in &self.entries {
            text.push_str(entry);
            text.push('\n');
        }
        fs::write(path, text).map_err(|source| DenylistError::Write {
            path: path.clone(),
            source,
        })
    }

    /// The entries, in the order they were added.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

fn parse_entries(text: &str) -> Vec<String> {
    let mut entries: Vec<String> = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if !entries.iter().any(|e| e == line) {
            entries.push(line.to_string());
        }
    }
    entries
}
