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

use auralis_core::config::PropertySource;
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

#[derive(Debug, Default)]
struct Cached {
    modified: Option<SystemTime>,
    table: toml::Table,
}

/// Tunables read from a TOML file, reloaded whenever the file changes.
///
/// Dotted keys address nested tables, so `hud.distance` reads
/// `distance` from a `[hud]` table. Strings are returned as written,
/// numbers and booleans in their TOML spelling. A missing or unparsable
/// file reads as every key unset.
#[derive(Debug)]
pub struct TomlPropertySource {
    path: PathBuf,
    cache: RefCell<Cached>,
}

impl TomlPropertySource {
    /// Creates a source over `path`. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RefCell::new(Cached::default()),
        }
    }

    fn refresh(&self) {
        let modified = fs::metadata(&self.path).and_then(|m| m.modified()).ok();
        let mut cache = self.cache.borrow_mut();
        if modified.is_some() && modified == cache.modified {
            return;
        }

        cache.modified = modified;
        cache.table = match fs::read_to_string(&self.path) {
            Ok(text) => toml::from_str(&text).unwrap_or_else(|e| {
                log::warn!("Ignoring tunables file '{}': {e}", self.path.display());
                toml::Table::new()
            }),
            Err(_) => toml::Table::new(),
        };
    }
}

impl PropertySource for TomlPropertySource {
    fn get(&self, key: &str) -> Option<String> {
        self.refresh();
        let cache = self.cache.borrow();

        let mut segments = key.split('.').peekable();
        let mut table = &cache.table;
        while let Some(segment) = segments.next() {
            let value = table.get(segment)?;
            if segments.peek().is_none() {
                return match value {
                    toml::Value::String(s) => Some(s.clone()),
                    toml::Value::Integer(i) => Some(i.to_string()),
                    toml::Value::Float(f) => Some(f.to_string()),
                    toml::Value::Boolean(b) => Some(b.to_string()),
                    _ => None,
                };
            }
            table = value.as_table()?;
        }
        None
    }
}
