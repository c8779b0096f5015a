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

//! # Auralis IO
//!
//! Everything that touches the filesystem: the preset catalog and its
//! rotation, the persisted slow-preset denylist, and the sources the
//! visualizer reads its configuration from.

#![warn(missing_docs)]

pub mod catalog;
pub mod config;
pub mod error;

pub use catalog::{scan_presets, CatalogTiming, ContentCatalog, Denylist};
pub use config::{load_config, load_config_or_default, TomlPropertySource};
pub use error::{CatalogError, DenylistError};
