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

//! Error types of the I/O layer.

use std::io;
use std::path::PathBuf;

/// Failure reading or writing the denylist file.
#[derive(Debug, thiserror::Error)]
pub enum DenylistError {
    /// The file exists but could not be read.
    #[error("Failed to read denylist '{path}': {source}")]
    Read {
        /// The denylist file.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// The file could not be rewritten.
    #[error("Failed to write denylist '{path}': {source}")]
    Write {
        /// The denylist file.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
}

/// Failure maintaining the preset catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The preset directory could not be listed.
    #[error("Failed to scan preset directory '{path}': {source}")]
    Scan {
        /// The preset directory.
        path: PathBuf,
        /// The underlying error.
        source: walkdir::Error,
    },
    /// A denylist operation failed.
    #[error(transparent)]
    Denylist(#[from] DenylistError),
}
