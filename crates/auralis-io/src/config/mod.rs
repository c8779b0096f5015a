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

//! Reading configuration from disk.

mod properties;

pub use properties::TomlPropertySource;

use anyhow::{Context, Result};
use auralis_core::config::VisualizerConfig;
use std::fs;
use std::path::Path;

/// Loads the startup configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<VisualizerConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at '{}'", path.display()))?;
    toml::from_str(&text)
        .with_context(|| format!("Failed to parse TOML from '{}'", path.display()))
}

/// Loads the startup configuration, falling back to the defaults when no
/// path is given or the file cannot be used.
pub fn load_config_or_default(path: Option<&Path>) -> VisualizerConfig {
    let Some(path) = path else {
        log::info!("No config file given. Using default configuration.");
        return VisualizerConfig::default();
    };
    match load_config(path) {
        Ok(config) => {
            log::info!("Loaded configuration from '{}'.", path.display());
            config
        }
        Err(e) => {
            log::warn!("{e:#}. Using default configuration.");
            VisualizerConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "preset_dir = \"/data/presets\"\nauto_advance_seconds = 45.0").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.preset_dir, Path::new("/data/presets"));
        assert_eq!(config.auto_advance_seconds, 45.0);
        assert_eq!(config.audio_quantum_frames, 512);
    }

    #[test]
    fn broken_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "preset_dir = [unterminated").unwrap();

        assert!(load_config(file.path()).is_err());
        assert_eq!(
            load_config_or_default(Some(file.path())),
            VisualizerConfig::default()
        );
        assert_eq!(load_config_or_default(None), VisualizerConfig::default());
    }
}
