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

//! External tool locations, loadable from a `Ballast.toml` manifest.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Paths of the external tools the scanners shell out to.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Archive-listing tool; invoked as `<tool> -l <package>`.
    pub archive_list_tool: PathBuf,
    /// Compression-test tool; invoked as `<tool> t <blob>`.
    pub compression_probe_tool: PathBuf,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            archive_list_tool: PathBuf::from("zipinfo"),
            compression_probe_tool: PathBuf::from("7z"),
        }
    }
}

impl ScanSettings {
    /// Loads settings from a TOML manifest.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file at '{}'", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Failed to parse TOML from '{}'", path.display()))
    }

    /// Loads settings, falling back to the defaults when the manifest is
    /// absent.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            log::info!(
                "No settings manifest at '{}', using default tool paths",
                path.display()
            );
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_manifest() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let manifest = dir.path().join("Ballast.toml");
        std::fs::write(
            &manifest,
            "archive_list_tool = \"/opt/tools/zipinfo\"\n\
             compression_probe_tool = \"/opt/tools/7z\"\n",
        )?;

        let settings = ScanSettings::load(&manifest)?;
        assert_eq!(settings.archive_list_tool, Path::new("/opt/tools/zipinfo"));
        assert_eq!(settings.compression_probe_tool, Path::new("/opt/tools/7z"));
        Ok(())
    }

    #[test]
    fn missing_manifest_falls_back_to_defaults() -> Result<()> {
        let settings = ScanSettings::load_or_default(Path::new("/nope/Ballast.toml"))?;
        assert_eq!(settings.archive_list_tool, Path::new("zipinfo"));
        assert_eq!(settings.compression_probe_tool, Path::new("7z"));
        Ok(())
    }

    #[test]
    fn partial_manifest_keeps_remaining_defaults() -> Result<()> {
        let settings: ScanSettings = toml::from_str("archive_list_tool = \"unzip\"")?;
        assert_eq!(settings.archive_list_tool, Path::new("unzip"));
        assert_eq!(settings.compression_probe_tool, Path::new("7z"));
        Ok(())
    }
}
