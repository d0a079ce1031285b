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

//! Scanner for compressed-blob deployments.
//!
//! The on-disk directory only shows compressed bytes, so per-file roles
//! come from the native build report the engine wrote next to the build,
//! and the uncompressed total is refined by probing the deployment blobs
//! with the compression-test tool. Probe failures leave the
//! approximation untouched.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ballast_core::{BuildArtifactsInfo, SizePair};
use serde::Deserialize;

use crate::error::ScanError;
use crate::fs_size::{directory_size, file_size};
use crate::probe::probe_uncompressed_size;
use crate::settings::ScanSettings;

/// Default file name of the native build report inside the build folder.
const DEFAULT_REPORT_NAME: &str = "BuildReport.json";

/// Scene data files are named `level<N>`.
const LEVEL_PREFIX: &str = "level";
/// Managed modules sit under a `Managed/` directory in report paths.
const MODULES_SEGMENT: &str = "/Managed/";

/// Per-file entry of the native build report.
#[derive(Debug, Deserialize)]
struct ReportFile {
    /// Path of the produced file.
    path: String,
    /// Role the build pipeline assigned to the file.
    role: String,
    /// Uncompressed size in bytes.
    #[serde(rename = "totalSize")]
    total_size: u64,
}

/// The native build report: per-file role metadata emitted by the
/// engine at build time.
#[derive(Debug, Deserialize)]
struct NativeBuildReport {
    files: Vec<ReportFile>,
}

/// Scans a compressed-blob deployment.
pub fn scan_blob(
    build_path: &Path,
    report_path: Option<&Path>,
    settings: &ScanSettings,
) -> Result<BuildArtifactsInfo, ScanError> {
    let compressed_size = directory_size(build_path);
    let mut total_uncompressed = compressed_size;
    let streaming_assets_size = directory_size(&build_path.join("StreamingAssets"));

    let report = load_report(build_path, report_path)?;

    let mut scene_sizes: Vec<SizePair> = Vec::new();
    let mut managed_modules: BTreeMap<String, SizePair> = BTreeMap::new();

    for file in &report.files {
        match file.role.as_str() {
            "Scene" => {
                let Some(level_number) = trailing_level_number(&file.path) else {
                    log::warn!("Unexpected level path: {}", file.path);
                    continue;
                };
                // Pad skipped indices so load order is preserved.
                while scene_sizes.len() <= level_number {
                    scene_sizes.push(SizePair::default());
                }
                scene_sizes[level_number] = SizePair::new(file.total_size, file.total_size);
            }
            "ManagedLibrary" | "DependentManagedLibrary" => {
                let Some(module_name) = module_name_of(&file.path) else {
                    log::warn!("Unexpected module path: {}", file.path);
                    continue;
                };
                managed_modules
                    .insert(module_name.to_owned(), SizePair::new(0, file.total_size));
            }
            _ => {}
        }
    }

    // Probe the deployment blobs to trade the compressed approximation
    // for real uncompressed sizes wherever a probe succeeds.
    for blob in deployment_blobs(build_path) {
        if let Some(uncompressed) =
            probe_uncompressed_size(&settings.compression_probe_tool, &blob)
        {
            total_uncompressed += uncompressed;
            total_uncompressed = total_uncompressed.saturating_sub(file_size(&blob));
        }
    }

    Ok(BuildArtifactsInfo {
        scene_sizes,
        managed_modules,
        total_size: SizePair::new(compressed_size, total_uncompressed),
        runtime_size: SizePair::default(),
        streaming_assets_size,
        engine_resources: BTreeMap::new(),
        other_assets: BTreeMap::new(),
    })
}

/// The blobs worth probing: a single `Release/<name>.datagz`, or every
/// compressed chunk under `Build/`.
fn deployment_blobs(build_path: &Path) -> Vec<PathBuf> {
    let release_dir = build_path.join("Release");
    if release_dir.is_dir() {
        // The release blob is named after the build folder.
        return match build_path.file_name() {
            Some(name) => {
                let mut blob_name = name.to_os_string();
                blob_name.push(".datagz");
                vec![release_dir.join(blob_name)]
            }
            None => Vec::new(),
        };
    }

    let build_dir = build_path.join("Build");
    let mut blobs = Vec::new();
    if build_dir.is_dir() {
        if let Ok(entries) = std::fs::read_dir(&build_dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_file()
                    && path
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("unityweb"))
                {
                    blobs.push(path);
                }
            }
        }
        blobs.sort();
    }
    blobs
}

fn load_report(
    build_path: &Path,
    override_path: Option<&Path>,
) -> Result<NativeBuildReport, ScanError> {
    let path = match override_path {
        Some(path) => path.to_path_buf(),
        None => build_path.join(DEFAULT_REPORT_NAME),
    };
    let text = std::fs::read_to_string(&path).map_err(|source| ScanError::MissingReport {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ScanError::MalformedReport { path, source })
}

/// Parses the `<N>` out of a path ending in `level<N>`.
fn trailing_level_number(path: &str) -> Option<usize> {
    let start = path.rfind(LEVEL_PREFIX)?;
    path[start + LEVEL_PREFIX.len()..].parse().ok()
}

/// The module file name after the last `/Managed/` segment.
fn module_name_of(path: &str) -> Option<&str> {
    let start = path.rfind(MODULES_SEGMENT)?;
    Some(&path[start + MODULES_SEGMENT.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn level_numbers_parse_from_path_suffixes() {
        assert_eq!(trailing_level_number("Temp/StagingArea/Data/level3"), Some(3));
        assert_eq!(trailing_level_number("level0"), Some(0));
        assert_eq!(trailing_level_number("Data/level"), None);
        assert_eq!(trailing_level_number("Data/scene3"), None);
        assert_eq!(trailing_level_number("Data/level3.split0"), None);
    }

    #[test]
    fn module_names_come_after_the_managed_segment() {
        assert_eq!(
            module_name_of("Data/Managed/Assembly-CSharp.dll"),
            Some("Assembly-CSharp.dll")
        );
        assert_eq!(module_name_of("Data/Plugins/native.so"), None);
    }

    #[test]
    fn report_roles_populate_scenes_and_modules() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("app.bin"), vec![0u8; 500])?;
        fs::write(
            dir.path().join("BuildReport.json"),
            r#"{"files": [
                {"path": "Data/level0", "role": "Scene", "totalSize": 100},
                {"path": "Data/level2", "role": "Scene", "totalSize": 300},
                {"path": "Data/Managed/Game.dll", "role": "ManagedLibrary", "totalSize": 40},
                {"path": "Data/Managed/mscorlib.dll", "role": "DependentManagedLibrary", "totalSize": 60},
                {"path": "Data/app.wasm", "role": "Executable", "totalSize": 999}
            ]}"#,
        )?;

        let settings = ScanSettings::default();
        let info = scan_blob(dir.path(), None, &settings)?;

        // level1 was never reported; its slot is padded with zeros.
        assert_eq!(
            info.scene_sizes
                .iter()
                .map(|s| s.uncompressed)
                .collect::<Vec<_>>(),
            [100, 0, 300]
        );
        assert_eq!(
            info.managed_modules.get("Game.dll"),
            Some(&SizePair::new(0, 40))
        );
        assert_eq!(
            info.managed_modules.get("mscorlib.dll"),
            Some(&SizePair::new(0, 60))
        );
        // Gross directory size doubles as both sides of the total when no
        // probe succeeds.
        assert_eq!(info.total_size.compressed, info.total_size.uncompressed);
        Ok(())
    }

    #[test]
    fn missing_report_is_fatal() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let settings = ScanSettings::default();
        let err = scan_blob(dir.path(), None, &settings).unwrap_err();
        assert!(matches!(err, ScanError::MissingReport { .. }));
        Ok(())
    }

    #[test]
    fn malformed_report_is_fatal() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("BuildReport.json"), "not json")?;
        let settings = ScanSettings::default();
        let err = scan_blob(dir.path(), None, &settings).unwrap_err();
        assert!(matches!(err, ScanError::MalformedReport { .. }));
        Ok(())
    }
}
