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

//! Scanners for builds laid out as plain directories on disk.
//!
//! Three layouts share one data-directory scan and differ only in where
//! the data directory sits and what counts as auxiliary runtime.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ballast_core::artifacts::ENGINE_RESOURCE_NAMES;
use ballast_core::{BuildArtifactsInfo, SizePair};

use crate::error::ScanError;
use crate::fs_size::{directory_size, file_size, file_size_quiet};
use crate::scenes::scene_sizes_from;

/// Desktop build: `<executable name>_Data` beside the executable.
pub fn scan_desktop(
    build_path: &Path,
    data_dir_override: Option<&Path>,
    runtime_in_root: bool,
) -> Result<BuildArtifactsInfo, ScanError> {
    let data_dir = match data_dir_override {
        Some(dir) => dir.to_path_buf(),
        None => sibling_with_suffix(build_path, "_Data"),
    };

    let mut info = scan_data_directory(&data_dir, &data_dir, "StreamingAssets");
    info.runtime_size.uncompressed += directory_size(&data_dir.join("Mono"));

    // The executable itself is runtime, not content.
    let mut additional_runtime = file_size(build_path);

    if runtime_in_root {
        if let Some(root) = build_path.parent() {
            additional_runtime += file_size_quiet(&root.join("UnityPlayer.dll"));
            additional_runtime += file_size_quiet(&root.join("UnityCrashHandler64.exe"));
            additional_runtime += directory_size(&root.join("Mono"));
        }
    }

    info.total_size.uncompressed += additional_runtime;
    info.runtime_size.uncompressed += additional_runtime;

    Ok(info)
}

/// App bundle: data under `Contents/Resources/Data`, the whole bundle
/// counts toward the total, no auxiliary runtime files.
pub fn scan_app_bundle(build_path: &Path) -> Result<BuildArtifactsInfo, ScanError> {
    let data_dir = build_path.join("Contents/Resources/Data");
    Ok(scan_data_directory(build_path, &data_dir, "StreamingAssets"))
}

/// Exported device project: an embedded `Data` directory with a `Raw`
/// streaming folder.
pub fn scan_data_folder(build_path: &Path) -> Result<BuildArtifactsInfo, ScanError> {
    let data_dir = build_path.join("Data");
    Ok(scan_data_directory(&data_dir, &data_dir, "Raw"))
}

/// Shared scan over an on-disk data directory.
///
/// `total_dir` is what counts toward the build's gross size: the data
/// directory itself for most layouts, the bundle root for app bundles.
fn scan_data_directory(
    total_dir: &Path,
    data_dir: &Path,
    streaming_assets_name: &str,
) -> BuildArtifactsInfo {
    let modules_dir = data_dir.join("Managed");
    let streaming_dir = data_dir.join(streaming_assets_name);

    let mut managed_modules: BTreeMap<String, SizePair> = BTreeMap::new();
    let mut runtime_size = SizePair::default();

    if modules_dir.is_dir() {
        // Module files ship as assets and get attributed individually;
        // the rest of the folder is runtime.
        for path in top_level_module_files(&modules_dir) {
            let name = match path.file_name() {
                Some(name) => name.to_string_lossy().into_owned(),
                None => continue,
            };
            managed_modules.insert(name, SizePair::from(file_size(&path)));
        }

        let modules_total: u64 = managed_modules.values().map(|s| s.uncompressed).sum();
        runtime_size =
            SizePair::from(directory_size(&modules_dir).saturating_sub(modules_total));
    }

    let mut engine_resources = BTreeMap::new();
    for name in ENGINE_RESOURCE_NAMES {
        let actual = data_dir.join(name);
        // A directory with a resource's name is not the resource.
        if actual.is_file() {
            engine_resources.insert(name.to_owned(), SizePair::from(file_size(&actual)));
        }
    }

    let scene_sizes = scene_sizes_from(|data_file| match std::fs::metadata(data_dir.join(data_file)) {
        Ok(metadata) if metadata.is_file() => Some(SizePair::from(metadata.len())),
        _ => None,
    });

    BuildArtifactsInfo {
        scene_sizes,
        managed_modules,
        total_size: SizePair::from(directory_size(total_dir)),
        runtime_size,
        streaming_assets_size: directory_size(&streaming_dir),
        engine_resources,
        other_assets: BTreeMap::new(),
    }
}

/// `.dll` files directly under the modules directory, in name order.
fn top_level_module_files(modules_dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let entries = match std::fs::read_dir(modules_dir) {
        Ok(entries) => entries,
        Err(err) => {
            log::warn!("Unable to list {}: {}", modules_dir.display(), err);
            return files;
        }
    };
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("Skipping entry under {}: {}", modules_dir.display(), err);
                continue;
            }
        };
        let path = entry.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("dll"))
        {
            files.push(path);
        }
    }
    files.sort();
    files
}

/// Replaces the path's file name with `<stem><suffix>`, dropping any
/// extension: `Game.exe` becomes `Game_Data`.
fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_stem().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}
