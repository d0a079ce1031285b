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

//! Scanner for archive-packaged builds (a package file plus an optional
//! expansion file beside it).
//!
//! Every entry of every source archive is classified by path prefix:
//! scene data, managed modules, engine resources, hash-named assets,
//! streaming assets, native libraries. Classification is purely textual;
//! nothing is extracted.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use ballast_core::artifacts::{is_content_hash_name, ENGINE_RESOURCE_NAMES};
use ballast_core::paths::{ends_with_ignore_case, file_name_of, file_stem_of};
use ballast_core::{BuildArtifactsInfo, SizePair};

use crate::error::ScanError;
use crate::fs_size::file_size;
use crate::listing::list_archive;
use crate::scenes::scene_sizes_from;
use crate::settings::ScanSettings;

/// Content data prefix inside the package.
const DATA_PREFIX: &str = "assets/bin/Data/";
/// Streaming assets live under `assets/` but outside the data prefix.
const STREAMING_PREFIX: &str = "assets/";
/// Native runtime libraries.
const NATIVE_LIB_PREFIX: &str = "lib/";
/// Managed modules inside the data directory.
const MODULES_PREFIX: &str = "Managed/";

/// Scans the package (and its expansion file, when present) through the
/// external archive-listing tool.
pub fn scan_package(
    build_path: &Path,
    with_expansion: bool,
    settings: &ScanSettings,
) -> Result<BuildArtifactsInfo, ScanError> {
    let mut sources = vec![build_path.to_path_buf()];
    if with_expansion {
        sources.push(expansion_path(build_path));
    }

    let mut scene_files: HashMap<String, SizePair> = HashMap::new();
    let mut managed_modules: BTreeMap<String, SizePair> = BTreeMap::new();
    let mut engine_resources: BTreeMap<String, SizePair> = BTreeMap::new();
    let mut other_assets: BTreeMap<String, SizePair> = BTreeMap::new();

    let mut compressed_size = 0u64;
    let mut uncompressed_size = 0u64;
    let mut streaming_assets_size = 0u64;
    let mut runtime_size = SizePair::default();

    for source in &sources {
        compressed_size += file_size(source);

        let listing = list_archive(&settings.archive_list_tool, source)?;
        for entry in listing.entries()? {
            let entry = entry?;
            uncompressed_size += entry.size.uncompressed;

            if let Some(data_file) = entry.path.strip_prefix(DATA_PREFIX) {
                if data_file.starts_with("level") || data_file.starts_with("mainData") {
                    scene_files.insert(data_file.to_owned(), entry.size);
                } else if let Some(module_file) = data_file.strip_prefix(MODULES_PREFIX) {
                    // Module files ship as assets and get attributed
                    // individually; the rest of Managed is runtime.
                    if ends_with_ignore_case(module_file, ".dll") {
                        let module_name = file_name_of(module_file).to_owned();
                        if managed_modules.contains_key(&module_name) {
                            log::warn!(
                                "Duplicate module {module_name} across package sources, keeping the first"
                            );
                        } else {
                            managed_modules.insert(module_name, entry.size);
                        }
                    } else {
                        runtime_size += entry.size;
                    }
                } else if ENGINE_RESOURCE_NAMES.contains(&data_file) {
                    engine_resources.insert(data_file.to_owned(), entry.size);
                } else {
                    let stem = file_stem_of(data_file);
                    if is_content_hash_name(stem) {
                        // The same hash can recur across sources; sizes sum.
                        *other_assets.entry(stem.to_owned()).or_default() += entry.size;
                    }
                }
            } else if entry.path.starts_with(STREAMING_PREFIX) {
                streaming_assets_size += entry.size.uncompressed;
            } else if entry.path.starts_with(NATIVE_LIB_PREFIX) {
                runtime_size += entry.size;
            }
        }
    }

    let scene_sizes = scene_sizes_from(|name| scene_files.get(name).copied());

    Ok(BuildArtifactsInfo {
        scene_sizes,
        managed_modules,
        total_size: SizePair::new(compressed_size, uncompressed_size),
        runtime_size,
        streaming_assets_size,
        engine_resources,
        other_assets,
    })
}

/// The expansion file sits beside the package as `<name>.main.obb`.
fn expansion_path(package: &Path) -> PathBuf {
    let mut name = package.file_stem().unwrap_or_default().to_os_string();
    name.push(".main.obb");
    package.with_file_name(name)
}
