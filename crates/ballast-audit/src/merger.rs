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

//! Reconciliation of raw build measurements with the asset inventory.
//!
//! Three reconciliations share one compressed-size rule and one lookup
//! discipline. Scenes are matched by build order and take the maximum of
//! measurement and prior knowledge. Modules are matched by file name and
//! add. Resources and hash-named assets are matched by path and
//! *override* — deliberately not the maximum; see
//! [`merge_resource_artifacts`].

use std::collections::{BTreeMap, HashMap};

use ballast_core::asset::list::find_asset_index;
use ballast_core::asset::property::{clean_up_details, AssetProperty, COMPRESSED_SIZE_KEY, SCRIPT_REFERENCES_KEY};
use ballast_core::paths::{ends_with_ignore_case, file_name_of};
use ballast_core::query::{ContentQuery, DetailsCollector};
use ballast_core::{AssetInfo, BuildArtifactsInfo, SizePair};

use crate::error::AuditError;

/// How long the collector may spend finishing pending compressed-size
/// calculations, in milliseconds.
const CALCULATED_SIZES_BUDGET_MS: u64 = 15_000;

/// The scenes that went into the build, in load order, with whatever was
/// known about them before artifact measurement.
#[derive(Debug, Default, Clone)]
pub struct SceneManifest {
    /// Scene paths in build (load) order.
    pub paths: Vec<String>,
    /// Logical scene sizes known before measurement, by path.
    pub logical_sizes: HashMap<String, u64>,
    /// Extension properties per scene, parallel to `paths`. Leave empty
    /// when no collector ran.
    pub details: Vec<Vec<AssetProperty>>,
}

/// How a new compressed-size measurement combines with a stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressedUpdate {
    /// Add to whatever was stored before; partial evidence accumulates.
    Accumulate,
    /// Discard the stored value. Drift between independently measured
    /// values is a diagnostic signal, logged by the caller, never an
    /// error.
    Replace,
}

/// Stores `compressed` bytes on the entry per `mode` and returns the
/// previously stored value.
///
/// Zero measurements are ignored, so a probe that saw nothing cannot
/// erase real evidence.
pub(crate) fn update_compressed_size(
    info: &mut AssetInfo,
    compressed: u64,
    mode: CompressedUpdate,
) -> u64 {
    if compressed == 0 {
        return 0;
    }
    let current: u64 = info.detail(COMPRESSED_SIZE_KEY).unwrap_or(0);
    let stored = match mode {
        CompressedUpdate::Accumulate => compressed + current,
        CompressedUpdate::Replace => compressed,
    };
    info.set_detail(COMPRESSED_SIZE_KEY, stored);
    current
}

/// Adds one entry per processed scene and reconciles the measured scene
/// sizes against them.
///
/// Attribution never shrinks a scene: the entry keeps the maximum of the
/// measured and previously known logical size, while compressed sizes
/// accumulate. Measured scenes beyond the known scene count are a
/// warning — older runtimes do not always report per-scene boundaries
/// reliably.
pub fn attach_scene_entries(
    assets: &mut Vec<AssetInfo>,
    manifest: &SceneManifest,
    artifacts: &BuildArtifactsInfo,
) {
    let mut scene_entries: Vec<AssetInfo> = Vec::new();
    let mut index_of: HashMap<String, usize> = HashMap::new();

    for (build_index, path) in manifest.paths.iter().enumerate() {
        if index_of.contains_key(path) {
            continue;
        }

        let mut info = AssetInfo::new(path.clone());
        info.scenes.insert(path.clone());
        info.size = manifest.logical_sizes.get(path).copied().unwrap_or(0);

        if !manifest.details.is_empty() {
            match manifest.details.get(build_index) {
                Some(details) => info.details = clean_up_details(details.clone(), path),
                None => log::warn!("Missing details for scene {path}"),
            }
        }

        index_of.insert(path.clone(), scene_entries.len());
        scene_entries.push(info);
    }

    for (build_index, measured) in artifacts.scene_sizes.iter().enumerate() {
        let Some(path) = manifest.paths.get(build_index) else {
            log::warn!(
                "More scenes measured in the build than known ({} vs {})",
                artifacts.scene_sizes.len(),
                manifest.paths.len()
            );
            break;
        };
        if measured.uncompressed == 0 {
            log::warn!("No measured size for {path}");
        }

        let entry = &mut scene_entries[index_of[path]];
        entry.size = entry.size.max(measured.uncompressed);
        update_compressed_size(entry, measured.compressed, CompressedUpdate::Accumulate);
    }

    assets.extend(scene_entries);
}

/// Adds measured module sizes onto every entry sharing the module's file
/// name, creating a top-level entry for modules absent from the
/// inventory.
///
/// Appends out of order; the caller re-sorts before any binary-search
/// step runs.
pub fn merge_module_sizes(assets: &mut Vec<AssetInfo>, artifacts: &BuildArtifactsInfo) {
    if artifacts.managed_modules.is_empty() {
        return;
    }

    // Several inventory paths can share one module file name; the
    // measurement applies to each of them.
    let mut by_file_name: HashMap<String, Vec<usize>> = HashMap::new();
    for (index, asset) in assets.iter().enumerate() {
        if ends_with_ignore_case(&asset.path, ".dll") {
            by_file_name
                .entry(file_name_of(&asset.path).to_owned())
                .or_default()
                .push(index);
        }
    }

    for (module_name, size) in &artifacts.managed_modules {
        match by_file_name.get(module_name.as_str()) {
            Some(indices) => {
                for &index in indices {
                    let entry = &mut assets[index];
                    entry.size += size.uncompressed;
                    update_compressed_size(entry, size.compressed, CompressedUpdate::Accumulate);
                }
            }
            None => {
                let mut entry = AssetInfo::new(module_name.clone());
                entry.size = size.uncompressed;
                update_compressed_size(&mut entry, size.compressed, CompressedUpdate::Accumulate);
                assets.push(entry);
            }
        }
    }
}

/// Reconciles engine-resource and content-hash measurements by path.
///
/// Requires `assets` sorted by path; previously unknown entries are
/// inserted at the binary search's complement index so it stays that
/// way. Hash identifiers that no longer resolve to an asset are dropped
/// silently.
pub fn merge_resource_artifacts(
    assets: &mut Vec<AssetInfo>,
    artifacts: &BuildArtifactsInfo,
    query: &dyn ContentQuery,
) {
    for (name, size) in &artifacts.engine_resources {
        force_update_asset(assets, name, *size);
    }

    for (identifier, size) in &artifacts.other_assets {
        let Some(path) = query.path_for_identifier(identifier) else {
            continue;
        };
        force_update_asset(assets, &path, *size);
    }
}

fn force_update_asset(assets: &mut Vec<AssetInfo>, asset_path: &str, size: SizePair) {
    if size.uncompressed == 0 {
        return;
    }

    let mut lookup = find_asset_index(assets, asset_path);
    if lookup.is_err() && asset_path.ends_with("unity default resources") {
        // The default-resources blob has moved between the root and a
        // Library/ prefix across engine releases; retry the relocated
        // path once.
        if let Ok(index) = find_asset_index(assets, "Library/unity default resources") {
            lookup = Ok(index);
        }
    }

    let index = match lookup {
        Ok(index) => index,
        Err(slot) => {
            log::debug!("Unknown asset {asset_path}, adding from build artifacts with no dependencies");
            assets.insert(slot, AssetInfo::new(asset_path));
            slot
        }
    };

    let entry = &mut assets[index];
    log::debug!(
        "Overriding {} size from {} to {} based on build artifacts",
        asset_path,
        entry.size,
        size.uncompressed
    );
    // An override, not a maximum: package evidence replaces whatever was
    // attributed before. Scenes get the maximize policy instead.
    entry.size = size.uncompressed;

    let previous = update_compressed_size(entry, size.compressed, CompressedUpdate::Accumulate);
    if previous > 0 {
        log::debug!(
            "Already had compressed size for {asset_path}: {previous} vs {}",
            size.compressed
        );
    }
}

/// Applies collector-computed compressed sizes in replace mode.
///
/// When an entry already carries a different non-zero value the earlier
/// measurement wins and the drift is logged.
pub fn apply_calculated_compressed_sizes(
    assets: &mut [AssetInfo],
    collector: &dyn DetailsCollector,
) {
    for (path, compressed) in collector.calculated_compressed_sizes(CALCULATED_SIZES_BUDGET_MS) {
        match find_asset_index(assets, &path) {
            Ok(index) => {
                let entry = &mut assets[index];
                let previous =
                    update_compressed_size(entry, compressed, CompressedUpdate::Replace);
                if previous != 0 && previous != compressed {
                    log::debug!(
                        "Calculated and actual compressed size differ for {path}: {previous} vs {compressed}, keeping the former"
                    );
                    update_compressed_size(entry, previous, CompressedUpdate::Replace);
                }
            }
            Err(_) => {
                log::warn!("Calculated compressed size for {path}, but no matching asset entry");
            }
        }
    }
}

/// Counts, for every tracked script, the assets referencing it plus its
/// own scene-membership count, stored as the `ScriptReferences`
/// property. Downstream tooling uses a zero count to flag unreferenced
/// scripts.
pub fn count_script_references(
    assets: &mut [AssetInfo],
    query: &dyn ContentQuery,
) -> Result<(), AuditError> {
    let mut reference_counts: BTreeMap<String, usize> = query
        .valid_scripts()
        .into_iter()
        .map(|path| (path, 0))
        .collect();

    for asset in assets.iter() {
        for dependency in &asset.dependencies {
            if let Some(count) = reference_counts.get_mut(dependency) {
                *count += 1;
            }
        }
    }

    for (script, count) in reference_counts {
        let index = find_asset_index(assets, &script)
            .map_err(|_| AuditError::ScriptNotTracked { path: script.clone() })?;
        let entry = &mut assets[index];
        let total = entry.scenes.len() + count;
        entry.set_detail(SCRIPT_REFERENCES_KEY, total);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compressed_of(info: &AssetInfo) -> u64 {
        info.detail(COMPRESSED_SIZE_KEY).unwrap_or(0)
    }

    #[test]
    fn compressed_updates_accumulate_and_replace() {
        let mut info = AssetInfo::new("a.png");

        assert_eq!(
            update_compressed_size(&mut info, 10, CompressedUpdate::Accumulate),
            0
        );
        assert_eq!(
            update_compressed_size(&mut info, 5, CompressedUpdate::Accumulate),
            10
        );
        assert_eq!(compressed_of(&info), 15);

        assert_eq!(
            update_compressed_size(&mut info, 7, CompressedUpdate::Replace),
            15
        );
        assert_eq!(compressed_of(&info), 7);

        // Zero measurements change nothing.
        assert_eq!(
            update_compressed_size(&mut info, 0, CompressedUpdate::Replace),
            0
        );
        assert_eq!(compressed_of(&info), 7);
    }

    #[test]
    fn measured_modules_raise_every_matching_entry() {
        let mut assets = vec![
            AssetInfo::new("Assets/Plugins/Foo.dll"),
            AssetInfo::new("Assets/Plugins/Editor/Foo.dll"),
            AssetInfo::new("Assets/Other.png"),
        ];
        assets[0].size = 1;
        assets[1].size = 2;

        let mut artifacts = BuildArtifactsInfo::default();
        artifacts
            .managed_modules
            .insert("Foo.dll".to_owned(), SizePair::new(10, 50));

        merge_module_sizes(&mut assets, &artifacts);

        assert_eq!(assets.len(), 3);
        assert_eq!(assets[0].size, 51);
        assert_eq!(assets[1].size, 52);
        assert_eq!(compressed_of(&assets[0]), 10);
        assert_eq!(compressed_of(&assets[1]), 10);
        assert_eq!(assets[2].size, 0);
    }

    #[test]
    fn unknown_modules_become_top_level_entries() {
        let mut assets = Vec::new();
        let mut artifacts = BuildArtifactsInfo::default();
        artifacts
            .managed_modules
            .insert("mscorlib.dll".to_owned(), SizePair::new(3, 30));

        merge_module_sizes(&mut assets, &artifacts);

        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].path, "mscorlib.dll");
        assert_eq!(assets[0].size, 30);
        assert_eq!(compressed_of(&assets[0]), 3);
    }

    #[test]
    fn scene_sizes_take_the_maximum_and_accumulate_compressed() {
        let manifest = SceneManifest {
            paths: vec!["Assets/Intro.scene".to_owned(), "Assets/Town.scene".to_owned()],
            logical_sizes: [
                ("Assets/Intro.scene".to_owned(), 100u64),
                ("Assets/Town.scene".to_owned(), 10u64),
            ]
            .into_iter()
            .collect(),
            details: Vec::new(),
        };

        let artifacts = BuildArtifactsInfo {
            scene_sizes: vec![SizePair::new(8, 40), SizePair::new(4, 70)],
            ..Default::default()
        };

        let mut assets = Vec::new();
        attach_scene_entries(&mut assets, &manifest, &artifacts);

        assert_eq!(assets.len(), 2);
        // Known 100 beats measured 40; measured 70 beats known 10.
        assert_eq!(assets[0].size, 100);
        assert_eq!(assets[1].size, 70);
        assert_eq!(compressed_of(&assets[0]), 8);
        assert_eq!(compressed_of(&assets[1]), 4);
        assert_eq!(assets[0].scenes.len(), 1);
    }

    #[test]
    fn extra_measured_scenes_are_tolerated() {
        let manifest = SceneManifest {
            paths: vec!["Assets/Only.scene".to_owned()],
            logical_sizes: HashMap::new(),
            details: Vec::new(),
        };
        let artifacts = BuildArtifactsInfo {
            scene_sizes: vec![SizePair::from(5), SizePair::from(6), SizePair::from(7)],
            ..Default::default()
        };

        let mut assets = Vec::new();
        attach_scene_entries(&mut assets, &manifest, &artifacts);

        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].size, 5);
    }

    struct HashQuery;

    impl ContentQuery for HashQuery {
        fn dependencies(&self, _asset_path: &str) -> Vec<String> {
            Vec::new()
        }
        fn qualifies_for_packing(&self, _asset_path: &str) -> bool {
            false
        }
        fn atlas_pages(
            &self,
            _atlas_path: &str,
        ) -> Option<(String, Vec<ballast_core::query::PageTexture>)> {
            None
        }
        fn collect_sprites(
            &self,
            _asset_path: &str,
        ) -> Option<Vec<ballast_core::query::SpriteRef>> {
            None
        }
        fn sprite_packing(
            &self,
            _sprite: &ballast_core::query::SpriteRef,
        ) -> Option<(String, String)> {
            None
        }
        fn packed_pages(&self, _tag: &str) -> Vec<ballast_core::query::PageTexture> {
            Vec::new()
        }
        fn path_for_identifier(&self, identifier: &str) -> Option<String> {
            (identifier == "00000000000000000000000000000001")
                .then(|| "Assets/Big.png".to_owned())
        }
        fn valid_scripts(&self) -> Vec<String> {
            Vec::new()
        }
    }

    #[test]
    fn resource_sizes_override_and_fall_back_to_the_library_prefix() {
        let mut assets = vec![AssetInfo::new("Library/unity default resources")];
        assets[0].size = 999;

        let mut artifacts = BuildArtifactsInfo::default();
        artifacts
            .engine_resources
            .insert("unity default resources".to_owned(), SizePair::new(2, 123));

        merge_resource_artifacts(&mut assets, &artifacts, &HashQuery);

        // No new entry: the relocated path matched, and the measured size
        // replaced the attributed one.
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].size, 123);
        assert_eq!(compressed_of(&assets[0]), 2);
    }

    #[test]
    fn hash_assets_resolve_or_are_dropped() {
        let mut assets = vec![AssetInfo::new("Assets/Big.png")];
        assets[0].size = 1;

        let mut artifacts = BuildArtifactsInfo::default();
        artifacts.other_assets.insert(
            "00000000000000000000000000000001".to_owned(),
            SizePair::new(9, 400),
        );
        artifacts.other_assets.insert(
            "ffffffffffffffffffffffffffffffff".to_owned(),
            SizePair::new(1, 50),
        );

        merge_resource_artifacts(&mut assets, &artifacts, &HashQuery);

        // The stale hash vanished without adding an entry.
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].size, 400);
        assert_eq!(compressed_of(&assets[0]), 9);
    }

    #[test]
    fn unknown_resource_paths_insert_in_sorted_position() {
        let mut assets = vec![
            AssetInfo::new("Resources/unity_builtin_extra"),
            AssetInfo::new("Zed.png"),
        ];

        let mut artifacts = BuildArtifactsInfo::default();
        artifacts
            .engine_resources
            .insert("Resources/unity default resources".to_owned(), SizePair::from(33));

        merge_resource_artifacts(&mut assets, &artifacts, &HashQuery);

        assert_eq!(assets.len(), 3);
        assert_eq!(assets[0].path, "Resources/unity default resources");
        assert_eq!(assets[0].size, 33);
        assert!(assets.windows(2).all(|w| w[0].path < w[1].path));
    }

    struct ScriptQuery;

    impl ContentQuery for ScriptQuery {
        fn dependencies(&self, _asset_path: &str) -> Vec<String> {
            Vec::new()
        }
        fn qualifies_for_packing(&self, _asset_path: &str) -> bool {
            false
        }
        fn atlas_pages(
            &self,
            _atlas_path: &str,
        ) -> Option<(String, Vec<ballast_core::query::PageTexture>)> {
            None
        }
        fn collect_sprites(
            &self,
            _asset_path: &str,
        ) -> Option<Vec<ballast_core::query::SpriteRef>> {
            None
        }
        fn sprite_packing(
            &self,
            _sprite: &ballast_core::query::SpriteRef,
        ) -> Option<(String, String)> {
            None
        }
        fn packed_pages(&self, _tag: &str) -> Vec<ballast_core::query::PageTexture> {
            Vec::new()
        }
        fn path_for_identifier(&self, _identifier: &str) -> Option<String> {
            None
        }
        fn valid_scripts(&self) -> Vec<String> {
            vec!["Assets/Scripts/Player.cs".to_owned()]
        }
    }

    #[test]
    fn script_references_count_dependents_and_scenes() {
        let mut script = AssetInfo::new("Assets/Scripts/Player.cs");
        script.scenes.insert("Assets/Intro.scene".to_owned());

        let mut hero = AssetInfo::new("Assets/Hero.prefab");
        hero.insert_dependency("Assets/Scripts/Player.cs");
        let mut villain = AssetInfo::new("Assets/Villain.prefab");
        villain.insert_dependency("Assets/Scripts/Player.cs");

        let mut assets = vec![hero, script, villain];
        ballast_core::asset::list::sort_assets_by_path(&mut assets);

        count_script_references(&mut assets, &ScriptQuery).unwrap();

        let script = &assets[find_asset_index(&assets, "Assets/Scripts/Player.cs").unwrap()];
        assert_eq!(script.detail::<usize>(SCRIPT_REFERENCES_KEY), Some(3));
    }

    #[test]
    fn missing_script_entry_is_fatal() {
        let mut assets = Vec::new();
        let err = count_script_references(&mut assets, &ScriptQuery).unwrap_err();
        assert!(matches!(err, AuditError::ScriptNotTracked { .. }));
    }
}
