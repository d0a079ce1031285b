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

//! Dependency resolution and sprite-atlas discovery.
//!
//! Two atlas mechanisms coexist because packing changed across content
//! pipeline generations. Explicit atlas assets list their pages and the
//! pages become synthetic entries directly. Legacy packing leaves no
//! edge in the dependency graph: an asset loaded through the resource
//! convention can pull in a packed page without referencing it, so
//! suspect assets get their full object graph scanned and every
//! reachable sprite is mapped back to the page it was packed into.

use std::collections::{BTreeMap, HashMap};

use ballast_core::paths::ends_with_ignore_case;
use ballast_core::query::{ContentQuery, DetailsCollector, DetailsTarget, PageTexture, SpriteRef};
use ballast_core::AssetInfo;

/// Which sprite-packing generations the content pipeline used.
#[derive(Debug, Clone, Copy)]
pub struct ResolverOptions {
    /// Modern explicit atlas assets (`.spriteatlas`).
    pub explicit_atlases: bool,
    /// Implicit tag-based packing of older pipelines.
    pub legacy_sprite_packing: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            explicit_atlases: true,
            legacy_sprite_packing: false,
        }
    }
}

/// Attaches dependency edges to every asset and discovers atlas pages,
/// appending the newly discovered synthetic entries to `assets`.
pub fn discover_dependencies(
    assets: &mut Vec<AssetInfo>,
    query: &dyn ContentQuery,
    options: ResolverOptions,
    collector: Option<&dyn DetailsCollector>,
) {
    // Scene data can reference a packed page directly, in which case the
    // page already has an inventory entry the legacy scan must reuse.
    let scene_asset_index: HashMap<String, usize> = assets
        .iter()
        .enumerate()
        .filter(|(_, asset)| !asset.scenes.is_empty())
        .map(|(index, asset)| (asset.path.clone(), index))
        .collect();

    let mut discovered: BTreeMap<String, AssetInfo> = BTreeMap::new();
    let mut legacy = options
        .legacy_sprite_packing
        .then(LegacyAtlasScan::default);

    for index in 0..assets.len() {
        let asset_path = assets[index].path.clone();
        log::debug!("Collecting dependencies for asset: {asset_path}");

        let dependencies = query.dependencies(&asset_path);

        let legacy_suspect = legacy.is_some()
            && assets[index].scenes.is_empty()
            && asset_path.to_ascii_lowercase().contains("/resources/")
            && (ends_with_ignore_case(&asset_path, ".prefab")
                || ends_with_ignore_case(&asset_path, ".asset"));

        if options.explicit_atlases && asset_path.ends_with(".spriteatlas") {
            attach_atlas_pages(&mut assets[index], &mut discovered, query, collector);
        }

        let mut may_reference_packed_sprites = false;
        for dependency in &dependencies {
            if *dependency == asset_path {
                continue;
            }
            assets[index].insert_dependency(dependency);

            if legacy_suspect && query.qualifies_for_packing(dependency) {
                may_reference_packed_sprites = true;
            }
        }

        if may_reference_packed_sprites {
            log::debug!(
                "Asset {asset_path} may reference packed sprites, doing a full object scan"
            );
            if let Some(scan) = legacy.as_mut() {
                scan.scan_suspect(&asset_path, query);
            }
        }
    }

    if let Some(scan) = legacy {
        scan.apply(assets, &scene_asset_index, &mut discovered, collector);
    }
    assets.extend(discovered.into_values());
}

/// Display name of one atlas page, deterministic per (tag, page).
fn atlas_page_name(tag: &str, page_number: usize, page_count: usize) -> String {
    format!("Sprite Atlas {} [{} of {}]", tag, page_number + 1, page_count)
}

/// Synthesizes one entry per page of an explicit atlas asset and links
/// the pages as dependencies of the atlas.
fn attach_atlas_pages(
    atlas: &mut AssetInfo,
    discovered: &mut BTreeMap<String, AssetInfo>,
    query: &dyn ContentQuery,
    collector: Option<&dyn DetailsCollector>,
) {
    let pages = match query.atlas_pages(&atlas.path) {
        Some((_, pages)) if pages.is_empty() => None,
        other => other,
    };
    let Some((tag, pages)) = pages else {
        // Some atlases legitimately degrade to nothing.
        log::warn!("No textures found for atlas {}", atlas.path);
        return;
    };

    let page_count = pages.len();
    for (page_number, page) in pages.iter().enumerate() {
        let name = atlas_page_name(&tag, page_number, page_count);
        if discovered.contains_key(&name) {
            log::warn!("Atlas page already discovered: {name}");
            continue;
        }

        let mut info = AssetInfo::new(name.clone());
        info.sprite_packer_tag = Some(tag.clone());
        info.sprite_packer_page = Some(page_number);
        info.size = page.storage_size;
        info.scenes = atlas.scenes.clone();

        if let Some(collector) = collector {
            log::debug!("Collecting details for asset: {name}");
            let mut details = Vec::new();
            collector.collect(
                DetailsTarget::AtlasPage {
                    name: &name,
                    texture_key: &page.key,
                },
                &mut details,
            );
            info.details = details;
        }

        atlas.insert_dependency(&name);
        discovered.insert(name, info);
    }
}

/// State of one legacy packed-sprite scan.
///
/// Page resolution is memoized per sprite and page lists are cached per
/// tag for the duration of the scan; the slow object-graph loads happen
/// in the caller, once per suspect.
#[derive(Default)]
struct LegacyAtlasScan {
    /// Sprite key → resolved page name (`None` records a failed
    /// resolution so it is not retried).
    sprite_pages: HashMap<String, Option<String>>,
    /// Tag → ordered page textures.
    tag_pages: HashMap<String, Vec<PageTexture>>,
    /// Page name → synthetic entry data accumulated so far.
    pending: BTreeMap<String, PendingPage>,
}

struct PendingPage {
    tag: String,
    page_number: usize,
    storage_size: u64,
    texture_key: String,
    /// Suspect assets that reach a sprite on this page.
    referencing_assets: Vec<String>,
}

impl LegacyAtlasScan {
    /// Loads the suspect's object graph and maps every reachable sprite
    /// back to its atlas page.
    fn scan_suspect(&mut self, suspect_path: &str, query: &dyn ContentQuery) {
        let Some(sprites) = query.collect_sprites(suspect_path) else {
            log::warn!("Unable to scan {suspect_path} for packed sprites");
            return;
        };

        for sprite in sprites {
            if sprite.asset_path.is_empty() {
                continue;
            }
            if let Some(page_name) = self.resolve_sprite_page(&sprite, query) {
                if let Some(page) = self.pending.get_mut(&page_name) {
                    if !page.referencing_assets.iter().any(|p| p == suspect_path) {
                        page.referencing_assets.push(suspect_path.to_owned());
                    }
                }
            }
        }
    }

    /// Memoized sprite → page-name resolution.
    fn resolve_sprite_page(
        &mut self,
        sprite: &SpriteRef,
        query: &dyn ContentQuery,
    ) -> Option<String> {
        if let Some(cached) = self.sprite_pages.get(&sprite.key) {
            return cached.clone();
        }
        let resolved = self.resolve_uncached(sprite, query);
        self.sprite_pages.insert(sprite.key.clone(), resolved.clone());
        resolved
    }

    fn resolve_uncached(
        &mut self,
        sprite: &SpriteRef,
        query: &dyn ContentQuery,
    ) -> Option<String> {
        if !query.qualifies_for_packing(&sprite.asset_path) {
            return None;
        }
        let (tag, texture_key) = query.sprite_packing(sprite)?;

        let pages = self
            .tag_pages
            .entry(tag.clone())
            .or_insert_with(|| query.packed_pages(&tag));

        let Some(page_number) = pages.iter().position(|page| page.key == texture_key) else {
            log::warn!("Unable to find texture {texture_key} in atlas {tag}");
            return None;
        };

        let name = atlas_page_name(&tag, page_number, pages.len());
        self.pending.entry(name.clone()).or_insert_with(|| PendingPage {
            tag,
            page_number,
            storage_size: pages[page_number].storage_size,
            texture_key: pages[page_number].key.clone(),
            referencing_assets: Vec::new(),
        });
        Some(name)
    }

    /// Writes the accumulated page data into the inventory: an existing
    /// scene-referenced entry first, then an already-discovered page,
    /// else a lazily created one.
    fn apply(
        self,
        assets: &mut [AssetInfo],
        scene_asset_index: &HashMap<String, usize>,
        discovered: &mut BTreeMap<String, AssetInfo>,
        collector: Option<&dyn DetailsCollector>,
    ) {
        for (name, page) in self.pending {
            if let Some(&index) = scene_asset_index.get(&name) {
                stamp_page_entry(&mut assets[index], &page);
            } else {
                let entry = discovered.entry(name.clone()).or_insert_with(|| {
                    let mut info = AssetInfo::new(name.clone());
                    if let Some(collector) = collector {
                        log::debug!("Collecting details for asset: {name}");
                        let mut details = Vec::new();
                        collector.collect(
                            DetailsTarget::AtlasPage {
                                name: &name,
                                texture_key: &page.texture_key,
                            },
                            &mut details,
                        );
                        info.details = details;
                    }
                    info
                });
                stamp_page_entry(entry, &page);
            }
        }
    }
}

/// First touch stamps the page metadata; every touch adds the
/// referencing suspects as dependencies.
fn stamp_page_entry(entry: &mut AssetInfo, page: &PendingPage) {
    if entry.sprite_packer_tag.is_none() {
        entry.sprite_packer_tag = Some(page.tag.clone());
        entry.sprite_packer_page = Some(page.page_number);
        entry.size = page.storage_size;
    }
    for suspect in &page.referencing_assets {
        entry.insert_dependency(suspect);
    }
}
