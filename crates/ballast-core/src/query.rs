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

//! Contracts implemented by the engine-side content collaborators.
//!
//! The auditor itself never loads assets; everything it knows about
//! content — dependency edges, sprite packing, hash-to-path resolution —
//! comes through [`ContentQuery`]. Extension properties for individual
//! entries come through the optional [`DetailsCollector`].

use crate::asset::AssetProperty;

/// One packed texture page of a sprite atlas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTexture {
    /// Stable identity of the page texture within its tag.
    pub key: String,
    /// In-memory storage footprint of the page, in bytes.
    pub storage_size: u64,
}

/// A sprite reachable from a loaded object graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteRef {
    /// Stable identity of the sprite; page lookups are memoized on it.
    pub key: String,
    /// Path of the asset the sprite was imported from; empty when the
    /// sprite has no source asset.
    pub asset_path: String,
}

/// Content-dependency queries answered by the engine's asset database.
pub trait ContentQuery {
    /// Paths the asset directly and transitively uses.
    fn dependencies(&self, asset_path: &str) -> Vec<String>;

    /// Whether the asset at `asset_path` is an importable texture
    /// eligible for sprite packing.
    fn qualifies_for_packing(&self, asset_path: &str) -> bool;

    /// Tag and ordered page textures of an explicit atlas asset; `None`
    /// when the atlas cannot be loaded or carries no tag.
    fn atlas_pages(&self, atlas_path: &str) -> Option<(String, Vec<PageTexture>)>;

    /// Every sprite reachable from the asset's full object graph; `None`
    /// when the asset cannot be loaded.
    fn collect_sprites(&self, asset_path: &str) -> Option<Vec<SpriteRef>>;

    /// The `(tag, page texture key)` the sprite was actually packed
    /// into; `None` when the sprite is not packed.
    fn sprite_packing(&self, sprite: &SpriteRef) -> Option<(String, String)>;

    /// Ordered page textures for a legacy packing tag.
    fn packed_pages(&self, tag: &str) -> Vec<PageTexture>;

    /// Resolves a content-hash identifier to an asset path; `None` when
    /// the identifier is stale or unknown.
    fn path_for_identifier(&self, identifier: &str) -> Option<String>;

    /// Paths of all tracked script-type assets.
    fn valid_scripts(&self) -> Vec<String>;
}

/// What a details collector is being asked to describe.
#[derive(Debug, Clone, Copy)]
pub enum DetailsTarget<'a> {
    /// An asset addressed by path.
    Asset {
        /// The asset's path.
        path: &'a str,
    },
    /// A synthetic atlas-page entry.
    AtlasPage {
        /// The synthetic entry's name.
        name: &'a str,
        /// Identity of the page texture backing the entry.
        texture_key: &'a str,
    },
}

/// Collects engine-specific extension properties for report entries.
pub trait DetailsCollector {
    /// Appends properties describing `target`; returns `false` when the
    /// target is unknown to the collector.
    fn collect(&self, target: DetailsTarget<'_>, out: &mut Vec<AssetProperty>) -> bool;

    /// Compressed sizes computed off-line by the collaborator, as
    /// `(asset path, bytes)` pairs. `budget_ms` bounds how long the
    /// collaborator may spend finishing pending calculations.
    fn calculated_compressed_sizes(&self, budget_ms: u64) -> Vec<(String, u64)>;
}
