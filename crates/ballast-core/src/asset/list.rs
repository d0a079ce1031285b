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

//! Lookup primitives over the globally sorted asset list.
//!
//! All merge-time "find entry by path" operations binary-search one list
//! sorted by path. A miss returns the complement insertion index, and any
//! insertion of a previously unknown entry must use exactly that index —
//! inserting anywhere else silently breaks every later lookup.

use super::info::AssetInfo;

/// Binary-searches `assets` (sorted by path) for `path`.
///
/// Returns `Ok(index)` on a hit, or `Err(slot)` with the insertion point
/// that keeps the list sorted.
pub fn find_asset_index(assets: &[AssetInfo], path: &str) -> Result<usize, usize> {
    assets.binary_search_by(|asset| asset.path.as_str().cmp(path))
}

/// Sorts the list by path, establishing the order [`find_asset_index`]
/// requires.
pub fn sort_assets_by_path(assets: &mut [AssetInfo]) {
    assets.sort_by(|a, b| a.path.cmp(&b.path));
}
