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

//! The per-asset report entry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

use super::property::{clean_up_details, AssetProperty};

/// One entry of the per-asset size report.
///
/// Entries are created during dependency resolution (authored assets and
/// synthetic atlas pages) and during attribution (scenes, modules, assets
/// known only from build artifacts). `path` is the unique, case-sensitive
/// key that the global report ordering and all merge-time lookups rely
/// on.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AssetInfo {
    /// Unique asset path, the entry's identity and sort key.
    pub path: String,

    /// Logical (uncompressed) size in bytes.
    pub size: u64,

    /// Scenes this asset is reachable from; empty for pure resources.
    pub scenes: BTreeSet<String>,

    /// Paths of other assets this asset references, strictly sorted and
    /// de-duplicated.
    pub dependencies: Vec<String>,

    /// Packing tag, present only on synthetic atlas-page entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprite_packer_tag: Option<String>,

    /// Page index within the packing tag, synthetic entries only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprite_packer_page: Option<usize>,

    /// Extension properties, sorted by name after cleanup.
    pub details: Vec<AssetProperty>,
}

impl AssetInfo {
    /// Creates an empty entry for `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Inserts `dependency` keeping the list sorted; duplicates are
    /// dropped. Insertion always goes through the binary search's
    /// complement slot, never a plain append.
    pub fn insert_dependency(&mut self, dependency: &str) {
        if let Err(slot) = self
            .dependencies
            .binary_search_by(|d| d.as_str().cmp(dependency))
        {
            self.dependencies.insert(slot, dependency.to_owned());
        }
    }

    /// Reads a typed extension property; `None` when absent or unparsable.
    pub fn detail<T: FromStr>(&self, name: &str) -> Option<T> {
        self.details
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.value.parse().ok())
    }

    /// Sets an extension property, overwriting an existing value.
    pub fn set_detail(&mut self, name: &str, value: impl ToString) {
        match self.details.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.value = value.to_string(),
            None => self.details.push(AssetProperty::new(name, value)),
        }
    }

    /// Sorts and de-duplicates the extension properties.
    pub fn clean_up(&mut self) {
        self.details = clean_up_details(std::mem::take(&mut self.details), &self.path);
    }
}
