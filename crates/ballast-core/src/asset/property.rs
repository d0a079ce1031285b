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

//! Schema-less extension properties attached to report entries.
//!
//! Independent resolution steps (detail collectors, the attribution
//! merger, script-reference counting) each add their own properties
//! without a shared schema owner, so the bag stays an association list
//! rather than a fixed struct. One cleanup rule applies everywhere:
//! sorted by name, first duplicate wins, later ones are dropped with a
//! warning.

use serde::{Deserialize, Serialize};

/// Property accumulating an asset's measured compressed size.
pub const COMPRESSED_SIZE_KEY: &str = "CompressedSize";

/// Property holding how many assets and scenes reference a script.
pub const SCRIPT_REFERENCES_KEY: &str = "ScriptReferences";

/// A single named extension property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetProperty {
    /// Property name, unique per asset after cleanup.
    pub name: String,
    /// Stringified property value.
    pub value: String,
}

impl AssetProperty {
    /// Creates a property from any displayable value.
    pub fn new(name: impl Into<String>, value: impl ToString) -> Self {
        Self {
            name: name.into(),
            value: value.to_string(),
        }
    }
}

/// Sorts `details` by name and drops duplicate names, keeping the first
/// occurrence. A duplicate is a data-integrity warning, never fatal.
pub fn clean_up_details(mut details: Vec<AssetProperty>, asset_path: &str) -> Vec<AssetProperty> {
    // Stable sort, so "first occurrence" survives the reordering.
    details.sort_by(|a, b| a.name.cmp(&b.name));
    details.dedup_by(|later, kept| {
        if later.name == kept.name {
            log::warn!(
                "Dropping duplicate property '{}' on {}: keeping '{}', discarding '{}'",
                later.name,
                asset_path,
                kept.value,
                later.value
            );
            true
        } else {
            false
        }
    });
    details
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleanup_sorts_by_name() {
        let details = vec![
            AssetProperty::new("Width", 64),
            AssetProperty::new("Format", "RGBA32"),
        ];
        let cleaned = clean_up_details(details, "a.png");
        assert_eq!(cleaned[0].name, "Format");
        assert_eq!(cleaned[1].name, "Width");
    }

    #[test]
    fn cleanup_keeps_first_duplicate() {
        let details = vec![
            AssetProperty::new("Format", "RGBA32"),
            AssetProperty::new("Width", 64),
            AssetProperty::new("Format", "ETC2"),
        ];
        let cleaned = clean_up_details(details, "a.png");
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned[0].name, "Format");
        assert_eq!(cleaned[0].value, "RGBA32");
    }
}
