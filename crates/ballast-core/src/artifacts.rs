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

//! Raw size measurements extracted from one platform build.

use std::collections::BTreeMap;

use crate::size::SizePair;

/// Engine built-in resource files that may appear in a build's data
/// directory. The first name has historically moved between the root and
/// a `Library/` prefix; the attribution merger retries the relocated
/// path on a miss.
pub const ENGINE_RESOURCE_NAMES: [&str; 3] = [
    "unity default resources",
    "Resources/unity default resources",
    "Resources/unity_builtin_extra",
];

/// Raw measurements from a single platform scan.
///
/// Never addressed by asset path: scenes are indexed by load order,
/// modules and resources by file name, anonymous assets by content hash.
/// Produced once per scan, consumed exactly once by the attribution
/// merger. Ordered maps keep iteration — and therefore the merged
/// report — deterministic for identical inputs.
#[derive(Debug, Default, Clone)]
pub struct BuildArtifactsInfo {
    /// Per-scene sizes indexed by scene load order.
    pub scene_sizes: Vec<SizePair>,

    /// Managed module sizes keyed by module file name.
    pub managed_modules: BTreeMap<String, SizePair>,

    /// Gross size of the build output.
    pub total_size: SizePair,

    /// Bytes attributable to the engine runtime rather than content.
    pub runtime_size: SizePair,

    /// Bytes under the streaming-assets folder.
    pub streaming_assets_size: u64,

    /// Engine built-in resources keyed by resource file name.
    pub engine_resources: BTreeMap<String, SizePair>,

    /// Assets identified only by a 32-hex content hash.
    pub other_assets: BTreeMap<String, SizePair>,
}

/// Whether `name` is a content-hash asset name: exactly 32 hexadecimal
/// characters, either case.
pub fn is_content_hash_name(name: &str) -> bool {
    name.len() == 32 && name.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_hash_names_are_exactly_32_hex_chars() {
        assert!(is_content_hash_name("0123456789abcdef0123456789abcdef"));
        assert!(is_content_hash_name("0123456789ABCDEF0123456789ABCDEF"));

        // Wrong length.
        assert!(!is_content_hash_name("0123456789abcdef0123456789abcde"));
        assert!(!is_content_hash_name("0123456789abcdef0123456789abcdef0"));
        assert!(!is_content_hash_name(""));

        // Non-hex content.
        assert!(!is_content_hash_name("0123456789abcdef0123456789abcdeg"));
        assert!(!is_content_hash_name("0123456789abcdef_123456789abcdef"));
    }
}
