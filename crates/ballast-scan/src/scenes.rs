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

//! Scene/level size aggregation over numbered data files.

use ballast_core::SizePair;

/// Sums each level's base file and its numbered split continuations.
///
/// Levels are indexed contiguously from 0 and the scan stops at the
/// first index with neither a base nor any split present. A level's
/// total is `level<i>` plus `level<i>.split0`, `.split1`, … up to the
/// first missing split. Index 0 may instead be named `mainData`, the
/// single-blob convention of older runtimes, which shifts subsequent
/// indices by one.
///
/// `lookup` answers "what size does this data file have, if present" —
/// a filesystem stat for directory builds, a map lookup for archive
/// builds.
pub fn scene_sizes_from(mut lookup: impl FnMut(&str) -> Option<SizePair>) -> Vec<SizePair> {
    let mut result = Vec::new();

    let mut level_index: i64 = 0;
    let mut first = true;
    loop {
        let mut level_path = format!("level{level_index}");
        if first {
            first = false;
            if lookup("mainData").is_some() {
                level_path = "mainData".to_owned();
                level_index -= 1;
            }
        }

        let mut total = SizePair::default();
        let mut has_entry = false;

        if let Some(size) = lookup(&level_path) {
            total += size;
            has_entry = true;
        }

        for split_index in 0.. {
            match lookup(&format!("{level_path}.split{split_index}")) {
                Some(size) => {
                    total += size;
                    has_entry = true;
                }
                None => break,
            }
        }

        if !has_entry {
            break;
        }
        result.push(total);
        level_index += 1;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sizes(files: &[(&str, u64)]) -> Vec<SizePair> {
        let map: HashMap<&str, u64> = files.iter().copied().collect();
        scene_sizes_from(|name| map.get(name).copied().map(SizePair::from))
    }

    #[test]
    fn sums_base_and_splits_until_the_first_gap() {
        let result = sizes(&[
            ("level0", 7),
            ("level1", 3),
            ("level2", 40),
            ("level2.split0", 10),
            ("level2.split1", 5),
            // no level2.split2, no level3
            ("level4", 99),
        ]);
        assert_eq!(result.len(), 3);
        assert_eq!(result[2].uncompressed, 55);
    }

    #[test]
    fn splits_count_without_a_base_file() {
        let result = sizes(&[("level0.split0", 4), ("level0.split1", 6)]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].uncompressed, 10);
    }

    #[test]
    fn legacy_main_data_shifts_indices() {
        let result = sizes(&[("mainData", 11), ("level0", 20), ("level1", 30)]);
        assert_eq!(
            result.iter().map(|s| s.uncompressed).collect::<Vec<_>>(),
            [11, 20, 30]
        );
    }

    #[test]
    fn aggregation_is_idempotent() {
        let files = [("level0", 5), ("level0.split0", 2), ("level1", 9)];
        assert_eq!(sizes(&files), sizes(&files));
    }

    #[test]
    fn empty_measurement_yields_no_scenes() {
        assert!(sizes(&[]).is_empty());
    }
}
