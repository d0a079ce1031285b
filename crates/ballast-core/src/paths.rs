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

//! Helpers over textual asset paths.
//!
//! Asset paths and archive entry paths are plain strings with `/` (and
//! occasionally `\`) separators; they never touch the host filesystem, so
//! `std::path` is the wrong tool for them.

/// Case-insensitive suffix test. Operates on bytes, so it is safe for
/// arbitrary UTF-8 input.
pub fn ends_with_ignore_case(path: &str, suffix: &str) -> bool {
    let (path, suffix) = (path.as_bytes(), suffix.as_bytes());
    path.len() >= suffix.len()
        && path[path.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

/// File-name component: everything after the last path separator.
pub fn file_name_of(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// File-name component with its last extension removed.
pub fn file_stem_of(path: &str) -> &str {
    let name = file_name_of(path);
    match name.rfind('.') {
        Some(dot) => &name[..dot],
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_test_ignores_case() {
        assert!(ends_with_ignore_case("Managed/Game.DLL", ".dll"));
        assert!(ends_with_ignore_case("a.prefab", ".PREFAB"));
        assert!(!ends_with_ignore_case("a.prefab2", ".prefab"));
        assert!(!ends_with_ignore_case("ll", ".dll"));
    }

    #[test]
    fn name_and_stem_extraction() {
        assert_eq!(file_name_of("assets/bin/Data/Managed/Game.dll"), "Game.dll");
        assert_eq!(file_name_of("Game.dll"), "Game.dll");
        assert_eq!(file_name_of("a\\b\\c.txt"), "c.txt");

        assert_eq!(file_stem_of("dir/8a7b2c.assets"), "8a7b2c");
        assert_eq!(file_stem_of("noext"), "noext");
        assert_eq!(file_stem_of("dir/archive.tar.gz"), "archive.tar");
    }
}
