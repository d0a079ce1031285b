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

//! Filesystem size measurement that degrades instead of failing.

use std::path::Path;

use walkdir::WalkDir;

/// Recursively sums the sizes of all files under `dir`.
///
/// A missing directory yields 0 — several layouts simply do not have the
/// folder being measured. Unreadable entries are logged and contribute 0,
/// so a single bad file cannot sink an entire audit.
pub fn directory_size(dir: &Path) -> u64 {
    if !dir.is_dir() {
        return 0;
    }

    let mut total = 0u64;
    for entry in WalkDir::new(dir) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("Skipping unreadable entry under {}: {}", dir.display(), err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        match entry.metadata() {
            Ok(metadata) => total += metadata.len(),
            Err(err) => log::warn!("Unable to size {}: {}", entry.path().display(), err),
        }
    }
    total
}

/// Size of a single file, warning and yielding 0 when it is missing or
/// unreadable.
pub fn file_size(path: &Path) -> u64 {
    file_size_impl(path, true)
}

/// Like [`file_size`], but silent: some runtime files are optional and
/// their absence is expected.
pub fn file_size_quiet(path: &Path) -> u64 {
    file_size_impl(path, false)
}

fn file_size_impl(path: &Path, log_error: bool) -> u64 {
    match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => metadata.len(),
        Ok(_) => {
            if log_error {
                log::warn!("{} is not a file", path.display());
            }
            0
        }
        Err(err) => {
            if log_error {
                log::warn!("Unable to size {}: {}", path.display(), err);
            }
            0
        }
    }
}
