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

//! Best-effort probe recovering a compressed blob's uncompressed size.

use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

use regex::Regex;

/// Runs `<tool> t <blob>` and scrapes the reported uncompressed size
/// from the first stdout line matching `Size: <bytes>`.
///
/// `None` means the blob could not be probed — the tool failed to start,
/// exited non-zero, or never reported a size. Callers treat that as "no
/// adjustment", never as an error.
pub fn probe_uncompressed_size(tool: &Path, blob: &Path) -> Option<u64> {
    let output = match Command::new(tool).arg("t").arg(blob).output() {
        Ok(output) => output,
        Err(err) => {
            log::debug!("Unable to run {}: {}", tool.display(), err);
            return None;
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !output.status.success() {
        log::debug!(
            "Probe of {} failed with status {:?}, output:\n{}",
            blob.display(),
            output.status.code(),
            stdout
        );
        return None;
    }

    parse_probe_output(&stdout)
}

fn parse_probe_output(stdout: &str) -> Option<u64> {
    for line in stdout.lines() {
        if let Some(captures) = size_pattern().captures(line) {
            if let Ok(size) = captures[1].parse() {
                return Some(size);
            }
        }
    }
    None
}

fn size_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^Size:\s*(\d+)$").expect("size pattern"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_size_line_wins() {
        let stdout = "Processing archive: x.datagz\n\
                      \n\
                      Size: 123456\n\
                      Size: 999\n\
                      Everything is Ok\n";
        assert_eq!(parse_probe_output(stdout), Some(123456));
    }

    #[test]
    fn no_size_line_means_unknown() {
        assert_eq!(parse_probe_output("Everything is Ok\n"), None);
        assert_eq!(parse_probe_output("Size: not-a-number\n"), None);
        assert_eq!(parse_probe_output(""), None);
    }

    #[test]
    fn size_must_fill_the_whole_line() {
        assert_eq!(parse_probe_output("Packed Size: 55\n"), None);
        assert_eq!(parse_probe_output("Size: 55 bytes\n"), None);
        assert_eq!(parse_probe_output("Size:55\n"), Some(55));
    }
}
