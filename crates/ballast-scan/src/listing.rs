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

//! Archive-listing invocation and its tabular output parser.
//!
//! The listing tool prints one banner line (newer versions add a second
//! header line starting with `Zip file size:`), one whitespace-separated
//! data row per archive entry, and a trailing summary line. Sizes sit at
//! fixed token positions; the path is the tenth token, or tokens ten
//! onward rejoined when the path itself contains spaces.

use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

use ballast_core::SizePair;
use regex::Regex;

use crate::error::ScanError;

/// One file entry of an archive listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Path of the file inside the archive.
    pub path: String,
    /// Compressed and uncompressed sizes as reported by the tool.
    pub size: SizePair,
}

/// Captured output of one archive-listing invocation.
#[derive(Debug)]
pub struct ArchiveListing {
    stdout: String,
}

/// Runs `<tool> -l <archive>` and captures its listing.
///
/// A non-zero exit status is fatal: it means the external toolchain
/// changed behavior, and the error carries the exit code and everything
/// the tool printed.
pub fn list_archive(tool: &Path, archive: &Path) -> Result<ArchiveListing, ScanError> {
    let output = Command::new(tool)
        .arg("-l")
        .arg(archive)
        .output()
        .map_err(|source| ScanError::ToolSpawn {
            tool: tool.to_path_buf(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if !output.status.success() {
        return Err(ScanError::ListingTool {
            path: archive.to_path_buf(),
            code: output.status.code().unwrap_or(-1),
            stdout,
        });
    }

    Ok(ArchiveListing { stdout })
}

impl ArchiveListing {
    /// Wraps already-captured listing text; used by tests and by callers
    /// that obtained the output some other way.
    pub fn from_stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
        }
    }

    /// Starts the single pass over the data rows.
    ///
    /// Fails immediately when the output is too short to contain even a
    /// footer.
    pub fn entries(&self) -> Result<Entries<'_>, ScanError> {
        Entries::new(&self.stdout)
    }
}

/// Single-pass iterator over listing data rows.
///
/// Holds a one-row lookahead: a row is only yielded once the line after
/// it exists, so the final line is validated as the summary footer
/// instead of being parsed as data. Any malformed row or footer ends the
/// iteration with the fatal error.
pub struct Entries<'a> {
    lines: std::str::Lines<'a>,
    current: Option<&'a str>,
    done: bool,
}

impl<'a> Entries<'a> {
    fn new(stdout: &'a str) -> Result<Self, ScanError> {
        let mut lines = stdout.lines();

        // First line is a banner. Since tool version 2.41 a second
        // header line is printed by default; skip it when present.
        let mut line = lines.next();
        if line.is_some() {
            line = lines.next();
        }
        if let Some(text) = line {
            if starts_with_ignore_case(text, "Zip file size:") {
                line = lines.next();
            }
        }

        match line {
            Some(current) => Ok(Self {
                lines,
                current: Some(current),
                done: false,
            }),
            None => Err(ScanError::ListingTruncated {
                stdout: stdout.to_owned(),
            }),
        }
    }
}

impl<'a> Iterator for Entries<'a> {
    type Item = Result<ListingEntry, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.current?;

        match self.lines.next() {
            Some(next_line) => {
                self.current = Some(next_line);
                let row = parse_row(current);
                if row.is_err() {
                    self.done = true;
                }
                Some(row)
            }
            None => {
                // No line after this one: `current` must be the footer.
                self.done = true;
                self.current = None;
                if footer_pattern().is_match(current) {
                    None
                } else {
                    Some(Err(ScanError::ListingFooter {
                        line: current.to_owned(),
                    }))
                }
            }
        }
    }
}

/// Parses one data row at the tool's fixed token positions.
fn parse_row(line: &str) -> Result<ListingEntry, ScanError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    let parsed = (|| {
        if tokens.len() < 10 {
            return None;
        }
        let uncompressed: u64 = tokens[3].parse().ok()?;
        let compressed: u64 = tokens[5].parse().ok()?;
        let path = if tokens.len() == 10 {
            tokens[9].to_owned()
        } else {
            // Paths may contain spaces; everything from the path column
            // onward belongs together.
            tokens[9..].join(" ")
        };
        Some(ListingEntry {
            path,
            size: SizePair::new(compressed, uncompressed),
        })
    })();

    parsed.ok_or_else(|| ScanError::ListingLine {
        line: line.to_owned(),
    })
}

fn footer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\d+) files, (\d+) bytes uncompressed, (\d+) bytes compressed")
            .expect("footer pattern")
    })
}

fn starts_with_ignore_case(line: &str, prefix: &str) -> bool {
    line.len() >= prefix.len() && line.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}
