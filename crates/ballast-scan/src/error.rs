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

//! Scan failure taxonomy.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal scan failures.
///
/// Everything recoverable — missing folders, unreadable files, failed
/// probes — degrades to a zero contribution and a warning. These
/// variants are the cases where the external toolchain changed behavior
/// and the measurement cannot be trusted.
#[derive(Debug, Error)]
pub enum ScanError {
    /// An external tool could not be started at all.
    #[error("failed to run '{}'", .tool.display())]
    ToolSpawn {
        /// The tool that failed to spawn.
        tool: PathBuf,
        /// The underlying launch error.
        source: io::Error,
    },

    /// The archive-listing tool exited with a failure status.
    #[error("archive listing of '{}' failed with status {}, output:\n{}", .path.display(), .code, .stdout)]
    ListingTool {
        /// The archive being listed.
        path: PathBuf,
        /// Tool exit code (-1 when killed by a signal).
        code: i32,
        /// Everything the tool printed before failing.
        stdout: String,
    },

    /// The listing ended before any data row or footer could be read.
    #[error("unexpected archive listing output:\n{stdout}")]
    ListingTruncated {
        /// The whole captured listing.
        stdout: String,
    },

    /// A listing data row did not parse at the fixed token positions.
    #[error("error parsing listing line: {line}")]
    ListingLine {
        /// The offending row.
        line: String,
    },

    /// The listing's trailing summary line did not match.
    #[error("unexpected listing footer: {line}")]
    ListingFooter {
        /// The line found where the summary was expected.
        line: String,
    },

    /// The native build report was missing or unreadable.
    #[error("unable to read native build report at '{}'", .path.display())]
    MissingReport {
        /// Where the report was expected.
        path: PathBuf,
        /// The underlying read error.
        source: io::Error,
    },

    /// The native build report did not deserialize.
    #[error("malformed native build report at '{}'", .path.display())]
    MalformedReport {
        /// The report that failed to parse.
        path: PathBuf,
        /// The underlying parse error.
        source: serde_json::Error,
    },
}
