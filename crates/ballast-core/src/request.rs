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

//! Scan requests: what to measure and how the build is laid out.

use std::path::PathBuf;

/// How a finished build is laid out on disk, one variant per platform
/// family.
///
/// Scanning dispatches over this closed set; supporting a new platform
/// means adding a variant and its handler, nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformLayout {
    /// Loose data directory beside the executable (desktop builds).
    DesktopDirectory {
        /// Overrides the `<executable name>_Data` convention when set.
        data_dir_override: Option<PathBuf>,
        /// Newer runtimes ship loader binaries and the scripting runtime
        /// beside the executable instead of inside the data directory.
        runtime_in_root: bool,
    },

    /// Zip-like package, optionally with an expansion file beside it
    /// (device builds).
    ArchivePackage {
        /// Also measure the `.main.obb` expansion file next to the
        /// package.
        with_expansion: bool,
    },

    /// Compressed-blob deployment measured through a native build report
    /// (web builds).
    CompressedBlob {
        /// Overrides the default `<build>/BuildReport.json` location.
        report_path: Option<PathBuf>,
    },

    /// App bundle with data under `Contents/Resources/Data`.
    AppBundle,

    /// Exported project embedding a `Data` directory with a `Raw`
    /// streaming folder (device projects built through a host IDE).
    DataDirectory,
}

/// An immutable description of one build to audit.
///
/// Scanners take the request by reference and never mutate shared state;
/// re-running a scan with an identical request yields an identical
/// measurement.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    /// Path to the build output: the executable, the package file, or
    /// the output directory, depending on the layout.
    pub build_path: PathBuf,

    /// The build's on-disk layout.
    pub platform: PlatformLayout,
}
