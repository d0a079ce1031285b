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

//! Platform-specific build scanners.
//!
//! One handler per [`PlatformLayout`] variant. Each handler is a pure
//! function from an immutable [`ScanRequest`] to a fresh
//! [`BuildArtifactsInfo`]; nothing is cached between scans.

mod blob;
mod directory;
mod package;

use ballast_core::{BuildArtifactsInfo, PlatformLayout, ScanRequest};

use crate::error::ScanError;
use crate::settings::ScanSettings;

/// Measures one finished build.
pub fn scan_build(
    request: &ScanRequest,
    settings: &ScanSettings,
) -> Result<BuildArtifactsInfo, ScanError> {
    match &request.platform {
        PlatformLayout::DesktopDirectory {
            data_dir_override,
            runtime_in_root,
        } => directory::scan_desktop(
            &request.build_path,
            data_dir_override.as_deref(),
            *runtime_in_root,
        ),
        PlatformLayout::AppBundle => directory::scan_app_bundle(&request.build_path),
        PlatformLayout::DataDirectory => directory::scan_data_folder(&request.build_path),
        PlatformLayout::ArchivePackage { with_expansion } => {
            package::scan_package(&request.build_path, *with_expansion, settings)
        }
        PlatformLayout::CompressedBlob { report_path } => {
            blob::scan_blob(&request.build_path, report_path.as_deref(), settings)
        }
    }
}
