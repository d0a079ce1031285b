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

//! # Ballast Scan
//!
//! Platform artifact scanners: extract raw size facts from finished
//! build outputs — plain directories, archive packages, compressed-blob
//! deployments — using the filesystem and one-shot external tool
//! invocations.
//!
//! The whole crate is a synchronous batch process. The only suspension
//! points are blocking filesystem reads and waiting for an external
//! listing/probe process to exit; there is no cancellation and no retry.

pub mod error;
pub mod fs_size;
pub mod listing;
pub mod platform;
pub mod probe;
pub mod scenes;
pub mod settings;

pub use error::ScanError;
pub use platform::scan_build;
pub use settings::ScanSettings;
