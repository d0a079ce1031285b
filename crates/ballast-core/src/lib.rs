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

//! # Ballast Core
//!
//! Foundational crate containing the types, contracts and lookup
//! primitives shared by the Ballast build-size auditor: byte-size pairs,
//! the per-asset report entry, raw build measurements, scan requests, and
//! the traits the engine-side content collaborators implement.

#![warn(missing_docs)]

pub mod artifacts;
pub mod asset;
pub mod paths;
pub mod query;
pub mod request;
pub mod size;

pub use artifacts::BuildArtifactsInfo;
pub use asset::{AssetInfo, AssetProperty};
pub use request::{PlatformLayout, ScanRequest};
pub use size::SizePair;
