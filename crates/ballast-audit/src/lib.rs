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

//! # Ballast Audit
//!
//! Dependency resolution and size attribution: turns a raw build
//! measurement and an authored-content inventory into the final,
//! globally sorted per-asset report.

pub mod error;
pub mod merger;
pub mod report;
pub mod resolver;

pub use error::AuditError;
pub use merger::SceneManifest;
pub use report::{audit_build, AuditReport};
pub use resolver::ResolverOptions;
