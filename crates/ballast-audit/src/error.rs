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

//! Attribution failure taxonomy.

use thiserror::Error;

/// Fatal attribution failures.
///
/// The merger otherwise degrades: unresolvable hashes are dropped,
/// drifting measurements are logged, scene-count mismatches warn.
#[derive(Debug, Error)]
pub enum AuditError {
    /// A tracked script has no entry in the final asset list; the
    /// inventory and the script service disagree about what exists.
    #[error("no asset entry for tracked script '{path}'")]
    ScriptNotTracked {
        /// Path of the script that could not be found.
        path: String,
    },
}
