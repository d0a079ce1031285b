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

//! Final report assembly.
//!
//! One fixed pipeline order, so identical inputs always produce the
//! identical report: resolve dependencies, collect missing details,
//! attach scenes, merge modules, sort globally, merge resources, apply
//! calculated compressed sizes, count script references, clean up.

use std::collections::BTreeMap;

use ballast_core::asset::list::sort_assets_by_path;
use ballast_core::query::{ContentQuery, DetailsCollector, DetailsTarget};
use ballast_core::{AssetInfo, BuildArtifactsInfo, SizePair};
use serde::Serialize;

use crate::error::AuditError;
use crate::merger::{
    apply_calculated_compressed_sizes, attach_scene_entries, count_script_references,
    merge_module_sizes, merge_resource_artifacts, SceneManifest,
};
use crate::resolver::{discover_dependencies, ResolverOptions};

/// The complete, queryable result of one audit.
///
/// Consumed by an external rendering or persistence layer; nothing here
/// knows how the report is displayed.
#[derive(Debug, Serialize)]
pub struct AuditReport {
    /// Every asset entry, sorted by path.
    pub assets: Vec<AssetInfo>,
    /// Scene paths in build order.
    pub scenes: Vec<String>,
    /// Measured per-scene sizes, indexed by build order.
    pub scene_sizes: Vec<SizePair>,
    /// Measured module sizes by file name.
    pub modules: BTreeMap<String, SizePair>,
    /// Gross build size.
    pub total_size: SizePair,
    /// Bytes attributable to the engine runtime.
    pub runtime_size: SizePair,
    /// Bytes under the streaming-assets folder.
    pub streaming_assets_size: u64,
}

/// Runs the full attribution pipeline over one build measurement.
///
/// `inventory` is the authored-asset list — paths, logical sizes and any
/// scene reachability already known. `artifacts` is consumed here; every
/// reconciliation step reads it exactly once.
pub fn audit_build(
    mut inventory: Vec<AssetInfo>,
    scenes: SceneManifest,
    artifacts: BuildArtifactsInfo,
    query: &dyn ContentQuery,
    options: ResolverOptions,
    collector: Option<&dyn DetailsCollector>,
) -> Result<AuditReport, AuditError> {
    discover_dependencies(&mut inventory, query, options, collector);

    if let Some(collector) = collector {
        collect_missing_details(&mut inventory, collector);
    }

    attach_scene_entries(&mut inventory, &scenes, &artifacts);
    merge_module_sizes(&mut inventory, &artifacts);

    // Everything below finds entries by binary search.
    sort_assets_by_path(&mut inventory);

    merge_resource_artifacts(&mut inventory, &artifacts, query);
    if let Some(collector) = collector {
        apply_calculated_compressed_sizes(&mut inventory, collector);
    }
    count_script_references(&mut inventory, query)?;

    for asset in &mut inventory {
        asset.clean_up();
    }

    Ok(AuditReport {
        assets: inventory,
        scenes: scenes.paths,
        scene_sizes: artifacts.scene_sizes,
        modules: artifacts.managed_modules,
        total_size: artifacts.total_size,
        runtime_size: artifacts.runtime_size,
        streaming_assets_size: artifacts.streaming_assets_size,
    })
}

/// Collects extension properties for entries that have none yet.
fn collect_missing_details(assets: &mut [AssetInfo], collector: &dyn DetailsCollector) {
    for asset in assets.iter_mut() {
        if !asset.details.is_empty() {
            continue;
        }
        log::debug!("Collecting details for asset: {}", asset.path);
        let mut details = Vec::new();
        if collector.collect(DetailsTarget::Asset { path: &asset.path }, &mut details) {
            asset.details = details;
        }
    }
}
