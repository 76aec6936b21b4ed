//! Generation entry points: build a context, run the pass order, extract the result.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use xxhash_rust::xxh3::xxh3_64;

use crate::catalog::Catalog;
use crate::config::RandomGenerationConfig;
use crate::context::{GeneratedBuildingPlacement, GenerationContext, ReservedDistrict};
use crate::diagnostics::GenerationDiagnostics;
use crate::grid::TileGrid;
use crate::passes::{PassId, resolve_pass_order};
use crate::tiles::TileId;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RandomGenerationResult {
    pub grid: TileGrid,
    pub width: usize,
    pub height: usize,
    pub display_name: String,
    pub archetype_id: String,
    pub seed: String,
    pub building_placements: Vec<GeneratedBuildingPlacement>,
    pub reserved_districts: Vec<ReservedDistrict>,
    pub diagnostics: GenerationDiagnostics,
}

impl RandomGenerationResult {
    /// Grid and placements only; timings and messages never feed the fingerprint.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 + self.grid.tiles().len() * 4);
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        for &tile in self.grid.tiles() {
            bytes.extend(tile.to_le_bytes());
        }
        bytes.extend((self.building_placements.len() as u32).to_le_bytes());
        for placement in &self.building_placements {
            bytes.push(placement.building_id as u8);
            bytes.push(placement.rotation.quarter_turns());
            bytes.extend(placement.anchor.x.to_le_bytes());
            bytes.extend(placement.anchor.y.to_le_bytes());
        }
        bytes
    }

    pub fn grid_hash(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    pub fn path_tile_count(&self, path_tile: TileId) -> usize {
        self.grid.count_where(|tile| tile == path_tile)
    }
}

/// Generates with the builtin catalog.
pub fn generate_random_map(config: &RandomGenerationConfig) -> RandomGenerationResult {
    generate_random_map_with(config, Catalog::builtin())
}

pub fn generate_random_map_with(config: &RandomGenerationConfig, catalog: &Catalog) -> RandomGenerationResult {
    let mut context = GenerationContext::new(config, catalog);

    let disabled = context.config.hard_constraint_policy.disabled();
    if !disabled.is_empty() {
        let names: Vec<_> = disabled.iter().map(|id| id.as_str()).collect();
        context
            .diagnostics
            .warn(format!("Hard constraints disabled by config: {}", names.join(", ")));
    }

    let content = if context.config.pipeline.pass_order_override.is_empty() {
        context.archetype.pass_order.clone()
    } else {
        context.config.pipeline.pass_order_override.clone()
    };
    for pass in resolve_pass_order(&content) {
        run_pass(&mut context, pass);
    }

    info!(
        seed = %context.config.seed,
        archetype = %context.archetype.id,
        dimensions = %context.config.dimensions,
        warnings = context.diagnostics.warnings.len(),
        issues = context.diagnostics.hard_constraint_issues.len(),
        "generated map"
    );

    RandomGenerationResult {
        width: context.grid.width(),
        height: context.grid.height(),
        display_name: format!("Generated {}", context.archetype.label),
        archetype_id: context.archetype.id.clone(),
        seed: context.config.seed,
        grid: context.grid,
        building_placements: context.building_placements,
        reserved_districts: context.state.reserved_districts,
        diagnostics: context.diagnostics,
    }
}

fn run_pass(context: &mut GenerationContext<'_>, pass: PassId) {
    let started = Instant::now();
    pass.runner()(context);
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    debug!(pass = pass.as_str(), elapsed_ms, "pass finished");
    context.diagnostics.pass_durations_ms.insert(pass, elapsed_ms);
}
