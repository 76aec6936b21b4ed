//! The mutable working state threaded through every pass of one generation run.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::buildings::{BuildingId, Rotation, StampCell};
use crate::catalog::{Archetype, Catalog, TemplateHints};
use crate::config::{RandomGenerationConfig, SoftGoalWeights};
use crate::diagnostics::GenerationDiagnostics;
use crate::grid::{Cell, TileGrid};
use crate::rng::SeededRng;
use crate::tiles::TileId;

pub const TOWN_DISTRICT_ID: &str = "town";
pub const ROUTE_EAST_DISTRICT_ID: &str = "route_east";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedDistrict {
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl ReservedDistrict {
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= self.x
            && cell.y >= self.y
            && cell.x < self.x + self.width
            && cell.y < self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedBuildingPlacement {
    pub building_id: BuildingId,
    pub rotation: Rotation,
    pub anchor: Cell,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerationState {
    pub primary_path_cells: Vec<Cell>,
    pub reserved_districts: Vec<ReservedDistrict>,
    pub encounter_anchor_cells: Vec<Cell>,
    pub active_template_id: Option<String>,
    pub template_hints: Option<TemplateHints>,
}

pub struct GenerationContext<'c> {
    pub config: RandomGenerationConfig,
    pub catalog: &'c Catalog,
    pub archetype: &'c Archetype,
    /// Archetype weights with the config overrides applied.
    pub soft_goal_weights: SoftGoalWeights,
    pub rng: SeededRng,
    pub grid: TileGrid,
    pub building_placements: Vec<GeneratedBuildingPlacement>,
    pub state: GenerationState,
    pub diagnostics: GenerationDiagnostics,
}

impl<'c> GenerationContext<'c> {
    /// Resolves the archetype and clamps dimensions; the config stored on the context
    /// is the normalised one the result reports.
    pub fn new(config: &RandomGenerationConfig, catalog: &'c Catalog) -> Self {
        let mut diagnostics = GenerationDiagnostics::default();
        let archetype = catalog.archetype_or_default(&config.archetype_id);

        let mut config = config.clone();
        if archetype.id != config.archetype_id {
            warn!(requested = %config.archetype_id, fallback = %archetype.id, "unknown archetype");
            diagnostics.warn(format!(
                "Unknown archetype '{}'; using {}.",
                config.archetype_id, archetype.id
            ));
            config.archetype_id = archetype.id.clone();
        }
        config.dimensions = config.dimensions.clamped();

        let soft_goal_weights =
            archetype.soft_goal_weights.with_overrides(&config.soft_goal_weights_override);
        let grid = TileGrid::filled(
            config.dimensions.width,
            config.dimensions.height,
            config.base_fill_tile_id,
        );

        Self {
            rng: SeededRng::new(&config.seed),
            config,
            catalog,
            archetype,
            soft_goal_weights,
            grid,
            building_placements: Vec::new(),
            state: GenerationState::default(),
            diagnostics,
        }
    }

    pub fn width(&self) -> i32 {
        self.config.dimensions.width as i32
    }

    pub fn height(&self) -> i32 {
        self.config.dimensions.height as i32
    }

    pub fn area(&self) -> usize {
        self.config.dimensions.area()
    }

    pub fn base_terrain(&self) -> TileId {
        self.archetype.tile_roles.base_terrain
    }

    pub fn path_tile(&self) -> TileId {
        self.archetype.tile_roles.primary_path
    }

    pub fn encounter_options(&self) -> &'c [TileId] {
        self.archetype.tile_roles.encounter_options()
    }

    pub fn town_district(&self) -> Option<&ReservedDistrict> {
        self.state.reserved_districts.iter().find(|district| district.id == TOWN_DISTRICT_ID)
    }

    pub fn footprint_cells(&self, placement: &GeneratedBuildingPlacement) -> Vec<StampCell> {
        self.catalog
            .buildings
            .footprint(placement.building_id, placement.rotation)
            .stamp_cells(placement.anchor, self.grid.width(), self.grid.height())
    }

    /// In-bounds cells covered by any building placement.
    pub fn occupied_building_cells(&self) -> BTreeSet<Cell> {
        self.building_placements
            .iter()
            .flat_map(|placement| self.footprint_cells(placement))
            .filter(|stamp| stamp.in_bounds)
            .map(|stamp| stamp.cell)
            .collect()
    }

    /// Re-reads the primary path from the grid, row-major.
    pub fn refresh_primary_path(&mut self) {
        self.state.primary_path_cells = self.grid.cells_with(self.path_tile());
    }

    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.grid.get(cell).is_some_and(|tile| self.catalog.tiles.is_walkable(tile))
    }
}
