//! Density balancing.
//!
//! Clears clutter around town roads, then trims or tops up trainers (relative to the
//! recorded path length) and encounter tiles (relative to map area) until both sit
//! inside the archetype's density targets. Excess is removed closest-to-the-road
//! first; shortfalls are filled on open terrain near the path. Repair can carve or
//! stamp over balanced cells, so [`restore_densities`] reruns both clamps afterwards
//! against the settled path.

use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::iter;

use tracing::debug;

use crate::catalog::DensityTargets;
use crate::context::GenerationContext;
use crate::grid::Cell;
use crate::math::clamp_i32;
use crate::rng::SeededRng;
use crate::tiles::{TILE_FLOWER, TILE_TREE, TOWN_PATH_CLUTTER_TILE_IDS, TRAINER_TILE_IDS, TileId, is_trainer};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Tuning {
    removed: usize,
    added: usize,
}

/// Inclusive count range a tile family should land in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DensityRange {
    pub min: usize,
    pub max: usize,
}

impl DensityRange {
    pub fn contains(self, count: usize) -> bool {
        (self.min..=self.max).contains(&count)
    }
}

/// Trainer count range for a map whose primary path has `path_cells` cells.
pub fn trainer_range(path_cells: usize, density: &DensityTargets) -> DensityRange {
    let path_cells = path_cells.max(1) as f64;
    let min = ((path_cells * density.trainer_min_ratio).floor() as usize).max(1);
    let max = ((path_cells * density.trainer_max_ratio).ceil() as usize).max(min);
    DensityRange { min, max }
}

/// Encounter tile count range for a map of `area` cells.
pub fn encounter_range(area: usize, density: &DensityTargets) -> DensityRange {
    let area = area as f64;
    let min = clamp_i32(
        (area * density.encounter_min_ratio).floor() as i32,
        density.min_encounter_cells as i32,
        (area * density.encounter_cap_ratio).floor() as i32,
    )
    .max(0) as usize;
    let max = ((area * density.encounter_max_ratio).floor() as usize).max(min);
    DensityRange { min, max }
}

/// Shared view of the map the tuning steps rank and filter against.
struct BalanceView {
    path: Vec<Cell>,
    path_set: BTreeSet<Cell>,
    town_buffer: BTreeSet<Cell>,
    buildings: BTreeSet<Cell>,
}

impl BalanceView {
    fn new(context: &GenerationContext<'_>) -> Self {
        let path = context.state.primary_path_cells.clone();
        let mut town_buffer = BTreeSet::new();
        if let Some(town) = context.town_district() {
            for &cell in path.iter().filter(|&&cell| town.contains(cell)) {
                for next in iter::once(cell).chain(cell.orthogonal_neighbors()) {
                    if context.grid.in_bounds(next) {
                        town_buffer.insert(next);
                    }
                }
            }
        }

        Self {
            path_set: path.iter().copied().collect(),
            path,
            town_buffer,
            buildings: context.occupied_building_cells(),
        }
    }

    fn path_distance(&self, cell: Cell) -> u32 {
        self.path.iter().map(|&path_cell| path_cell.manhattan(cell)).min().unwrap_or(u32::MAX)
    }

    fn is_reserved(&self, cell: Cell) -> bool {
        self.path_set.contains(&cell) || self.town_buffer.contains(&cell) || self.buildings.contains(&cell)
    }

    /// Shuffles, then orders by town-buffer membership, path distance, row and column.
    fn rank_for_removal(&self, rng: &mut SeededRng, mut cells: Vec<Cell>) -> Vec<Cell> {
        rng.shuffle(&mut cells);
        cells.sort_by_key(|&cell| {
            (Reverse(self.town_buffer.contains(&cell)), self.path_distance(cell), cell.y, cell.x)
        });
        cells
    }
}

fn clear_town_path_clutter(context: &mut GenerationContext<'_>, view: &BalanceView) -> usize {
    let base = context.base_terrain();
    let mut cleared = 0;
    for &cell in &view.town_buffer {
        if view.buildings.contains(&cell) {
            continue;
        }
        if context.grid.get(cell).is_some_and(|tile| TOWN_PATH_CLUTTER_TILE_IDS.contains(&tile)) {
            context.grid.set(cell, base);
            cleared += 1;
        }
    }
    cleared
}

fn remove_excess(
    context: &mut GenerationContext<'_>,
    view: &BalanceView,
    rng: &mut SeededRng,
    cells: Vec<Cell>,
    max: usize,
) -> usize {
    let Some(excess) = cells.len().checked_sub(max).filter(|&excess| excess > 0) else {
        return 0;
    };
    let base = context.base_terrain();
    let ranked = view.rank_for_removal(rng, cells);
    for &cell in ranked.iter().take(excess) {
        context.grid.set(cell, base);
    }
    excess.min(ranked.len())
}

fn open_cells(
    context: &GenerationContext<'_>,
    view: &BalanceView,
    allowed: &[TileId],
    keep: impl Fn(Cell) -> bool,
) -> Vec<Cell> {
    context
        .grid
        .cells()
        .filter(|&cell| !view.is_reserved(cell))
        .filter(|&cell| context.grid.get(cell).is_some_and(|tile| allowed.contains(&tile)))
        .filter(|&cell| keep(cell))
        .collect()
}

fn clamp_trainer_density(context: &mut GenerationContext<'_>, view: &BalanceView, stream: &str) -> Tuning {
    let range = trainer_range(view.path.len(), &context.archetype.density);
    let mut rng = context.rng.fork(&format!("{stream}:trainers"));
    let trainers: Vec<Cell> =
        context.grid.cells().filter(|&cell| context.grid.get(cell).is_some_and(is_trainer)).collect();
    let found = trainers.len();

    let removed = remove_excess(context, view, &mut rng, trainers, range.max);
    let mut added = 0;
    let remaining = found - removed;
    if remaining < range.min && !view.path.is_empty() {
        let needed = range.min - remaining;
        let base = context.base_terrain();
        let mut candidates = open_cells(context, view, &[base, TILE_FLOWER, TILE_TREE], |cell| {
            cell.orthogonal_neighbors().any(|next| view.path_set.contains(&next))
        });
        rng.shuffle(&mut candidates);
        for &cell in candidates.iter().take(needed) {
            let trainer = rng.pick(&TRAINER_TILE_IDS).unwrap_or(TRAINER_TILE_IDS[0]);
            context.grid.set(cell, trainer);
            added += 1;
        }
    }

    Tuning { removed, added }
}

fn clamp_encounter_density(context: &mut GenerationContext<'_>, view: &BalanceView, stream: &str) -> Tuning {
    let range = encounter_range(context.area(), &context.archetype.density);
    let options = context.encounter_options();
    let mut rng = context.rng.fork(&format!("{stream}:encounters"));
    let encounters: Vec<Cell> = context
        .grid
        .cells()
        .filter(|&cell| context.grid.get(cell).is_some_and(|tile| options.contains(&tile)))
        .collect();
    let found = encounters.len();

    let removed = remove_excess(context, view, &mut rng, encounters, range.max);
    let mut added = 0;
    let remaining = found - removed;
    let Some(&primary) = options.first() else {
        return Tuning { removed, added };
    };
    if remaining < range.min && !view.path.is_empty() {
        let needed = range.min - remaining;
        let base = context.base_terrain();

        let mut near = open_cells(context, view, &[base, TILE_FLOWER], |cell| {
            (2..=7).contains(&view.path_distance(cell))
        });
        rng.shuffle(&mut near);
        for &cell in near.iter().take(needed) {
            context.grid.set(cell, primary);
            added += 1;
        }

        if added < needed {
            let mut fallback = open_cells(context, view, &[base, TILE_FLOWER, TILE_TREE], |cell| {
                (1..=9).contains(&view.path_distance(cell))
            });
            rng.shuffle(&mut fallback);
            for &cell in fallback.iter().take(needed - added) {
                context.grid.set(cell, primary);
                added += 1;
            }
        }
    }

    Tuning { removed, added }
}

pub(crate) fn balance(context: &mut GenerationContext<'_>) {
    let view = BalanceView::new(context);
    let cleared = clear_town_path_clutter(context, &view);
    let trainers = clamp_trainer_density(context, &view, "balance");
    let encounters = clamp_encounter_density(context, &view, "balance");

    debug!(
        cleared,
        trainers_removed = trainers.removed,
        trainers_added = trainers.added,
        encounters_removed = encounters.removed,
        encounters_added = encounters.added,
        "balanced densities"
    );
    if cleared > 0 || trainers != Tuning::default() || encounters != Tuning::default() {
        context.diagnostics.warn(format!(
            "Balance pass adjusted clutter:{cleared} trainers:-{}/+{} encounters:-{}/+{}.",
            trainers.removed, trainers.added, encounters.removed, encounters.added
        ));
    }
}

/// Re-clamps trainer and encounter counts against every path tile on the settled grid.
/// Path and building cells are never touched.
pub(crate) fn restore_densities(context: &mut GenerationContext<'_>) {
    context.refresh_primary_path();
    let view = BalanceView::new(context);
    let trainers = clamp_trainer_density(context, &view, "balance:restore");
    let encounters = clamp_encounter_density(context, &view, "balance:restore");
    debug!(
        trainers_removed = trainers.removed,
        trainers_added = trainers.added,
        encounters_removed = encounters.removed,
        encounters_added = encounters.added,
        "restored densities after repair"
    );
}
