//! Signs, NPCs, trainers and items dropped onto open cells beside the route.

use std::collections::{BTreeSet, VecDeque};

use crate::context::GenerationContext;
use crate::grid::{Cell, TileGrid};
use crate::tiles::{
    TILE_FLOWER, TILE_GRASS, TILE_HIDDEN_ITEM, TILE_ITEM, TILE_NPC, TILE_SIGN, TILE_TALL_GRASS,
    TRAINER_TILE_IDS, TileId,
};

const CANDIDATE_OFFSETS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Open grass-like cells touching the recorded path, first occurrence order.
fn roadside_candidates(context: &GenerationContext<'_>) -> Vec<Cell> {
    let occupied = context.occupied_building_cells();
    let path: BTreeSet<Cell> = context.state.primary_path_cells.iter().copied().collect();
    let mut seen = BTreeSet::new();
    let mut candidates = Vec::new();

    for &path_cell in &context.state.primary_path_cells {
        for (dx, dy) in CANDIDATE_OFFSETS {
            let cell = path_cell.offset(dx, dy);
            if path.contains(&cell) || occupied.contains(&cell) {
                continue;
            }
            let open = matches!(context.grid.get(cell), Some(TILE_GRASS | TILE_FLOWER | TILE_TALL_GRASS));
            if open && seen.insert(cell) {
                candidates.push(cell);
            }
        }
    }
    candidates
}

struct Dispenser {
    available: VecDeque<Cell>,
    path_tile: TileId,
}

impl Dispenser {
    /// Consumes up to `count` cells from the front; a cell that became path is skipped
    /// but still counts.
    fn place(&mut self, grid: &mut TileGrid, count: i32, mut resolve: impl FnMut(usize) -> TileId) {
        for index in 0..count.max(0) as usize {
            let Some(cell) = self.available.pop_front() else {
                return;
            };
            if grid.is(cell, self.path_tile) {
                continue;
            }
            grid.set(cell, resolve(index));
        }
    }
}

pub(crate) fn place_interactives_and_entities(context: &mut GenerationContext<'_>) {
    let mut rng = context.rng.fork("placeInteractivesAndEntities");
    let mut candidates = roadside_candidates(context);
    rng.shuffle(&mut candidates);
    let mut dispenser = Dispenser { available: VecDeque::from(candidates), path_tile: context.path_tile() };
    let grid = &mut context.grid;

    let signs = rng.int(2, 4);
    dispenser.place(grid, signs, |_| TILE_SIGN);
    let npcs = rng.int(2, 4);
    dispenser.place(grid, npcs, |_| TILE_NPC);
    let trainers = rng.int(3, 6);
    dispenser.place(grid, trainers, |_| rng.pick(&TRAINER_TILE_IDS).unwrap_or(TRAINER_TILE_IDS[0]));
    let items = rng.int(2, 4);
    dispenser.place(grid, items, |index| if index % 2 == 0 { TILE_ITEM } else { TILE_HIDDEN_ITEM });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::{ConfigOverrides, RandomGenerationConfig};
    use crate::passes::carve_path::carve_primary_paths;
    use crate::passes::initialize::initialize;
    use crate::tiles::is_trainer;

    #[test]
    fn candidates_are_unique_open_cells_next_to_the_path() {
        let config = RandomGenerationConfig::from_overrides(ConfigOverrides {
            seed: Some("roadside".to_owned()),
            ..ConfigOverrides::default()
        });
        let mut context = GenerationContext::new(&config, Catalog::builtin());
        initialize(&mut context);
        carve_primary_paths(&mut context);

        let candidates = roadside_candidates(&context);
        let unique: BTreeSet<Cell> = candidates.iter().copied().collect();
        assert_eq!(unique.len(), candidates.len());
        let path: BTreeSet<Cell> = context.state.primary_path_cells.iter().copied().collect();
        for cell in &candidates {
            assert!(!path.contains(cell));
            assert!(cell.orthogonal_neighbors().any(|next| path.contains(&next)));
        }

        place_interactives_and_entities(&mut context);
        let trainers = context.grid.count_where(is_trainer);
        assert!((3..=6).contains(&trainers));
        assert!(context.grid.count_where(|tile| tile == TILE_SIGN) >= 2);
    }

    #[test]
    fn dispenser_skips_cells_that_became_path() {
        let mut grid = TileGrid::filled(4, 1, TILE_GRASS);
        grid.set(Cell::new(0, 0), 2);
        let mut dispenser = Dispenser {
            available: VecDeque::from([Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0)]),
            path_tile: 2,
        };
        dispenser.place(&mut grid, 2, |_| TILE_SIGN);
        assert_eq!(grid.tiles(), &[2, TILE_SIGN, TILE_GRASS, TILE_GRASS]);
        assert_eq!(dispenser.available.len(), 1);
    }
}
