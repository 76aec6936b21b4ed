//! Cosmetic scatter: flowers over open base terrain, then elliptical tree clusters.

use std::collections::BTreeSet;

use crate::context::GenerationContext;
use crate::grid::Cell;
use crate::tiles::{TILE_FLOWER, TILE_TREE};

const FLOWER_CHANCE: f64 = 0.045;
const CLUSTER_AREA_PER_TREE_CLUSTER: usize = 180;
const CLUSTER_SHAPE_LIMIT: f64 = 1.25;
const CLUSTER_FILL_CHANCE: f64 = 0.65;

pub(crate) fn paint_biomes(context: &mut GenerationContext<'_>) {
    let mut rng = context.rng.fork("paintBiomes");
    let base = context.base_terrain();
    let path: BTreeSet<Cell> = context.state.primary_path_cells.iter().copied().collect();

    for cell in context.grid.cells() {
        if !path.contains(&cell) && context.grid.is(cell, base) && rng.chance(FLOWER_CHANCE) {
            context.grid.set(cell, TILE_FLOWER);
        }
    }

    let width = context.width();
    let height = context.height();
    let clusters = (context.area() / CLUSTER_AREA_PER_TREE_CLUSTER).max(2);
    for _ in 0..clusters {
        let center = Cell::new(rng.int(1, width - 2), rng.int(1, height - 2));
        let radius_x = rng.int(2, 4);
        let radius_y = rng.int(2, 3);

        for y in center.y - radius_y..=center.y + radius_y {
            for x in center.x - radius_x..=center.x + radius_x {
                let cell = Cell::new(x, y);
                if !context.grid.in_bounds(cell) || path.contains(&cell) {
                    continue;
                }
                let nx = (f64::from(x - center.x) / f64::from(radius_x)).abs();
                let ny = (f64::from(y - center.y) / f64::from(radius_y)).abs();
                if nx + ny <= CLUSTER_SHAPE_LIMIT && rng.chance(CLUSTER_FILL_CHANCE) {
                    context.grid.set(cell, TILE_TREE);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::{ConfigOverrides, RandomGenerationConfig};
    use crate::passes::carve_path::carve_primary_paths;
    use crate::passes::initialize::initialize;

    #[test]
    fn painting_never_touches_the_primary_path() {
        let config = RandomGenerationConfig::from_overrides(ConfigOverrides {
            seed: Some("biomes".to_owned()),
            ..ConfigOverrides::default()
        });
        let mut context = GenerationContext::new(&config, Catalog::builtin());
        initialize(&mut context);
        carve_primary_paths(&mut context);
        paint_biomes(&mut context);

        let path_tile = context.path_tile();
        assert!(context.state.primary_path_cells.iter().all(|&cell| context.grid.is(cell, path_tile)));
        assert!(context.grid.count_where(|tile| tile == TILE_TREE) > 0);
        let allowed = [context.base_terrain(), path_tile, TILE_FLOWER, TILE_TREE];
        assert!(context.grid.tiles().iter().all(|tile| allowed.contains(tile)));
    }
}
