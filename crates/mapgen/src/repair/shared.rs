use std::collections::BTreeSet;

use crate::buildings::{BuildingId, Rotation};
use crate::context::{GeneratedBuildingPlacement, GenerationContext};
use crate::grid::{Cell, TileGrid};
use crate::tiles::{TILE_FLOWER, TileId};

/// Carves an L-shaped run from `start` to `end`: along x first, then along y.
pub(super) fn carve_manhattan_path(grid: &mut TileGrid, start: Cell, end: Cell, tile: TileId) {
    let mut cursor = start;
    grid.set(cursor, tile);
    while cursor.x != end.x {
        cursor = cursor.offset((end.x - cursor.x).signum(), 0);
        grid.set(cursor, tile);
    }
    while cursor.y != end.y {
        cursor = cursor.offset(0, (end.y - cursor.y).signum());
        grid.set(cursor, tile);
    }
}

/// Nearest cell of `tile` to `origin`, excluding `origin`; ties go to smaller x, then y.
pub(super) fn nearest_tile(grid: &TileGrid, origin: Cell, tile: TileId) -> Option<Cell> {
    grid.cells_with(tile)
        .into_iter()
        .filter(|&cell| cell != origin)
        .min_by_key(|&cell| (cell.manhattan(origin), cell.x, cell.y))
}

pub(super) fn clear_footprint(context: &mut GenerationContext<'_>, placement: &GeneratedBuildingPlacement) {
    let base = context.base_terrain();
    for stamp in context.footprint_cells(placement) {
        if stamp.in_bounds {
            context.grid.set(stamp.cell, base);
        }
    }
}

fn can_place_at(
    context: &GenerationContext<'_>,
    placement: &GeneratedBuildingPlacement,
    occupied: &BTreeSet<Cell>,
) -> bool {
    let base = context.base_terrain();
    let path_tile = context.path_tile();
    context.footprint_cells(placement).iter().all(|stamp| {
        stamp.in_bounds
            && !occupied.contains(&stamp.cell)
            && context
                .grid
                .get(stamp.cell)
                .is_some_and(|tile| tile == base || tile == TILE_FLOWER || tile == path_tile)
    })
}

/// Exhaustive scan over rotations, then rows, then columns. Stamps the first fit.
pub(super) fn place_deterministically(
    context: &mut GenerationContext<'_>,
    building_id: BuildingId,
    occupied: &mut BTreeSet<Cell>,
) -> Option<GeneratedBuildingPlacement> {
    for rotation in Rotation::ALL {
        let footprint = context.catalog.buildings.footprint(building_id, rotation);
        if footprint.filled_count() == 0 {
            return None;
        }
        let max_x = context.width() - footprint.width as i32;
        let max_y = context.height() - footprint.height as i32;
        for y in 0..=max_y {
            for x in 0..=max_x {
                let placement = GeneratedBuildingPlacement { building_id, rotation, anchor: Cell::new(x, y) };
                if !can_place_at(context, &placement, occupied) {
                    continue;
                }
                for stamp in context.footprint_cells(&placement) {
                    context.grid.set(stamp.cell, stamp.tile);
                    occupied.insert(stamp.cell);
                }
                return Some(placement);
            }
        }
    }
    None
}
