//! Encounter patches painted beside the route outside the town.

use crate::catalog::EncounterZoneBias;
use crate::context::GenerationContext;
use crate::grid::Cell;
use crate::math::clamp_i32;
use crate::tiles::{TILE_FLOWER, TILE_GRASS};

const PATCH_STRIDE: usize = 3;
const PATCH_CHANCE: f64 = 0.4;
const ALTERNATE_TILE_CHANCE: f64 = 0.18;

fn in_zone(cell: Cell, width: i32, zone: EncounterZoneBias) -> bool {
    match zone {
        EncounterZoneBias::East => cell.x >= (f64::from(width) * 0.45).floor() as i32,
        EncounterZoneBias::West => cell.x <= (f64::from(width) * 0.55).ceil() as i32,
        EncounterZoneBias::Balanced => true,
    }
}

pub(crate) fn place_encounters(context: &mut GenerationContext<'_>) {
    let mut rng = context.rng.fork("placeEncounters");
    let width = context.width();
    let height = context.height();
    let path_tile = context.path_tile();
    let buildings = context.occupied_building_cells();
    let options = context.encounter_options();
    let zone = context
        .state
        .template_hints
        .and_then(|hints| hints.encounter_zone)
        .unwrap_or_default();

    let zoned: Vec<Cell> = context
        .state
        .primary_path_cells
        .iter()
        .copied()
        .filter(|&cell| in_zone(cell, width, zone))
        .collect();
    let source = if zoned.is_empty() { context.state.primary_path_cells.clone() } else { zoned };
    let town = context.town_district();
    let mut path_cells: Vec<Cell> = source
        .into_iter()
        .filter(|&cell| town.is_none_or(|town| !town.contains(cell)))
        .collect();
    path_cells.sort_by_key(|cell| cell.x);

    let mut anchors = Vec::new();
    for (index, &anchor) in path_cells.iter().enumerate() {
        if index % PATCH_STRIDE != 0 || !rng.chance(PATCH_CHANCE) {
            continue;
        }

        let patch_width = rng.int(2, 4);
        let patch_height = rng.int(2, 3);
        let side = rng.pick(&[-1, 1]).unwrap_or(1);
        let start_x = clamp_i32(anchor.x + rng.int(-1, 1), 1, width - patch_width - 1);
        let start_y = clamp_i32(anchor.y + side * rng.int(2, 4), 1, height - patch_height - 1);
        let tile = match options.split_first() {
            Some((&primary, rest)) if !rest.is_empty() && rng.chance(ALTERNATE_TILE_CHANCE) => {
                rng.pick(rest).unwrap_or(primary)
            }
            Some((&primary, _)) => primary,
            None => continue,
        };

        let mut painted = false;
        for y in start_y..start_y + patch_height {
            for x in start_x..start_x + patch_width {
                let cell = Cell::new(x, y);
                if buildings.contains(&cell) {
                    continue;
                }
                match context.grid.get(cell) {
                    Some(current) if current == path_tile => {}
                    Some(TILE_GRASS | TILE_FLOWER) => {
                        context.grid.set(cell, tile);
                        painted = true;
                    }
                    _ => {}
                }
            }
        }
        if painted {
            anchors.push(anchor);
        }
    }

    context.state.encounter_anchor_cells = anchors;
}
