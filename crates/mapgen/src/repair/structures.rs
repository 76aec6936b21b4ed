use std::collections::BTreeSet;

use super::shared::{carve_manhattan_path, clear_footprint, nearest_tile, place_deterministically};
use crate::context::{GeneratedBuildingPlacement, GenerationContext};
use crate::validate::{door_groups, footprint_set};

/// Carves one exit per stranded door group toward the nearest path cell.
pub(super) fn connect_building_doors(context: &mut GenerationContext<'_>) -> usize {
    let path_tile = context.path_tile();
    let mut changes = 0;

    for placement in context.building_placements.clone() {
        let own = footprint_set(context, &placement);
        for group in door_groups(context, &placement).into_iter().filter(|group| !group.connected) {
            let exit = group.doors.iter().find_map(|&door| {
                door.orthogonal_neighbors()
                    .find(|&next| context.grid.in_bounds(next) && !own.contains(&next))
                    .map(|exit| (door, exit))
            });
            let Some((door, exit)) = exit else {
                continue;
            };
            let target = nearest_tile(&context.grid, door, path_tile);
            context.grid.set(exit, path_tile);
            if let Some(target) = target {
                carve_manhattan_path(&mut context.grid, exit, target, path_tile);
            }
            changes += 1;
        }
    }
    changes
}

/// Moves overhanging placements to the first free in-bounds spot, or drops them.
pub(super) fn repair_building_footprints(context: &mut GenerationContext<'_>) -> usize {
    let placements = context.building_placements.clone();
    let overhangs = |placement: &GeneratedBuildingPlacement| {
        context.footprint_cells(placement).iter().any(|stamp| !stamp.in_bounds)
    };
    let (kept, stray): (Vec<_>, Vec<_>) = placements.into_iter().partition(|placement| !overhangs(placement));

    let mut occupied: BTreeSet<_> =
        kept.iter().flat_map(|placement| footprint_set(context, placement)).collect();
    let mut next = kept;
    for placement in &stray {
        clear_footprint(context, placement);
        if let Some(relocated) = place_deterministically(context, placement.building_id, &mut occupied) {
            next.push(relocated);
        }
    }
    context.building_placements = next;
    stray.len()
}

pub(super) fn force_required_structures(context: &mut GenerationContext<'_>) -> usize {
    let mut occupied = context.occupied_building_cells();
    let mut forced = 0;
    for (&building_id, target) in &context.archetype.building_targets {
        let mut placed = context
            .building_placements
            .iter()
            .filter(|placement| placement.building_id == building_id)
            .count();
        while placed < target.min as usize {
            let Some(placement) = place_deterministically(context, building_id, &mut occupied) else {
                break;
            };
            context.building_placements.push(placement);
            placed += 1;
            forced += 1;
        }
    }
    forced
}
