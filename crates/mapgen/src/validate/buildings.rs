use std::collections::BTreeSet;

use crate::config::HardConstraintId;
use crate::context::{GeneratedBuildingPlacement, GenerationContext};
use crate::diagnostics::ValidationIssue;
use crate::grid::Cell;
use crate::tiles::TILE_DOOR;

/// Doors of one footprint that are 4-connected through each other.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DoorGroup {
    /// Row-major door cells.
    pub doors: Vec<Cell>,
    pub connected: bool,
}

/// In-bounds footprint cells of one placement.
pub(crate) fn footprint_set(
    context: &GenerationContext<'_>,
    placement: &GeneratedBuildingPlacement,
) -> BTreeSet<Cell> {
    context
        .footprint_cells(placement)
        .into_iter()
        .filter(|stamp| stamp.in_bounds)
        .map(|stamp| stamp.cell)
        .collect()
}

fn touches_path(context: &GenerationContext<'_>, door: Cell, own: &BTreeSet<Cell>) -> bool {
    door.orthogonal_neighbors()
        .any(|next| !own.contains(&next) && context.grid.is(next, context.path_tile()))
}

pub(crate) fn door_groups(
    context: &GenerationContext<'_>,
    placement: &GeneratedBuildingPlacement,
) -> Vec<DoorGroup> {
    let own = footprint_set(context, placement);
    let mut remaining: Vec<Cell> = context
        .footprint_cells(placement)
        .into_iter()
        .filter(|stamp| stamp.in_bounds && stamp.tile == TILE_DOOR)
        .map(|stamp| stamp.cell)
        .collect();

    let mut groups = Vec::new();
    while !remaining.is_empty() {
        let mut doors = vec![remaining.remove(0)];
        let mut index = 0;
        while index < doors.len() {
            let current = doors[index];
            let (adjacent, rest): (Vec<Cell>, Vec<Cell>) =
                remaining.into_iter().partition(|door| door.manhattan(current) == 1);
            doors.extend(adjacent);
            remaining = rest;
            index += 1;
        }
        doors.sort_by_key(|cell| (cell.y, cell.x));
        let connected = doors.iter().any(|&door| touches_path(context, door, &own));
        groups.push(DoorGroup { doors, connected });
    }
    groups
}

pub(super) fn footprints_in_bounds(context: &GenerationContext<'_>) -> Option<ValidationIssue> {
    let outside: Vec<_> = context
        .building_placements
        .iter()
        .flat_map(|placement| context.footprint_cells(placement))
        .filter(|stamp| !stamp.in_bounds)
        .map(|stamp| stamp.cell)
        .collect();
    if outside.is_empty() {
        return None;
    }
    Some(
        ValidationIssue::error(
            HardConstraintId::BuildingFootprintsInBounds,
            format!("Found {} building footprint cells outside map bounds.", outside.len()),
        )
        .with_cells(outside),
    )
}

pub(super) fn door_connectivity(context: &GenerationContext<'_>) -> Option<ValidationIssue> {
    let stranded: Vec<_> = context
        .building_placements
        .iter()
        .flat_map(|placement| door_groups(context, placement))
        .filter(|group| !group.connected)
        .flat_map(|group| group.doors)
        .collect();
    if stranded.is_empty() {
        return None;
    }
    Some(
        ValidationIssue::error(
            HardConstraintId::BuildingDoorConnectivity,
            format!("Found {} building doors without path adjacency.", stranded.len()),
        )
        .with_cells(stranded),
    )
}

pub(super) fn min_required_structures(context: &GenerationContext<'_>) -> Option<ValidationIssue> {
    let missing: Vec<String> = context
        .archetype
        .building_targets
        .iter()
        .filter(|(_, target)| target.min > 0)
        .filter_map(|(&building_id, target)| {
            let placed = context
                .building_placements
                .iter()
                .filter(|placement| placement.building_id == building_id)
                .count();
            (placed < target.min as usize).then(|| format!("{building_id} ({placed}/{})", target.min))
        })
        .collect();
    if missing.is_empty() {
        return None;
    }
    Some(ValidationIssue::error(
        HardConstraintId::MinRequiredStructures,
        format!("Missing required structures: {}.", missing.join(", ")),
    ))
}
