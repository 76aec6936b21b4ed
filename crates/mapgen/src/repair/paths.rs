use std::collections::{BTreeSet, VecDeque};

use super::shared::carve_manhattan_path;
use crate::context::GenerationContext;
use crate::grid::Cell;
use crate::validate::resolve_spawn_cell;

/// 4-connected components in row-major discovery order; each starts at its first cell.
fn path_components(cells: &[Cell]) -> Vec<Vec<Cell>> {
    let path_set: BTreeSet<Cell> = cells.iter().copied().collect();
    let mut visited = BTreeSet::new();
    let mut components = Vec::new();
    for &cell in cells {
        if !visited.insert(cell) {
            continue;
        }
        let mut component = Vec::new();
        let mut queue = VecDeque::from([cell]);
        while let Some(current) = queue.pop_front() {
            component.push(current);
            for next in current.orthogonal_neighbors() {
                if path_set.contains(&next) && visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        components.push(component);
    }
    components
}

/// Joins every component to the westernmost one, then stretches the path to both edges.
pub(super) fn reconnect_path_components(context: &mut GenerationContext<'_>) -> usize {
    let path_tile = context.path_tile();
    let width = context.width();
    let mut changes = 0;

    let mut cells = context.grid.cells_with(path_tile);
    if cells.is_empty() {
        context.grid.fill_rect(0, context.height() / 2, width, 1, path_tile);
        changes += 1;
        cells = context.grid.cells_with(path_tile);
    }

    let mut components = path_components(&cells);
    components.sort_by_key(|component| component.iter().min().copied());
    let Some(&main) = components.first().and_then(|component| component.first()) else {
        return changes;
    };
    for component in &components[1..] {
        carve_manhattan_path(&mut context.grid, main, component[0], path_tile);
        changes += 1;
    }

    let refreshed = context.grid.cells_with(path_tile);
    let Some(&first) = refreshed.first() else {
        return changes;
    };
    let left = refreshed.iter().copied().fold(first, |best, cell| if cell.x < best.x { cell } else { best });
    let right = refreshed.iter().copied().fold(first, |best, cell| if cell.x > best.x { cell } else { best });
    if left.x > 0 {
        carve_manhattan_path(&mut context.grid, left, Cell::new(0, left.y), path_tile);
        changes += 1;
    }
    if right.x < width - 1 {
        carve_manhattan_path(&mut context.grid, right, Cell::new(width - 1, right.y), path_tile);
        changes += 1;
    }
    changes
}

pub(super) fn enforce_spawn_safety(context: &mut GenerationContext<'_>) -> usize {
    let Some(spawn) = resolve_spawn_cell(context) else {
        return 0;
    };
    let path_tile = context.path_tile();
    let mut changes = 0;

    if context.grid.in_bounds(spawn) && !context.is_walkable(spawn) {
        context.grid.set(spawn, path_tile);
        changes += 1;
    }
    if !spawn.orthogonal_neighbors().any(|next| context.is_walkable(next))
        && let Some(exit) = spawn.orthogonal_neighbors().find(|&next| context.grid.in_bounds(next))
    {
        context.grid.set(exit, path_tile);
        changes += 1;
    }
    changes
}
