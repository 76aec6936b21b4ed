use std::collections::{BTreeSet, VecDeque};

use crate::config::HardConstraintId;
use crate::context::GenerationContext;
use crate::diagnostics::ValidationIssue;
use crate::grid::Cell;

/// The leftmost (then topmost) primary path cell, preferring the recorded path over the grid.
pub fn resolve_spawn_cell(context: &GenerationContext<'_>) -> Option<Cell> {
    context
        .state
        .primary_path_cells
        .iter()
        .min()
        .copied()
        .or_else(|| context.grid.cells_with(context.path_tile()).into_iter().min())
}

pub(super) fn reachable_critical_path(context: &GenerationContext<'_>) -> Option<ValidationIssue> {
    let id = HardConstraintId::ReachableCriticalPath;
    let path_cells = context.grid.cells_with(context.path_tile());
    let Some(&start) = path_cells.first() else {
        return Some(ValidationIssue::error(id, "Primary path tiles are missing."));
    };

    let path_set: BTreeSet<Cell> = path_cells.iter().copied().collect();
    let mut visited = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        for next in current.orthogonal_neighbors() {
            if path_set.contains(&next) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    if visited.len() != path_cells.len() {
        let unreachable: Vec<_> =
            path_cells.into_iter().filter(|cell| !visited.contains(cell)).collect();
        return Some(
            ValidationIssue::error(
                id,
                format!("Primary path is disconnected ({} unreachable cells).", unreachable.len()),
            )
            .with_cells(unreachable),
        );
    }

    let right_edge = context.grid.width() as i32 - 1;
    let touches_left = path_cells.iter().any(|cell| cell.x == 0);
    let touches_right = path_cells.iter().any(|cell| cell.x == right_edge);
    if !touches_left || !touches_right {
        return Some(ValidationIssue::error(id, "Primary path must reach both map edges."));
    }
    None
}

pub(super) fn spawn_safety(context: &GenerationContext<'_>) -> Option<ValidationIssue> {
    let id = HardConstraintId::SpawnSafety;
    let Some(spawn) = resolve_spawn_cell(context) else {
        return Some(ValidationIssue::error(id, "Spawn cell cannot be resolved without a primary path."));
    };
    let message = if !context.grid.in_bounds(spawn) {
        "Spawn cell is out of bounds."
    } else if !context.is_walkable(spawn) {
        "Spawn cell is not walkable."
    } else if !spawn.orthogonal_neighbors().any(|next| context.is_walkable(next)) {
        "Spawn cell has no walkable escape neighbor."
    } else {
        return None;
    };
    Some(ValidationIssue::error(id, message).with_cells(vec![spawn]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::{ConfigOverrides, RandomGenerationConfig};
    use crate::tiles::{TILE_PATH, TILE_TREE};

    fn context() -> GenerationContext<'static> {
        let config = RandomGenerationConfig::from_overrides(ConfigOverrides {
            seed: Some("path".to_owned()),
            width: Some(14),
            height: Some(12),
            ..ConfigOverrides::default()
        });
        GenerationContext::new(&config, Catalog::builtin())
    }

    fn carve_row(context: &mut GenerationContext<'_>, y: i32, xs: impl IntoIterator<Item = i32>) {
        for x in xs {
            context.grid.set(Cell::new(x, y), TILE_PATH);
        }
    }

    #[test]
    fn missing_path_is_its_own_issue() {
        let context = context();
        let issue = reachable_critical_path(&context).expect("issue");
        assert_eq!(issue.message, "Primary path tiles are missing.");
    }

    #[test]
    fn split_path_lists_the_unreachable_cells() {
        let mut context = context();
        carve_row(&mut context, 5, 0..6);
        carve_row(&mut context, 5, 8..14);
        let issue = reachable_critical_path(&context).expect("issue");
        assert_eq!(issue.message, "Primary path is disconnected (6 unreachable cells).");
        assert_eq!(issue.cells.first(), Some(&Cell::new(8, 5)));
    }

    #[test]
    fn connected_path_must_span_both_edges() {
        let mut context = context();
        carve_row(&mut context, 5, 0..10);
        let issue = reachable_critical_path(&context).expect("issue");
        assert_eq!(issue.message, "Primary path must reach both map edges.");

        carve_row(&mut context, 5, 10..14);
        assert_eq!(reachable_critical_path(&context), None);
    }

    #[test]
    fn spawn_prefers_the_leftmost_recorded_path_cell() {
        let mut context = context();
        carve_row(&mut context, 6, 0..14);
        carve_row(&mut context, 2, 0..1);
        assert_eq!(resolve_spawn_cell(&context), Some(Cell::new(0, 2)));

        context.state.primary_path_cells = vec![Cell::new(3, 6), Cell::new(1, 6)];
        assert_eq!(resolve_spawn_cell(&context), Some(Cell::new(1, 6)));
        assert_eq!(spawn_safety(&context), None);
    }

    #[test]
    fn boxed_in_spawn_has_no_escape() {
        let mut context = context();
        context.grid.set(Cell::new(0, 3), TILE_PATH);
        for cell in Cell::new(0, 3).orthogonal_neighbors() {
            context.grid.set(cell, TILE_TREE);
        }
        let issue = spawn_safety(&context).expect("issue");
        assert_eq!(issue.message, "Spawn cell has no walkable escape neighbor.");
        assert_eq!(issue.cells, vec![Cell::new(0, 3)]);
    }
}
