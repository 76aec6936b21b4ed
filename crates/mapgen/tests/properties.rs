use std::collections::{BTreeSet, VecDeque};

use mapgen::{
    Catalog, Cell, ConfigOverrides, HardConstraintId, RandomGenerationConfig, RandomGenerationResult, TileId,
    generate_random_map,
};
use proptest::prelude::*;

fn primary_path_connected(result: &RandomGenerationResult, path_tile: TileId) -> bool {
    let cells = result.grid.cells_with(path_tile);
    let Some(&start) = cells.first() else {
        return false;
    };
    let path: BTreeSet<Cell> = cells.iter().copied().collect();
    let mut visited = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        for next in current.orthogonal_neighbors() {
            if path.contains(&next) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
    let right_edge = result.width as i32 - 1;
    visited.len() == cells.len()
        && cells.iter().any(|cell| cell.x == 0)
        && cells.iter().any(|cell| cell.x == right_edge)
}

fn generate(seed: u64, archetype_index: usize, template_index: Option<usize>, attempts: u32) -> RandomGenerationResult {
    let catalog = Catalog::builtin();
    let archetype = &catalog.archetypes()[archetype_index % catalog.archetypes().len()];
    let template = template_index.map(|index| catalog.templates()[index % catalog.templates().len()].id.clone());
    generate_random_map(&RandomGenerationConfig::from_overrides(ConfigOverrides {
        seed: Some(format!("prop-{seed}")),
        archetype_id: Some(archetype.id.clone()),
        template_id: template,
        max_repair_attempts: Some(attempts),
        ..ConfigOverrides::default()
    }))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]
    #[test]
    fn generated_maps_keep_structural_invariants(
        seed in any::<u64>(),
        archetype_index in 0_usize..64,
        template_index in proptest::option::of(0_usize..64)
    ) {
        let catalog = Catalog::builtin();
        let result = generate(seed, archetype_index, template_index, 3);
        let archetype = catalog.archetype(&result.archetype_id).expect("resolved archetype");
        let path_tile = archetype.tile_roles.primary_path;

        prop_assert_eq!(result.grid.width(), result.width);
        prop_assert_eq!(result.grid.height(), result.height);
        prop_assert!(result.grid.tiles().iter().all(|&tile| catalog.tiles.is_known(tile)));
        let unreachable = result
            .diagnostics
            .hard_constraint_issues
            .iter()
            .any(|issue| issue.id == HardConstraintId::ReachableCriticalPath);
        prop_assert!(
            unreachable || primary_path_connected(&result, path_tile),
            "seed={seed}, archetype={}, template={template_index:?} should keep one edge-to-edge path",
            result.archetype_id
        );
        for placement in &result.building_placements {
            let footprint = catalog.buildings.footprint(placement.building_id, placement.rotation);
            prop_assert!(placement.anchor.x >= 0 && placement.anchor.y >= 0);
            prop_assert!(placement.anchor.x as usize + footprint.width <= result.width);
            prop_assert!(placement.anchor.y as usize + footprint.height <= result.height);
        }
    }

    #[test]
    fn repair_is_monotone_per_config(
        seed in any::<u64>(),
        archetype_index in 0_usize..64
    ) {
        let unrepaired = generate(seed, archetype_index, None, 0);
        let repaired = generate(seed, archetype_index, None, 3);
        prop_assert!(
            repaired.diagnostics.hard_constraint_issues.len()
                <= unrepaired.diagnostics.hard_constraint_issues.len()
        );
    }
}
