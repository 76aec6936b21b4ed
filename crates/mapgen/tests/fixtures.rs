use std::collections::{BTreeSet, VecDeque};

use mapgen::tiles::{TILE_CAVE, TILE_PATH, TILE_RARE_GRASS, TILE_TALL_GRASS, TRAINER_TILE_IDS};
use mapgen::{
    Cell, Catalog, ConfigOverrides, HardConstraintId, PassId, RandomGenerationConfig,
    RandomGenerationResult, TileGrid, TileId, generate_random_map,
};

struct Fixture {
    seed: &'static str,
    archetype_id: &'static str,
    template_id: &'static str,
    min_path_tiles: usize,
    trainer_density: (f64, f64),
    encounter_density: (f64, f64),
    max_hard_constraint_issues: usize,
    expect_connected_path_edges: bool,
}

const FIXTURES: [Fixture; 3] = [
    Fixture {
        seed: "phase6-basic-001",
        archetype_id: "town_route_basic",
        template_id: "compact_town_spine",
        min_path_tiles: 24,
        trainer_density: (0.001, 0.02),
        encounter_density: (0.03, 0.16),
        max_hard_constraint_issues: 0,
        expect_connected_path_edges: true,
    },
    Fixture {
        seed: "phase6-coastal-019",
        archetype_id: "coastal_town_route",
        template_id: "northern_crossing",
        min_path_tiles: 28,
        trainer_density: (0.001, 0.02),
        encounter_density: (0.029, 0.16),
        max_hard_constraint_issues: 0,
        expect_connected_path_edges: true,
    },
    Fixture {
        seed: "phase6-forest-007",
        archetype_id: "forest_town_route",
        template_id: "southern_wilds",
        min_path_tiles: 24,
        trainer_density: (0.001, 0.025),
        encounter_density: (0.03, 0.17),
        max_hard_constraint_issues: 0,
        expect_connected_path_edges: true,
    },
];

const ENCOUNTER_TILE_IDS: [TileId; 3] = [TILE_TALL_GRASS, TILE_CAVE, TILE_RARE_GRASS];

fn generate(fixture: &Fixture) -> RandomGenerationResult {
    generate_random_map(&RandomGenerationConfig::from_overrides(ConfigOverrides {
        seed: Some(fixture.seed.to_owned()),
        archetype_id: Some(fixture.archetype_id.to_owned()),
        template_id: Some(fixture.template_id.to_owned()),
        max_repair_attempts: Some(3),
        ..ConfigOverrides::default()
    }))
}

fn path_spans_both_edges(grid: &TileGrid, path_tile: TileId) -> bool {
    let cells = grid.cells_with(path_tile);
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
    let right_edge = grid.width() as i32 - 1;
    visited.len() == cells.len()
        && cells.iter().any(|cell| cell.x == 0)
        && cells.iter().any(|cell| cell.x == right_edge)
}

#[test]
fn fixtures_are_deterministic() {
    for fixture in &FIXTURES {
        let first = generate(fixture);
        let second = generate(fixture);
        assert_eq!(first.grid, second.grid, "{}", fixture.seed);
        assert_eq!(
            first.diagnostics.hard_constraint_issues,
            second.diagnostics.hard_constraint_issues
        );
    }
}

#[test]
fn fixtures_settle_within_their_hard_constraint_budget() {
    for fixture in &FIXTURES {
        let result = generate(fixture);
        let ids: Vec<_> = result.diagnostics.hard_constraint_issues.iter().map(|issue| issue.id).collect();
        assert!(
            ids.len() <= fixture.max_hard_constraint_issues,
            "{}: {ids:?} exceeds {} issues",
            fixture.seed,
            fixture.max_hard_constraint_issues
        );
        assert!(!ids.contains(&HardConstraintId::MinRequiredStructures), "{}: {ids:?}", fixture.seed);
        assert!(result.diagnostics.pass_durations_ms.contains_key(&PassId::Repair));
    }
}

#[test]
fn fixtures_carve_a_connected_edge_to_edge_path() {
    for fixture in &FIXTURES {
        let result = generate(fixture);
        assert!(result.path_tile_count(TILE_PATH) >= fixture.min_path_tiles, "{}", fixture.seed);
        assert_eq!(
            path_spans_both_edges(&result.grid, TILE_PATH),
            fixture.expect_connected_path_edges,
            "{}",
            fixture.seed
        );
    }
}

#[test]
fn fixtures_use_known_tiles_within_density_bounds() {
    let catalog = Catalog::builtin();
    for fixture in &FIXTURES {
        let result = generate(fixture);
        assert!(result.grid.tiles().iter().all(|&tile| catalog.tiles.is_known(tile)));
        assert_eq!((result.grid.width(), result.grid.height()), (result.width, result.height));

        let cell_count = (result.width * result.height) as f64;
        let trainers = result.grid.count_where(|tile| TRAINER_TILE_IDS.contains(&tile)) as f64;
        let encounters = result.grid.count_where(|tile| ENCOUNTER_TILE_IDS.contains(&tile)) as f64;
        let trainer_density = trainers / cell_count;
        let encounter_density = encounters / cell_count;

        let (trainer_min, trainer_max) = fixture.trainer_density;
        let (encounter_min, encounter_max) = fixture.encounter_density;
        assert!(
            (trainer_min..=trainer_max).contains(&trainer_density),
            "{}: trainer density {trainer_density}",
            fixture.seed
        );
        assert!(
            (encounter_min..=encounter_max).contains(&encounter_density),
            "{}: encounter density {encounter_density}",
            fixture.seed
        );
        assert!(result.diagnostics.pass_durations_ms.contains_key(&PassId::Balance));
    }
}
