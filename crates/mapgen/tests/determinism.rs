use std::collections::{BTreeMap, BTreeSet};

use mapgen::tiles::TILE_PATH;
use mapgen::{
    Catalog, ConfigOverrides, RandomGenerationConfig, RandomGenerationResult, TileGrid,
    generate_random_map, generate_random_map_with,
};
use xxhash_rust::xxh3::xxh3_64;

fn config(seed: &str, archetype_id: &str, template_id: Option<&str>) -> RandomGenerationConfig {
    RandomGenerationConfig::from_overrides(ConfigOverrides {
        seed: Some(seed.to_owned()),
        archetype_id: Some(archetype_id.to_owned()),
        template_id: template_id.map(str::to_owned),
        ..ConfigOverrides::default()
    })
}

fn signature(result: &RandomGenerationResult) -> (u64, usize) {
    (xxh3_64(&result.canonical_bytes()), result.path_tile_count(TILE_PATH))
}

/// Per column: normalised mean row and vertical spread of path tiles, or `x` when empty.
fn path_signature(grid: &TileGrid) -> String {
    let mut rows_by_column: BTreeMap<i32, Vec<i32>> = BTreeMap::new();
    for cell in grid.cells_with(TILE_PATH) {
        rows_by_column.entry(cell.x).or_default().push(cell.y);
    }
    let height = grid.height() as f64;
    (0..grid.width() as i32)
        .map(|x| match rows_by_column.get(&x) {
            Some(rows) => {
                let min = rows.iter().min().copied().unwrap_or_default();
                let max = rows.iter().max().copied().unwrap_or_default();
                let mean = rows.iter().map(|&y| f64::from(y)).sum::<f64>() / rows.len() as f64;
                let normalised = (mean / (height - 1.0).max(1.0) * 10.0).round();
                format!("{normalised}.{}", max - min)
            }
            None => "x".to_owned(),
        })
        .collect::<Vec<_>>()
        .join("|")
}

#[test]
fn identical_configs_produce_identical_results_for_every_archetype() {
    for archetype in Catalog::builtin().archetypes() {
        let config = config("determinism-sweep", &archetype.id, None);
        let first = generate_random_map(&config);
        let second = generate_random_map(&config);
        assert_eq!(signature(&first), signature(&second), "{}", archetype.id);
        assert_eq!(first.diagnostics.hard_constraint_issues, second.diagnostics.hard_constraint_issues);
        assert_eq!(first.diagnostics.warnings, second.diagnostics.warnings);
    }
}

#[test]
fn fingerprints_hold_across_runs_and_catalog_instances() {
    let fresh_catalog = Catalog::standard();
    for archetype_id in ["town_route_basic", "coastal_town_route", "canyon_corridor_route"] {
        let config = config("catalog-instances", archetype_id, Some("compact_town_spine"));
        let expected = signature(&generate_random_map(&config));
        assert_eq!(signature(&generate_random_map(&config)), expected, "{archetype_id}");
        assert_eq!(signature(&generate_random_map_with(&config, &fresh_catalog)), expected, "{archetype_id}");
    }
}

#[test]
fn different_seeds_change_the_fingerprint() {
    let first = generate_random_map(&config("seed-a", "town_route_basic", None));
    let second = generate_random_map(&config("seed-b", "town_route_basic", None));
    assert_ne!(first.grid_hash(), second.grid_hash());
}

#[test]
fn templates_and_archetypes_visibly_change_the_route() {
    let shared = |archetype_id: &str, template_id: &str| {
        let mut config = config("route-variation-014", archetype_id, Some(template_id));
        config.dimensions.width = 30;
        config.dimensions.height = 20;
        path_signature(&generate_random_map(&config).grid)
    };

    let by_template: BTreeSet<_> = ["compact_town_spine", "central_switchbacks", "highland_sweep", "lowland_bypass"]
        .into_iter()
        .map(|template_id| shared("town_route_basic", template_id))
        .collect();
    assert!(by_template.len() >= 3, "templates produced {} signatures", by_template.len());

    let by_archetype: BTreeSet<_> = ["town_route_basic", "canyon_corridor_route", "riverlands_town_route"]
        .into_iter()
        .map(|archetype_id| shared(archetype_id, "compact_town_spine"))
        .collect();
    assert!(by_archetype.len() >= 2, "archetypes produced {} signatures", by_archetype.len());
}
