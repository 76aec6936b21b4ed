use std::collections::{BTreeSet, VecDeque};

use anyhow::{Result, bail};
use clap::Parser;
use mapgen::{
    Catalog, Cell, ConfigOverrides, HardConstraintId, RandomGenerationConfig, RandomGenerationResult, TileId,
    generate_random_map_with,
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Maps generated per archetype
    #[arg(short, long, default_value_t = 25)]
    runs: u32,
    #[arg(short, long)]
    verbose: bool,
}

fn choose<'a, T>(rng: &mut ChaCha8Rng, slice: &'a [T]) -> &'a T {
    let p = rng.next_u64() as usize % slice.len();
    &slice[p]
}

fn path_spans_map(result: &RandomGenerationResult, path_tile: TileId) -> bool {
    let cells: BTreeSet<Cell> = result.grid.cells_with(path_tile).into_iter().collect();
    let Some(&start) = cells.first() else {
        return false;
    };
    let mut visited = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(cell) = queue.pop_front() {
        for next in cell.orthogonal_neighbors() {
            if cells.contains(&next) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
    visited.len() == cells.len()
        && cells.iter().any(|cell| cell.x == 0)
        && cells.iter().any(|cell| cell.x == result.width as i32 - 1)
}

/// Returns a description of the first broken invariant, if any.
fn check_invariants(catalog: &Catalog, result: &RandomGenerationResult) -> Option<String> {
    if result.grid.width() != result.width || result.grid.height() != result.height {
        return Some(format!("grid is {}x{}", result.grid.width(), result.grid.height()));
    }
    if let Some(tile) = result.grid.tiles().iter().find(|&&tile| !catalog.tiles.is_known(tile)) {
        return Some(format!("unknown tile id {tile}"));
    }
    let Ok(archetype) = catalog.archetype(&result.archetype_id) else {
        return Some(format!("unresolved archetype {}", result.archetype_id));
    };
    let unreachable = result
        .diagnostics
        .hard_constraint_issues
        .iter()
        .any(|issue| issue.id == HardConstraintId::ReachableCriticalPath);
    if !unreachable && !path_spans_map(result, archetype.tile_roles.primary_path) {
        return Some("primary path is broken without a reported issue".to_owned());
    }
    for placement in &result.building_placements {
        let footprint = catalog.buildings.footprint(placement.building_id, placement.rotation);
        let fits = placement.anchor.x >= 0
            && placement.anchor.y >= 0
            && placement.anchor.x as usize + footprint.width <= result.width
            && placement.anchor.y as usize + footprint.height <= result.height;
        if !fits {
            return Some(format!("{} placed out of bounds at {:?}", placement.building_id.as_str(), placement.anchor));
        }
    }
    None
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    println!("Starting map fuzz on seed {} with {} runs per archetype...", args.seed, args.runs);
    let catalog = Catalog::builtin();
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut failures = 0_u32;
    let mut unresolved = 0_u32;
    let mut total = 0_u32;

    for archetype in catalog.archetypes() {
        for _ in 0..args.runs {
            let template = if rng.next_u64() % 3 == 0 {
                None
            } else {
                Some(choose(&mut rng, catalog.templates()).id.clone())
            };
            let config = RandomGenerationConfig::from_overrides_with(
                ConfigOverrides {
                    seed: Some(format!("fuzz-{:016x}", rng.next_u64())),
                    archetype_id: Some(archetype.id.clone()),
                    template_id: template,
                    ..ConfigOverrides::default()
                },
                catalog,
            );
            let result = generate_random_map_with(&config, catalog);
            total += 1;
            if !result.diagnostics.hard_constraint_issues.is_empty() {
                unresolved += 1;
            }
            if let Some(failure) = check_invariants(catalog, &result) {
                failures += 1;
                warn!(seed = %config.seed, archetype = %archetype.id, template = ?config.template_id, %failure, "invariant failed");
            }
        }
        info!(archetype = %archetype.id, "archetype swept");
    }

    println!("Generated {total} maps, {unresolved} with unresolved hard constraints.");
    if failures > 0 {
        bail!("{failures} maps broke structural invariants");
    }
    println!("Fuzzing completed successfully.");
    Ok(())
}
