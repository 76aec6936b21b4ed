use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use mapgen::{
    Catalog, ConfigOverrides, RandomGenerationConfig, RandomGenerationResult, generate_random_map_with,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed string; a runtime seed is derived when absent
    #[arg(short, long)]
    seed: Option<String>,
    #[arg(short, long)]
    archetype: Option<String>,
    #[arg(short, long)]
    template: Option<String>,
    #[arg(long)]
    width: Option<usize>,
    #[arg(long)]
    height: Option<usize>,
    #[arg(long)]
    max_repair_attempts: Option<u32>,
    /// TOML file with config overrides; flags win over file values
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Reject unknown ids and out-of-range dimensions instead of normalising them
    #[arg(long)]
    strict: bool,
    /// Print the full result as JSON instead of the tile grid
    #[arg(long)]
    json: bool,
    /// Write the JSON result to this path
    #[arg(short, long)]
    out: Option<PathBuf>,
    /// List archetypes and templates, then exit
    #[arg(long)]
    list: bool,
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            seed: self.seed.clone(),
            archetype_id: self.archetype.clone(),
            template_id: self.template.clone(),
            width: self.width,
            height: self.height,
            max_repair_attempts: self.max_repair_attempts,
            ..ConfigOverrides::default()
        }
    }
}

fn load_overrides(path: &Path) -> Result<ConfigOverrides> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&data).with_context(|| format!("Failed to parse config TOML: {}", path.display()))
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(true)
        .init();
}

fn print_listing(catalog: &Catalog) {
    println!("Archetypes:");
    for archetype in catalog.archetypes() {
        println!(
            "  {:<26} {} ({})",
            archetype.id, archetype.label, archetype.recommended_dimensions
        );
    }
    println!("Templates:");
    for template in catalog.templates() {
        println!("  {:<26} {}", template.id, template.label);
    }
}

fn print_grid(catalog: &Catalog, result: &RandomGenerationResult) {
    for row in result.grid.rows() {
        let line: Vec<String> = row.iter().map(|tile| format!("{tile:>2}")).collect();
        println!("{}", line.join(" "));
    }

    let mut counts: BTreeMap<_, usize> = BTreeMap::new();
    for &tile in result.grid.tiles() {
        *counts.entry(tile).or_default() += 1;
    }
    println!();
    for (tile, count) in counts {
        let name = catalog.tiles.get(tile).map_or("Unknown", |definition| definition.name.as_str());
        println!("  {tile:>2} {name:<18} {count}");
    }
}

fn print_summary(result: &RandomGenerationResult) {
    let summary = result.diagnostics.summary();
    println!();
    println!("{} [{}] seed={} {}x{}", result.display_name, result.archetype_id, result.seed, result.width, result.height);
    println!("Grid Hash: {:016x}", result.grid_hash());
    println!("Buildings: {}", result.building_placements.len());
    println!(
        "Passes: {} in {:.2} ms{}",
        summary.pass_count,
        summary.total_pass_duration_ms,
        summary
            .slowest_pass
            .map(|(pass, ms)| format!(" (slowest {pass} {ms:.2} ms)"))
            .unwrap_or_default()
    );
    for score in &result.diagnostics.soft_goal_scores {
        println!("  {:<20} {:.3} x {:.2} = {:.3}", score.id.as_str(), score.score, score.weight, score.weighted_score);
    }
    for warning in &result.diagnostics.warnings {
        println!("Warning: {warning}");
    }
    for issue in &result.diagnostics.hard_constraint_issues {
        println!("Issue: {} {}", issue.id.as_str(), issue.message);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let catalog = Catalog::builtin();
    if args.list {
        print_listing(catalog);
        return Ok(());
    }

    let file_overrides = match &args.config {
        Some(path) => load_overrides(path)?,
        None => ConfigOverrides::default(),
    };
    let config = RandomGenerationConfig::from_overrides_with(file_overrides.merged(args.overrides()), catalog);
    if args.strict {
        config.validate(catalog).context("Config rejected in strict mode")?;
    }
    info!(seed = %config.seed, archetype = %config.archetype_id, "generating");

    let result = generate_random_map_with(&config, catalog);
    let json = serde_json::to_string_pretty(&result).context("Failed to serialize result")?;
    if let Some(path) = &args.out {
        fs::write(path, &json).with_context(|| format!("Failed to write result: {}", path.display()))?;
    }

    if args.json {
        println!("{json}");
    } else {
        print_grid(catalog, &result);
        print_summary(&result);
    }

    Ok(())
}
