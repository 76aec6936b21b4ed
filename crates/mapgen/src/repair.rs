//! Bounded repair loop driven by validator output.
//!
//! Each hard constraint maps to exactly one [`RepairAction`]. An attempt runs every
//! action whose constraint currently has an issue, records all seven outcomes, then
//! re-validates. The loop stops when issues clear, when an attempt changes nothing,
//! or when `max_repair_attempts` is spent; leftovers become a warning, never an error.

mod paths;
mod shared;
mod structures;
mod tiles;

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::config::HardConstraintId;
use crate::context::GenerationContext;
use crate::diagnostics::{RepairActionRecord, ValidationIssue};
use crate::passes::{PassId, restore_densities};
use crate::validate::validate_hard_constraints;

pub struct RepairAction {
    pub constraint: HardConstraintId,
    pub id_prefix: &'static str,
    /// Returns how many things changed; zero means the action was a no-op.
    pub run: fn(&mut GenerationContext<'_>) -> usize,
    pub describe: fn(usize) -> String,
}

pub const REPAIR_ACTIONS: [RepairAction; 7] = [
    RepairAction {
        constraint: HardConstraintId::BoundedMap,
        id_prefix: "repair-bounded-map",
        run: tiles::normalize_grid_bounds,
        describe: |_| "Normalize grid bounds to configured dimensions.".to_owned(),
    },
    RepairAction {
        constraint: HardConstraintId::KnownTileIdsOnly,
        id_prefix: "repair-known-tile-ids",
        run: tiles::replace_unknown_tile_ids,
        describe: |count| format!("Replace unknown tile ids with base terrain ({count} cells)."),
    },
    RepairAction {
        constraint: HardConstraintId::ReachableCriticalPath,
        id_prefix: "repair-reconnect-critical-path",
        run: paths::reconnect_path_components,
        describe: |_| "Reconnect disconnected primary path segments.".to_owned(),
    },
    RepairAction {
        constraint: HardConstraintId::BuildingDoorConnectivity,
        id_prefix: "repair-building-door-connectivity",
        run: structures::connect_building_doors,
        describe: |_| "Connect building doors to nearby path cells.".to_owned(),
    },
    RepairAction {
        constraint: HardConstraintId::BuildingFootprintsInBounds,
        id_prefix: "repair-building-footprints",
        run: structures::repair_building_footprints,
        describe: |count| format!("Relocate or remove out-of-bounds buildings ({count} placements)."),
    },
    RepairAction {
        constraint: HardConstraintId::MinRequiredStructures,
        id_prefix: "repair-force-required-structures",
        run: structures::force_required_structures,
        describe: |count| {
            format!("Force minimum required buildings when placement is possible ({count} added).")
        },
    },
    RepairAction {
        constraint: HardConstraintId::SpawnSafety,
        id_prefix: "repair-spawn-safety",
        run: paths::enforce_spawn_safety,
        describe: |_| "Enforce walkable and escapable spawn cell.".to_owned(),
    },
];

/// Runs one repair attempt against `issues` and returns a record per registered action.
pub fn apply_repairs(
    context: &mut GenerationContext<'_>,
    issues: &[ValidationIssue],
    attempt: u32,
) -> Vec<RepairActionRecord> {
    let failing: BTreeSet<HardConstraintId> = issues.iter().map(|issue| issue.id).collect();
    let records = REPAIR_ACTIONS
        .iter()
        .map(|action| {
            let changed =
                if failing.contains(&action.constraint) { (action.run)(context) } else { 0 };
            let record = RepairActionRecord {
                id: format!("{}-{attempt}", action.id_prefix),
                description: (action.describe)(changed),
                applied: changed > 0,
            };
            if record.applied {
                debug!(action = %record.id, changed, "repair applied");
            }
            record
        })
        .collect();
    context.refresh_primary_path();
    records
}

/// The repair pass: validate, then repair and re-validate until settled.
///
/// When Balance ran earlier, densities are re-clamped against the settled path before
/// the final validation.
pub fn repair_hard_constraints(context: &mut GenerationContext<'_>) {
    let mut issues = validate_hard_constraints(context);
    context.diagnostics.hard_constraint_issues = issues.clone();

    let max_attempts = context.config.pipeline.max_repair_attempts;
    for attempt in 1..=max_attempts {
        if issues.is_empty() {
            break;
        }
        let records = apply_repairs(context, &issues, attempt);
        let applied_any = records.iter().any(|record| record.applied);
        context.diagnostics.applied_repairs.extend(records);

        issues = validate_hard_constraints(context);
        context.diagnostics.hard_constraint_issues = issues.clone();
        if !applied_any {
            break;
        }
    }

    if context.diagnostics.pass_durations_ms.contains_key(&PassId::Balance) {
        restore_densities(context);
        issues = validate_hard_constraints(context);
        context.diagnostics.hard_constraint_issues = issues.clone();
    }

    if !issues.is_empty() {
        warn!(unresolved = issues.len(), seed = %context.config.seed, "hard constraints unresolved");
        context.diagnostics.warn(format!(
            "Generation completed with {} unresolved hard constraint issue(s).",
            issues.len()
        ));
    }
}
