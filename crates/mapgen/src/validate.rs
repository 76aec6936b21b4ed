//! Hard-constraint validation.
//!
//! Each constraint is an independent check over the context that yields at most one
//! [`ValidationIssue`]. A check runs only when the config policy enables it and the
//! active archetype requires it, so wild archetypes skip the building checks.

mod bounds;
mod buildings;
mod path;

use crate::config::HardConstraintId;
use crate::context::GenerationContext;
use crate::diagnostics::ValidationIssue;

pub(crate) use buildings::{door_groups, footprint_set};
pub use path::resolve_spawn_cell;

pub type ConstraintCheck = fn(&GenerationContext<'_>) -> Option<ValidationIssue>;

pub fn constraint_check(id: HardConstraintId) -> ConstraintCheck {
    match id {
        HardConstraintId::BoundedMap => bounds::bounded_map,
        HardConstraintId::KnownTileIdsOnly => bounds::known_tile_ids_only,
        HardConstraintId::ReachableCriticalPath => path::reachable_critical_path,
        HardConstraintId::BuildingFootprintsInBounds => buildings::footprints_in_bounds,
        HardConstraintId::BuildingDoorConnectivity => buildings::door_connectivity,
        HardConstraintId::MinRequiredStructures => buildings::min_required_structures,
        HardConstraintId::SpawnSafety => path::spawn_safety,
    }
}

/// Constraints checked for this context, in canonical order.
pub fn active_constraints(context: &GenerationContext<'_>) -> Vec<HardConstraintId> {
    HardConstraintId::ALL
        .into_iter()
        .filter(|&id| context.config.hard_constraint_policy.is_enabled(id) && context.archetype.requires(id))
        .collect()
}

pub fn validate_hard_constraints(context: &GenerationContext<'_>) -> Vec<ValidationIssue> {
    active_constraints(context)
        .into_iter()
        .filter_map(|id| constraint_check(id)(context))
        .collect()
}
