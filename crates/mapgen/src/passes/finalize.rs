//! Soft-goal scoring of the settled map. Scores never gate the result.

use std::collections::BTreeSet;

use crate::config::SoftGoalId;
use crate::context::GenerationContext;
use crate::diagnostics::SoftGoalScore;
use crate::math::clamp_f64;

const VARIETY_TARGET_TILE_KINDS: f64 = 6.0;
const PACING_BANDS: i32 = 8;
const LANDMARK_REACH: u32 = 2;

/// Wider maps for the same path length read as straighter routes.
fn route_readability(context: &GenerationContext<'_>) -> f64 {
    let path_cells = context.grid.count_where(|tile| tile == context.path_tile());
    if path_cells == 0 {
        return 0.0;
    }
    clamp_f64(f64::from(context.width()) / path_cells as f64, 0.0, 1.0)
}

fn biome_variety(context: &GenerationContext<'_>) -> f64 {
    let path_tile = context.path_tile();
    let kinds: BTreeSet<_> = context.grid.tiles().iter().copied().filter(|&tile| tile != path_tile).collect();
    clamp_f64(kinds.len() as f64 / VARIETY_TARGET_TILE_KINDS, 0.0, 1.0)
}

fn town_coherence(context: &GenerationContext<'_>) -> f64 {
    let Some(town) = context.town_district() else {
        return 0.0;
    };
    if context.building_placements.is_empty() {
        return 0.0;
    }
    let inside = context
        .building_placements
        .iter()
        .filter(|placement| town.contains(placement.anchor))
        .count();
    inside as f64 / context.building_placements.len() as f64
}

/// Share of equal-width column bands holding at least one encounter tile.
fn encounter_pacing(context: &GenerationContext<'_>) -> f64 {
    let options = context.encounter_options();
    let width = context.width();
    let bands = PACING_BANDS.min(width).max(1);
    let mut covered = BTreeSet::new();
    for cell in context.grid.cells() {
        if context.grid.get(cell).is_some_and(|tile| options.contains(&tile)) {
            covered.insert(cell.x * bands / width);
        }
    }
    covered.len() as f64 / f64::from(bands)
}

fn landmark_visibility(context: &GenerationContext<'_>) -> f64 {
    if context.building_placements.is_empty() {
        return 0.0;
    }
    let path = context.grid.cells_with(context.path_tile());
    let visible = context
        .building_placements
        .iter()
        .filter(|placement| {
            context.footprint_cells(placement).iter().any(|stamp| {
                path.iter().any(|&cell| cell.manhattan(stamp.cell) <= LANDMARK_REACH)
            })
        })
        .count();
    visible as f64 / context.building_placements.len() as f64
}

pub(crate) fn finalize(context: &mut GenerationContext<'_>) {
    let scores = SoftGoalId::ALL.map(|id| {
        let score = match id {
            SoftGoalId::RouteReadability => route_readability(context),
            SoftGoalId::BiomeVariety => biome_variety(context),
            SoftGoalId::TownCoherence => town_coherence(context),
            SoftGoalId::EncounterPacing => encounter_pacing(context),
            SoftGoalId::LandmarkVisibility => landmark_visibility(context),
        };
        let weight = context.soft_goal_weights.get(id);
        SoftGoalScore { id, score, weight, weighted_score: score * weight }
    });
    context.diagnostics.soft_goal_scores = scores.to_vec();
}
