//! Named generation passes over a shared [`GenerationContext`].
//!
//! Every pass is a plain function looked up by [`PassId`]; the pipeline walks an
//! ordered id list and never branches per archetype.

mod balance;
mod biomes;
mod carve_path;
mod districts;
mod encounters;
mod finalize;
mod initialize;
mod interactives;
mod place_buildings;

pub use balance::{DensityRange, encounter_range, trainer_range};
pub(crate) use balance::restore_densities;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::context::GenerationContext;
use crate::error::MapgenError;
use crate::repair::repair_hard_constraints;
use crate::validate::validate_hard_constraints;

pub type PassRunner = fn(&mut GenerationContext<'_>);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PassId {
    Initialize,
    CarvePrimaryPaths,
    PaintBiomes,
    ReserveDistricts,
    PlaceBuildings,
    PlaceEncounters,
    PlaceInteractivesAndEntities,
    Balance,
    Validate,
    Repair,
    Finalize,
}

impl PassId {
    pub const ALL: [PassId; 11] = [
        Self::Initialize,
        Self::CarvePrimaryPaths,
        Self::PaintBiomes,
        Self::ReserveDistricts,
        Self::PlaceBuildings,
        Self::PlaceEncounters,
        Self::PlaceInteractivesAndEntities,
        Self::Balance,
        Self::Validate,
        Self::Repair,
        Self::Finalize,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::CarvePrimaryPaths => "carvePrimaryPaths",
            Self::PaintBiomes => "paintBiomes",
            Self::ReserveDistricts => "reserveDistricts",
            Self::PlaceBuildings => "placeBuildings",
            Self::PlaceEncounters => "placeEncounters",
            Self::PlaceInteractivesAndEntities => "placeInteractivesAndEntities",
            Self::Balance => "balance",
            Self::Validate => "validate",
            Self::Repair => "repair",
            Self::Finalize => "finalize",
        }
    }

    /// Content passes are the ones an archetype or override may reorder or omit.
    pub fn is_content(self) -> bool {
        !matches!(self, Self::Initialize | Self::Validate | Self::Repair | Self::Finalize)
    }

    pub fn runner(self) -> PassRunner {
        match self {
            Self::Initialize => initialize::initialize,
            Self::CarvePrimaryPaths => carve_path::carve_primary_paths,
            Self::PaintBiomes => biomes::paint_biomes,
            Self::ReserveDistricts => districts::reserve_districts,
            Self::PlaceBuildings => place_buildings::place_buildings,
            Self::PlaceEncounters => encounters::place_encounters,
            Self::PlaceInteractivesAndEntities => interactives::place_interactives_and_entities,
            Self::Balance => balance::balance,
            Self::Validate => validate,
            Self::Repair => repair_hard_constraints,
            Self::Finalize => finalize::finalize,
        }
    }
}

impl fmt::Display for PassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PassId {
    type Err = MapgenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == value)
            .ok_or_else(|| MapgenError::UnknownPass(value.to_owned()))
    }
}

fn validate(context: &mut GenerationContext<'_>) {
    context.diagnostics.hard_constraint_issues = validate_hard_constraints(context);
}

/// The full run order: initialize, the content passes, then validate, repair and finalize.
pub fn resolve_pass_order(content: &[PassId]) -> Vec<PassId> {
    let mut order = vec![PassId::Initialize];
    for &pass in content {
        if pass.is_content() && !order.contains(&pass) {
            order.push(pass);
        }
    }
    order.extend([PassId::Validate, PassId::Repair, PassId::Finalize]);
    order
}
