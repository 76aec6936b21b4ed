//! Immutable static data consumed by generation: tiles, building stamps, archetype
//! presets and starter templates, bundled into one injectable [`Catalog`].

mod archetypes;
mod templates;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::buildings::{BuildingCatalog, BuildingId};
use crate::config::{Dimensions, HardConstraintId, SoftGoalWeights};
use crate::error::{MapgenError, Result};
use crate::passes::PassId;
use crate::tiles::{TileCatalog, TileRoles};

pub const DEFAULT_ARCHETYPE_ID: &str = "town_route_basic";

static BUILTIN: LazyLock<Catalog> = LazyLock::new(Catalog::standard);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingTargetRange {
    pub min: u32,
    pub max: u32,
}

impl BuildingTargetRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

/// Density ranges the balance pass steers toward.
///
/// Trainer ratios are relative to the primary-path cell count, encounter ratios to
/// the map area.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DensityTargets {
    pub trainer_min_ratio: f64,
    pub trainer_max_ratio: f64,
    pub encounter_min_ratio: f64,
    pub encounter_cap_ratio: f64,
    pub encounter_max_ratio: f64,
    pub min_encounter_cells: usize,
}

impl Default for DensityTargets {
    fn default() -> Self {
        Self {
            trainer_min_ratio: 0.04,
            trainer_max_ratio: 0.16,
            encounter_min_ratio: 0.035,
            encounter_cap_ratio: 0.1,
            encounter_max_ratio: 0.14,
            min_encounter_cells: 8,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Archetype {
    pub id: String,
    pub label: String,
    pub description: String,
    pub recommended_dimensions: Dimensions,
    pub pass_order: Vec<PassId>,
    pub required_hard_constraints: Vec<HardConstraintId>,
    pub soft_goal_weights: SoftGoalWeights,
    pub building_targets: BTreeMap<BuildingId, BuildingTargetRange>,
    pub tile_roles: TileRoles,
    #[serde(default)]
    pub density: DensityTargets,
}

impl Archetype {
    pub fn requires(&self, constraint: HardConstraintId) -> bool {
        self.required_hard_constraints.contains(&constraint)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterZoneBias {
    #[default]
    Balanced,
    West,
    East,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrimaryPathHint {
    pub start_y_ratio: f64,
    pub min_y_ratio: f64,
    pub max_y_ratio: f64,
    pub meander_chance: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TownHint {
    pub anchor_x_ratio: f64,
    pub anchor_y_ratio: f64,
    pub width_ratio: f64,
    pub height_ratio: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateHints {
    #[serde(default)]
    pub primary_path: Option<PrimaryPathHint>,
    #[serde(default)]
    pub town: Option<TownHint>,
    #[serde(default)]
    pub encounter_zone: Option<EncounterZoneBias>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub label: String,
    pub description: String,
    pub hints: TemplateHints,
}

#[derive(Clone, Debug)]
pub struct Catalog {
    pub tiles: TileCatalog,
    pub buildings: BuildingCatalog,
    archetypes: Vec<Archetype>,
    templates: Vec<Template>,
}

impl Catalog {
    /// Bundles custom tables. The archetype registry must not be empty, since unknown
    /// archetype ids resolve to a registered fallback.
    pub fn new(
        tiles: TileCatalog,
        buildings: BuildingCatalog,
        archetypes: Vec<Archetype>,
        templates: Vec<Template>,
    ) -> Result<Self> {
        if archetypes.is_empty() {
            return Err(MapgenError::InvalidCatalog("archetype registry is empty".to_owned()));
        }
        Ok(Self { tiles, buildings, archetypes, templates })
    }

    pub fn standard() -> Self {
        Self {
            tiles: TileCatalog::standard(),
            buildings: BuildingCatalog::standard(),
            archetypes: archetypes::archetype_presets(),
            templates: templates::starter_templates(),
        }
    }

    /// The process-wide read-only standard catalog.
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    pub fn archetypes(&self) -> &[Archetype] {
        &self.archetypes
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn archetype(&self, id: &str) -> Result<&Archetype> {
        self.archetypes
            .iter()
            .find(|archetype| archetype.id == id)
            .ok_or_else(|| MapgenError::UnknownArchetype(id.to_owned()))
    }

    /// `id` when it exists, else the default archetype, else the first one registered.
    pub fn archetype_or_default(&self, id: &str) -> &Archetype {
        self.archetype(id)
            .or_else(|_| self.archetype(DEFAULT_ARCHETYPE_ID))
            .unwrap_or(&self.archetypes[0])
    }

    pub fn template(&self, id: &str) -> Result<&Template> {
        self.templates
            .iter()
            .find(|template| template.id == id)
            .ok_or_else(|| MapgenError::UnknownTemplate(id.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn registries_have_unique_ids() {
        let catalog = Catalog::builtin();
        let archetype_ids: BTreeSet<_> = catalog.archetypes().iter().map(|a| a.id.as_str()).collect();
        let template_ids: BTreeSet<_> = catalog.templates().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(archetype_ids.len(), catalog.archetypes().len());
        assert_eq!(archetype_ids.len(), 12);
        assert_eq!(template_ids.len(), catalog.templates().len());
        assert_eq!(template_ids.len(), 35);
    }

    #[test]
    fn archetype_data_stays_within_catalog_and_limits() {
        let catalog = Catalog::builtin();
        for archetype in catalog.archetypes() {
            let roles = &archetype.tile_roles;
            assert!(catalog.tiles.is_walkable(roles.primary_path), "{}", archetype.id);
            assert!(catalog.tiles.is_known(roles.base_terrain), "{}", archetype.id);
            assert!(roles.encounter_options().iter().all(|&tile| catalog.tiles.is_known(tile)));
            assert_eq!(archetype.pass_order.first(), Some(&PassId::Initialize));
            for range in archetype.building_targets.values() {
                assert!(range.min <= range.max, "{}", archetype.id);
            }
            let dims = archetype.recommended_dimensions;
            assert_eq!(dims, dims.clamped(), "{}", archetype.id);
        }
    }

    #[test]
    fn lookups_report_unknown_ids() {
        let catalog = Catalog::builtin();
        assert!(catalog.archetype("coastal_town_route").is_ok());
        assert_eq!(
            catalog.template("zone_east").err(),
            Some(MapgenError::UnknownTemplate("zone_east".to_owned()))
        );
        assert_eq!(catalog.archetype_or_default("missing").id, DEFAULT_ARCHETYPE_ID);
        assert!(
            Catalog::new(TileCatalog::standard(), BuildingCatalog::standard(), Vec::new(), Vec::new())
                .is_err()
        );
    }

    #[test]
    fn templates_without_a_town_hint_still_carry_a_zone_bias() {
        let template = Catalog::builtin().template("winding_passages").expect("template");
        assert!(template.hints.town.is_none());
        assert_eq!(template.hints.encounter_zone, Some(EncounterZoneBias::Balanced));
    }
}
