//! Generation configuration: the resolved config a run is built from, the partial
//! overrides callers supply, and the constraint/goal identifiers both share.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, DEFAULT_ARCHETYPE_ID};
use crate::error::{MapgenError, Result};
use crate::passes::PassId;
use crate::seed::generate_runtime_seed;
use crate::tiles::TileId;

pub const MIN_DIMENSION: usize = 12;
pub const MAX_DIMENSION: usize = 256;
pub const DEFAULT_MAX_REPAIR_ATTEMPTS: u32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}

impl Dimensions {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn area(self) -> usize {
        self.width * self.height
    }

    pub fn clamped(self) -> Self {
        Self {
            width: self.width.clamp(MIN_DIMENSION, MAX_DIMENSION),
            height: self.height.clamp(MIN_DIMENSION, MAX_DIMENSION),
        }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HardConstraintId {
    BoundedMap,
    KnownTileIdsOnly,
    ReachableCriticalPath,
    BuildingFootprintsInBounds,
    BuildingDoorConnectivity,
    MinRequiredStructures,
    SpawnSafety,
}

impl HardConstraintId {
    pub const ALL: [HardConstraintId; 7] = [
        Self::BoundedMap,
        Self::KnownTileIdsOnly,
        Self::ReachableCriticalPath,
        Self::BuildingFootprintsInBounds,
        Self::BuildingDoorConnectivity,
        Self::MinRequiredStructures,
        Self::SpawnSafety,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BoundedMap => "boundedMap",
            Self::KnownTileIdsOnly => "knownTileIdsOnly",
            Self::ReachableCriticalPath => "reachableCriticalPath",
            Self::BuildingFootprintsInBounds => "buildingFootprintsInBounds",
            Self::BuildingDoorConnectivity => "buildingDoorConnectivity",
            Self::MinRequiredStructures => "minRequiredStructures",
            Self::SpawnSafety => "spawnSafety",
        }
    }
}

impl fmt::Display for HardConstraintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-constraint enable flags. A constraint absent from the map is enabled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HardConstraintPolicy(BTreeMap<HardConstraintId, bool>);

impl Default for HardConstraintPolicy {
    fn default() -> Self {
        Self(HardConstraintId::ALL.into_iter().map(|id| (id, true)).collect())
    }
}

impl HardConstraintPolicy {
    pub fn is_enabled(&self, id: HardConstraintId) -> bool {
        self.0.get(&id).copied().unwrap_or(true)
    }

    pub fn set(&mut self, id: HardConstraintId, enabled: bool) {
        self.0.insert(id, enabled);
    }

    pub fn with(mut self, id: HardConstraintId, enabled: bool) -> Self {
        self.set(id, enabled);
        self
    }

    /// Disabled constraints in canonical order.
    pub fn disabled(&self) -> Vec<HardConstraintId> {
        HardConstraintId::ALL.into_iter().filter(|&id| !self.is_enabled(id)).collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SoftGoalId {
    RouteReadability,
    BiomeVariety,
    TownCoherence,
    EncounterPacing,
    LandmarkVisibility,
}

impl SoftGoalId {
    pub const ALL: [SoftGoalId; 5] = [
        Self::RouteReadability,
        Self::BiomeVariety,
        Self::TownCoherence,
        Self::EncounterPacing,
        Self::LandmarkVisibility,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RouteReadability => "routeReadability",
            Self::BiomeVariety => "biomeVariety",
            Self::TownCoherence => "townCoherence",
            Self::EncounterPacing => "encounterPacing",
            Self::LandmarkVisibility => "landmarkVisibility",
        }
    }
}

impl fmt::Display for SoftGoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SoftGoalWeights {
    pub route_readability: f64,
    pub biome_variety: f64,
    pub town_coherence: f64,
    pub encounter_pacing: f64,
    pub landmark_visibility: f64,
}

impl Default for SoftGoalWeights {
    fn default() -> Self {
        Self {
            route_readability: 1.0,
            biome_variety: 1.0,
            town_coherence: 1.0,
            encounter_pacing: 1.0,
            landmark_visibility: 1.0,
        }
    }
}

impl SoftGoalWeights {
    pub fn get(&self, id: SoftGoalId) -> f64 {
        match id {
            SoftGoalId::RouteReadability => self.route_readability,
            SoftGoalId::BiomeVariety => self.biome_variety,
            SoftGoalId::TownCoherence => self.town_coherence,
            SoftGoalId::EncounterPacing => self.encounter_pacing,
            SoftGoalId::LandmarkVisibility => self.landmark_visibility,
        }
    }

    fn slot(&mut self, id: SoftGoalId) -> &mut f64 {
        match id {
            SoftGoalId::RouteReadability => &mut self.route_readability,
            SoftGoalId::BiomeVariety => &mut self.biome_variety,
            SoftGoalId::TownCoherence => &mut self.town_coherence,
            SoftGoalId::EncounterPacing => &mut self.encounter_pacing,
            SoftGoalId::LandmarkVisibility => &mut self.landmark_visibility,
        }
    }

    /// Applies finite overrides on top of these weights; non-finite values are ignored.
    pub fn with_overrides(mut self, overrides: &BTreeMap<SoftGoalId, f64>) -> Self {
        for (&id, &weight) in overrides {
            if weight.is_finite() {
                *self.slot(id) = weight;
            }
        }
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOptions {
    #[serde(default)]
    pub pass_order_override: Vec<PassId>,
    #[serde(default = "default_max_repair_attempts")]
    pub max_repair_attempts: u32,
}

fn default_max_repair_attempts() -> u32 {
    DEFAULT_MAX_REPAIR_ATTEMPTS
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self { pass_order_override: Vec::new(), max_repair_attempts: DEFAULT_MAX_REPAIR_ATTEMPTS }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RandomGenerationConfig {
    pub seed: String,
    pub dimensions: Dimensions,
    pub archetype_id: String,
    #[serde(default)]
    pub template_id: Option<String>,
    pub base_fill_tile_id: TileId,
    #[serde(default)]
    pub hard_constraint_policy: HardConstraintPolicy,
    #[serde(default)]
    pub soft_goal_weights_override: BTreeMap<SoftGoalId, f64>,
    #[serde(default)]
    pub pipeline: PipelineOptions,
}

/// Partial configuration; every absent field takes its default in
/// [`RandomGenerationConfig::from_overrides`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub seed: Option<String>,
    pub archetype_id: Option<String>,
    pub template_id: Option<String>,
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub base_fill_tile_id: Option<TileId>,
    pub hard_constraint_policy: Option<HardConstraintPolicy>,
    pub soft_goal_weights_override: Option<BTreeMap<SoftGoalId, f64>>,
    pub pass_order_override: Option<Vec<PassId>>,
    pub max_repair_attempts: Option<u32>,
}

impl ConfigOverrides {
    /// Layers `other` on top of `self`: fields set in `other` win.
    pub fn merged(self, other: ConfigOverrides) -> Self {
        Self {
            seed: other.seed.or(self.seed),
            archetype_id: other.archetype_id.or(self.archetype_id),
            template_id: other.template_id.or(self.template_id),
            width: other.width.or(self.width),
            height: other.height.or(self.height),
            base_fill_tile_id: other.base_fill_tile_id.or(self.base_fill_tile_id),
            hard_constraint_policy: other.hard_constraint_policy.or(self.hard_constraint_policy),
            soft_goal_weights_override: other
                .soft_goal_weights_override
                .or(self.soft_goal_weights_override),
            pass_order_override: other.pass_order_override.or(self.pass_order_override),
            max_repair_attempts: other.max_repair_attempts.or(self.max_repair_attempts),
        }
    }
}

impl RandomGenerationConfig {
    pub fn from_overrides(overrides: ConfigOverrides) -> Self {
        Self::from_overrides_with(overrides, Catalog::builtin())
    }

    /// Fills absent fields from `catalog`. An unknown archetype id is kept as given so
    /// generation can report it; its defaults come from the fallback archetype.
    pub fn from_overrides_with(overrides: ConfigOverrides, catalog: &Catalog) -> Self {
        let archetype_id = overrides.archetype_id.unwrap_or_else(|| DEFAULT_ARCHETYPE_ID.to_owned());
        let preset = catalog.archetype_or_default(&archetype_id);

        Self {
            seed: overrides.seed.unwrap_or_else(generate_runtime_seed),
            dimensions: Dimensions {
                width: overrides.width.unwrap_or(preset.recommended_dimensions.width),
                height: overrides.height.unwrap_or(preset.recommended_dimensions.height),
            },
            archetype_id,
            template_id: overrides.template_id,
            base_fill_tile_id: overrides.base_fill_tile_id.unwrap_or(preset.tile_roles.base_terrain),
            hard_constraint_policy: overrides.hard_constraint_policy.unwrap_or_default(),
            soft_goal_weights_override: overrides.soft_goal_weights_override.unwrap_or_default(),
            pipeline: PipelineOptions {
                pass_order_override: overrides.pass_order_override.unwrap_or_default(),
                max_repair_attempts: overrides
                    .max_repair_attempts
                    .unwrap_or(DEFAULT_MAX_REPAIR_ATTEMPTS),
            },
        }
    }

    /// Rejects what generation would otherwise normalise silently.
    pub fn validate(&self, catalog: &Catalog) -> Result<()> {
        catalog.archetype(&self.archetype_id)?;
        if let Some(template_id) = &self.template_id {
            catalog.template(template_id)?;
        }

        let Dimensions { width, height } = self.dimensions;
        if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&width)
            || !(MIN_DIMENSION..=MAX_DIMENSION).contains(&height)
        {
            return Err(MapgenError::InvalidConfig(format!(
                "dimensions {} outside {MIN_DIMENSION}..={MAX_DIMENSION}",
                self.dimensions
            )));
        }

        if !catalog.tiles.is_known(self.base_fill_tile_id) {
            return Err(MapgenError::InvalidConfig(format!(
                "base fill tile {} is not in the tile catalog",
                self.base_fill_tile_id
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_default_archetype() {
        let config = RandomGenerationConfig::from_overrides(ConfigOverrides {
            seed: Some("fixed".to_owned()),
            ..ConfigOverrides::default()
        });
        let archetype = Catalog::builtin().archetype(DEFAULT_ARCHETYPE_ID).expect("default archetype");

        assert_eq!(config.seed, "fixed");
        assert_eq!(config.archetype_id, DEFAULT_ARCHETYPE_ID);
        assert_eq!(config.dimensions, archetype.recommended_dimensions);
        assert_eq!(config.base_fill_tile_id, archetype.tile_roles.base_terrain);
        assert_eq!(config.pipeline.max_repair_attempts, DEFAULT_MAX_REPAIR_ATTEMPTS);
        assert!(config.pipeline.pass_order_override.is_empty());
        assert!(HardConstraintId::ALL.iter().all(|&id| config.hard_constraint_policy.is_enabled(id)));
        assert!(config.validate(Catalog::builtin()).is_ok());
    }

    #[test]
    fn missing_seed_is_filled_from_the_runtime() {
        let first = RandomGenerationConfig::from_overrides(ConfigOverrides::default());
        let second = RandomGenerationConfig::from_overrides(ConfigOverrides::default());
        assert!(!first.seed.is_empty());
        assert_ne!(first.seed, second.seed);
    }

    #[test]
    fn one_sided_dimension_override_keeps_the_other_recommendation() {
        let config = RandomGenerationConfig::from_overrides(ConfigOverrides {
            seed: Some("dims".to_owned()),
            archetype_id: Some("canyon_corridor_route".to_owned()),
            width: Some(40),
            ..ConfigOverrides::default()
        });
        let archetype = Catalog::builtin().archetype("canyon_corridor_route").expect("canyon");
        assert_eq!(config.dimensions.width, 40);
        assert_eq!(config.dimensions.height, archetype.recommended_dimensions.height);
    }

    #[test]
    fn validate_rejects_unknown_ids_and_degenerate_dimensions() {
        let catalog = Catalog::builtin();
        let base = RandomGenerationConfig::from_overrides(ConfigOverrides {
            seed: Some("v".to_owned()),
            ..ConfigOverrides::default()
        });

        let mut unknown_archetype = base.clone();
        unknown_archetype.archetype_id = "volcano_lair".to_owned();
        assert_eq!(
            unknown_archetype.validate(catalog),
            Err(MapgenError::UnknownArchetype("volcano_lair".to_owned()))
        );

        let mut unknown_template = base.clone();
        unknown_template.template_id = Some("nowhere".to_owned());
        assert_eq!(
            unknown_template.validate(catalog),
            Err(MapgenError::UnknownTemplate("nowhere".to_owned()))
        );

        let mut tiny = base.clone();
        tiny.dimensions = Dimensions::new(4, 30);
        assert!(matches!(tiny.validate(catalog), Err(MapgenError::InvalidConfig(_))));

        let mut bad_tile = base;
        bad_tile.base_fill_tile_id = 999;
        assert!(matches!(bad_tile.validate(catalog), Err(MapgenError::InvalidConfig(_))));
    }

    #[test]
    fn policy_lists_disabled_constraints_in_canonical_order() {
        let policy = HardConstraintPolicy::default()
            .with(HardConstraintId::SpawnSafety, false)
            .with(HardConstraintId::BoundedMap, false);
        assert_eq!(policy.disabled(), vec![HardConstraintId::BoundedMap, HardConstraintId::SpawnSafety]);

        let sparse: HardConstraintPolicy =
            serde_json::from_str(r#"{"knownTileIdsOnly": false}"#).expect("policy json");
        assert!(sparse.is_enabled(HardConstraintId::BoundedMap));
        assert!(!sparse.is_enabled(HardConstraintId::KnownTileIdsOnly));
    }

    #[test]
    fn weight_overrides_replace_only_named_goals() {
        let overrides = BTreeMap::from([(SoftGoalId::TownCoherence, 0.25), (SoftGoalId::BiomeVariety, f64::NAN)]);
        let weights = SoftGoalWeights::default().with_overrides(&overrides);
        assert_eq!(weights.town_coherence, 0.25);
        assert_eq!(weights.biome_variety, 1.0);
    }

    #[test]
    fn later_overrides_win_when_merged() {
        let file = ConfigOverrides {
            seed: Some("file".to_owned()),
            width: Some(30),
            ..ConfigOverrides::default()
        };
        let flags = ConfigOverrides { seed: Some("flag".to_owned()), ..ConfigOverrides::default() };
        let merged = file.merged(flags);
        assert_eq!(merged.seed.as_deref(), Some("flag"));
        assert_eq!(merged.width, Some(30));
    }
}
