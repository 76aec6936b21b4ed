//! Archetype presets: eight town routes and four wild regions without a town.

use std::collections::BTreeMap;

use super::{Archetype, BuildingTargetRange, DensityTargets};
use crate::buildings::BuildingId;
use crate::config::{Dimensions, HardConstraintId, SoftGoalWeights};
use crate::passes::PassId;
use crate::tiles::{
    TILE_CAVE, TILE_GRASS, TILE_PATH, TILE_RARE_GRASS, TILE_SURF_WATER, TILE_TALL_GRASS,
    TILE_WATER, TILE_WATER_EDGE, TileId, TileRoles,
};

const TILE_ROCK: TileId = 8;
const TILE_LEGENDARY: TileId = 29;

const TOWN_PASSES: [PassId; 11] = [
    PassId::Initialize,
    PassId::CarvePrimaryPaths,
    PassId::PaintBiomes,
    PassId::ReserveDistricts,
    PassId::PlaceBuildings,
    PassId::PlaceEncounters,
    PassId::PlaceInteractivesAndEntities,
    PassId::Balance,
    PassId::Validate,
    PassId::Repair,
    PassId::Finalize,
];

const WILD_PASSES: [PassId; 9] = [
    PassId::Initialize,
    PassId::CarvePrimaryPaths,
    PassId::PaintBiomes,
    PassId::PlaceEncounters,
    PassId::PlaceInteractivesAndEntities,
    PassId::Balance,
    PassId::Validate,
    PassId::Repair,
    PassId::Finalize,
];

const WILD_CONSTRAINTS: [HardConstraintId; 4] = [
    HardConstraintId::BoundedMap,
    HardConstraintId::KnownTileIdsOnly,
    HardConstraintId::ReachableCriticalPath,
    HardConstraintId::SpawnSafety,
];

fn weights(
    route_readability: f64,
    biome_variety: f64,
    town_coherence: f64,
    encounter_pacing: f64,
    landmark_visibility: f64,
) -> SoftGoalWeights {
    SoftGoalWeights {
        route_readability,
        biome_variety,
        town_coherence,
        encounter_pacing,
        landmark_visibility,
    }
}

fn roles(base_terrain: TileId, water: &[TileId], encounters: &[TileId]) -> TileRoles {
    TileRoles {
        base_terrain,
        primary_path: TILE_PATH,
        water: water.to_vec(),
        encounters: encounters.to_vec(),
    }
}

fn targets(entries: &[(BuildingId, u32, u32)]) -> BTreeMap<BuildingId, BuildingTargetRange> {
    entries
        .iter()
        .map(|&(id, min, max)| (id, BuildingTargetRange::new(min, max)))
        .collect()
}

/// Town routes keep a higher encounter floor than the shared default.
fn town_density() -> DensityTargets {
    DensityTargets { encounter_min_ratio: 0.045, encounter_max_ratio: 0.13, ..DensityTargets::default() }
}

struct TownPreset<'a> {
    id: &'a str,
    label: &'a str,
    description: &'a str,
    dimensions: (usize, usize),
    weights: SoftGoalWeights,
    buildings: &'a [(BuildingId, u32, u32)],
    water: &'a [TileId],
}

fn town_archetype(preset: TownPreset<'_>) -> Archetype {
    Archetype {
        id: preset.id.to_owned(),
        label: preset.label.to_owned(),
        description: preset.description.to_owned(),
        recommended_dimensions: Dimensions::new(preset.dimensions.0, preset.dimensions.1),
        pass_order: TOWN_PASSES.to_vec(),
        required_hard_constraints: HardConstraintId::ALL.to_vec(),
        soft_goal_weights: preset.weights,
        building_targets: targets(preset.buildings),
        tile_roles: roles(TILE_GRASS, preset.water, &[TILE_TALL_GRASS, TILE_RARE_GRASS]),
        density: town_density(),
    }
}

struct WildPreset<'a> {
    id: &'a str,
    label: &'a str,
    description: &'a str,
    dimensions: (usize, usize),
    weights: SoftGoalWeights,
    roles: TileRoles,
    density: DensityTargets,
}

fn wild_archetype(preset: WildPreset<'_>) -> Archetype {
    Archetype {
        id: preset.id.to_owned(),
        label: preset.label.to_owned(),
        description: preset.description.to_owned(),
        recommended_dimensions: Dimensions::new(preset.dimensions.0, preset.dimensions.1),
        pass_order: WILD_PASSES.to_vec(),
        required_hard_constraints: WILD_CONSTRAINTS.to_vec(),
        soft_goal_weights: preset.weights,
        building_targets: BTreeMap::new(),
        tile_roles: preset.roles,
        density: preset.density,
    }
}

pub(super) fn archetype_presets() -> Vec<Archetype> {
    use BuildingId::{
        CaveEntrance, FenceH, FenceV, Gate, Gym, HouseLarge, HouseSmall, Lab, Pokecenter,
        Pokemart, Pond,
    };

    vec![
        town_archetype(TownPreset {
            id: "town_route_basic",
            label: "Town + Route (Basic)",
            description: "A small town on the west edge feeding a single readable route east.",
            dimensions: (32, 22),
            weights: weights(1.3, 1.0, 1.2, 1.0, 0.9),
            buildings: &[
                (Pokecenter, 1, 1),
                (Pokemart, 1, 1),
                (HouseSmall, 1, 2),
                (HouseLarge, 0, 1),
                (FenceH, 0, 1),
            ],
            water: &[],
        }),
        town_archetype(TownPreset {
            id: "coastal_town_route",
            label: "Coastal Town Route",
            description: "Seaside settlement with a pond inland and a breezy route along the shore.",
            dimensions: (34, 22),
            weights: weights(1.1, 1.3, 1.0, 1.1, 1.0),
            buildings: &[
                (Pokecenter, 1, 1),
                (Pokemart, 0, 1),
                (HouseSmall, 1, 2),
                (Pond, 0, 1),
                (FenceH, 0, 1),
            ],
            water: &[TILE_WATER, TILE_WATER_EDGE],
        }),
        town_archetype(TownPreset {
            id: "forest_town_route",
            label: "Forest Town Route",
            description: "Clearing village hemmed in by woods, with a winding trail through the trees.",
            dimensions: (32, 24),
            weights: weights(0.9, 1.4, 1.1, 1.2, 0.8),
            buildings: &[
                (Pokecenter, 1, 1),
                (HouseSmall, 1, 2),
                (HouseLarge, 0, 1),
                (FenceV, 0, 1),
            ],
            water: &[],
        }),
        town_archetype(TownPreset {
            id: "mountain_pass_town_route",
            label: "Mountain Pass Town Route",
            description: "Hillside outpost guarding a switchback pass and a cave mouth.",
            dimensions: (30, 24),
            weights: weights(1.0, 1.1, 1.0, 1.3, 1.2),
            buildings: &[
                (Pokecenter, 1, 1),
                (Pokemart, 0, 1),
                (HouseSmall, 1, 1),
                (CaveEntrance, 0, 1),
            ],
            water: &[],
        }),
        town_archetype(TownPreset {
            id: "riverlands_town_route",
            label: "Riverlands Town Route",
            description: "Market town beside slow water, with a meandering route between ponds.",
            dimensions: (34, 24),
            weights: weights(1.0, 1.3, 1.2, 1.0, 1.1),
            buildings: &[
                (Pokecenter, 1, 1),
                (Pokemart, 1, 1),
                (HouseLarge, 0, 1),
                (HouseSmall, 1, 2),
                (Pond, 0, 1),
            ],
            water: &[TILE_WATER, TILE_WATER_EDGE],
        }),
        town_archetype(TownPreset {
            id: "lakeside_hamlet_route",
            label: "Lakeside Hamlet Route",
            description: "A quiet hamlet with a research lab and a short lakeside stroll.",
            dimensions: (30, 22),
            weights: weights(1.2, 1.2, 1.3, 0.9, 1.0),
            buildings: &[(Lab, 1, 1), (HouseSmall, 1, 2), (Pond, 0, 1)],
            water: &[TILE_WATER, TILE_WATER_EDGE],
        }),
        town_archetype(TownPreset {
            id: "canyon_corridor_route",
            label: "Canyon Corridor Route",
            description: "Walled gate town opening onto a long, narrow canyon corridor.",
            dimensions: (36, 20),
            weights: weights(1.4, 0.9, 1.0, 1.2, 1.1),
            buildings: &[(Pokecenter, 1, 1), (Gate, 0, 1), (HouseSmall, 0, 1)],
            water: &[],
        }),
        town_archetype(TownPreset {
            id: "meadow_outskirts_route",
            label: "Meadow Outskirts Route",
            description: "Open farmland edge with a gym, fenced plots and wide grass fields.",
            dimensions: (34, 22),
            weights: weights(1.1, 1.2, 1.1, 1.3, 1.0),
            buildings: &[
                (Pokecenter, 1, 1),
                (Gym, 0, 1),
                (HouseSmall, 1, 2),
                (FenceH, 0, 2),
            ],
            water: &[],
        }),
        wild_archetype(WildPreset {
            id: "deep_cave",
            label: "Deep Cave",
            description: "Rock-walled tunnels where wild encounters lurk on the cave floor.",
            dimensions: (30, 22),
            weights: weights(0.9, 1.0, 0.5, 1.4, 0.8),
            roles: roles(TILE_ROCK, &[], &[TILE_CAVE, TILE_RARE_GRASS]),
            density: DensityTargets::default(),
        }),
        wild_archetype(WildPreset {
            id: "dense_forest",
            label: "Dense Forest",
            description: "Thick woodland with a narrow trail and frequent tall grass.",
            dimensions: (32, 24),
            weights: weights(0.8, 1.5, 0.5, 1.3, 0.7),
            roles: roles(TILE_GRASS, &[], &[TILE_TALL_GRASS, TILE_RARE_GRASS]),
            density: DensityTargets::default(),
        }),
        wild_archetype(WildPreset {
            id: "safari_zone",
            label: "Safari Zone",
            description: "Sprawling reserve of grass fields with rare and legendary sightings.",
            dimensions: (34, 24),
            weights: weights(1.0, 1.4, 0.5, 1.5, 0.9),
            roles: roles(TILE_GRASS, &[TILE_WATER], &[TILE_TALL_GRASS, TILE_RARE_GRASS, TILE_LEGENDARY]),
            density: DensityTargets { encounter_min_ratio: 0.06, encounter_max_ratio: 0.18, ..DensityTargets::default() },
        }),
        wild_archetype(WildPreset {
            id: "surfing_route",
            label: "Surfing Route",
            description: "Open sea crossing along a boardwalk, with surf encounters on either side.",
            dimensions: (36, 20),
            weights: weights(1.3, 0.8, 0.5, 1.1, 1.0),
            roles: roles(TILE_WATER, &[TILE_WATER, TILE_WATER_EDGE, TILE_SURF_WATER], &[TILE_SURF_WATER]),
            density: DensityTargets::default(),
        }),
    ]
}
