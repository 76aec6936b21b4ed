//! Tile ids, the roles the passes assign to them, and the tile catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub type TileId = i32;

pub const TILE_WATER: TileId = 0;
pub const TILE_GRASS: TileId = 1;
pub const TILE_PATH: TileId = 2;
pub const TILE_TREE: TileId = 3;
pub const TILE_DOOR: TileId = 4;
pub const TILE_TALL_GRASS: TileId = 7;
pub const TILE_SIGN: TileId = 9;
pub const TILE_NPC: TileId = 10;
pub const TILE_CAVE: TileId = 15;
pub const TILE_WATER_EDGE: TileId = 17;
pub const TILE_FLOWER: TileId = 19;
pub const TILE_SURF_WATER: TileId = 25;
pub const TILE_RARE_GRASS: TileId = 28;
pub const TILE_HIDDEN_ITEM: TileId = 40;
pub const TILE_ITEM: TileId = 42;

pub const TRAINER_TILE_IDS: [TileId; 4] = [20, 21, 22, 23];
pub const DEFAULT_ENCOUNTER_TILE_IDS: [TileId; 2] = [TILE_TALL_GRASS, TILE_RARE_GRASS];

/// Decorations and entities cleared from the walkway around town roads.
pub const TOWN_PATH_CLUTTER_TILE_IDS: [TileId; 12] = [
    TILE_TREE,
    TILE_TALL_GRASS,
    TILE_SIGN,
    TILE_NPC,
    TILE_FLOWER,
    20,
    21,
    22,
    23,
    TILE_RARE_GRASS,
    TILE_HIDDEN_ITEM,
    TILE_ITEM,
];

pub fn is_trainer(tile: TileId) -> bool {
    TRAINER_TILE_IDS.contains(&tile)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileCategory {
    Terrain,
    Encounter,
    Interactive,
    Entity,
    Trainer,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileDefinition {
    pub id: TileId,
    pub name: String,
    pub color: String,
    pub walkable: bool,
    pub category: TileCategory,
}

/// Which tile ids play the structural roles for one archetype.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRoles {
    pub base_terrain: TileId,
    pub primary_path: TileId,
    #[serde(default)]
    pub water: Vec<TileId>,
    #[serde(default)]
    pub encounters: Vec<TileId>,
}

impl TileRoles {
    pub fn encounter_options(&self) -> &[TileId] {
        if self.encounters.is_empty() { &DEFAULT_ENCOUNTER_TILE_IDS } else { &self.encounters }
    }

    pub fn primary_encounter(&self) -> TileId {
        self.encounter_options().first().copied().unwrap_or(TILE_TALL_GRASS)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileCatalog {
    by_id: BTreeMap<TileId, TileDefinition>,
}

impl TileCatalog {
    pub fn new(definitions: impl IntoIterator<Item = TileDefinition>) -> Self {
        Self { by_id: definitions.into_iter().map(|tile| (tile.id, tile)).collect() }
    }

    pub fn standard() -> Self {
        use TileCategory::{Encounter, Entity, Interactive, Terrain, Trainer};

        let rows: [(TileId, &str, &str, bool, TileCategory); 51] = [
            (0, "Water", "#1a4a7a", false, Terrain),
            (1, "Grass", "#2d5a27", true, Terrain),
            (2, "Path", "#c9a86c", true, Terrain),
            (3, "Tree", "#1a4a1a", false, Terrain),
            (4, "Door", "#8b4513", true, Interactive),
            (5, "Bridge", "#6b4423", true, Terrain),
            (6, "Wall", "#555555", false, Terrain),
            (7, "Tall Grass", "#1a8a1a", true, Encounter),
            (8, "Rock", "#696969", false, Terrain),
            (9, "Sign", "#8b7355", false, Interactive),
            (10, "NPC", "#ff6b6b", false, Entity),
            (11, "Shop", "#ffd93d", false, Entity),
            (12, "Heal", "#6bcb77", false, Entity),
            (13, "Item", "#9d4edd", true, Entity),
            (14, "Key Item", "#e040fb", true, Entity),
            (15, "Cave", "#2c2c2c", true, Encounter),
            (16, "Warp", "#00cec9", true, Interactive),
            (17, "Water Edge", "#2980b9", false, Terrain),
            (18, "Fence", "#795548", false, Terrain),
            (19, "Flower", "#e84393", true, Terrain),
            (20, "Trainer Up", "#ff922b", false, Trainer),
            (21, "Trainer Down", "#ff922b", false, Trainer),
            (22, "Trainer Left", "#ff922b", false, Trainer),
            (23, "Trainer Right", "#ff922b", false, Trainer),
            (24, "Gym Leader", "#ff1744", false, Trainer),
            (25, "Surf Water", "#1e90ff", false, Encounter),
            (26, "Strength Rock", "#8d6e63", false, Interactive),
            (27, "Cut Tree", "#4caf50", false, Interactive),
            (28, "Rare Grass", "#ffd700", true, Encounter),
            (29, "Legendary", "#ff00ff", true, Encounter),
            (30, "Villain Boss", "#800080", false, Trainer),
            (31, "Villain Up", "#4a0080", false, Trainer),
            (32, "Villain Down", "#4a0080", false, Trainer),
            (33, "Villain Left", "#4a0080", false, Trainer),
            (34, "Villain Right", "#4a0080", false, Trainer),
            (35, "Minion Up", "#6a0dad", false, Trainer),
            (36, "Minion Down", "#6a0dad", false, Trainer),
            (37, "Minion Left", "#6a0dad", false, Trainer),
            (38, "Minion Right", "#6a0dad", false, Trainer),
            (39, "Rival", "#dc143c", false, Trainer),
            (40, "Hidden Item", "#4682b4", true, Entity),
            (41, "PC", "#a9a9a9", false, Interactive),
            (42, "Pokeball", "#ff0000", true, Entity),
            (43, "Elite 4", "#c0c0c0", false, Trainer),
            (44, "Champion", "#ffd700", false, Trainer),
            (45, "Champion Alt", "#ffd700", false, Trainer),
            (46, "Rival Final", "#dc143c", false, Trainer),
            (47, "Prof Oak", "#8b4513", false, Entity),
            (48, "Mom", "#dda0dd", false, Entity),
            (49, "Statue", "#d4af37", false, Interactive),
            (50, "Badge", "#00ced1", true, Entity),
        ];

        Self::new(rows.into_iter().map(|(id, name, color, walkable, category)| TileDefinition {
            id,
            name: name.to_owned(),
            color: color.to_owned(),
            walkable,
            category,
        }))
    }

    pub fn get(&self, id: TileId) -> Option<&TileDefinition> {
        self.by_id.get(&id)
    }

    pub fn is_known(&self, id: TileId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Unknown ids are never walkable.
    pub fn is_walkable(&self, id: TileId) -> bool {
        self.get(id).is_some_and(|tile| tile.walkable)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TileDefinition> {
        self.by_id.values()
    }
}
