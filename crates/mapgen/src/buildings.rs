//! Building stamp matrices, quarter-turn rotation, and footprint projection.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MapgenError;
use crate::grid::Cell;
use crate::tiles::TileId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildingId {
    Pokecenter,
    Pokemart,
    Gym,
    Lab,
    HouseLarge,
    HouseSmall,
    Gate,
    CaveEntrance,
    Pond,
    FenceH,
    FenceV,
}

impl BuildingId {
    /// Candidate order used when building the placement queue.
    pub const ALL: [BuildingId; 11] = [
        Self::Pokecenter,
        Self::Pokemart,
        Self::Gym,
        Self::Lab,
        Self::HouseLarge,
        Self::HouseSmall,
        Self::Gate,
        Self::CaveEntrance,
        Self::Pond,
        Self::FenceH,
        Self::FenceV,
    ];

    /// Town buildings placed ahead of the shuffled decorative tail.
    pub const REQUIRED_ORDER: [BuildingId; 7] = [
        Self::Pokecenter,
        Self::Pokemart,
        Self::Gym,
        Self::Lab,
        Self::HouseLarge,
        Self::HouseSmall,
        Self::Gate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pokecenter => "pokecenter",
            Self::Pokemart => "pokemart",
            Self::Gym => "gym",
            Self::Lab => "lab",
            Self::HouseLarge => "house-large",
            Self::HouseSmall => "house-small",
            Self::Gate => "gate",
            Self::CaveEntrance => "cave-entrance",
            Self::Pond => "pond",
            Self::FenceH => "fence-h",
            Self::FenceV => "fence-v",
        }
    }

    pub fn is_required_kind(self) -> bool {
        Self::REQUIRED_ORDER.contains(&self)
    }
}

impl fmt::Display for BuildingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clockwise quarter turns applied to a stamp before placement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Rotation {
    #[default]
    None,
    Quarter,
    Half,
    ThreeQuarter,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [Self::None, Self::Quarter, Self::Half, Self::ThreeQuarter];

    pub fn quarter_turns(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Quarter => 1,
            Self::Half => 2,
            Self::ThreeQuarter => 3,
        }
    }

    /// Maps any integer onto a rotation, wrapping modulo four.
    pub fn from_index(index: i32) -> Self {
        Self::ALL[index.rem_euclid(4) as usize]
    }
}

impl From<Rotation> for u8 {
    fn from(rotation: Rotation) -> Self {
        rotation.quarter_turns()
    }
}

impl TryFrom<u8> for Rotation {
    type Error = MapgenError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL.get(usize::from(value)).copied().ok_or(MapgenError::InvalidRotation(value))
    }
}

/// A stamp matrix at one rotation. `None` cells are left untouched when stamping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Footprint {
    pub width: usize,
    pub height: usize,
    cells: Vec<Option<TileId>>,
}

/// One non-empty footprint cell projected onto the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StampCell {
    pub cell: Cell,
    pub tile: TileId,
    pub in_bounds: bool,
}

impl Footprint {
    pub fn from_rows(rows: &[&[Option<TileId>]]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.len());
        let mut cells = Vec::with_capacity(width * height);
        for row in rows {
            for x in 0..width {
                cells.push(row.get(x).copied().flatten());
            }
        }
        Self { width, height, cells }
    }

    pub fn tile(&self, x: usize, y: usize) -> Option<TileId> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[y * self.width + x]
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    fn rotated_quarter(&self) -> Self {
        let next_width = self.height;
        let next_height = self.width;
        let mut cells = vec![None; next_width * next_height];
        for y in 0..self.height {
            for x in 0..self.width {
                cells[x * next_width + (self.height - 1 - y)] = self.cells[y * self.width + x];
            }
        }
        Self { width: next_width, height: next_height, cells }
    }

    pub fn rotated(&self, rotation: Rotation) -> Self {
        let mut footprint = self.clone();
        for _ in 0..rotation.quarter_turns() {
            footprint = footprint.rotated_quarter();
        }
        footprint
    }

    /// Projects every non-empty cell onto a `map_width` x `map_height` map at `anchor`.
    pub fn stamp_cells(&self, anchor: Cell, map_width: usize, map_height: usize) -> Vec<StampCell> {
        let mut projected = Vec::with_capacity(self.cells.len());
        for local_y in 0..self.height {
            for local_x in 0..self.width {
                let Some(tile) = self.tile(local_x, local_y) else {
                    continue;
                };
                let cell = anchor.offset(local_x as i32, local_y as i32);
                let in_bounds = cell.x >= 0
                    && cell.y >= 0
                    && (cell.x as usize) < map_width
                    && (cell.y as usize) < map_height;
                projected.push(StampCell { cell, tile, in_bounds });
            }
        }
        projected
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildingDefinition {
    pub id: BuildingId,
    pub name: String,
    pub footprint: Footprint,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildingCatalog {
    by_id: BTreeMap<BuildingId, BuildingDefinition>,
}

impl BuildingCatalog {
    pub fn new(definitions: impl IntoIterator<Item = BuildingDefinition>) -> Self {
        Self { by_id: definitions.into_iter().map(|building| (building.id, building)).collect() }
    }

    pub fn standard() -> Self {
        let s = Some;
        let define = |id: BuildingId, name: &str, rows: &[&[Option<TileId>]]| BuildingDefinition {
            id,
            name: name.to_owned(),
            footprint: Footprint::from_rows(rows),
        };

        Self::new([
            define(BuildingId::Pokecenter, "Pokecenter", &[
                &[s(3), s(3), s(3), s(3)],
                &[s(3), s(4), s(4), s(3)],
                &[s(3), s(4), s(4), s(3)],
                &[s(6), s(4), s(4), s(6)],
            ]),
            define(BuildingId::Pokemart, "Pokemart", &[
                &[s(3), s(3), s(3), s(3)],
                &[s(3), s(6), s(6), s(3)],
                &[s(3), s(11), s(6), s(3)],
                &[s(6), s(4), s(4), s(6)],
            ]),
            define(BuildingId::Gym, "Gym", &[
                &[s(3), s(3), s(3), s(3), s(3)],
                &[s(3), s(6), s(6), s(6), s(3)],
                &[s(3), s(6), s(12), s(6), s(3)],
                &[s(3), s(6), s(4), s(6), s(3)],
                &[s(6), s(6), s(4), s(6), s(6)],
            ]),
            define(BuildingId::HouseSmall, "House Small", &[
                &[s(3), s(3), s(3)],
                &[s(3), s(4), s(3)],
                &[s(6), s(4), s(6)],
            ]),
            define(BuildingId::HouseLarge, "House Large", &[
                &[s(3), s(3), s(3), s(3)],
                &[s(3), s(6), s(6), s(3)],
                &[s(3), s(4), s(6), s(3)],
                &[s(6), s(4), s(6), s(6)],
            ]),
            define(BuildingId::Lab, "Lab", &[
                &[s(3), s(3), s(3), s(3), s(3)],
                &[s(3), s(6), s(6), s(6), s(3)],
                &[s(3), s(4), s(41), s(4), s(3)],
                &[s(6), s(4), s(4), s(4), s(6)],
            ]),
            define(BuildingId::CaveEntrance, "Cave Entrance", &[
                &[s(3), s(3), s(3)],
                &[s(15), s(15), s(15)],
            ]),
            define(BuildingId::Gate, "Gate", &[
                &[s(6), s(6), s(6), s(6)],
                &[s(6), s(16), s(16), s(6)],
                &[s(6), s(6), s(6), s(6)],
            ]),
            define(BuildingId::Pond, "Pond", &[
                &[s(17), s(0), s(0), s(17)],
                &[s(0), s(0), s(0), s(0)],
                &[s(17), s(0), s(0), s(17)],
            ]),
            define(BuildingId::FenceH, "Fence H", &[&[s(18), s(18), s(18), s(18)]]),
            define(BuildingId::FenceV, "Fence V", &[&[s(18)], &[s(18)], &[s(18)], &[s(18)]]),
        ])
    }

    pub fn get(&self, id: BuildingId) -> Option<&BuildingDefinition> {
        self.by_id.get(&id)
    }

    /// The rotated footprint, or an empty one for a building missing from this catalog.
    pub fn footprint(&self, id: BuildingId, rotation: Rotation) -> Footprint {
        self.get(id).map_or_else(
            || Footprint { width: 0, height: 0, cells: Vec::new() },
            |building| building.footprint.rotated(rotation),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_turn_moves_top_row_to_right_column() {
        let footprint = Footprint::from_rows(&[&[Some(1), Some(2), Some(3)], &[Some(4), Some(5), Some(6)]]);
        let rotated = footprint.rotated(Rotation::Quarter);
        assert_eq!((rotated.width, rotated.height), (2, 3));
        assert_eq!(rotated.tile(1, 0), Some(1));
        assert_eq!(rotated.tile(1, 2), Some(3));
        assert_eq!(rotated.tile(0, 0), Some(4));
        assert_eq!(rotated.tile(0, 2), Some(6));
    }

    #[test]
    fn four_quarter_turns_restore_the_original() {
        let catalog = BuildingCatalog::standard();
        for id in BuildingId::ALL {
            let base = catalog.footprint(id, Rotation::None);
            let mut turned = base.clone();
            for _ in 0..4 {
                turned = turned.rotated(Rotation::Quarter);
            }
            assert_eq!(turned, base, "{id} should survive a full turn");
            assert_eq!(catalog.footprint(id, Rotation::Half).filled_count(), base.filled_count());
        }
    }

    #[test]
    fn vertical_fence_is_four_tall_and_one_wide() {
        let fence = BuildingCatalog::standard().footprint(BuildingId::FenceV, Rotation::None);
        assert_eq!((fence.width, fence.height), (1, 4));
        assert_eq!(fence.filled_count(), 4);
    }

    #[test]
    fn stamp_cells_flag_cells_past_the_map_edge() {
        let catalog = BuildingCatalog::standard();
        let footprint = catalog.footprint(BuildingId::HouseSmall, Rotation::None);
        let cells = footprint.stamp_cells(Cell::new(8, 8), 10, 10);
        assert_eq!(cells.len(), 9);
        assert_eq!(cells.iter().filter(|cell| cell.in_bounds).count(), 4);
    }

    #[test]
    fn rotation_round_trips_through_its_wire_form() {
        for rotation in Rotation::ALL {
            assert_eq!(Rotation::try_from(u8::from(rotation)).ok(), Some(rotation));
        }
        assert!(Rotation::try_from(4).is_err());
        assert_eq!(Rotation::from_index(-1), Rotation::ThreeQuarter);
    }
}
