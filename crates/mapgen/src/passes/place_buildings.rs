//! Town building placement by bounded random trials inside the town district.

use std::collections::BTreeSet;
use std::iter;

use crate::buildings::{BuildingId, Rotation};
use crate::context::{GeneratedBuildingPlacement, GenerationContext, ReservedDistrict};
use crate::grid::Cell;
use crate::rng::SeededRng;
use crate::tiles::{TILE_DOOR, TILE_FLOWER};

const PLACEMENT_ATTEMPTS: usize = 40;
const DOOR_STUB_OFFSETS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Queue of buildings to place: required kinds in fixed order, then a shuffled tail.
fn placement_queue(context: &GenerationContext<'_>, rng_stream: &mut SeededRng) -> Vec<BuildingId> {
    let mut queue = Vec::new();
    for building_id in BuildingId::ALL {
        let Some(target) = context.archetype.building_targets.get(&building_id) else {
            continue;
        };
        let extra = if target.max > target.min {
            rng_stream.int(0, (target.max - target.min) as i32) as u32
        } else {
            0
        };
        queue.extend(iter::repeat_n(building_id, (target.min + extra) as usize));
    }

    let mut tail: Vec<BuildingId> = queue.iter().copied().filter(|id| !id.is_required_kind()).collect();
    rng_stream.shuffle(&mut tail);
    queue.retain(|id| id.is_required_kind());
    queue.extend(tail);
    queue
}

struct Placer<'a> {
    town: &'a ReservedDistrict,
    occupied: BTreeSet<Cell>,
}

impl Placer<'_> {
    fn try_place(
        &mut self,
        context: &mut GenerationContext<'_>,
        rng: &mut SeededRng,
        building_id: BuildingId,
    ) -> Option<GeneratedBuildingPlacement> {
        let base = context.base_terrain();
        let path_tile = context.path_tile();

        for _ in 0..PLACEMENT_ATTEMPTS {
            let rotation = Rotation::from_index(rng.int(0, 3));
            let footprint = context.catalog.buildings.footprint(building_id, rotation);
            let min_x = self.town.x + 1;
            let max_x = self.town.x + self.town.width - footprint.width as i32 - 1;
            let min_y = self.town.y + 1;
            let max_y = self.town.y + self.town.height - footprint.height as i32 - 1;
            if max_x < min_x || max_y < min_y {
                return None;
            }

            let anchor = Cell::new(rng.int(min_x, max_x), rng.int(min_y, max_y));
            let cells: Vec<_> = footprint
                .stamp_cells(anchor, context.grid.width(), context.grid.height())
                .into_iter()
                .filter(|stamp| stamp.in_bounds)
                .collect();
            if cells.len() != footprint.filled_count() {
                continue;
            }
            let blocked = cells.iter().any(|stamp| {
                self.occupied.contains(&stamp.cell)
                    || context.grid.get(stamp.cell).is_none_or(|tile| tile != base && tile != TILE_FLOWER)
            });
            if blocked {
                continue;
            }

            for stamp in &cells {
                context.grid.set(stamp.cell, stamp.tile);
                self.occupied.insert(stamp.cell);
            }

            let own: BTreeSet<Cell> = cells.iter().map(|stamp| stamp.cell).collect();
            for door in cells.iter().filter(|stamp| stamp.tile == TILE_DOOR) {
                let exit = DOOR_STUB_OFFSETS
                    .iter()
                    .map(|&(dx, dy)| door.cell.offset(dx, dy))
                    .find(|&cell| context.grid.in_bounds(cell) && !own.contains(&cell));
                if let Some(exit) = exit
                    && !self.occupied.contains(&exit)
                {
                    context.grid.set(exit, path_tile);
                }
            }

            return Some(GeneratedBuildingPlacement { building_id, rotation, anchor });
        }
        None
    }
}

pub(crate) fn place_buildings(context: &mut GenerationContext<'_>) {
    let mut rng = context.rng.fork("placeBuildings");
    let Some(town) = context.town_district().cloned() else {
        context.diagnostics.warn("Town district missing before building placement.");
        return;
    };

    let queue = placement_queue(context, &mut rng);
    let mut placer = Placer { town: &town, occupied: context.occupied_building_cells() };
    for building_id in queue {
        if let Some(placement) = placer.try_place(context, &mut rng, building_id) {
            context.building_placements.push(placement);
        }
    }

    for (&building_id, target) in &context.archetype.building_targets {
        let placed = context
            .building_placements
            .iter()
            .filter(|placement| placement.building_id == building_id)
            .count();
        if placed < target.min as usize {
            context.diagnostics.warn(format!(
                "Could not place required building {building_id} ({placed}/{}).",
                target.min
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::{ConfigOverrides, RandomGenerationConfig};
    use crate::passes::biomes::paint_biomes;
    use crate::passes::carve_path::carve_primary_paths;
    use crate::passes::districts::reserve_districts;
    use crate::passes::initialize::initialize;

    fn placed(seed: &str, archetype: &str) -> GenerationContext<'static> {
        let config = RandomGenerationConfig::from_overrides(ConfigOverrides {
            seed: Some(seed.to_owned()),
            archetype_id: Some(archetype.to_owned()),
            ..ConfigOverrides::default()
        });
        let mut context = GenerationContext::new(&config, Catalog::builtin());
        initialize(&mut context);
        carve_primary_paths(&mut context);
        paint_biomes(&mut context);
        reserve_districts(&mut context);
        place_buildings(&mut context);
        context
    }

    #[test]
    fn placements_stay_inside_the_town_without_overlap() {
        for seed in ["build-a", "build-b", "build-c", "build-d"] {
            let context = placed(seed, "town_route_basic");
            let town = context.town_district().expect("town").clone();
            let mut seen = BTreeSet::new();
            for placement in &context.building_placements {
                for stamp in context.footprint_cells(placement) {
                    assert!(stamp.in_bounds);
                    assert!(town.contains(stamp.cell), "{seed}: {:?}", placement.building_id);
                    assert!(seen.insert(stamp.cell), "{seed}: overlapping footprints");
                    assert!(context.grid.is(stamp.cell, stamp.tile));
                }
            }
        }
    }

    #[test]
    fn required_buildings_come_first_in_the_queue() {
        let config = RandomGenerationConfig::from_overrides(ConfigOverrides {
            seed: Some("queue".to_owned()),
            archetype_id: Some("coastal_town_route".to_owned()),
            ..ConfigOverrides::default()
        });
        let context = GenerationContext::new(&config, Catalog::builtin());
        let mut rng = context.rng.fork("queue");
        let queue = placement_queue(&context, &mut rng);
        let first_optional = queue.iter().position(|id| !id.is_required_kind()).unwrap_or(queue.len());
        assert!(queue[..first_optional].iter().all(|id| id.is_required_kind()));
        assert!(queue[first_optional..].iter().all(|id| !id.is_required_kind()));
        assert_eq!(queue.first(), Some(&BuildingId::Pokecenter));
    }

    #[test]
    fn missing_town_is_reported_and_skipped() {
        let config = RandomGenerationConfig::from_overrides(ConfigOverrides {
            seed: Some("no-town".to_owned()),
            ..ConfigOverrides::default()
        });
        let mut context = GenerationContext::new(&config, Catalog::builtin());
        initialize(&mut context);
        place_buildings(&mut context);
        assert!(context.building_placements.is_empty());
        assert_eq!(
            context.diagnostics.warnings,
            vec!["Town district missing before building placement.".to_owned()]
        );
    }
}
