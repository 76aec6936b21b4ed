//! Town reservation: a rectangle blended between the template anchor and where the
//! spine actually crosses, cleared to base terrain and crossed by one road each way.

use crate::context::{GenerationContext, ROUTE_EAST_DISTRICT_ID, ReservedDistrict, TOWN_DISTRICT_ID};
use crate::grid::Cell;
use crate::math::{clamp_i32, round_half_up};

const DEFAULT_TOWN_WIDTH_RATIO: f64 = 0.3;
const DEFAULT_TOWN_HEIGHT_RATIO: f64 = 0.5;
const DEFAULT_TOWN_ANCHOR_X_RATIO: f64 = 0.18;

/// Row of the first recorded path cell in column `x`.
pub(crate) fn primary_path_y(cells: &[Cell], x: i32) -> Option<i32> {
    cells.iter().find(|cell| cell.x == x).map(|cell| cell.y)
}

pub(crate) fn reserve_districts(context: &mut GenerationContext<'_>) {
    let mut rng = context.rng.fork("reserveDistricts");
    let width = context.width();
    let height = context.height();
    let town_hint = context.state.template_hints.and_then(|hints| hints.town);

    let town_width = clamp_i32(
        (f64::from(width) * town_hint.map_or(DEFAULT_TOWN_WIDTH_RATIO, |hint| hint.width_ratio)).floor()
            as i32,
        8,
        14,
    );
    let town_height = clamp_i32(
        (f64::from(height) * town_hint.map_or(DEFAULT_TOWN_HEIGHT_RATIO, |hint| hint.height_ratio))
            .floor() as i32,
        7,
        12,
    );
    let anchor_x_ratio = town_hint.map_or(DEFAULT_TOWN_ANCHOR_X_RATIO, |hint| hint.anchor_x_ratio);
    let anchor_x = clamp_i32(
        (f64::from(width) * anchor_x_ratio).floor() as i32 + rng.int(-2, 2),
        1,
        width - town_width - 1,
    );
    let path_y = primary_path_y(&context.state.primary_path_cells, anchor_x).unwrap_or(height / 2);
    let anchor_y_from_path = path_y - town_height / 2;
    let anchor_y_from_ratio = town_hint.map_or(anchor_y_from_path, |hint| {
        (f64::from(height) * hint.anchor_y_ratio).floor() as i32 - town_height / 2
    });
    let anchor_y = clamp_i32(
        round_half_up(f64::from(anchor_y_from_path + anchor_y_from_ratio) / 2.0),
        1,
        height - town_height - 1,
    );

    let base = context.base_terrain();
    let path_tile = context.path_tile();
    context.grid.fill_rect(anchor_x, anchor_y, town_width, town_height, base);

    let road_y = clamp_i32(path_y, anchor_y + 1, anchor_y + town_height - 2);
    let road_x = clamp_i32(anchor_x + town_width / 2, anchor_x + 1, anchor_x + town_width - 2);
    for x in anchor_x..anchor_x + town_width {
        context.grid.set(Cell::new(x, road_y), path_tile);
    }
    for y in anchor_y..anchor_y + town_height {
        context.grid.set(Cell::new(road_x, y), path_tile);
    }

    let districts = [
        ReservedDistrict {
            id: TOWN_DISTRICT_ID.to_owned(),
            x: anchor_x,
            y: anchor_y,
            width: town_width,
            height: town_height,
        },
        ReservedDistrict {
            id: ROUTE_EAST_DISTRICT_ID.to_owned(),
            x: anchor_x + town_width,
            y: 1,
            width: width - (anchor_x + town_width) - 1,
            height: height - 2,
        },
    ];

    context.state.reserved_districts.clear();
    for district in districts {
        if district.is_empty() {
            context.diagnostics.warn(format!("Reserved district '{}' has zero area.", district.id));
            continue;
        }
        context.state.reserved_districts.push(district);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::{ConfigOverrides, RandomGenerationConfig};
    use crate::passes::carve_path::carve_primary_paths;
    use crate::passes::initialize::initialize;

    fn reserved(seed: &str, template: Option<&str>, width: usize, height: usize) -> GenerationContext<'static> {
        let config = RandomGenerationConfig::from_overrides(ConfigOverrides {
            seed: Some(seed.to_owned()),
            template_id: template.map(str::to_owned),
            width: Some(width),
            height: Some(height),
            ..ConfigOverrides::default()
        });
        let mut context = GenerationContext::new(&config, Catalog::builtin());
        initialize(&mut context);
        carve_primary_paths(&mut context);
        reserve_districts(&mut context);
        context
    }

    #[test]
    fn town_fits_inside_the_map_with_a_margin() {
        for seed in ["district-a", "district-b", "district-c"] {
            let context = reserved(seed, Some("riverbend_market"), 34, 24);
            let town = context.town_district().expect("town district");
            assert!((8..=14).contains(&town.width));
            assert!((7..=12).contains(&town.height));
            assert!(town.x >= 1 && town.x + town.width < 34);
            assert!(town.y >= 1 && town.y + town.height < 24);
        }
    }

    #[test]
    fn town_is_crossed_by_both_roads() {
        let context = reserved("district-roads", None, 32, 22);
        let town = context.town_district().expect("town district").clone();
        let path_tile = context.path_tile();
        let full_rows = (town.y..town.y + town.height)
            .filter(|&y| (town.x..town.x + town.width).all(|x| context.grid.is(Cell::new(x, y), path_tile)))
            .count();
        let full_columns = (town.x..town.x + town.width)
            .filter(|&x| (town.y..town.y + town.height).all(|y| context.grid.is(Cell::new(x, y), path_tile)))
            .count();
        assert!(full_rows >= 1);
        assert!(full_columns >= 1);
    }

    #[test]
    fn cramped_maps_drop_the_empty_route_district_with_a_warning() {
        let context = reserved("district-cramped", Some("eastward_promontory"), 12, 12);
        assert!(context.town_district().is_some());
        if context.state.reserved_districts.len() == 1 {
            assert_eq!(
                context.diagnostics.warnings,
                vec!["Reserved district 'route_east' has zero area.".to_owned()]
            );
        }
    }

    #[test]
    fn path_row_lookup_uses_the_first_cell_in_the_column() {
        let cells = [Cell::new(0, 4), Cell::new(1, 4), Cell::new(1, 5), Cell::new(1, 6)];
        assert_eq!(primary_path_y(&cells, 1), Some(4));
        assert_eq!(primary_path_y(&cells, 7), None);
    }
}
