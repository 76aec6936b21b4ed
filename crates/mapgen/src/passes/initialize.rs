//! Resets the working state and resolves the active template into clamped hints.

use crate::catalog::{PrimaryPathHint, TemplateHints, TownHint};
use crate::context::GenerationContext;
use crate::grid::TileGrid;
use crate::math::clamp_f64;

pub(crate) fn normalize_template_hints(hints: &TemplateHints) -> TemplateHints {
    TemplateHints {
        primary_path: hints.primary_path.map(|path| PrimaryPathHint {
            start_y_ratio: clamp_f64(path.start_y_ratio, 0.1, 0.9),
            min_y_ratio: clamp_f64(path.min_y_ratio.min(path.max_y_ratio), 0.08, 0.92),
            max_y_ratio: clamp_f64(path.min_y_ratio.max(path.max_y_ratio), 0.08, 0.92),
            meander_chance: clamp_f64(path.meander_chance, 0.05, 0.85),
        }),
        town: hints.town.map(|town| TownHint {
            anchor_x_ratio: clamp_f64(town.anchor_x_ratio, 0.05, 0.9),
            anchor_y_ratio: clamp_f64(town.anchor_y_ratio, 0.1, 0.9),
            width_ratio: clamp_f64(town.width_ratio, 0.2, 0.5),
            height_ratio: clamp_f64(town.height_ratio, 0.25, 0.65),
        }),
        encounter_zone: Some(hints.encounter_zone.unwrap_or_default()),
    }
}

fn apply_template_prepass(context: &mut GenerationContext<'_>) {
    context.state.active_template_id = None;
    context.state.template_hints = None;

    let Some(template_id) = context.config.template_id.clone() else {
        return;
    };
    match context.catalog.template(&template_id) {
        Ok(template) => {
            context.state.active_template_id = Some(template.id.clone());
            context.state.template_hints = Some(normalize_template_hints(&template.hints));
        }
        Err(_) => context.diagnostics.warn(format!("Unknown template '{template_id}' ignored.")),
    }
}

pub(crate) fn initialize(context: &mut GenerationContext<'_>) {
    context.grid = TileGrid::filled(
        context.config.dimensions.width,
        context.config.dimensions.height,
        context.base_terrain(),
    );
    context.building_placements.clear();
    context.state.primary_path_cells.clear();
    context.state.reserved_districts.clear();
    context.state.encounter_anchor_cells.clear();
    apply_template_prepass(context);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, EncounterZoneBias};
    use crate::config::{ConfigOverrides, RandomGenerationConfig};
    use crate::grid::Cell;

    fn context_for(template: Option<&str>) -> GenerationContext<'static> {
        let config = RandomGenerationConfig::from_overrides(ConfigOverrides {
            seed: Some("init".to_owned()),
            template_id: template.map(str::to_owned),
            ..ConfigOverrides::default()
        });
        GenerationContext::new(&config, Catalog::builtin())
    }

    #[test]
    fn fills_with_base_terrain_and_resolves_the_template() {
        let mut context = context_for(Some("northern_crossing"));
        context.grid.set(Cell::new(0, 0), 42);
        initialize(&mut context);

        let base = context.base_terrain();
        assert!(context.grid.tiles().iter().all(|&tile| tile == base));
        assert_eq!(context.state.active_template_id.as_deref(), Some("northern_crossing"));
        let hints = context.state.template_hints.expect("hints");
        assert_eq!(hints.encounter_zone, Some(EncounterZoneBias::East));
        assert!(context.diagnostics.warnings.is_empty());
    }

    #[test]
    fn unknown_template_is_ignored_with_a_warning() {
        let mut context = context_for(Some("zone_east"));
        initialize(&mut context);
        assert_eq!(context.state.active_template_id, None);
        assert_eq!(context.diagnostics.warnings, vec!["Unknown template 'zone_east' ignored.".to_owned()]);
    }

    #[test]
    fn hints_are_clamped_and_inverted_bands_swapped() {
        let raw = TemplateHints {
            primary_path: Some(PrimaryPathHint {
                start_y_ratio: 1.4,
                min_y_ratio: 0.95,
                max_y_ratio: 0.01,
                meander_chance: 0.0,
            }),
            town: Some(TownHint {
                anchor_x_ratio: -1.0,
                anchor_y_ratio: 0.5,
                width_ratio: 0.9,
                height_ratio: 0.1,
            }),
            encounter_zone: None,
        };
        let normalized = normalize_template_hints(&raw);
        let path = normalized.primary_path.expect("path");
        assert_eq!(path.start_y_ratio, 0.9);
        assert_eq!((path.min_y_ratio, path.max_y_ratio), (0.08, 0.92));
        assert_eq!(path.meander_chance, 0.05);
        let town = normalized.town.expect("town");
        assert_eq!((town.anchor_x_ratio, town.width_ratio, town.height_ratio), (0.05, 0.5, 0.25));
        assert_eq!(normalized.encounter_zone, Some(EncounterZoneBias::Balanced));
    }
}
