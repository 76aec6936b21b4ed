//! The starter template registry.

use super::{EncounterZoneBias, PrimaryPathHint, Template, TemplateHints, TownHint};

fn path(start_y_ratio: f64, min_y_ratio: f64, max_y_ratio: f64, meander_chance: f64) -> PrimaryPathHint {
    PrimaryPathHint { start_y_ratio, min_y_ratio, max_y_ratio, meander_chance }
}

fn town(anchor_x_ratio: f64, anchor_y_ratio: f64, width_ratio: f64, height_ratio: f64) -> TownHint {
    TownHint { anchor_x_ratio, anchor_y_ratio, width_ratio, height_ratio }
}

fn template(
    id: &str,
    label: &str,
    description: &str,
    primary_path: Option<PrimaryPathHint>,
    town: Option<TownHint>,
    encounter_zone: EncounterZoneBias,
) -> Template {
    Template {
        id: id.to_owned(),
        label: label.to_owned(),
        description: description.to_owned(),
        hints: TemplateHints { primary_path, town, encounter_zone: Some(encounter_zone) },
    }
}

pub(super) fn starter_templates() -> Vec<Template> {
    vec![
        template(
            "compact_town_spine",
            "Compact Town Spine",
            "Centered route spine with a compact west-side town core and balanced encounters.",
            Some(path(0.5, 0.35, 0.65, 0.28)),
            Some(town(0.18, 0.5, 0.28, 0.46)),
            EncounterZoneBias::Balanced,
        ),
        template(
            "northern_crossing",
            "Northern Crossing",
            "Upper-route traversal with a north-leaning town placement and east-heavy encounters.",
            Some(path(0.32, 0.16, 0.5, 0.4)),
            Some(town(0.22, 0.34, 0.32, 0.44)),
            EncounterZoneBias::East,
        ),
        template(
            "southern_wilds",
            "Southern Wilds",
            "Lower-route arc with broader town footprint and west-weighted encounter fields.",
            Some(path(0.68, 0.45, 0.84, 0.34)),
            Some(town(0.16, 0.66, 0.34, 0.5)),
            EncounterZoneBias::West,
        ),
        template(
            "central_switchbacks",
            "Central Switchbacks",
            "Mid-map switchback route with medium meander and a compact central town block.",
            Some(path(0.52, 0.26, 0.74, 0.46)),
            Some(town(0.28, 0.5, 0.26, 0.38)),
            EncounterZoneBias::Balanced,
        ),
        template(
            "riverbend_market",
            "Riverbend Market",
            "Path bends north then east; larger riverside town with east-leaning encounters.",
            Some(path(0.44, 0.24, 0.66, 0.38)),
            Some(town(0.2, 0.46, 0.36, 0.52)),
            EncounterZoneBias::East,
        ),
        template(
            "cliffside_detour",
            "Cliffside Detour",
            "Upper-lane detour with tighter vertical movement and a smaller west ridge town.",
            Some(path(0.3, 0.12, 0.48, 0.32)),
            Some(town(0.14, 0.3, 0.24, 0.34)),
            EncounterZoneBias::West,
        ),
        template(
            "eastward_promontory",
            "Eastward Promontory",
            "Route trends toward the east edge, with a modest town plateau and eastern wild zones.",
            Some(path(0.5, 0.3, 0.7, 0.24)),
            Some(town(0.3, 0.54, 0.3, 0.4)),
            EncounterZoneBias::East,
        ),
        template(
            "westwood_weave",
            "Westwood Weave",
            "Forest-edge weave pattern with heavier meander and broad west-side encounter pockets.",
            Some(path(0.56, 0.3, 0.82, 0.5)),
            Some(town(0.18, 0.58, 0.32, 0.46)),
            EncounterZoneBias::West,
        ),
        template(
            "twin_meadow_lane",
            "Twin Meadow Lane",
            "Gentle dual-lane feel with low meander and a wider but shallower town footprint.",
            Some(path(0.48, 0.34, 0.62, 0.2)),
            Some(town(0.24, 0.48, 0.4, 0.32)),
            EncounterZoneBias::Balanced,
        ),
        template(
            "lowland_bypass",
            "Lowland Bypass",
            "Lower bypass route hugging southern terrain with mid-size town and west encounter bias.",
            Some(path(0.7, 0.52, 0.86, 0.3)),
            Some(town(0.22, 0.68, 0.3, 0.42)),
            EncounterZoneBias::West,
        ),
        template(
            "highland_sweep",
            "Highland Sweep",
            "Northern highland sweep with broad arc movement, larger hill town, and eastern encounters.",
            Some(path(0.28, 0.1, 0.46, 0.42)),
            Some(town(0.26, 0.3, 0.34, 0.5)),
            EncounterZoneBias::East,
        ),
        template(
            "winding_passages",
            "Winding Passages",
            "Deep cave with high meander paths and scattered encounter zones.",
            Some(path(0.5, 0.2, 0.8, 0.6)),
            None,
            EncounterZoneBias::Balanced,
        ),
        template(
            "crystal_depths",
            "Crystal Depths",
            "Lower cave region with rare item placement and eastern encounter clusters.",
            Some(path(0.6, 0.4, 0.9, 0.5)),
            None,
            EncounterZoneBias::East,
        ),
        template(
            "ocean_crossing",
            "Ocean Crossing",
            "Direct water route with minimal meander across open sea.",
            Some(path(0.5, 0.35, 0.65, 0.15)),
            None,
            EncounterZoneBias::Balanced,
        ),
        template(
            "archipelago_drift",
            "Archipelago Drift",
            "Winding water path through island chains with western landing points.",
            Some(path(0.45, 0.25, 0.75, 0.4)),
            None,
            EncounterZoneBias::West,
        ),
        template(
            "abyssal_trench",
            "Abyssal Trench",
            "Deep underwater trench with rare encounters in darker depths.",
            Some(path(0.55, 0.4, 0.8, 0.35)),
            None,
            EncounterZoneBias::East,
        ),
        template(
            "coral_reef",
            "Coral Reef",
            "Shallow underwater area with scattered item zones and balanced paths.",
            Some(path(0.5, 0.3, 0.7, 0.25)),
            None,
            EncounterZoneBias::Balanced,
        ),
        template(
            "lava_flows",
            "Lava Flows",
            "Volcano interior with narrow safe paths through lava fields.",
            Some(path(0.5, 0.3, 0.7, 0.3)),
            None,
            EncounterZoneBias::East,
        ),
        template(
            "crater_rim",
            "Crater Rim",
            "Volcanic crater edge with western entry and dangerous eastern zones.",
            Some(path(0.4, 0.2, 0.6, 0.45)),
            None,
            EncounterZoneBias::West,
        ),
        template(
            "beachfront_row",
            "Beachfront Row",
            "Coastal boardwalk with town structures along the western shore.",
            Some(path(0.5, 0.35, 0.65, 0.2)),
            Some(town(0.2, 0.5, 0.35, 0.5)),
            EncounterZoneBias::East,
        ),
        template(
            "pier_plaza",
            "Pier Plaza",
            "Extended pier structure with shops and eastern water access.",
            Some(path(0.48, 0.38, 0.58, 0.15)),
            Some(town(0.15, 0.48, 0.4, 0.45)),
            EncounterZoneBias::Balanced,
        ),
        template(
            "forest_maze",
            "Forest Maze",
            "Dense forest with high meander and scattered hidden items.",
            Some(path(0.5, 0.15, 0.85, 0.65)),
            None,
            EncounterZoneBias::Balanced,
        ),
        template(
            "canopy_trail",
            "Canopy Trail",
            "Forest route with northern bias and concentrated encounter zones.",
            Some(path(0.35, 0.2, 0.55, 0.5)),
            None,
            EncounterZoneBias::West,
        ),
        template(
            "gym_leader_hall",
            "Gym Leader Hall",
            "Symmetrical gym layout with central path to leader position.",
            Some(path(0.5, 0.4, 0.6, 0.1)),
            None,
            EncounterZoneBias::Balanced,
        ),
        template(
            "trainer_gauntlet",
            "Trainer Gauntlet",
            "Gym with southern entry and trainer gauntlet to northern leader.",
            Some(path(0.7, 0.3, 0.85, 0.2)),
            None,
            EncounterZoneBias::Balanced,
        ),
        template(
            "tower_arena",
            "Tower Arena",
            "Battle tower main floor with central arena and western entrance.",
            Some(path(0.5, 0.35, 0.65, 0.15)),
            None,
            EncounterZoneBias::Balanced,
        ),
        template(
            "tower_basement",
            "Tower Basement",
            "Underground battle facility with maze-like layout.",
            Some(path(0.5, 0.25, 0.75, 0.4)),
            None,
            EncounterZoneBias::Balanced,
        ),
        template(
            "summit_path",
            "Summit Path",
            "Steep mountain ascent with western base and eastern peak.",
            Some(path(0.5, 0.2, 0.8, 0.55)),
            None,
            EncounterZoneBias::East,
        ),
        template(
            "cliff_edge",
            "Cliff Edge",
            "Mountain ridge route with northern cliff edge and rare encounters.",
            Some(path(0.3, 0.15, 0.5, 0.35)),
            None,
            EncounterZoneBias::West,
        ),
        template(
            "lunar_surface",
            "Lunar Surface",
            "Alien moon terrain with scattered craters and western landing zone.",
            Some(path(0.5, 0.3, 0.7, 0.4)),
            Some(town(0.15, 0.5, 0.25, 0.4)),
            EncounterZoneBias::East,
        ),
        template(
            "crater_base",
            "Crater Base",
            "Deep lunar crater with central exploration and rare item zones.",
            Some(path(0.55, 0.35, 0.75, 0.5)),
            None,
            EncounterZoneBias::Balanced,
        ),
        template(
            "cruise_deck",
            "Cruise Deck",
            "Ship main deck with western boarding and eastern viewing areas.",
            Some(path(0.5, 0.4, 0.6, 0.1)),
            None,
            EncounterZoneBias::Balanced,
        ),
        template(
            "cargo_hold",
            "Cargo Hold",
            "Ship interior with maze-like cargo arrangement and item zones.",
            Some(path(0.5, 0.3, 0.7, 0.45)),
            None,
            EncounterZoneBias::West,
        ),
        template(
            "zone_north",
            "Zone North",
            "Safari zone northern sector with open encounter fields.",
            Some(path(0.35, 0.15, 0.5, 0.35)),
            None,
            EncounterZoneBias::Balanced,
        ),
        template(
            "zone_south",
            "Zone South",
            "Safari zone southern sector with rare encounter concentration.",
            Some(path(0.65, 0.5, 0.85, 0.4)),
            None,
            EncounterZoneBias::East,
        ),
    ]
}
