//! Primary path synthesis.
//!
//! A route style is drawn from weights shaped by the template meander and the soft-goal
//! weights, a per-column target row series is built for that style, and the spine is
//! walked west to east carving the vertical run into each column before stepping on.
//! Every column therefore holds at least one path cell joined to its neighbour, so the
//! spine is a single edge-to-edge component by construction.

use std::collections::BTreeSet;
use std::f64::consts::PI;

use tracing::debug;

use crate::catalog::EncounterZoneBias;
use crate::context::GenerationContext;
use crate::grid::{Cell, TileGrid};
use crate::math::{clamp_f64, clamp_i32, lerp, round_half_up, smoothstep};
use crate::rng::SeededRng;
use crate::tiles::TileId;

const DEFAULT_MEANDER_CHANCE: f64 = 0.35;
const DEFAULT_WEST_TOWN_INFLUENCE: f64 = 0.24;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RouteStyle {
    StraightSpine,
    GentleSCurve,
    SegmentedBends,
    BranchSpurs,
}

impl RouteStyle {
    const ALL: [RouteStyle; 4] =
        [Self::StraightSpine, Self::GentleSCurve, Self::SegmentedBends, Self::BranchSpurs];

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::StraightSpine => "straightSpine",
            Self::GentleSCurve => "gentleSCurve",
            Self::SegmentedBends => "segmentedBends",
            Self::BranchSpurs => "branchSpurs",
        }
    }
}

struct PathProfile {
    style: RouteStyle,
    amplitude: i32,
    segment_count: i32,
    meander_chance: f64,
    spur_chance: f64,
    max_spurs: usize,
    spur_length_range: (i32, i32),
    spur_lateral_chance: f64,
}

/// Vertical band and reference rows the series is built within.
struct RowBand {
    y_min: i32,
    y_max: i32,
    start_y: i32,
    center_y: i32,
}

impl RowBand {
    fn clamp(&self, y: i32) -> i32 {
        clamp_i32(y, self.y_min, self.y_max)
    }

    fn span(&self) -> i32 {
        (self.y_max - self.y_min).max(1)
    }
}

struct Carver {
    tile: TileId,
    cells: Vec<Cell>,
}

impl Carver {
    fn carve(&mut self, grid: &mut TileGrid, cell: Cell) {
        grid.set(cell, self.tile);
        self.cells.push(cell);
    }
}

fn style_weights(
    context: &GenerationContext<'_>,
    meander_chance: f64,
    zone: EncounterZoneBias,
) -> [f64; 4] {
    let weights = context.soft_goal_weights;
    let readability_bias = clamp_f64(weights.route_readability - 1.0, 0.0, 0.5);
    let variety_bias = clamp_f64(weights.biome_variety - 1.0, 0.0, 0.6);
    let pacing_bias = clamp_f64(weights.encounter_pacing - 1.0, 0.0, 0.6);
    let zone_curve_bonus = if zone == EncounterZoneBias::Balanced { 0.2 } else { 0.45 };

    [
        1.1 + (1.0 - meander_chance) * 1.3 + readability_bias * 1.8,
        0.8 + meander_chance * 1.05 + zone_curve_bonus,
        0.75 + meander_chance * 1.35 + pacing_bias * 1.25,
        0.45 + meander_chance * 0.95 + variety_bias * 1.15,
    ]
}

pub(crate) fn pick_route_style(rng: &mut SeededRng, weights: [f64; 4]) -> RouteStyle {
    let floored = weights.map(|weight| weight.max(0.01));
    let total: f64 = floored.iter().sum();
    let roll = rng.next_f64() * total;
    let mut cumulative = 0.0;
    for (style, weight) in RouteStyle::ALL.into_iter().zip(floored) {
        cumulative += weight;
        if roll <= cumulative {
            return style;
        }
    }
    RouteStyle::BranchSpurs
}

fn zone_scale(zone: EncounterZoneBias, progress: f64, low: f64, high: f64) -> f64 {
    match zone {
        EncounterZoneBias::East => lerp(low, high, progress),
        EncounterZoneBias::West => lerp(high, low, progress),
        EncounterZoneBias::Balanced => 1.0,
    }
}

fn column_progress(x: i32, width: i32) -> f64 {
    if width <= 1 { 0.0 } else { f64::from(x) / f64::from(width - 1) }
}

fn build_target_series(
    width: i32,
    band: &RowBand,
    zone: EncounterZoneBias,
    profile: &PathProfile,
    rng: &mut SeededRng,
) -> Vec<i32> {
    match profile.style {
        RouteStyle::StraightSpine => straight_series(width, band, profile, rng),
        RouteStyle::GentleSCurve => s_curve_series(width, band, zone, profile, rng),
        RouteStyle::SegmentedBends => segmented_series(width, band, zone, profile, rng),
        RouteStyle::BranchSpurs => drifting_series(width, band, zone, profile, rng),
    }
}

fn straight_series(width: i32, band: &RowBand, profile: &PathProfile, rng: &mut SeededRng) -> Vec<i32> {
    let mut current = band.start_y;
    let mut targets = Vec::with_capacity(width as usize);
    for x in 0..width {
        if x > 0 && rng.chance(profile.meander_chance * 0.3) {
            let to_center = band.center_y - current;
            let step = match to_center {
                0 => rng.pick(&[-1, 1]).unwrap_or(1),
                d if d > 0 => 1,
                _ => -1,
            };
            current = band.clamp(current + step);
        }
        targets.push(current);
    }
    targets
}

fn s_curve_series(
    width: i32,
    band: &RowBand,
    zone: EncounterZoneBias,
    profile: &PathProfile,
    rng: &mut SeededRng,
) -> Vec<i32> {
    let phase_shift = match zone {
        EncounterZoneBias::East => PI * 0.2,
        EncounterZoneBias::West => -PI * 0.2,
        EncounterZoneBias::Balanced => 0.0,
    };
    let direction = if rng.chance(0.5) { 1.0 } else { -1.0 };

    (0..width)
        .map(|x| {
            let progress = column_progress(x, width);
            let zone_bias = zone_scale(zone, progress, 0.8, 1.2);
            let wave = (progress * PI * 2.0 + phase_shift).sin();
            let jitter = if rng.chance(profile.meander_chance * 0.25) {
                rng.pick(&[-1, 0, 1]).unwrap_or(0)
            } else {
                0
            };
            let raw = f64::from(band.center_y)
                + direction * wave * f64::from(profile.amplitude) * zone_bias
                + f64::from(jitter);
            band.clamp(round_half_up(raw))
        })
        .collect()
}

fn segmented_series(
    width: i32,
    band: &RowBand,
    zone: EncounterZoneBias,
    profile: &PathProfile,
    rng: &mut SeededRng,
) -> Vec<i32> {
    let segment_count = profile.segment_count.max(2);
    let width_segments = (segment_count - 1).max(1);
    let offset_limit = (f64::from(band.span()) * 0.45).floor() as i32;
    let mut control_points = vec![Cell::new(0, band.start_y)];
    let mut previous_y = band.start_y;

    for index in 1..segment_count {
        let x = round_half_up(f64::from(index * (width - 1)) / f64::from(width_segments));
        let multiplier = zone_scale(zone, f64::from(x) / f64::from((width - 1).max(1)), 0.8, 1.25);
        let offset = rng.int(-profile.amplitude, profile.amplitude);
        let bounded = clamp_i32(round_half_up(f64::from(offset) * multiplier), -offset_limit, offset_limit);
        let target_y = band.clamp(previous_y + bounded);
        control_points.push(Cell::new(x, target_y));
        previous_y = target_y;
    }

    if let Some(last) = control_points.last_mut() {
        let settled = round_half_up(f64::from(last.y + band.center_y) / 2.0);
        *last = Cell::new(width - 1, band.clamp(settled));
    }

    let last_index = control_points.len() - 1;
    (0..width)
        .map(|x| {
            let mut segment = 0;
            while segment + 2 <= last_index && x > control_points[segment + 1].x {
                segment += 1;
            }
            let left = control_points[segment];
            let right = control_points[(segment + 1).min(last_index)];
            let denominator = (right.x - left.x).max(1);
            let t = smoothstep(f64::from(x - left.x) / f64::from(denominator));
            band.clamp(round_half_up(lerp(f64::from(left.y), f64::from(right.y), t)))
        })
        .collect()
}

fn drifting_series(
    width: i32,
    band: &RowBand,
    zone: EncounterZoneBias,
    profile: &PathProfile,
    rng: &mut SeededRng,
) -> Vec<i32> {
    let drift_scale = if zone == EncounterZoneBias::Balanced { 0.55 } else { 0.75 };
    let mut current = band.start_y;
    let mut targets = Vec::with_capacity(width as usize);
    for x in 0..width {
        let progress = column_progress(x, width);
        let center_pull =
            band.clamp(round_half_up(lerp(f64::from(current), f64::from(band.center_y), 0.18)));
        current = if rng.chance(profile.meander_chance * drift_scale) {
            let step = match zone {
                EncounterZoneBias::East => {
                    if progress > 0.5 { 1 } else { -1 }
                }
                EncounterZoneBias::West => {
                    if progress < 0.5 { 1 } else { -1 }
                }
                EncounterZoneBias::Balanced => rng.pick(&[-1, 1]).unwrap_or(1),
            };
            band.clamp(center_pull + step)
        } else {
            center_pull
        };
        targets.push(current);
    }
    targets
}

pub(crate) fn carve_primary_paths(context: &mut GenerationContext<'_>) {
    let width = context.width();
    let height = context.height();
    let hints = context.state.template_hints.unwrap_or_default();
    let path_hint = hints.primary_path;
    let town_hint = hints.town;
    let zone = hints.encounter_zone.unwrap_or_default();
    let style_seed = format!(
        "{}:{}",
        context.config.archetype_id,
        context.state.active_template_id.as_deref().unwrap_or("none")
    );
    let mut profile_rng = context.rng.fork(&format!("carvePrimaryPaths:{style_seed}:profile"));

    let (y_min, y_max) = match path_hint {
        Some(hint) => {
            let y_min = clamp_i32((f64::from(height) * hint.min_y_ratio).floor() as i32, 1, height - 2);
            let y_max = clamp_i32((f64::from(height) * hint.max_y_ratio).ceil() as i32, y_min, height - 2);
            (y_min, y_max)
        }
        None => (
            ((f64::from(height) * 0.2).floor() as i32).max(1),
            ((f64::from(height) * 0.8).ceil() as i32).min(height - 2),
        ),
    };
    let seeded_start_y = match path_hint {
        Some(hint) => round_half_up(f64::from(height) * hint.start_y_ratio),
        None => height / 2,
    };
    let town_center_y = match town_hint {
        Some(hint) => clamp_i32(round_half_up(f64::from(height) * hint.anchor_y_ratio), y_min, y_max),
        None => clamp_i32(round_half_up(f64::from(height) / 2.0), y_min, y_max),
    };
    let meander_chance = path_hint.map_or(DEFAULT_MEANDER_CHANCE, |hint| hint.meander_chance);

    let style = pick_route_style(&mut profile_rng, style_weights(context, meander_chance, zone));
    let weights = context.soft_goal_weights;
    let readability_scale = clamp_f64(1.3 - (weights.route_readability - 1.0) * 0.75, 0.7, 1.3);
    let y_span = (y_max - y_min).max(1);
    let amplitude_base =
        ((f64::from(y_span) * (0.12 + meander_chance * 0.3) * readability_scale).floor() as i32).max(1);
    let segment_base =
        clamp_i32(round_half_up(2.0 + meander_chance * 5.0 + weights.encounter_pacing), 2, 6);
    let spur_base =
        clamp_f64(meander_chance * 0.35 + (weights.biome_variety - 1.0) * 0.2, 0.08, 0.45);

    let profile = PathProfile {
        style,
        amplitude: if style == RouteStyle::StraightSpine {
            ((f64::from(amplitude_base) * 0.55).floor() as i32).max(1)
        } else {
            amplitude_base
        },
        segment_count: if style == RouteStyle::SegmentedBends {
            segment_base
        } else {
            (segment_base - 1).max(2)
        },
        meander_chance,
        spur_chance: if style == RouteStyle::BranchSpurs {
            clamp_f64(spur_base + 0.12, 0.12, 0.6)
        } else {
            spur_base
        },
        max_spurs: clamp_i32(width / 8, 1, 5) as usize,
        spur_length_range: (
            2,
            clamp_i32(
                round_half_up(3.0 + meander_chance * 6.0),
                3,
                ((f64::from(height) * 0.35).floor() as i32).max(4),
            ),
        ),
        spur_lateral_chance: if style == RouteStyle::BranchSpurs { 0.35 } else { 0.2 },
    };
    debug!(style = style.as_str(), amplitude = profile.amplitude, "selected route style");

    let mut carve_rng =
        context.rng.fork(&format!("carvePrimaryPaths:{style_seed}:{}:carve", style.as_str()));
    let start_y = clamp_i32(seeded_start_y + carve_rng.int(-2, 2), y_min, y_max);
    let band = RowBand {
        y_min,
        y_max,
        start_y,
        center_y: clamp_i32(round_half_up(f64::from(start_y * 2 + town_center_y) / 3.0), y_min, y_max),
    };
    let targets = build_target_series(width, &band, zone, &profile, &mut carve_rng);

    let mut carver = Carver { tile: context.path_tile(), cells: Vec::new() };

    let west_influence = town_hint.map_or(DEFAULT_WEST_TOWN_INFLUENCE, |hint| {
        clamp_f64(hint.anchor_x_ratio + hint.width_ratio * 0.6, 0.15, 0.7)
    });
    let mut spine_anchors = Vec::with_capacity(width as usize);
    let mut current_y = targets.first().copied().unwrap_or(start_y);
    for x in 0..width {
        let series_y = targets.get(x as usize).copied().unwrap_or(current_y);
        let town_progress =
            1.0 - clamp_f64(f64::from(x) / f64::from((width - 1).max(1)) / west_influence, 0.0, 1.0);
        let target_y = band.clamp(round_half_up(lerp(
            f64::from(series_y),
            f64::from(town_center_y),
            town_progress * 0.35,
        )));

        let step = if target_y > current_y { 1 } else { -1 };
        while current_y != target_y {
            carver.carve(&mut context.grid, Cell::new(x, current_y));
            current_y += step;
        }
        carver.carve(&mut context.grid, Cell::new(x, current_y));
        spine_anchors.push(Cell::new(x, current_y));
    }

    if profile.style == RouteStyle::BranchSpurs {
        let mut candidates: Vec<Cell> =
            spine_anchors.into_iter().filter(|cell| cell.x > 2 && cell.x < width - 3).collect();
        carve_rng.shuffle(&mut candidates);

        let mut carved_spurs = 0;
        for anchor in candidates {
            if carved_spurs >= profile.max_spurs {
                break;
            }
            if !carve_rng.chance(profile.spur_chance) {
                continue;
            }

            let preferred = if anchor.y < band.center_y { 1 } else { -1 };
            let mut direction = if carve_rng.chance(0.2) { -preferred } else { preferred };
            let (min_length, max_length) = profile.spur_length_range;
            let length = carve_rng.int(min_length, max_length.max(min_length));
            let mut cursor = anchor;

            for _ in 0..length {
                cursor.y = band.clamp(cursor.y + direction);
                if cursor.y == y_min || cursor.y == y_max {
                    direction = -direction;
                }
                carver.carve(&mut context.grid, cursor);

                if carve_rng.chance(profile.spur_lateral_chance) {
                    let choices: [i32; 3] = match zone {
                        EncounterZoneBias::East => [0, 1, 1],
                        EncounterZoneBias::West => [0, -1, -1],
                        EncounterZoneBias::Balanced => [-1, 0, 1],
                    };
                    let lateral = carve_rng.pick(&choices).unwrap_or(0);
                    cursor.x = clamp_i32(cursor.x + lateral, 1, width - 2);
                    carver.carve(&mut context.grid, cursor);
                }
            }
            carved_spurs += 1;
        }
    }

    let mut seen = BTreeSet::new();
    carver.cells.retain(|&cell| seen.insert(cell));
    context.state.primary_path_cells = carver.cells;
}
