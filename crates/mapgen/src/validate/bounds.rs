use crate::config::HardConstraintId;
use crate::context::GenerationContext;
use crate::diagnostics::ValidationIssue;

pub(super) fn bounded_map(context: &GenerationContext<'_>) -> Option<ValidationIssue> {
    let expected = context.config.dimensions;
    let (width, height) = (context.grid.width(), context.grid.height());
    if width == expected.width && height == expected.height {
        return None;
    }
    Some(ValidationIssue::error(
        HardConstraintId::BoundedMap,
        format!("Grid is {width}x{height} but expected {expected}."),
    ))
}

pub(super) fn known_tile_ids_only(context: &GenerationContext<'_>) -> Option<ValidationIssue> {
    let unknown: Vec<_> = context
        .grid
        .cells()
        .filter(|&cell| context.grid.get(cell).is_none_or(|tile| !context.catalog.tiles.is_known(tile)))
        .collect();
    if unknown.is_empty() {
        return None;
    }
    Some(
        ValidationIssue::error(
            HardConstraintId::KnownTileIdsOnly,
            format!("Found {} cells with unknown tile ids.", unknown.len()),
        )
        .with_cells(unknown),
    )
}
