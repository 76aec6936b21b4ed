use crate::context::GenerationContext;

pub(super) fn normalize_grid_bounds(context: &mut GenerationContext<'_>) -> usize {
    let expected = context.config.dimensions;
    if context.grid.width() == expected.width && context.grid.height() == expected.height {
        return 0;
    }
    context.grid = context.grid.resized(expected.width, expected.height, context.base_terrain());
    1
}

pub(super) fn replace_unknown_tile_ids(context: &mut GenerationContext<'_>) -> usize {
    let base = context.base_terrain();
    let unknown: Vec<_> = context
        .grid
        .cells()
        .filter(|&cell| context.grid.get(cell).is_some_and(|tile| !context.catalog.tiles.is_known(tile)))
        .collect();
    for &cell in &unknown {
        context.grid.set(cell, base);
    }
    unknown.len()
}
