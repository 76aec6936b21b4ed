//! Cell coordinates and the owned row-major tile buffer threaded through generation.

use serde::{Deserialize, Serialize};

use crate::tiles::TileId;

/// Orthogonal neighbour offsets in the order validation and repair probe them.
pub const ORTHOGONAL_OFFSETS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// A grid coordinate. Ordering is column-major: `x` first, then `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }

    pub fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn orthogonal_neighbors(self) -> impl Iterator<Item = Cell> {
        ORTHOGONAL_OFFSETS.into_iter().map(move |(dx, dy)| self.offset(dx, dy))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<TileId>,
}

impl TileGrid {
    pub fn filled(width: usize, height: usize, tile: TileId) -> Self {
        Self { width, height, tiles: vec![tile; width * height] }
    }

    /// Builds a grid from equal-length rows; ragged input is padded with `fill`.
    pub fn from_rows(rows: &[Vec<TileId>], fill: TileId) -> Self {
        let height = rows.len();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut grid = Self::filled(width, height, fill);
        for (y, row) in rows.iter().enumerate() {
            for (x, &tile) in row.iter().enumerate() {
                grid.tiles[y * width + x] = tile;
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tiles(&self) -> &[TileId] {
        &self.tiles
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && (cell.x as usize) < self.width
            && (cell.y as usize) < self.height
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        self.in_bounds(cell).then(|| (cell.y as usize) * self.width + (cell.x as usize))
    }

    pub fn get(&self, cell: Cell) -> Option<TileId> {
        self.index(cell).map(|index| self.tiles[index])
    }

    /// Writes `tile` at `cell`; out-of-bounds writes are ignored and reported as `false`.
    pub fn set(&mut self, cell: Cell, tile: TileId) -> bool {
        match self.index(cell) {
            Some(index) => {
                self.tiles[index] = tile;
                true
            }
            None => false,
        }
    }

    pub fn is(&self, cell: Cell, tile: TileId) -> bool {
        self.get(cell) == Some(tile)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[TileId]> {
        self.tiles.chunks(self.width.max(1))
    }

    /// Every coordinate in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<> {
        let width = self.width as i32;
        let height = self.height as i32;
        (0..height).flat_map(move |y| (0..width).map(move |x| Cell::new(x, y)))
    }

    /// Cells holding `tile`, in row-major order.
    pub fn cells_with(&self, tile: TileId) -> Vec<Cell> {
        self.cells().filter(|&cell| self.is(cell, tile)).collect()
    }

    pub fn count_where(&self, mut predicate: impl FnMut(TileId) -> bool) -> usize {
        self.tiles.iter().filter(|&&tile| predicate(tile)).count()
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, tile: TileId) {
        for iy in y..y + height {
            for ix in x..x + width {
                self.set(Cell::new(ix, iy), tile);
            }
        }
    }

    /// Copies the overlapping region into a `width` x `height` grid padded with `fill`.
    pub fn resized(&self, width: usize, height: usize, fill: TileId) -> Self {
        let mut next = Self::filled(width, height, fill);
        for cell in next.cells() {
            if let Some(tile) = self.get(cell) {
                next.set(cell, tile);
            }
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_access_is_rejected_without_panicking() {
        let mut grid = TileGrid::filled(4, 3, 1);
        assert_eq!(grid.get(Cell::new(-1, 0)), None);
        assert_eq!(grid.get(Cell::new(4, 0)), None);
        assert!(!grid.set(Cell::new(0, 3), 2));
        assert!(grid.set(Cell::new(3, 2), 2));
        assert_eq!(grid.get(Cell::new(3, 2)), Some(2));
    }

    #[test]
    fn cells_with_walks_rows_top_to_bottom() {
        let mut grid = TileGrid::filled(3, 3, 0);
        grid.set(Cell::new(2, 0), 5);
        grid.set(Cell::new(0, 1), 5);
        grid.set(Cell::new(1, 2), 5);
        assert_eq!(grid.cells_with(5), vec![Cell::new(2, 0), Cell::new(0, 1), Cell::new(1, 2)]);
    }

    #[test]
    fn resized_keeps_overlap_and_pads_with_fill() {
        let mut grid = TileGrid::filled(2, 2, 3);
        grid.set(Cell::new(1, 1), 9);
        let next = grid.resized(3, 1, 0);
        assert_eq!(next.width(), 3);
        assert_eq!(next.height(), 1);
        assert_eq!(next.tiles(), &[3, 3, 0]);
    }

    #[test]
    fn from_rows_pads_ragged_rows() {
        let grid = TileGrid::from_rows(&[vec![1, 2, 3], vec![4]], 0);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.rows().nth(1), Some(&[4, 0, 0][..]));
    }

    #[test]
    fn cell_ordering_compares_x_before_y() {
        let mut cells = vec![Cell::new(2, 0), Cell::new(1, 5), Cell::new(1, 2)];
        cells.sort();
        assert_eq!(cells, vec![Cell::new(1, 2), Cell::new(1, 5), Cell::new(2, 0)]);
    }
}
