//! # Dense Grids
//!
//! Every per-cell layer of a world (elevation, biome, stairs, walkability)
//! is a `Grid<T>`: a flat `Vec<T>` indexed by `y * width + x`.
//!
//! Membership and neighbor tests are plain index arithmetic. There is no
//! hashing anywhere in the pipeline, so iteration order is always row-major.

use std::ops::{Index, IndexMut};

use crate::biome::Biome;

/// 4-connected neighbor offsets in N, E, S, W order.
pub const NEIGHBORS_4: [(i64, i64); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// 8-connected neighbor offsets, row-major.
pub const NEIGHBORS_8: [(i64, i64); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0),           (1, 0),
    (-1, 1),  (0, 1),  (1, 1),
];

/// Height per cell: 0 = ground, >= 1 = elevated tier.
pub type ElevationGrid = Grid<u8>;

/// Biome per cell.
pub type BiomeGrid = Grid<Biome>;

/// Dense `height x width` grid.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Creates a grid with every cell set to `value`.
    #[must_use]
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width * height],
        }
    }

    /// Resets every cell to `value`.
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }
}

impl<T> Grid<T> {
    /// Builds a grid from row-major cells.
    ///
    /// Returns `None` if `cells.len() != width * height`.
    #[must_use]
    pub fn from_cells(width: usize, height: usize, cells: Vec<T>) -> Option<Self> {
        (cells.len() == width * height).then_some(Self { width, height, cells })
    }

    /// Builds a grid by evaluating `f(x, y)` for every cell, row-major.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(x, y));
            }
        }
        Self { width, height, cells }
    }

    /// Grid width in cells.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if the grid has no cells.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Flat index of `(x, y)`. The caller guarantees the cell is in bounds.
    #[inline]
    #[must_use]
    pub const fn index_of(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Cell coordinates of a flat index.
    #[inline]
    #[must_use]
    pub const fn coords_of(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    /// True if signed coordinates fall inside the grid.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }

    /// Flat index of signed coordinates, or `None` when off-grid.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    pub const fn checked_index(&self, x: i64, y: i64) -> Option<usize> {
        if self.contains(x, y) {
            Some(self.index_of(x as usize, y as usize))
        } else {
            None
        }
    }

    /// Cell at `(x, y)`, or `None` when out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x < self.width && y < self.height {
            self.cells.get(self.index_of(x, y))
        } else {
            None
        }
    }

    /// Mutable cell at `(x, y)`, or `None` when out of bounds.
    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if x < self.width && y < self.height {
            let index = self.index_of(x, y);
            self.cells.get_mut(index)
        } else {
            None
        }
    }

    /// Cell at signed coordinates, or `None` when off-grid.
    #[inline]
    #[must_use]
    pub fn at(&self, x: i64, y: i64) -> Option<&T> {
        self.checked_index(x, y).map(|i| &self.cells[i])
    }

    /// Row-major cell slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    /// Mutable row-major cell slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.cells
    }

    /// Iterates over rows, top to bottom. Always yields `height` rows, even
    /// when they are empty.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.height).map(move |y| &self.cells[y * self.width..(y + 1) * self.width])
    }

    /// Builds a grid of the same shape by mapping every cell.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(f).collect(),
        }
    }

    /// True if `other` has the same dimensions.
    #[inline]
    #[must_use]
    pub const fn same_shape<U>(&self, other: &Grid<U>) -> bool {
        self.width == other.width && self.height == other.height
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    #[inline]
    fn index(&self, (x, y): (usize, usize)) -> &T {
        &self.cells[self.index_of(x, y)]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    #[inline]
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut T {
        let index = self.index_of(x, y);
        &mut self.cells[index]
    }
}

impl ElevationGrid {
    /// True if the cell at signed coordinates exists and is elevated.
    #[inline]
    #[must_use]
    pub fn is_elevated(&self, x: i64, y: i64) -> bool {
        self.at(x, y).is_some_and(|&h| h > 0)
    }

    /// Number of elevated 4-neighbors of `(x, y)`.
    #[must_use]
    pub fn elevated_neighbors_4(&self, x: i64, y: i64) -> usize {
        NEIGHBORS_4
            .iter()
            .filter(|(dx, dy)| self.is_elevated(x + dx, y + dy))
            .count()
    }

    /// Number of elevated cells.
    #[must_use]
    pub fn elevated_count(&self) -> usize {
        self.cells.iter().filter(|&&h| h > 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_indexing() {
        let grid = Grid::from_fn(4, 3, |x, y| y * 10 + x);
        assert_eq!(grid[(3, 2)], 23);
        assert_eq!(grid.index_of(3, 2), 11);
        assert_eq!(grid.coords_of(11), (3, 2));
        assert_eq!(grid.rows().count(), 3);
        assert_eq!(grid.rows().nth(1), Some(&[10, 11, 12, 13][..]));
    }

    #[test]
    fn test_bounds() {
        let grid = Grid::filled(5, 4, 0u8);
        assert!(grid.contains(0, 0));
        assert!(grid.contains(4, 3));
        assert!(!grid.contains(5, 0));
        assert!(!grid.contains(0, 4));
        assert!(!grid.contains(-1, 2));
        assert!(grid.get(5, 0).is_none());
        assert!(grid.at(-1, -1).is_none());
    }

    #[test]
    fn test_from_cells_checks_shape() {
        assert!(Grid::from_cells(2, 2, vec![0u8; 4]).is_some());
        assert!(Grid::from_cells(2, 2, vec![0u8; 5]).is_none());
    }

    #[test]
    fn test_empty_grid() {
        let grid = Grid::filled(0, 0, 0u8);
        assert!(grid.is_empty());
        assert_eq!(grid.rows().count(), 0);
        assert!(!grid.contains(0, 0));
    }

    #[test]
    fn test_zero_width_rows() {
        let grid = Grid::filled(0, 3, 0u8);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.rows().count(), 3);
        assert!(grid.rows().all(<[u8]>::is_empty));

        let tall = Grid::from_fn(1, 4, |_, y| y);
        let rows: Vec<&[usize]> = tall.rows().collect();
        assert_eq!(rows, vec![&[0][..], &[1][..], &[2][..], &[3][..]]);
    }

    #[test]
    fn test_elevated_neighbors() {
        let mut grid = Grid::filled(3, 3, 0u8);
        grid[(1, 1)] = 1;
        grid[(1, 0)] = 1;
        grid[(0, 1)] = 1;
        assert_eq!(grid.elevated_neighbors_4(1, 1), 2);
        assert_eq!(grid.elevated_neighbors_4(0, 0), 2);
        assert_eq!(grid.elevated_count(), 3);
    }
}
