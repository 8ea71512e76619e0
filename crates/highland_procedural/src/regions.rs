//! # Region Analysis
//!
//! 4-connected flood fill over a `Grid`, used to find plateaus.
//!
//! The fill uses an explicit stack and a dense visited array, so memory is
//! bounded by the grid size and large worlds cannot overflow the call stack.
//! Regions are discovered in row-major order of their first cell, which
//! makes the region list itself deterministic.

use crate::grid::{ElevationGrid, Grid, NEIGHBORS_4};

/// A maximal 4-connected set of cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    width: usize,
    /// Flat indices, in fill order.
    cells: Vec<usize>,
}

impl Region {
    /// Number of cells in the region.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if the region has no cells (never true for a discovered region).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Flat indices of the member cells.
    #[inline]
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.cells
    }

    /// Member cells as `(x, y)`.
    pub fn coords(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().map(|&i| (i % self.width, i / self.width))
    }
}

/// Finds every maximal 4-connected region of cells matching `member`.
pub fn connected_regions<T>(grid: &Grid<T>, mut member: impl FnMut(&T) -> bool) -> Vec<Region> {
    let width = grid.width();
    let cells = grid.as_slice();
    let mut visited = vec![false; cells.len()];
    let mut stack = Vec::new();
    let mut regions = Vec::new();

    for start in 0..cells.len() {
        if visited[start] || !member(&cells[start]) {
            continue;
        }

        visited[start] = true;
        stack.push(start);
        let mut region = Vec::new();

        while let Some(index) = stack.pop() {
            region.push(index);
            let (x, y) = grid.coords_of(index);
            #[allow(clippy::cast_possible_wrap)]
            let (x, y) = (x as i64, y as i64);

            for (dx, dy) in NEIGHBORS_4 {
                let Some(next) = grid.checked_index(x + dx, y + dy) else {
                    continue;
                };
                if !visited[next] && member(&cells[next]) {
                    visited[next] = true;
                    stack.push(next);
                }
            }
        }

        regions.push(Region { width, cells: region });
    }

    regions
}

/// Finds every plateau (4-connected region of elevated cells).
#[must_use]
pub fn plateaus(elevation: &ElevationGrid) -> Vec<Region> {
    connected_regions(elevation, |&h| h > 0)
}
