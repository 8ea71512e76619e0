//! # Collision Mask
//!
//! Walkability grid derived from a generated world, plus the queries the
//! authoritative movement logic and client prediction both call.
//!
//! ## Cell Rule
//!
//! A cell is walkable iff it is not on the outer ring of the grid and any of:
//!
//! - it carries a stair record whose sub-tile is walkable for its biome
//! - it is ground and not in a drop zone (one or two rows below a higher cell)
//! - it is elevated and not a cliff edge (no lower or off-grid 8-neighbor)
//!
//! ```text
//!   . . . . . . .      # = elevated, X = cliff edge / drop zone
//!   . X X X X X .
//!   . X # # # X .      Interior plateau cells are walkable,
//!   . X X X X X .      their rim is not, and neither are the
//!   . X X X X X .      two ground rows under the south face.
//!   . X X X X X .
//!   . . . . . . .
//! ```
//!
//! The mask is immutable after construction, so a single instance can be
//! shared between any number of reader threads.

use serde::{Deserialize, Serialize};
use tracing::debug;

use highland_procedural::grid::NEIGHBORS_8;
use highland_procedural::{ElevationGrid, GeneratedWorld, Grid, StairsGrid};

use crate::error::{validate_tile_size, CollisionError, CollisionResult};
use crate::stair_tiles::record_walkable;

/// World-unit offset of the four destination probes.
pub const PROBE_OFFSET: f32 = 8.0;

/// Moves shorter than this fraction of a tile skip path sampling.
pub const SHORT_MOVE_FRACTION: f32 = 0.3;

/// Path samples are spaced at most this fraction of a tile apart.
pub const PATH_SAMPLE_FRACTION: f32 = 0.25;

/// Upper bound on path samples for a single move.
pub const MAX_PATH_SAMPLES: usize = 1 << 16;

/// Rows below a higher cell that are unwalkable.
const DROP_ROWS: i64 = 2;

const PROBES: [(f32, f32); 4] = [
    (PROBE_OFFSET, 0.0),
    (-PROBE_OFFSET, 0.0),
    (0.0, PROBE_OFFSET),
    (0.0, -PROBE_OFFSET),
];

/// Search directions: N, NE, E, SE, S, SW, W, NW. Diagonals are unit length.
const COMPASS: [(f32, f32); 8] = [
    (0.0, -1.0),
    (std::f32::consts::FRAC_1_SQRT_2, -std::f32::consts::FRAC_1_SQRT_2),
    (1.0, 0.0),
    (std::f32::consts::FRAC_1_SQRT_2, std::f32::consts::FRAC_1_SQRT_2),
    (0.0, 1.0),
    (-std::f32::consts::FRAC_1_SQRT_2, std::f32::consts::FRAC_1_SQRT_2),
    (-1.0, 0.0),
    (-std::f32::consts::FRAC_1_SQRT_2, -std::f32::consts::FRAC_1_SQRT_2),
];

/// A position in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position (grows southward).
    pub y: f32,
}

impl WorldPoint {
    /// Creates a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Boolean walkability grid with its tile size.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionMask {
    pub(crate) walkable: Grid<bool>,
    pub(crate) tile_size: f32,
}

impl CollisionMask {
    /// Derives the mask from elevation and stairs.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if the grids differ in size, or
    /// `InvalidTileSize` if `tile_size` is not finite and positive.
    pub fn build(elevation: &ElevationGrid, stairs: &StairsGrid, tile_size: f32) -> CollisionResult<Self> {
        let tile_size = validate_tile_size(tile_size)?;
        let cells = stairs.cells();
        if !cells.same_shape(elevation) {
            return Err(CollisionError::ShapeMismatch {
                expected_width: elevation.width(),
                expected_height: elevation.height(),
                found_width: cells.width(),
                found_height: cells.height(),
            });
        }

        let walkable = Grid::from_fn(elevation.width(), elevation.height(), |x, y| {
            cell_walkable(elevation, stairs, x, y)
        });
        let mask = Self { walkable, tile_size };

        debug!(
            width = mask.width(),
            height = mask.height(),
            walkable = mask.walkable_count(),
            "collision mask built"
        );
        Ok(mask)
    }

    /// Derives the mask from a generated world.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTileSize` if `tile_size` is not finite and positive.
    pub fn from_world(world: &GeneratedWorld, tile_size: f32) -> CollisionResult<Self> {
        Self::build(&world.elevation, &world.stairs, tile_size)
    }

    /// Width in cells.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.walkable.width()
    }

    /// Height in cells.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.walkable.height()
    }

    /// World units per cell.
    #[inline]
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// The walkability grid.
    #[inline]
    #[must_use]
    pub const fn cells(&self) -> &Grid<bool> {
        &self.walkable
    }

    /// Number of walkable cells.
    #[must_use]
    pub fn walkable_count(&self) -> usize {
        self.walkable.as_slice().iter().filter(|&&w| w).count()
    }

    /// Walkability of a cell. Out of bounds is unwalkable.
    #[inline]
    #[must_use]
    pub fn is_cell_walkable(&self, cell_x: i64, cell_y: i64) -> bool {
        self.walkable.at(cell_x, cell_y).copied().unwrap_or(false)
    }

    /// Cell containing a world position, if the position is finite.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn cell_of(&self, world_x: f32, world_y: f32) -> Option<(i64, i64)> {
        if !world_x.is_finite() || !world_y.is_finite() {
            return None;
        }
        // Saturating casts: far-away points land far outside the grid
        let cx = (world_x / self.tile_size).floor() as i64;
        let cy = (world_y / self.tile_size).floor() as i64;
        Some((cx, cy))
    }

    /// True if the world position lies on a walkable cell.
    #[must_use]
    pub fn is_walkable(&self, world_x: f32, world_y: f32) -> bool {
        self.cell_of(world_x, world_y)
            .is_some_and(|(cx, cy)| self.is_cell_walkable(cx, cy))
    }

    /// True if an entity may move from `(from_x, from_y)` to `(to_x, to_y)`.
    ///
    /// The destination and four probes around it must be walkable. Moves of
    /// at least `SHORT_MOVE_FRACTION` of a tile are also sampled along the
    /// segment every quarter tile; the start itself is not checked.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn can_move(&self, from_x: f32, from_y: f32, to_x: f32, to_y: f32) -> bool {
        let dx = to_x - from_x;
        let dy = to_y - from_y;
        if dx == 0.0 && dy == 0.0 {
            return self.is_walkable(to_x, to_y);
        }
        if !from_x.is_finite() || !from_y.is_finite() || !self.is_walkable(to_x, to_y) {
            return false;
        }
        if !PROBES
            .iter()
            .all(|&(px, py)| self.is_walkable(to_x + px, to_y + py))
        {
            return false;
        }

        let length = (dx * dx + dy * dy).sqrt();
        if length < self.tile_size * SHORT_MOVE_FRACTION {
            return true;
        }

        let steps = path_sample_count(length, self.tile_size);
        (1..=steps).all(|i| {
            let t = i as f32 / steps as f32;
            self.is_walkable(from_x + dx * t, from_y + dy * t)
        })
    }

    /// Nearest walkable position to `(world_x, world_y)`.
    ///
    /// Returns the point itself if walkable. Otherwise probes the eight
    /// compass directions at radius `tile_size`, `2 * tile_size`, ... up to
    /// `max_radius`, returning the first walkable probe. Falls back to the
    /// center of the world.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn find_nearest_walkable(&self, world_x: f32, world_y: f32, max_radius: f32) -> WorldPoint {
        if self.is_walkable(world_x, world_y) {
            return WorldPoint::new(world_x, world_y);
        }

        if world_x.is_finite() && world_y.is_finite() && max_radius >= self.tile_size {
            let (first, last) = self.reachable_rings(world_x, world_y, max_radius);
            for ring in first..=last {
                let radius = ring as f32 * self.tile_size;
                for &(ux, uy) in &COMPASS {
                    let x = world_x + ux * radius;
                    let y = world_y + uy * radius;
                    if self.is_walkable(x, y) {
                        return WorldPoint::new(x, y);
                    }
                }
            }
        }

        let center = self.center();
        debug!(
            x = world_x,
            y = world_y,
            max_radius,
            fallback_x = center.x,
            fallback_y = center.y,
            "no walkable cell in range, falling back to world center"
        );
        center
    }

    /// Geometric center of the world in world units.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn center(&self) -> WorldPoint {
        WorldPoint::new(
            self.width() as f32 * self.tile_size * 0.5,
            self.height() as f32 * self.tile_size * 0.5,
        )
    }

    /// First and last ring whose probes can land on the grid, with the last
    /// ring also bounded by `max_radius`. The span never exceeds the grid's
    /// width plus height, whatever the distance to the grid.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn reachable_rings(&self, x: f32, y: f32, max_radius: f32) -> (usize, usize) {
        let tile = f64::from(self.tile_size);
        let (w, h) = (self.width() as f64 * tile, self.height() as f64 * tile);
        let (x, y) = (f64::from(x), f64::from(y));

        // Nearest and farthest points of the world rectangle
        let near_dx = (-x).max(x - w).max(0.0);
        let near_dy = (-y).max(y - h).max(0.0);
        let far_dx = x.abs().max((w - x).abs());
        let far_dy = y.abs().max((h - y).abs());
        let near = (near_dx * near_dx + near_dy * near_dy).sqrt();
        let far = (far_dx * far_dx + far_dy * far_dy).sqrt() + tile;

        let first = ((near / tile).floor() as usize).max(1);
        let last = (f64::from(max_radius).min(far) / tile).floor() as usize;
        let span = self.width() + self.height() + 2;
        (first, last.min(first.saturating_add(span)))
    }
}

/// Number of evenly spaced samples for a move of `length` world units.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn path_sample_count(length: f32, tile_size: f32) -> usize {
    let steps = (length / (tile_size * PATH_SAMPLE_FRACTION)).ceil();
    (steps as usize).clamp(1, MAX_PATH_SAMPLES)
}

/// True if the cell is on the grid's outer ring.
#[inline]
fn on_ring(width: usize, height: usize, x: usize, y: usize) -> bool {
    x == 0 || y == 0 || x + 1 >= width || y + 1 >= height
}

#[allow(clippy::cast_possible_wrap)]
fn cell_walkable(elevation: &ElevationGrid, stairs: &StairsGrid, x: usize, y: usize) -> bool {
    if on_ring(elevation.width(), elevation.height(), x, y) {
        return false;
    }
    if stairs.get(x, y).is_some_and(record_walkable) {
        return true;
    }

    let own = elevation[(x, y)];
    let (x, y) = (x as i64, y as i64);
    if own == 0 {
        // Drop zone: a higher cell one or two rows up
        !(1..=DROP_ROWS).any(|dy| elevation.at(x, y - dy).is_some_and(|&h| h > own))
    } else {
        // Cliff edge: a lower or missing neighbor
        NEIGHBORS_8
            .iter()
            .all(|(dx, dy)| elevation.at(x + dx, y + dy).is_some_and(|&h| h >= own))
    }
}
