//! # Elevation Generator
//!
//! Places organically shaped plateaus into the elevation grid.
//!
//! ## Pipeline
//!
//! 1. Partition the world into a `n x n` array of placement regions, one
//!    plateau per region.
//! 2. Pick a jittered center per region, keeping an edge buffer.
//! 3. Grow: a 3x3 core unconditionally, then noise-times-falloff cells
//!    within a random radius.
//! 4. Flatten regions smaller than the minimum footprint.
//! 5. Cleanup passes remove protrusions and tendrils.
//! 6. Flatten undersized regions once more.
//!
//! Steps always run in this order. Cleanup relies on step 4 having run.

use tracing::{debug, trace};

use crate::config::ElevationParams;
use crate::grid::{ElevationGrid, Grid};
use crate::noise::SimplexNoise;
use crate::regions::plateaus;
use crate::rng::WorldRng;

/// Elevation value written for plateau cells.
pub const PLATEAU_TIER: u8 = 1;

/// Half-open rectangle of cells `[x0, x1) x [y0, y1)` that hosts one plateau.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementRegion {
    /// Left column (inclusive).
    pub x0: i64,
    /// Top row (inclusive).
    pub y0: i64,
    /// Right column (exclusive).
    pub x1: i64,
    /// Bottom row (exclusive).
    pub y1: i64,
}

impl PlacementRegion {
    /// Region width in cells.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> i64 {
        self.x1 - self.x0
    }

    /// Region height in cells.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> i64 {
        self.y1 - self.y0
    }
}

/// Number of regions per side so that `n * n >= target`.
#[must_use]
pub fn regions_per_side(width: usize, height: usize, params: &ElevationParams) -> usize {
    let area = width * height;
    let target = params
        .min_plateaus
        .max(area / params.area_per_plateau.max(1))
        .max(1);

    let mut n = 1;
    while n * n < target {
        n += 1;
    }
    n
}

/// Splits the world into placement regions, row-major.
///
/// The last row and column absorb the division remainder.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn placement_regions(width: usize, height: usize, params: &ElevationParams) -> Vec<PlacementRegion> {
    let n = regions_per_side(width, height, params);
    let region_w = (width / n) as i64;
    let region_h = (height / n) as i64;
    let (width, height) = (width as i64, height as i64);
    let last = n as i64 - 1;

    let mut regions = Vec::with_capacity(n * n);
    for gy in 0..=last {
        for gx in 0..=last {
            let x0 = gx * region_w;
            let y0 = gy * region_h;
            regions.push(PlacementRegion {
                x0,
                y0,
                x1: if gx == last { width } else { x0 + region_w },
                y1: if gy == last { height } else { y0 + region_h },
            });
        }
    }
    regions
}

/// A chosen plateau seed point and growth radius.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlateauCandidate {
    /// Center column.
    pub x: i64,
    /// Center row.
    pub y: i64,
    /// Growth radius after the region cap.
    pub radius: i64,
}

/// Picks a candidate center for `region`.
///
/// Always draws exactly three values (x jitter, y jitter, radius), so the
/// stream position after a region does not depend on whether it was skipped.
/// Returns `None` when the region cannot hold a 3x3 core plus its buffer.
#[allow(clippy::cast_possible_wrap, clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn pick_candidate(
    region: &PlacementRegion,
    rng: &mut WorldRng,
    params: &ElevationParams,
) -> Option<PlateauCandidate> {
    let jitter_x = rng.next_signed();
    let jitter_y = rng.next_signed();
    let raw_radius = rng.range_inclusive(params.min_radius as i64, params.max_radius as i64);

    let buffer = params.edge_buffer as i64;
    // Inclusive interior a plateau may occupy
    let (lo_x, hi_x) = (region.x0 + buffer, region.x1 - 1 - buffer);
    let (lo_y, hi_y) = (region.y0 + buffer, region.y1 - 1 - buffer);
    // The 3x3 core needs one cell of slack on every side of the center
    let center_ok = |x: i64, y: i64| x - 1 >= lo_x && x + 1 <= hi_x && y - 1 >= lo_y && y + 1 <= hi_y;

    let mid_x = (region.x0 + region.x1) / 2;
    let mid_y = (region.y0 + region.y1) / 2;
    let x = mid_x + (jitter_x * region.width() as f64 * params.region_jitter) as i64;
    let y = mid_y + (jitter_y * region.height() as f64 * params.region_jitter) as i64;

    let (x, y) = if center_ok(x, y) {
        (x, y)
    } else if center_ok(mid_x, mid_y) {
        (mid_x, mid_y)
    } else {
        return None;
    };

    let cap = (x - lo_x).min(hi_x - x).min(y - lo_y).min(hi_y - y);
    Some(PlateauCandidate {
        x,
        y,
        radius: raw_radius.min(cap).max(1),
    })
}

/// Grows one plateau around `candidate`.
///
/// Returns the number of cells newly elevated.
#[allow(clippy::cast_precision_loss, clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub fn grow_plateau(
    grid: &mut ElevationGrid,
    candidate: &PlateauCandidate,
    noise: &SimplexNoise,
    params: &ElevationParams,
) -> usize {
    let mut added = 0;
    let mut raise = |grid: &mut ElevationGrid, x: i64, y: i64| {
        if let Some(index) = grid.checked_index(x, y) {
            let cell = &mut grid.as_mut_slice()[index];
            if *cell == 0 {
                *cell = PLATEAU_TIER;
                added += 1;
            }
        }
    };

    // Core: guarantees a non-degenerate plateau
    for dy in -1..=1 {
        for dx in -1..=1 {
            raise(grid, candidate.x + dx, candidate.y + dy);
        }
    }

    let r = candidate.radius;
    let r_f = r as f64;
    let scale = params.growth_noise_scale;
    for dy in -r..=r {
        for dx in -r..=r {
            let d2 = dx * dx + dy * dy;
            if d2 > r * r {
                continue;
            }
            let x = candidate.x + dx;
            let y = candidate.y + dy;
            let falloff = 1.0 - (d2 as f64).sqrt() / r_f;
            let n = (noise.noise2d(x as f64 * scale, y as f64 * scale) + 1.0) * 0.5;
            if n * falloff > params.growth_threshold {
                raise(grid, x, y);
            }
        }
    }

    added
}

/// Flattens every plateau smaller than `min_cells`.
///
/// Returns the number of cells flattened.
pub fn enforce_minimum_size(grid: &mut ElevationGrid, min_cells: usize) -> usize {
    let mut removed = 0;
    for region in plateaus(grid) {
        if region.len() < min_cells {
            for &index in region.indices() {
                grid.as_mut_slice()[index] = 0;
            }
            removed += region.len();
        }
    }
    removed
}

/// Removes elevated cells with at most one elevated 4-neighbor.
///
/// Each pass is evaluated against the grid as it was at the start of the
/// pass. Stops after `max_passes` or on the first pass that removes nothing.
/// Returns the number of cells removed.
#[allow(clippy::cast_possible_wrap)]
pub fn cleanup_protrusions(grid: &mut ElevationGrid, max_passes: usize) -> usize {
    let mut removed = 0;
    let mut doomed = Vec::new();

    for pass in 0..max_passes {
        doomed.clear();
        for (index, &h) in grid.as_slice().iter().enumerate() {
            if h == 0 {
                continue;
            }
            let (x, y) = grid.coords_of(index);
            if grid.elevated_neighbors_4(x as i64, y as i64) <= 1 {
                doomed.push(index);
            }
        }

        if doomed.is_empty() {
            break;
        }
        trace!(pass, cells = doomed.len(), "cleanup pass");
        for &index in &doomed {
            grid.as_mut_slice()[index] = 0;
        }
        removed += doomed.len();
    }

    removed
}

/// Cleanup followed by minimum-size enforcement.
///
/// Used after any stage that removes elevated cells, so that every
/// surviving plateau still meets the minimum footprint.
pub fn settle(grid: &mut ElevationGrid, params: &ElevationParams) -> usize {
    let trimmed = cleanup_protrusions(grid, params.cleanup_passes);
    trimmed + enforce_minimum_size(grid, params.min_plateau_cells)
}

/// Generates the elevation grid.
pub fn generate_elevation(
    width: usize,
    height: usize,
    rng: &mut WorldRng,
    noise: &SimplexNoise,
    params: &ElevationParams,
) -> ElevationGrid {
    let mut grid = Grid::filled(width, height, 0u8);

    let regions = placement_regions(width, height, params);
    let mut grown = 0;
    for (i, region) in regions.iter().enumerate() {
        match pick_candidate(region, rng, params) {
            Some(candidate) => {
                let cells = grow_plateau(&mut grid, &candidate, noise, params);
                trace!(region = i, x = candidate.x, y = candidate.y, radius = candidate.radius, cells, "plateau grown");
                grown += 1;
            }
            None => trace!(region = i, "region too small, skipped"),
        }
    }

    let undersized = enforce_minimum_size(&mut grid, params.min_plateau_cells);
    let settled = settle(&mut grid, params);

    debug!(
        regions = regions.len(),
        grown,
        undersized,
        settled,
        elevated = grid.elevated_count(),
        "elevation generated"
    );
    grid
}
