//! # Stair Placement
//!
//! Connects each plateau to the ground at one edge location.
//!
//! For every plateau the exposed cells of each side are grouped into
//! straight runs; the single longest qualifying run receives a fixed-size
//! stair footprint anchored at its first cell. Plateaus without a long
//! enough run get no stairs.
//!
//! ## Footprints
//!
//! ```text
//! North (3x2)   South (3x3)   East (2x4)   West (2x4)
//!   . . .         A # #         A .          . A
//!   A # #         # # #         # .          . #
//!                 # # #         # .          . #
//!                               # .          . #
//! ```
//!
//! `A` is the anchor (the run's first cell). North stairs climb from the row
//! above the edge; south stairs cover the edge row and the two-row cliff
//! face below it; east/west stairs cover the edge column and the ground
//! column beside it.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::biome::Biome;
use crate::grid::{BiomeGrid, ElevationGrid, Grid};
use crate::regions::{plateaus, Region};

/// Column offset of the dark variant's art.
pub const DARK_VARIANT_COLUMN_OFFSET: u8 = 11;

/// Minimum run length for north/south stairs.
pub const MIN_RUN_NORTH_SOUTH: usize = 3;

/// Minimum run length for east/west stairs.
pub const MIN_RUN_EAST_WEST: usize = 4;

/// Side of the plateau a stair descends from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum StairDirection {
    /// Top edge.
    North = 0,
    /// Bottom edge.
    South = 1,
    /// Right edge.
    East = 2,
    /// Left edge.
    West = 3,
}

/// Footprint geometry for one direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Footprint {
    /// Columns covered.
    pub width: u8,
    /// Rows covered.
    pub height: u8,
    /// Column of the footprint's top-left cell relative to the anchor.
    pub offset_x: i8,
    /// Row of the footprint's top-left cell relative to the anchor.
    pub offset_y: i8,
    /// First art column (light variant).
    pub art_column: u8,
}

impl StairDirection {
    /// Tie-break order when runs have equal length.
    pub const ALL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// Minimum run length for this side.
    #[must_use]
    pub const fn min_run(self) -> usize {
        match self {
            Self::North | Self::South => MIN_RUN_NORTH_SOUTH,
            Self::East | Self::West => MIN_RUN_EAST_WEST,
        }
    }

    /// Offset of the neighbor that makes a cell exposed on this side.
    #[must_use]
    pub const fn outward(self) -> (i64, i64) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
        }
    }

    /// Footprint geometry.
    #[must_use]
    pub const fn footprint(self) -> Footprint {
        match self {
            Self::North => Footprint { width: 3, height: 2, offset_x: 0, offset_y: -1, art_column: 3 },
            Self::South => Footprint { width: 3, height: 3, offset_x: 0, offset_y: 0, art_column: 0 },
            Self::East => Footprint { width: 2, height: 4, offset_x: 0, offset_y: 0, art_column: 6 },
            Self::West => Footprint { width: 2, height: 4, offset_x: -1, offset_y: 0, art_column: 8 },
        }
    }

    /// True if runs on this side extend along x (north/south edges).
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::North | Self::South)
    }
}

/// One cell of a stair footprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StairRecord {
    /// Side of the plateau the stair belongs to.
    pub direction: StairDirection,
    /// Art row.
    pub visual_tile_row: u8,
    /// Art column (dark variants are offset by `DARK_VARIANT_COLUMN_OFFSET`).
    pub visual_tile_col: u8,
    /// Biome at the stair's anchor.
    pub biome: Biome,
}

impl StairRecord {
    /// Row and column inside the footprint, undoing the art offsets.
    ///
    /// `None` if the art column lies left of the direction's art, which only
    /// happens for records not produced by stair placement.
    #[must_use]
    pub const fn sub_tile(&self) -> Option<(u8, u8)> {
        let dark = if self.biome.is_dark() { DARK_VARIANT_COLUMN_OFFSET } else { 0 };
        let Some(col) = self.visual_tile_col.checked_sub(dark) else {
            return None;
        };
        match col.checked_sub(self.direction.footprint().art_column) {
            Some(col) => Some((self.visual_tile_row, col)),
            None => None,
        }
    }
}

/// One placed stair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StairPlacement {
    /// Side of the plateau.
    pub direction: StairDirection,
    /// Anchor column.
    pub anchor_x: usize,
    /// Anchor row.
    pub anchor_y: usize,
    /// Length of the run the stair was placed on.
    pub run_length: usize,
    /// Biome at the anchor.
    pub biome: Biome,
}

/// Sparse grid of stair records plus the placement list.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StairsGrid {
    cells: Grid<Option<StairRecord>>,
    placements: Vec<StairPlacement>,
}

impl StairsGrid {
    /// Creates an empty stairs grid.
    #[must_use]
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            cells: Grid::filled(width, height, None),
            placements: Vec::new(),
        }
    }

    /// Record at `(x, y)`, if any.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<&StairRecord> {
        self.cells.get(x, y).and_then(Option::as_ref)
    }

    /// The underlying sparse grid.
    #[inline]
    #[must_use]
    pub const fn cells(&self) -> &Grid<Option<StairRecord>> {
        &self.cells
    }

    /// Placements, one per plateau that received stairs.
    #[inline]
    #[must_use]
    pub fn placements(&self) -> &[StairPlacement] {
        &self.placements
    }

    /// Number of cells holding a record.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.cells.as_slice().iter().filter(|c| c.is_some()).count()
    }

    /// Iterates `(x, y, record)` over occupied cells, row-major.
    pub fn records(&self) -> impl Iterator<Item = (usize, usize, &StairRecord)> + '_ {
        let width = self.cells.width();
        self.cells
            .as_slice()
            .iter()
            .enumerate()
            .filter_map(move |(i, c)| c.as_ref().map(|r| (i % width, i / width, r)))
    }

    /// Stamps the footprint for `placement`. Occupied cells are kept.
    #[allow(clippy::cast_possible_wrap)]
    fn stamp(&mut self, placement: StairPlacement) {
        let footprint = placement.direction.footprint();
        let dark = if placement.biome.is_dark() { DARK_VARIANT_COLUMN_OFFSET } else { 0 };
        let origin_x = placement.anchor_x as i64 + i64::from(footprint.offset_x);
        let origin_y = placement.anchor_y as i64 + i64::from(footprint.offset_y);

        for row in 0..footprint.height {
            for col in 0..footprint.width {
                let Some(index) = self
                    .cells
                    .checked_index(origin_x + i64::from(col), origin_y + i64::from(row))
                else {
                    continue;
                };
                let slot = &mut self.cells.as_mut_slice()[index];
                if slot.is_none() {
                    *slot = Some(StairRecord {
                        direction: placement.direction,
                        visual_tile_row: row,
                        visual_tile_col: footprint.art_column + col + dark,
                        biome: placement.biome,
                    });
                }
            }
        }
        self.placements.push(placement);
    }
}

/// Exposed cells of one plateau, per side.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlateauEdges {
    /// Cells whose north neighbor is off-plateau.
    pub north: Vec<(usize, usize)>,
    /// Cells whose south neighbor is off-plateau.
    pub south: Vec<(usize, usize)>,
    /// Cells whose east neighbor is off-plateau.
    pub east: Vec<(usize, usize)>,
    /// Cells whose west neighbor is off-plateau.
    pub west: Vec<(usize, usize)>,
}

impl PlateauEdges {
    /// Cells exposed on `direction`.
    #[must_use]
    pub fn side(&self, direction: StairDirection) -> &[(usize, usize)] {
        match direction {
            StairDirection::North => &self.north,
            StairDirection::South => &self.south,
            StairDirection::East => &self.east,
            StairDirection::West => &self.west,
        }
    }

    fn side_mut(&mut self, direction: StairDirection) -> &mut Vec<(usize, usize)> {
        match direction {
            StairDirection::North => &mut self.north,
            StairDirection::South => &mut self.south,
            StairDirection::East => &mut self.east,
            StairDirection::West => &mut self.west,
        }
    }
}

/// Classifies every cell of `plateau` by its exposed sides.
///
/// A side is exposed when the neighbor there is ground or off-grid.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn plateau_edges(plateau: &Region, elevation: &ElevationGrid) -> PlateauEdges {
    let mut edges = PlateauEdges::default();
    for (x, y) in plateau.coords() {
        for direction in StairDirection::ALL {
            let (dx, dy) = direction.outward();
            if !elevation.is_elevated(x as i64 + dx, y as i64 + dy) {
                edges.side_mut(direction).push((x, y));
            }
        }
    }
    edges
}

/// A straight run of exposed cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeRun {
    /// Side the run lies on.
    pub direction: StairDirection,
    /// First cell column.
    pub x: usize,
    /// First cell row.
    pub y: usize,
    /// Number of consecutive cells.
    pub length: usize,
}

/// Maximal runs of consecutive cells on one side, in sorted order.
#[must_use]
pub fn side_runs(cells: &[(usize, usize)], direction: StairDirection) -> Vec<EdgeRun> {
    // (line, position along the line)
    let mut keyed: Vec<(usize, usize)> = if direction.is_horizontal() {
        cells.iter().map(|&(x, y)| (y, x)).collect()
    } else {
        cells.iter().map(|&(x, y)| (x, y)).collect()
    };
    keyed.sort_unstable();

    let to_run = |line: usize, start: usize, length: usize| {
        let (x, y) = if direction.is_horizontal() { (start, line) } else { (line, start) };
        EdgeRun { direction, x, y, length }
    };

    let mut runs = Vec::new();
    let mut iter = keyed.into_iter();
    let Some((mut line, mut start)) = iter.next() else {
        return runs;
    };
    let mut length = 1;

    for (next_line, pos) in iter {
        if next_line == line && pos == start + length {
            length += 1;
        } else {
            runs.push(to_run(line, start, length));
            line = next_line;
            start = pos;
            length = 1;
        }
    }
    runs.push(to_run(line, start, length));
    runs
}

/// The longest run meeting its side's minimum length.
///
/// Ties go to the earlier side in `StairDirection::ALL`, then to the
/// earlier run in sorted order.
#[must_use]
pub fn longest_qualifying_run(edges: &PlateauEdges) -> Option<EdgeRun> {
    let mut best: Option<EdgeRun> = None;
    for direction in StairDirection::ALL {
        for run in side_runs(edges.side(direction), direction) {
            if run.length < direction.min_run() {
                continue;
            }
            if best.map_or(true, |b| run.length > b.length) {
                best = Some(run);
            }
        }
    }
    best
}

/// Places stairs on every plateau with a qualifying edge run.
#[must_use]
pub fn place_stairs(elevation: &ElevationGrid, biomes: &BiomeGrid) -> StairsGrid {
    let mut stairs = StairsGrid::empty(elevation.width(), elevation.height());
    let found = plateaus(elevation);
    let mut stranded = 0;

    for (i, plateau) in found.iter().enumerate() {
        let edges = plateau_edges(plateau, elevation);
        let Some(run) = longest_qualifying_run(&edges) else {
            trace!(plateau = i, cells = plateau.len(), "no qualifying edge, plateau stranded");
            stranded += 1;
            continue;
        };

        let biome = biomes.get(run.x, run.y).copied().unwrap_or_default();
        trace!(plateau = i, direction = ?run.direction, x = run.x, y = run.y, length = run.length, %biome, "stairs placed");
        stairs.stamp(StairPlacement {
            direction: run.direction,
            anchor_x: run.x,
            anchor_y: run.y,
            run_length: run.length,
            biome,
        });
    }

    debug!(
        plateaus = found.len(),
        placed = stairs.placements.len(),
        stranded,
        "stairs placed"
    );
    stairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(width: usize, height: usize, x0: usize, y0: usize, w: usize, h: usize) -> ElevationGrid {
        Grid::from_fn(width, height, |x, y| {
            u8::from(x >= x0 && x < x0 + w && y >= y0 && y < y0 + h)
        })
    }

    #[test]
    fn test_edges_of_block() {
        let elevation = block(10, 10, 2, 3, 4, 3);
        let plateau = &plateaus(&elevation)[0];
        let edges = plateau_edges(plateau, &elevation);
        assert_eq!(edges.north.len(), 4);
        assert_eq!(edges.south.len(), 4);
        assert_eq!(edges.east.len(), 3);
        assert_eq!(edges.west.len(), 3);
        assert!(edges.north.iter().all(|&(_, y)| y == 3));
        assert!(edges.east.iter().all(|&(x, _)| x == 5));
    }

    #[test]
    fn test_off_grid_counts_as_exposed() {
        let elevation = block(4, 4, 0, 0, 4, 4);
        let edges = plateau_edges(&plateaus(&elevation)[0], &elevation);
        assert_eq!(edges.north.len(), 4);
        assert_eq!(edges.west.len(), 4);
    }

    #[test]
    fn test_runs_split_on_gaps() {
        let cells = [(5, 2), (1, 2), (2, 2), (3, 2), (2, 7)];
        let runs = side_runs(&cells, StairDirection::North);
        assert_eq!(runs.len(), 3);
        assert_eq!((runs[0].x, runs[0].y, runs[0].length), (1, 2, 3));
        assert_eq!((runs[1].x, runs[1].y, runs[1].length), (5, 2, 1));
        assert_eq!((runs[2].x, runs[2].y, runs[2].length), (2, 7, 1));
    }

    #[test]
    fn test_vertical_runs() {
        let cells = [(4, 1), (4, 2), (4, 3), (4, 4), (4, 6)];
        let runs = side_runs(&cells, StairDirection::East);
        assert_eq!(runs.len(), 2);
        assert_eq!((runs[0].x, runs[0].y, runs[0].length), (4, 1, 4));
    }

    #[test]
    fn test_minimum_run_lengths() {
        let edges = PlateauEdges {
            north: vec![(1, 1), (2, 1)],
            east: vec![(5, 1), (5, 2), (5, 3)],
            ..PlateauEdges::default()
        };
        assert!(longest_qualifying_run(&edges).is_none());

        let edges = PlateauEdges {
            north: vec![(1, 1), (2, 1), (3, 1)],
            ..PlateauEdges::default()
        };
        assert_eq!(longest_qualifying_run(&edges).map(|r| r.length), Some(3));
    }

    #[test]
    fn test_tie_prefers_north() {
        let elevation = block(12, 12, 3, 3, 4, 4);
        let edges = plateau_edges(&plateaus(&elevation)[0], &elevation);
        let run = longest_qualifying_run(&edges).unwrap();
        assert_eq!(run.direction, StairDirection::North);
        assert_eq!((run.x, run.y, run.length), (3, 3, 4));
    }

    #[test]
    fn test_longest_side_wins() {
        // 3 wide, 6 tall: east/west runs of 6 beat north/south runs of 3
        let elevation = block(12, 12, 3, 2, 3, 6);
        let edges = plateau_edges(&plateaus(&elevation)[0], &elevation);
        let run = longest_qualifying_run(&edges).unwrap();
        assert_eq!(run.direction, StairDirection::East);
        assert_eq!((run.x, run.y, run.length), (5, 2, 6));
    }

    #[test]
    fn test_south_footprint_and_dark_offset() {
        let elevation = block(12, 12, 2, 2, 6, 3);
        // Make the north edge short so the south edge wins: carve notches
        let mut elevation = elevation;
        elevation[(3, 2)] = 0;
        elevation[(5, 2)] = 0;
        let biomes = Grid::filled(12, 12, Biome::GrassDark);
        let stairs = place_stairs(&elevation, &biomes);

        assert_eq!(stairs.placements().len(), 1);
        let p = stairs.placements()[0];
        assert_eq!(p.direction, StairDirection::South);
        assert_eq!((p.anchor_x, p.anchor_y), (2, 4));
        assert_eq!(stairs.record_count(), 9);

        let top_left = stairs.get(2, 4).unwrap();
        assert_eq!((top_left.visual_tile_row, top_left.visual_tile_col), (0, 11));
        let bottom_right = stairs.get(4, 6).unwrap();
        assert_eq!((bottom_right.visual_tile_row, bottom_right.visual_tile_col), (2, 13));
        assert_eq!(bottom_right.sub_tile(), Some((2, 2)));
        assert!(stairs.get(5, 4).is_none());
    }

    #[test]
    fn test_west_footprint_light_biome() {
        let elevation = block(12, 12, 4, 2, 2, 6);
        let biomes = Grid::filled(12, 12, Biome::Snow);
        let stairs = place_stairs(&elevation, &biomes);
        let p = stairs.placements()[0];
        // East and west both have 6-long runs; east comes first
        assert_eq!(p.direction, StairDirection::East);

        let mut west_only = elevation.clone();
        // Break the east edge into short runs
        west_only[(5, 4)] = 0;
        west_only[(5, 6)] = 0;
        let stairs = place_stairs(&west_only, &biomes);
        let p = stairs.placements()[0];
        assert_eq!(p.direction, StairDirection::West);
        assert_eq!((p.anchor_x, p.anchor_y), (4, 2));
        let record = stairs.get(3, 2).unwrap();
        assert_eq!((record.visual_tile_row, record.visual_tile_col), (0, 8));
        assert_eq!(stairs.get(4, 5).unwrap().sub_tile(), Some((3, 1)));
    }

    #[test]
    fn test_sub_tile_rejects_foreign_columns() {
        let record = StairRecord {
            direction: StairDirection::West,
            visual_tile_row: 0,
            visual_tile_col: 2,
            biome: Biome::Snow,
        };
        assert_eq!(record.sub_tile(), None);
        let dark = StairRecord { visual_tile_col: 10, biome: Biome::SandDark, ..record };
        assert_eq!(dark.sub_tile(), None);
        let ok = StairRecord { visual_tile_col: 19, ..dark };
        assert_eq!(ok.sub_tile(), Some((0, 0)));
    }

    #[test]
    fn test_plateau_without_run_is_stranded() {
        // 2x2 has runs of 2 only
        let elevation = block(8, 8, 3, 3, 2, 2);
        let stairs = place_stairs(&elevation, &Grid::filled(8, 8, Biome::GrassLight));
        assert!(stairs.placements().is_empty());
        assert_eq!(stairs.record_count(), 0);
    }

    #[test]
    fn test_footprint_clipped_at_grid_edge() {
        // North edge on row 0: the row above is off-grid
        let elevation = block(6, 6, 1, 0, 3, 3);
        let stairs = place_stairs(&elevation, &Grid::filled(6, 6, Biome::GrassLight));
        let p = stairs.placements()[0];
        assert_eq!(p.direction, StairDirection::North);
        assert_eq!(stairs.record_count(), 3);
    }
}
