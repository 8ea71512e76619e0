//! # Stair Sub-Tile Walkability
//!
//! Fixed per-biome table of which cells of a stair footprint can be walked
//! on. Grass and marsh stairs are open on every cell. Sand and snow stairs
//! carry a railing along the top row of their east/west footprints.

use highland_procedural::{BiomeFamily, StairDirection, StairRecord};

/// True if sub-tile `(row, col)` of a `direction` footprint is walkable for
/// `family`. Cells outside the footprint are never walkable.
#[must_use]
pub fn sub_tile_walkable(family: BiomeFamily, direction: StairDirection, row: u8, col: u8) -> bool {
    let footprint = direction.footprint();
    if row >= footprint.height || col >= footprint.width {
        return false;
    }

    match family {
        BiomeFamily::Grass | BiomeFamily::Marsh => true,
        BiomeFamily::Sand | BiomeFamily::Snow => direction.is_horizontal() || row != 0,
    }
}

/// True if the stair cell described by `record` is walkable. A record whose
/// art column does not map back into its footprint is not.
#[inline]
#[must_use]
pub fn record_walkable(record: &StairRecord) -> bool {
    record
        .sub_tile()
        .is_some_and(|(row, col)| sub_tile_walkable(record.biome.family(), record.direction, row, col))
}

#[cfg(test)]
mod tests {
    use super::*;
    use highland_procedural::Biome;

    #[test]
    fn test_grass_is_fully_open() {
        for direction in StairDirection::ALL {
            let fp = direction.footprint();
            for row in 0..fp.height {
                for col in 0..fp.width {
                    assert!(sub_tile_walkable(BiomeFamily::Grass, direction, row, col));
                    assert!(sub_tile_walkable(BiomeFamily::Marsh, direction, row, col));
                }
            }
        }
    }

    #[test]
    fn test_snow_railing_on_side_stairs() {
        assert!(!sub_tile_walkable(BiomeFamily::Snow, StairDirection::East, 0, 0));
        assert!(!sub_tile_walkable(BiomeFamily::Sand, StairDirection::West, 0, 1));
        assert!(sub_tile_walkable(BiomeFamily::Snow, StairDirection::East, 1, 0));
        assert!(sub_tile_walkable(BiomeFamily::Sand, StairDirection::North, 0, 2));
        assert!(sub_tile_walkable(BiomeFamily::Sand, StairDirection::South, 0, 0));
    }

    #[test]
    fn test_outside_footprint() {
        assert!(!sub_tile_walkable(BiomeFamily::Grass, StairDirection::North, 2, 0));
        assert!(!sub_tile_walkable(BiomeFamily::Grass, StairDirection::East, 0, 2));
    }

    #[test]
    fn test_dark_record_offsets_are_undone() {
        let record = StairRecord {
            direction: StairDirection::West,
            visual_tile_row: 0,
            visual_tile_col: 8 + 11 + 1,
            biome: Biome::SandDark,
        };
        assert_eq!(record.sub_tile(), Some((0, 1)));
        assert!(!record_walkable(&record));

        let lower = StairRecord { visual_tile_row: 2, ..record };
        assert!(record_walkable(&lower));
    }

    #[test]
    fn test_inconsistent_record_is_blocked() {
        // Dark biome but an art column from the light sheet
        let record = StairRecord {
            direction: StairDirection::East,
            visual_tile_row: 1,
            visual_tile_col: 6,
            biome: Biome::GrassDark,
        };
        assert_eq!(record.sub_tile(), None);
        assert!(!record_walkable(&record));

        let zero = StairRecord { visual_tile_col: 0, biome: Biome::GrassLight, ..record };
        assert!(!record_walkable(&zero));
    }
}
