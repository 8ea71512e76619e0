//! # World Pipeline
//!
//! Runs every generation stage in order on one private random stream:
//!
//! ```text
//! seed -> WorldRng -> SimplexNoise
//!      -> elevation -> climate/biomes (trims and settles elevation)
//!      -> stairs
//! ```
//!
//! Two instances that call `generate_world` with the same arguments get
//! byte-identical grids. `GeneratedWorld::fingerprint` lets them confirm
//! that without exchanging the grids.

use tracing::info;

use crate::climate::generate_biomes;
use crate::config::GenerationParams;
use crate::elevation::generate_elevation;
use crate::grid::{BiomeGrid, ElevationGrid};
use crate::noise::SimplexNoise;
use crate::rng::{WorldRng, WorldSeed};
use crate::stairs::{place_stairs, StairsGrid};

/// CRC-32 of a generated world's canonical grid bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldFingerprint(pub u32);

impl std::fmt::Display for WorldFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

/// Output of the generation pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedWorld {
    /// Seed the world was generated from.
    pub seed: WorldSeed,
    /// Final elevation.
    pub elevation: ElevationGrid,
    /// Biome per cell.
    pub biomes: BiomeGrid,
    /// Stair records and placements.
    pub stairs: StairsGrid,
}

impl GeneratedWorld {
    /// World width in cells.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.elevation.width()
    }

    /// World height in cells.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.elevation.height()
    }

    /// Checksums the elevation, biome and stairs grids.
    ///
    /// Byte layout: width and height as little-endian `u64`, the elevation
    /// bytes, the biome ids, then per cell either `0` or
    /// `1, direction, row, col, biome`.
    #[must_use]
    pub fn fingerprint(&self) -> WorldFingerprint {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&(self.width() as u64).to_le_bytes());
        hasher.update(&(self.height() as u64).to_le_bytes());
        hasher.update(self.elevation.as_slice());

        let biome_ids: Vec<u8> = self.biomes.as_slice().iter().map(|b| b.id()).collect();
        hasher.update(&biome_ids);

        let mut stair_bytes = Vec::with_capacity(self.stairs.cells().len());
        for cell in self.stairs.cells().as_slice() {
            match cell {
                None => stair_bytes.push(0),
                Some(record) => stair_bytes.extend_from_slice(&[
                    1,
                    record.direction as u8,
                    record.visual_tile_row,
                    record.visual_tile_col,
                    record.biome.id(),
                ]),
            }
        }
        hasher.update(&stair_bytes);

        WorldFingerprint(hasher.finalize())
    }
}

/// Generates a world with the default parameters.
#[must_use]
pub fn generate_world(seed: WorldSeed, width: usize, height: usize) -> GeneratedWorld {
    generate_world_with(seed, width, height, &GenerationParams::default())
}

/// Generates a world with explicit parameters.
///
/// Never fails: degenerate dimensions yield empty or plateau-free grids.
#[must_use]
pub fn generate_world_with(
    seed: WorldSeed,
    width: usize,
    height: usize,
    params: &GenerationParams,
) -> GeneratedWorld {
    let mut rng = WorldRng::new(seed);
    let noise = SimplexNoise::from_rng(&mut rng);

    let mut elevation = generate_elevation(width, height, &mut rng, &noise, &params.elevation);
    let biomes = generate_biomes(&mut elevation, &noise, params);
    let stairs = place_stairs(&elevation, &biomes);

    let world = GeneratedWorld {
        seed,
        elevation,
        biomes,
        stairs,
    };

    info!(
        seed = seed.value(),
        width,
        height,
        draws = rng.draws(),
        stairs = world.stairs.placements().len(),
        fingerprint = %world.fingerprint(),
        "world generated"
    );
    world
}
