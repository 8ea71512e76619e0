//! # Climate & Biome Assignment
//!
//! Synthetic temperature and moisture fields drive a fixed-threshold biome
//! classifier.
//!
//! - Temperature rises toward the south (0.2 at row 0, 0.8 at the last row)
//!   and is perturbed by noise.
//! - Moisture blends two noise octaves.
//! - Elevated cells are slightly cooler and drier.
//!
//! In [`BiomeMode::Buffered`] the elevation grid is then repaired so every
//! elevated cell is surrounded by cells of its own biome. Cells that end up
//! on the ground are classified without the elevation bias.

use tracing::{debug, trace};

use crate::biome::Biome;
use crate::config::{BiomeMode, GenerationParams};
use crate::elevation::settle;
use crate::grid::{BiomeGrid, ElevationGrid, Grid, NEIGHBORS_8};
use crate::noise::SimplexNoise;

/// Temperature at the top row.
const TEMPERATURE_NORTH: f64 = 0.2;
/// Temperature added between the top and bottom rows.
const TEMPERATURE_SPAN: f64 = 0.6;
/// Amplitude of the temperature perturbation.
const TEMPERATURE_NOISE_AMPLITUDE: f64 = 0.3;
/// Frequency of the temperature perturbation.
const TEMPERATURE_NOISE_SCALE: f64 = 0.02;
/// Base frequency of the moisture field.
const MOISTURE_NOISE_SCALE: f64 = 0.035;
/// Offset that decorrelates moisture from temperature.
const MOISTURE_OFFSET: f64 = 73.0;

/// Elevated cells are this much cooler.
pub const ELEVATION_TEMPERATURE_BIAS: f64 = -0.1;
/// Elevated cells are this much drier.
pub const ELEVATION_MOISTURE_BIAS: f64 = -0.05;

/// Climate values for one cell, both in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Climate {
    /// 0 = coldest, 1 = hottest.
    pub temperature: f64,
    /// 0 = driest, 1 = wettest.
    pub moisture: f64,
}

/// Samples the climate fields of one world.
pub struct ClimateField<'a> {
    noise: &'a SimplexNoise,
    height: usize,
}

impl<'a> ClimateField<'a> {
    /// Creates a climate field for a world `height` rows tall.
    #[must_use]
    pub const fn new(noise: &'a SimplexNoise, height: usize) -> Self {
        Self { noise, height }
    }

    /// Temperature at a cell, clamped to [0, 1].
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn temperature(&self, x: usize, y: usize) -> f64 {
        let gradient = if self.height > 1 {
            TEMPERATURE_NORTH + TEMPERATURE_SPAN * (y as f64 / (self.height - 1) as f64)
        } else {
            TEMPERATURE_NORTH
        };
        let perturbation = self.noise.noise2d(
            x as f64 * TEMPERATURE_NOISE_SCALE,
            y as f64 * TEMPERATURE_NOISE_SCALE,
        ) * TEMPERATURE_NOISE_AMPLITUDE;

        (gradient + perturbation).clamp(0.0, 1.0)
    }

    /// Moisture at a cell, clamped to [0, 1].
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn moisture(&self, x: usize, y: usize) -> f64 {
        // Two octaves: base scale and 3x frequency at half amplitude
        let raw = self.noise.octaved(
            x as f64 * MOISTURE_NOISE_SCALE + MOISTURE_OFFSET,
            y as f64 * MOISTURE_NOISE_SCALE + MOISTURE_OFFSET,
            2,
            0.5,
            3.0,
        );
        ((raw + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Climate at a cell, with the elevation bias applied if `elevated`.
    #[must_use]
    pub fn sample(&self, x: usize, y: usize, elevated: bool) -> Climate {
        let mut temperature = self.temperature(x, y);
        let mut moisture = self.moisture(x, y);
        if elevated {
            temperature += ELEVATION_TEMPERATURE_BIAS;
            moisture += ELEVATION_MOISTURE_BIAS;
        }
        Climate { temperature, moisture }
    }
}

/// Classifies a climate into a biome (first matching rule wins).
#[must_use]
pub fn classify(climate: Climate) -> Biome {
    let Climate { temperature, moisture } = climate;

    if temperature < 0.3 {
        Biome::Snow
    } else if temperature > 0.65 && moisture < 0.35 {
        if moisture < 0.2 {
            Biome::SandDark
        } else {
            Biome::SandLight
        }
    } else if moisture > 0.75 {
        Biome::Marsh
    } else if moisture > 0.5 {
        Biome::GrassDark
    } else {
        Biome::GrassLight
    }
}

/// Outcome of biome buffer enforcement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BufferReport {
    /// Passes executed (including the final clean pass, if reached).
    pub iterations: usize,
    /// Elevated cells flattened.
    pub cleared: usize,
    /// True if the last pass found no violations.
    pub converged: bool,
}

/// True if an elevated cell at `(x, y)` touches the world edge or a cell of
/// another biome in its 8-neighborhood.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn violates_buffer(biomes: &BiomeGrid, x: usize, y: usize) -> bool {
    let own = biomes[(x, y)];
    let (x, y) = (x as i64, y as i64);
    NEIGHBORS_8
        .iter()
        .any(|(dx, dy)| biomes.at(x + dx, y + dy).map_or(true, |&b| b != own))
}

/// Flat indices of elevated cells that break the biome buffer.
fn buffer_violations(elevation: &ElevationGrid, biomes: &BiomeGrid, out: &mut Vec<usize>) {
    out.clear();
    for (index, &h) in elevation.as_slice().iter().enumerate() {
        if h == 0 {
            continue;
        }
        let (x, y) = elevation.coords_of(index);
        if violates_buffer(biomes, x, y) {
            out.push(index);
        }
    }
}

/// Flattens elevated cells that break the biome buffer.
///
/// A flattened cell takes its ground biome from `ground`, which can expose
/// the next ring of elevated cells, so passes repeat until one finds
/// nothing or `max_iterations` passes have run.
pub fn enforce_biome_buffer(
    elevation: &mut ElevationGrid,
    biomes: &mut BiomeGrid,
    ground: &BiomeGrid,
    max_iterations: usize,
) -> BufferReport {
    let mut report = BufferReport::default();
    let mut violations = Vec::new();

    while report.iterations < max_iterations {
        report.iterations += 1;
        buffer_violations(elevation, biomes, &mut violations);

        if violations.is_empty() {
            report.converged = true;
            break;
        }
        trace!(pass = report.iterations, cells = violations.len(), "biome buffer pass");
        for &index in &violations {
            elevation.as_mut_slice()[index] = 0;
            biomes.as_mut_slice()[index] = ground.as_slice()[index];
        }
        report.cleared += violations.len();
    }

    report
}

/// Gives every ground cell its unbiased biome again.
///
/// Returns the number of cells that changed.
pub fn restore_ground_biomes(
    elevation: &ElevationGrid,
    biomes: &mut BiomeGrid,
    ground: &BiomeGrid,
) -> usize {
    let mut restored = 0;
    let cells = biomes.as_mut_slice().iter_mut().zip(ground.as_slice());
    for ((biome, &unbiased), &h) in cells.zip(elevation.as_slice()) {
        if h == 0 && *biome != unbiased {
            *biome = unbiased;
            restored += 1;
        }
    }
    restored
}

/// Assigns a biome to every cell.
///
/// In buffered mode the elevation grid is trimmed in place. Buffer repair
/// and `settle` alternate until no elevated cell breaks the buffer; each
/// round that continues flattens at least one cell, so the loop ends.
/// Ground cells always carry their unbiased biome.
pub fn generate_biomes(
    elevation: &mut ElevationGrid,
    noise: &SimplexNoise,
    params: &GenerationParams,
) -> BiomeGrid {
    let field = ClimateField::new(noise, elevation.height());
    let ground = Grid::from_fn(elevation.width(), elevation.height(), |x, y| {
        classify(field.sample(x, y, false))
    });
    if params.climate.mode == BiomeMode::Simple {
        return ground;
    }

    let mut biomes = Grid::from_fn(elevation.width(), elevation.height(), |x, y| {
        if elevation[(x, y)] > 0 {
            classify(field.sample(x, y, true))
        } else {
            ground[(x, y)]
        }
    });

    let max_iterations = params.climate.buffer_max_iterations.max(1);
    let mut violations = Vec::new();
    let mut round = 0;
    loop {
        round += 1;
        let report = enforce_biome_buffer(elevation, &mut biomes, &ground, max_iterations);
        let settled = settle(elevation, &params.elevation);
        let restored = restore_ground_biomes(elevation, &mut biomes, &ground);
        buffer_violations(elevation, &biomes, &mut violations);
        debug!(
            round,
            iterations = report.iterations,
            cleared = report.cleared,
            converged = report.converged,
            settled,
            restored,
            remaining = violations.len(),
            "biome buffer enforced"
        );
        if violations.is_empty() {
            break;
        }
    }

    biomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{WorldRng, WorldSeed};

    fn noise() -> SimplexNoise {
        SimplexNoise::from_rng(&mut WorldRng::new(WorldSeed::new(42)))
    }

    #[test]
    fn test_classify_thresholds() {
        let c = |temperature, moisture| classify(Climate { temperature, moisture });
        assert_eq!(c(0.1, 0.9), Biome::Snow);
        assert_eq!(c(0.8, 0.1), Biome::SandDark);
        assert_eq!(c(0.8, 0.3), Biome::SandLight);
        assert_eq!(c(0.5, 0.8), Biome::Marsh);
        assert_eq!(c(0.5, 0.6), Biome::GrassDark);
        assert_eq!(c(0.5, 0.4), Biome::GrassLight);
        // Hot but wet is not desert
        assert_eq!(c(0.8, 0.6), Biome::GrassDark);
    }

    #[test]
    fn test_fields_in_range() {
        let noise = noise();
        let field = ClimateField::new(&noise, 200);
        for y in (0..200).step_by(7) {
            for x in (0..300).step_by(11) {
                let t = field.temperature(x, y);
                let m = field.moisture(x, y);
                assert!((0.0..=1.0).contains(&t), "temperature {t}");
                assert!((0.0..=1.0).contains(&m), "moisture {m}");
            }
        }
    }

    #[test]
    fn test_south_is_warmer_on_average() {
        let noise = noise();
        let field = ClimateField::new(&noise, 300);
        let north: f64 = (0..300).map(|x| field.temperature(x, 0)).sum();
        let south: f64 = (0..300).map(|x| field.temperature(x, 299)).sum();
        assert!(south > north, "south {south} should exceed north {north}");
    }

    #[test]
    fn test_single_row_world() {
        let noise = noise();
        let field = ClimateField::new(&noise, 1);
        let t = field.temperature(5, 0);
        assert!((0.0..=1.0).contains(&t));
    }

    #[test]
    fn test_elevation_bias() {
        let noise = noise();
        let field = ClimateField::new(&noise, 100);
        let ground = field.sample(10, 50, false);
        let raised = field.sample(10, 50, true);
        assert!((ground.temperature - raised.temperature - 0.1).abs() < 1e-12);
        assert!((ground.moisture - raised.moisture - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_buffer_clears_cells_touching_other_biome() {
        let mut elevation = Grid::filled(10, 10, 0u8);
        for y in 2..8 {
            for x in 2..8 {
                elevation[(x, y)] = 1;
            }
        }
        // Biome boundary at x = 5
        let ground = Grid::from_fn(10, 10, |x, _| {
            if x < 5 { Biome::GrassLight } else { Biome::GrassDark }
        });
        let mut biomes = ground.clone();

        let report = enforce_biome_buffer(&mut elevation, &mut biomes, &ground, 5);
        assert!(report.converged);
        assert_eq!(report.cleared, 12);
        assert_eq!(report.iterations, 2);
        for y in 0..10 {
            assert_eq!(elevation[(4, y)], 0);
            assert_eq!(elevation[(5, y)], 0);
        }
    }

    #[test]
    fn test_buffer_clears_cells_on_world_edge() {
        let mut elevation = Grid::filled(4, 4, 1u8);
        let ground = Grid::filled(4, 4, Biome::Snow);
        let mut biomes = ground.clone();
        let report = enforce_biome_buffer(&mut elevation, &mut biomes, &ground, 5);
        assert_eq!(report.cleared, 12);
        assert_eq!(elevation.elevated_count(), 4);
    }

    /// A 7x7 snow plateau on grass: every flattened ring turns to grass and
    /// exposes the ring inside it.
    fn snowcap() -> (ElevationGrid, BiomeGrid, BiomeGrid) {
        let elevation = Grid::from_fn(9, 9, |x, y| u8::from((1..8).contains(&x) && (1..8).contains(&y)));
        let ground = Grid::filled(9, 9, Biome::GrassLight);
        let biomes = Grid::from_fn(9, 9, |x, y| {
            if elevation[(x, y)] > 0 { Biome::Snow } else { Biome::GrassLight }
        });
        (elevation, biomes, ground)
    }

    #[test]
    fn test_buffer_repair_peels_rings() {
        let (mut elevation, mut biomes, ground) = snowcap();
        let report = enforce_biome_buffer(&mut elevation, &mut biomes, &ground, 5);
        assert_eq!(report.iterations, 5);
        assert_eq!(report.cleared, 49);
        assert!(report.converged);
        assert_eq!(elevation.elevated_count(), 0);
        assert_eq!(biomes, ground);
    }

    #[test]
    fn test_buffer_iteration_cap() {
        let (mut elevation, mut biomes, ground) = snowcap();
        let report = enforce_biome_buffer(&mut elevation, &mut biomes, &ground, 3);
        assert_eq!(report.iterations, 3);
        assert_eq!(report.cleared, 24 + 16 + 8);
        assert!(!report.converged);
        assert_eq!(elevation.elevated_count(), 1);
        assert_eq!(biomes[(4, 4)], Biome::Snow);
    }

    #[test]
    fn test_restore_ground_biomes() {
        let (mut elevation, mut biomes, ground) = snowcap();
        elevation[(4, 4)] = 0;
        assert_eq!(restore_ground_biomes(&elevation, &mut biomes, &ground), 1);
        assert_eq!(biomes[(4, 4)], Biome::GrassLight);
        assert_eq!(biomes[(3, 3)], Biome::Snow);
        assert_eq!(restore_ground_biomes(&elevation, &mut biomes, &ground), 0);
    }

    #[test]
    fn test_ground_cells_carry_unbiased_biome() {
        let mut rng = WorldRng::new(WorldSeed::new(9_001));
        let noise = SimplexNoise::from_rng(&mut rng);
        let params = GenerationParams::default();
        let mut elevation = crate::elevation::generate_elevation(160, 160, &mut rng, &noise, &params.elevation);
        let before = elevation.elevated_count();

        let biomes = generate_biomes(&mut elevation, &noise, &params);
        assert!(elevation.elevated_count() < before);

        let field = ClimateField::new(&noise, 160);
        for y in 0..160 {
            for x in 0..160 {
                let elevated = elevation[(x, y)] > 0;
                assert_eq!(biomes[(x, y)], classify(field.sample(x, y, elevated)), "cell ({x}, {y})");
                if elevated {
                    assert!(!violates_buffer(&biomes, x, y));
                }
            }
        }
    }

    #[test]
    fn test_simple_mode_leaves_elevation() {
        let noise = noise();
        let mut elevation = Grid::filled(30, 30, 0u8);
        for y in 0..30 {
            elevation[(0, y)] = 1;
        }
        let mut params = GenerationParams::default();
        params.climate.mode = BiomeMode::Simple;
        let before = elevation.clone();
        let biomes = generate_biomes(&mut elevation, &noise, &params);
        assert_eq!(elevation, before);
        assert!(biomes.same_shape(&elevation));
    }
}
