//! # Generation Parameters
//!
//! Every tuning constant of the pipeline, loadable from TOML.
//!
//! The parameters are part of the world's identity: an authoritative and a
//! presentation instance only agree if they use the same seed, the same
//! dimensions and the same parameters. The defaults are the shipped values.
//!
//! ```toml
//! [elevation]
//! min_plateaus = 4
//! growth_threshold = 0.18
//!
//! [climate]
//! mode = "buffered"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, GenerationResult};

/// How biomes interact with plateau geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiomeMode {
    /// Climate only; plateaus are ignored.
    Simple,
    /// Plateaus bias the climate and are trimmed to sit inside one biome.
    #[default]
    Buffered,
}

/// Plateau placement and repair parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevationParams {
    /// Lower bound on the number of placement regions.
    pub min_plateaus: usize,
    /// World area (cells) per placement region.
    pub area_per_plateau: usize,
    /// Maximum center jitter as a fraction of the region extent.
    pub region_jitter: f64,
    /// Cells kept free between a plateau and its region boundary.
    pub edge_buffer: usize,
    /// Smallest growth radius.
    pub min_radius: usize,
    /// Largest growth radius (before the region cap).
    pub max_radius: usize,
    /// Noise-times-falloff value a cell must exceed to be elevated.
    pub growth_threshold: f64,
    /// Noise frequency used while growing plateaus.
    pub growth_noise_scale: f64,
    /// Regions smaller than this are flattened.
    pub min_plateau_cells: usize,
    /// Maximum protrusion cleanup passes.
    pub cleanup_passes: usize,
}

impl Default for ElevationParams {
    fn default() -> Self {
        Self {
            min_plateaus: 4,
            area_per_plateau: 15_000,
            region_jitter: 0.125,
            edge_buffer: 2,
            min_radius: 15,
            max_radius: 44,
            growth_threshold: 0.18,
            growth_noise_scale: 0.08,
            min_plateau_cells: 9,
            cleanup_passes: 3,
        }
    }
}

/// Climate and biome buffer parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateParams {
    /// Biome mode.
    pub mode: BiomeMode,
    /// Hard cap on biome buffer repair passes.
    pub buffer_max_iterations: usize,
}

impl Default for ClimateParams {
    fn default() -> Self {
        Self {
            mode: BiomeMode::Buffered,
            buffer_max_iterations: 5,
        }
    }
}

/// All generation parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    /// Elevation stage.
    pub elevation: ElevationParams,
    /// Climate and biome stage.
    pub climate: ClimateParams,
}

impl GenerationParams {
    /// Parses and validates parameters from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or a value is out of range.
    pub fn from_toml_str(source: &str) -> GenerationResult<Self> {
        let params: Self = toml::from_str(source)?;
        params.validate()?;
        Ok(params)
    }

    /// Reads, parses and validates parameters from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails validation.
    pub fn from_toml_file(path: impl AsRef<Path>) -> GenerationResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Checks that every value is in range.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::InvalidConfig` naming the first bad value.
    pub fn validate(&self) -> GenerationResult<()> {
        let e = &self.elevation;

        if e.area_per_plateau == 0 {
            return Err(invalid("elevation.area_per_plateau must be > 0"));
        }
        if e.min_radius == 0 || e.min_radius > e.max_radius {
            return Err(invalid("elevation radius range must satisfy 1 <= min_radius <= max_radius"));
        }
        if !(0.0..0.5).contains(&e.region_jitter) {
            return Err(invalid("elevation.region_jitter must be in [0, 0.5)"));
        }
        if !(0.0..1.0).contains(&e.growth_threshold) {
            return Err(invalid("elevation.growth_threshold must be in [0, 1)"));
        }
        if !e.growth_noise_scale.is_finite() || e.growth_noise_scale <= 0.0 {
            return Err(invalid("elevation.growth_noise_scale must be finite and > 0"));
        }
        if e.min_plateau_cells == 0 {
            return Err(invalid("elevation.min_plateau_cells must be > 0"));
        }
        if self.climate.buffer_max_iterations == 0 {
            return Err(invalid("climate.buffer_max_iterations must be > 0"));
        }

        Ok(())
    }
}

fn invalid(message: &str) -> GenerationError {
    GenerationError::InvalidConfig(message.to_owned())
}
