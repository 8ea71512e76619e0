//! # World Configuration
//!
//! Everything that determines a world, in one TOML document:
//!
//! ```toml
//! seed = 42
//! width = 200
//! height = 150
//! tile_size = 32.0
//!
//! [generation.elevation]
//! min_plateaus = 6
//!
//! [generation.climate]
//! mode = "buffered"
//! ```
//!
//! Every field has a default, so an empty document is a valid config.

use std::path::Path;

use serde::{Deserialize, Serialize};

use highland_procedural::{GenerationParams, WorldSeed};

use crate::error::{WorldError, WorldResult};

/// Smallest accepted side length; anything smaller is all outer ring.
pub const MIN_WORLD_SIDE: usize = 3;

/// Largest accepted side length.
pub const MAX_WORLD_SIDE: usize = 4096;

/// Configuration for one world instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Sole source of randomness.
    pub seed: WorldSeed,
    /// Width in cells.
    pub width: usize,
    /// Height in cells.
    pub height: usize,
    /// World units per cell.
    pub tile_size: f32,
    /// Pipeline tuning parameters.
    pub generation: GenerationParams,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: WorldSeed::default(),
            width: 200,
            height: 200,
            tile_size: 32.0,
            generation: GenerationParams::default(),
        }
    }
}

impl WorldConfig {
    /// Parses and validates a config from TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or fails validation.
    pub fn from_toml_str(source: &str) -> WorldResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails validation.
    pub fn from_toml_file(path: impl AsRef<Path>) -> WorldResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Serializes the config back to TOML.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the config cannot be represented in TOML.
    pub fn to_toml_string(&self) -> WorldResult<String> {
        toml::to_string(self).map_err(|e| WorldError::InvalidConfig(e.to_string()))
    }

    /// Checks dimensions, tile size and generation parameters.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> WorldResult<()> {
        for (name, side) in [("width", self.width), ("height", self.height)] {
            if !(MIN_WORLD_SIDE..=MAX_WORLD_SIDE).contains(&side) {
                return Err(WorldError::InvalidConfig(format!(
                    "{name} must be in [{MIN_WORLD_SIDE}, {MAX_WORLD_SIDE}], got {side}"
                )));
            }
        }
        if !self.tile_size.is_finite() || self.tile_size <= 0.0 {
            return Err(WorldError::InvalidConfig(format!(
                "tile_size must be finite and > 0, got {}",
                self.tile_size
            )));
        }
        self.generation.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use highland_procedural::BiomeMode;

    #[test]
    fn test_empty_document_is_default() {
        let config = WorldConfig::from_toml_str("").unwrap();
        assert_eq!(config, WorldConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = WorldConfig::from_toml_str(
            r#"
            seed = 7
            width = 64
            tile_size = 16.0

            [generation.climate]
            mode = "simple"
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, WorldSeed::new(7));
        assert_eq!((config.width, config.height), (64, 200));
        assert_eq!(config.generation.climate.mode, BiomeMode::Simple);
        assert_eq!(config.generation.elevation.min_plateaus, 4);
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        assert!(matches!(
            WorldConfig::from_toml_str("width = 2"),
            Err(WorldError::InvalidConfig(_))
        ));
        assert!(WorldConfig::from_toml_str("height = 100000").is_err());
        assert!(WorldConfig::from_toml_str("tile_size = 0.0").is_err());
        assert!(WorldConfig::from_toml_str("tile_size = -3.0").is_err());
    }

    #[test]
    fn test_rejects_bad_generation_params() {
        let result = WorldConfig::from_toml_str("[generation.elevation]\nmin_radius = 0");
        assert!(matches!(result, Err(WorldError::Generation(_))));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(WorldConfig::from_toml_str("seed = "), Err(WorldError::Toml(_))));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = WorldConfig::default();
        config.seed = WorldSeed::new(99);
        config.generation.elevation.cleanup_passes = 5;
        let text = config.to_toml_string().unwrap();
        assert_eq!(WorldConfig::from_toml_str(&text).unwrap(), config);
    }
}
