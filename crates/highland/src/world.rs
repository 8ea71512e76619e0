//! # World Instance
//!
//! One self-contained world: the generated grids and the collision mask
//! derived from them. The authoritative server and every presentation
//! client each build their own `World` from the same `WorldConfig`.

use tracing::info;

use highland_collision::CollisionMask;
use highland_procedural::{generate_world_with, GeneratedWorld, WorldFingerprint};

use crate::config::WorldConfig;
use crate::error::WorldResult;

/// Generated grids plus collision mask for one instance.
#[derive(Clone, Debug)]
pub struct World {
    config: WorldConfig,
    generated: GeneratedWorld,
    mask: CollisionMask,
}

impl World {
    /// Validates `config` and builds the world.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid.
    pub fn new(config: &WorldConfig) -> WorldResult<Self> {
        config.validate()?;

        let generated = generate_world_with(config.seed, config.width, config.height, &config.generation);
        let mask = CollisionMask::from_world(&generated, config.tile_size)?;

        info!(
            seed = config.seed.value(),
            width = config.width,
            height = config.height,
            fingerprint = %generated.fingerprint(),
            walkable = mask.walkable_count(),
            "world instance ready"
        );

        Ok(Self {
            config: config.clone(),
            generated,
            mask,
        })
    }

    /// Config the world was built from.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Elevation, biome and stairs grids.
    #[inline]
    #[must_use]
    pub const fn generated(&self) -> &GeneratedWorld {
        &self.generated
    }

    /// Collision oracle.
    #[inline]
    #[must_use]
    pub const fn mask(&self) -> &CollisionMask {
        &self.mask
    }

    /// Checksum of the generated grids.
    #[must_use]
    pub fn fingerprint(&self) -> WorldFingerprint {
        self.generated.fingerprint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use highland_procedural::WorldSeed;

    fn config(seed: u64) -> WorldConfig {
        WorldConfig {
            seed: WorldSeed::new(seed),
            width: 80,
            height: 60,
            ..WorldConfig::default()
        }
    }

    #[test]
    fn test_instances_from_same_config_agree() {
        let a = World::new(&config(42)).unwrap();
        let b = World::new(&config(42)).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.mask(), b.mask());
        assert_eq!(a.generated(), b.generated());
    }

    #[test]
    fn test_mask_matches_grids() {
        let world = World::new(&config(3)).unwrap();
        assert_eq!(world.mask().width(), world.generated().width());
        assert_eq!(world.mask().height(), world.generated().height());
        assert!((world.mask().tile_size() - 32.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad = WorldConfig {
            width: 1,
            ..config(1)
        };
        assert!(World::new(&bad).is_err());
    }
}
