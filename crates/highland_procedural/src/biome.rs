//! # Biomes
//!
//! Biome identifiers and their families.
//!
//! Each family has one tileset; the "dark" variants share their family's
//! art, shifted by a fixed column offset (see `stairs`).

use serde::{Deserialize, Serialize};

/// Biome types in the world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Biome {
    /// Temperate grassland, dry side
    #[default]
    GrassLight = 0,
    /// Temperate grassland, wet side
    GrassDark = 1,
    /// Cold regions
    Snow = 2,
    /// Hot desert, less arid
    SandLight = 3,
    /// Hot desert, most arid
    SandDark = 4,
    /// Very wet lowland
    Marsh = 5,
}

/// Tileset family a biome draws its art from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiomeFamily {
    /// `GrassLight`, `GrassDark`
    Grass,
    /// `SandLight`, `SandDark`
    Sand,
    /// `Snow`
    Snow,
    /// `Marsh`
    Marsh,
}

impl Biome {
    /// Every biome, in id order.
    pub const ALL: [Self; 6] = [
        Self::GrassLight,
        Self::GrassDark,
        Self::Snow,
        Self::SandLight,
        Self::SandDark,
        Self::Marsh,
    ];

    /// Stable numeric id (used in fingerprints and transport).
    #[inline]
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Converts from a numeric id.
    #[must_use]
    pub const fn from_id(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::GrassLight),
            1 => Some(Self::GrassDark),
            2 => Some(Self::Snow),
            3 => Some(Self::SandLight),
            4 => Some(Self::SandDark),
            5 => Some(Self::Marsh),
            _ => None,
        }
    }

    /// The tileset family.
    #[must_use]
    pub const fn family(self) -> BiomeFamily {
        match self {
            Self::GrassLight | Self::GrassDark => BiomeFamily::Grass,
            Self::SandLight | Self::SandDark => BiomeFamily::Sand,
            Self::Snow => BiomeFamily::Snow,
            Self::Marsh => BiomeFamily::Marsh,
        }
    }

    /// True for the dark variant of a two-variant family.
    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::GrassDark | Self::SandDark)
    }
}

impl std::fmt::Display for Biome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::GrassLight => "grass-light",
            Self::GrassDark => "grass-dark",
            Self::Snow => "snow",
            Self::SandLight => "sand-light",
            Self::SandDark => "sand-dark",
            Self::Marsh => "marsh",
        };
        f.write_str(name)
    }
}
