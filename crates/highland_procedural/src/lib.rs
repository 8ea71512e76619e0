//! # HIGHLAND Procedural Generation
//!
//! Deterministic world generation shared by the authoritative server and
//! every presentation client.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed, dimensions and parameters always produce
//!    the same grids, bit for bit
//! 2. **Self-contained**: Instances regenerate the world locally instead of
//!    receiving it over the wire
//! 3. **Infallible**: Every loop is bounded; degenerate inputs produce
//!    degenerate (but complete) worlds
//!
//! ## Core Components
//!
//! - `WorldRng` / `SimplexNoise`: seeded stream and coherent noise
//! - `elevation`: plateau placement, growth and repair
//! - `climate`: temperature, moisture and biome buffers
//! - `stairs`: plateau edge runs and stair footprints
//! - `generate_world`: the whole pipeline
//!
//! ## Example
//!
//! ```rust
//! use highland_procedural::{generate_world, WorldSeed};
//!
//! let server = generate_world(WorldSeed::new(42), 100, 100);
//! let client = generate_world(WorldSeed::new(42), 100, 100);
//!
//! assert_eq!(server.fingerprint(), client.fingerprint());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod biome;
pub mod climate;
pub mod config;
pub mod elevation;
pub mod error;
pub mod grid;
pub mod noise;
pub mod regions;
pub mod rng;
pub mod stairs;
pub mod world;

pub use biome::{Biome, BiomeFamily};
pub use config::{BiomeMode, ClimateParams, ElevationParams, GenerationParams};
pub use error::{GenerationError, GenerationResult};
pub use grid::{BiomeGrid, ElevationGrid, Grid};
pub use noise::SimplexNoise;
pub use regions::{plateaus, Region};
pub use rng::{WorldRng, WorldSeed};
pub use stairs::{StairDirection, StairPlacement, StairRecord, StairsGrid};
pub use world::{generate_world, generate_world_with, GeneratedWorld, WorldFingerprint};
