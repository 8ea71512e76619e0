//! # HIGHLAND Collision Oracle
//!
//! Walkability derived from a generated world, queried identically by the
//! authoritative server and by client prediction.
//!
//! ## Design Principles
//!
//! 1. **Derived, never edited**: a mask is built once from elevation and
//!    stairs and is read-only afterwards
//! 2. **Lock-free reads**: `CollisionMask` is `Send + Sync`; share it by
//!    reference or `Arc`
//! 3. **Closed world**: the outer ring of cells is always unwalkable
//!
//! ## Example
//!
//! ```rust
//! use highland_collision::CollisionMask;
//! use highland_procedural::{generate_world, WorldSeed};
//!
//! let world = generate_world(WorldSeed::new(42), 100, 100);
//! let mask = CollisionMask::from_world(&world, 32.0).unwrap();
//!
//! // The world edge is solid
//! assert!(!mask.is_walkable(1.0, 1.0));
//!
//! // Ejection always yields a position
//! let spot = mask.find_nearest_walkable(1.0, 1.0, 320.0);
//! assert!(spot.x.is_finite() && spot.y.is_finite());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod mask;
pub mod stair_tiles;
pub mod transport;

pub use error::{CollisionError, CollisionResult};
pub use mask::{CollisionMask, WorldPoint};
pub use transport::CollisionMaskData;
