//! # HIGHLAND
//!
//! A shared world that the authoritative server and every presentation
//! client regenerate locally from a seed.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         WorldConfig                          │
//! │           seed · width · height · tile_size · params         │
//! └──────────────┬───────────────────────────────┬───────────────┘
//!                │                               │
//!                v                               v
//!   ┌────────────────────────┐      ┌────────────────────────┐
//!   │  Authoritative World   │      │   Presentation World   │
//!   │  grids + CollisionMask │      │  grids + CollisionMask │
//!   └────────────┬───────────┘      └───────────┬────────────┘
//!                │                              │
//!                └──────── fingerprint ─────────┘
//!                     (4 bytes, must match)
//! ```
//!
//! ## Modules
//!
//! - `config`: `WorldConfig`, loaded from TOML
//! - `world`: `World`, one instance
//! - `check`: instance comparison used by `world_check`

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod check;
pub mod config;
pub mod error;
pub mod world;

// Re-export the layers
pub use highland_collision as collision;
pub use highland_procedural as procedural;

// Re-export commonly used types
pub use check::{compare, Divergence};
pub use config::WorldConfig;
pub use error::{WorldError, WorldResult};
pub use world::World;
