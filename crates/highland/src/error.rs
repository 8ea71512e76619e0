//! # World Error Types

use thiserror::Error;

use highland_collision::CollisionError;
use highland_procedural::GenerationError;

/// Errors that can occur while configuring or building a world instance.
#[derive(Error, Debug)]
pub enum WorldError {
    /// A world-level configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be parsed.
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Generation parameters were rejected.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Collision mask could not be built.
    #[error(transparent)]
    Collision(#[from] CollisionError),
}

/// Result type for world operations.
pub type WorldResult<T> = Result<T, WorldError>;
