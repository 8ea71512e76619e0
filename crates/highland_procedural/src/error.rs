//! # Generation Error Types
//!
//! Generation itself cannot fail. These errors only come from loading and
//! validating tuning parameters.

use thiserror::Error;

/// Errors raised while loading generation parameters.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// A parameter is out of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The TOML document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for parameter loading.
pub type GenerationResult<T> = Result<T, GenerationError>;
