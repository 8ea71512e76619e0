//! # Collision Error Types
//!
//! Errors raised while building or transporting a collision mask. Queries
//! themselves never fail.

use thiserror::Error;

/// Errors that can occur in the collision system.
#[derive(Error, Debug)]
pub enum CollisionError {
    /// Input grids or mask rows do not have the expected dimensions.
    #[error("shape mismatch: expected {expected_width}x{expected_height}, found {found_width}x{found_height}")]
    ShapeMismatch {
        /// Expected width in cells.
        expected_width: usize,
        /// Expected height in cells.
        expected_height: usize,
        /// Width actually found.
        found_width: usize,
        /// Height actually found.
        found_height: usize,
    },

    /// Tile size must be finite and positive.
    #[error("invalid tile size: {0}")]
    InvalidTileSize(f32),

    /// Mask JSON could not be encoded or decoded.
    #[error("mask json: {0}")]
    Json(#[from] serde_json::Error),

    /// Compressed mask payload is corrupt.
    #[error("mask decompression failed: {0}")]
    Decompress(String),
}

/// Result type for collision operations.
pub type CollisionResult<T> = Result<T, CollisionError>;

/// Checks a tile size.
///
/// # Errors
///
/// Returns `InvalidTileSize` unless `tile_size` is finite and positive.
pub fn validate_tile_size(tile_size: f32) -> CollisionResult<f32> {
    if tile_size.is_finite() && tile_size > 0.0 {
        Ok(tile_size)
    } else {
        Err(CollisionError::InvalidTileSize(tile_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_size_validation() {
        assert_eq!(validate_tile_size(32.0).ok(), Some(32.0));
        assert!(matches!(validate_tile_size(0.0), Err(CollisionError::InvalidTileSize(_))));
        assert!(validate_tile_size(-4.0).is_err());
        assert!(validate_tile_size(f32::NAN).is_err());
        assert!(validate_tile_size(f32::INFINITY).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = CollisionError::ShapeMismatch {
            expected_width: 10,
            expected_height: 8,
            found_width: 9,
            found_height: 8,
        };
        assert_eq!(err.to_string(), "shape mismatch: expected 10x8, found 9x8");
    }
}
