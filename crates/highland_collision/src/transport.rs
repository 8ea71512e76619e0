//! # Mask Transport
//!
//! Two encodings of a collision mask:
//!
//! - `CollisionMaskData`: the plain `{ width, height, tileSize, mask }`
//!   record, carried as JSON.
//! - A compact binary form: a 20-byte header followed by one bit per cell
//!   (row-major, least significant bit first), LZ4-compressed with the
//!   decompressed size prepended.
//!
//! Decoding always re-applies the unwalkable outer ring, so a tampered
//! payload cannot open an exit from the world.

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use serde::{Deserialize, Serialize};

use highland_procedural::Grid;

use crate::error::{validate_tile_size, CollisionError, CollisionResult};
use crate::mask::CollisionMask;

/// Header: width (u64 LE), height (u64 LE), tile size (f32 LE).
const HEADER_LEN: usize = 8 + 8 + 4;

/// Largest mask the compact form decodes (an 8192 x 8192 world).
pub const MAX_COMPRESSED_CELLS: usize = 1 << 26;

/// Largest decompressed payload accepted, checked before allocating.
const MAX_PAYLOAD_LEN: usize = HEADER_LEN + MAX_COMPRESSED_CELLS / 8;

/// Serializable mask record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollisionMaskData {
    /// Width in cells.
    pub width: usize,
    /// Height in cells.
    pub height: usize,
    /// World units per cell.
    #[serde(rename = "tileSize")]
    pub tile_size: f32,
    /// Walkability, `mask[y][x]`.
    pub mask: Vec<Vec<bool>>,
}

impl CollisionMask {
    /// Copies the mask into its serializable record.
    #[must_use]
    pub fn to_data(&self) -> CollisionMaskData {
        CollisionMaskData {
            width: self.width(),
            height: self.height(),
            tile_size: self.tile_size,
            mask: self.walkable.rows().map(<[bool]>::to_vec).collect(),
        }
    }

    /// Rebuilds a mask from its record.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if the rows disagree with `width`/`height`,
    /// or `InvalidTileSize` for a non-positive tile size.
    pub fn from_data(data: &CollisionMaskData) -> CollisionResult<Self> {
        let tile_size = validate_tile_size(data.tile_size)?;
        let mismatch = |found_width: usize| CollisionError::ShapeMismatch {
            expected_width: data.width,
            expected_height: data.height,
            found_width,
            found_height: data.mask.len(),
        };

        if data.mask.len() != data.height {
            return Err(mismatch(data.mask.first().map_or(0, Vec::len)));
        }
        if let Some(row) = data.mask.iter().find(|row| row.len() != data.width) {
            return Err(mismatch(row.len()));
        }

        let cells = data.mask.concat();
        let walkable = Grid::from_cells(data.width, data.height, cells)
            .ok_or_else(|| mismatch(data.width))?;
        Ok(Self::with_ring(walkable, tile_size))
    }

    /// Encodes the mask as JSON.
    ///
    /// # Errors
    ///
    /// Returns `Json` if encoding fails.
    pub fn to_json(&self) -> CollisionResult<String> {
        Ok(serde_json::to_string(&self.to_data())?)
    }

    /// Decodes a mask from JSON.
    ///
    /// # Errors
    ///
    /// Returns `Json` for malformed input, or any `from_data` error.
    pub fn from_json(json: &str) -> CollisionResult<Self> {
        let data: CollisionMaskData = serde_json::from_str(json)?;
        Self::from_data(&data)
    }

    /// Encodes the mask as LZ4-compressed bits.
    #[must_use]
    pub fn to_compressed(&self) -> Vec<u8> {
        let cells = self.walkable.as_slice();
        let mut payload = Vec::with_capacity(HEADER_LEN + cells.len().div_ceil(8));
        payload.extend_from_slice(&(self.width() as u64).to_le_bytes());
        payload.extend_from_slice(&(self.height() as u64).to_le_bytes());
        payload.extend_from_slice(&self.tile_size.to_le_bytes());

        for chunk in cells.chunks(8) {
            let byte = chunk
                .iter()
                .enumerate()
                .fold(0u8, |acc, (bit, &w)| acc | (u8::from(w) << bit));
            payload.push(byte);
        }

        compress_prepend_size(&payload)
    }

    /// Decodes a mask produced by `to_compressed`.
    ///
    /// # Errors
    ///
    /// Returns `Decompress` for corrupt, truncated or oversized payloads,
    /// or `InvalidTileSize` for a bad tile size.
    pub fn from_compressed(bytes: &[u8]) -> CollisionResult<Self> {
        let Some(prefix) = bytes.get(..4) else {
            return Err(CollisionError::Decompress("missing size prefix".to_string()));
        };
        let claimed = u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]);
        if usize::try_from(claimed).map_or(true, |len| len > MAX_PAYLOAD_LEN) {
            return Err(CollisionError::Decompress(format!(
                "payload of {claimed} bytes exceeds the {MAX_PAYLOAD_LEN} byte limit"
            )));
        }

        let payload =
            decompress_size_prepended(bytes).map_err(|e| CollisionError::Decompress(e.to_string()))?;
        if payload.len() < HEADER_LEN {
            return Err(CollisionError::Decompress(format!(
                "payload of {} bytes is shorter than the header",
                payload.len()
            )));
        }

        let (header, bits) = payload.split_at(HEADER_LEN);
        let width = read_dimension(&header[0..8])?;
        let height = read_dimension(&header[8..16])?;
        let mut tile = [0u8; 4];
        tile.copy_from_slice(&header[16..20]);
        let tile_size = validate_tile_size(f32::from_le_bytes(tile))?;

        let count = width
            .checked_mul(height)
            .filter(|&count| count <= MAX_COMPRESSED_CELLS)
            .ok_or_else(|| CollisionError::Decompress(format!("dimensions {width}x{height} too large")))?;
        if bits.len() != count.div_ceil(8) {
            return Err(CollisionError::Decompress(format!(
                "expected {} bytes of cells for {width}x{height}, found {}",
                count.div_ceil(8),
                bits.len()
            )));
        }

        let cells = (0..count).map(|i| (bits[i / 8] >> (i % 8)) & 1 == 1).collect();
        let walkable = Grid::from_cells(width, height, cells)
            .ok_or_else(|| CollisionError::Decompress("cell count mismatch".to_string()))?;
        Ok(Self::with_ring(walkable, tile_size))
    }

    /// Wraps a grid, forcing its outer ring unwalkable.
    fn with_ring(mut walkable: Grid<bool>, tile_size: f32) -> Self {
        let (width, height) = (walkable.width(), walkable.height());
        for (index, cell) in walkable.as_mut_slice().iter_mut().enumerate() {
            let (x, y) = (index % width, index / width);
            if x == 0 || y == 0 || x + 1 >= width || y + 1 >= height {
                *cell = false;
            }
        }
        Self { walkable, tile_size }
    }
}

fn read_dimension(bytes: &[u8]) -> CollisionResult<usize> {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(bytes);
    usize::try_from(u64::from_le_bytes(raw))
        .map_err(|_| CollisionError::Decompress("dimension does not fit in usize".to_string()))
}
