//! # Instance Comparison
//!
//! Compares two world instances that were built independently. Any
//! difference is a determinism defect.

use std::fmt;

use highland_collision::CollisionMask;
use highland_procedural::WorldFingerprint;

use crate::world::World;

/// One way two instances disagree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Divergence {
    /// Grid dimensions differ.
    Dimensions {
        /// Authoritative `(width, height)`.
        authoritative: (usize, usize),
        /// Presentation `(width, height)`.
        presentation: (usize, usize),
    },
    /// Generated grids differ.
    Fingerprint {
        /// Authoritative fingerprint.
        authoritative: WorldFingerprint,
        /// Presentation fingerprint.
        presentation: WorldFingerprint,
    },
    /// Collision masks differ.
    Mask {
        /// Number of cells with different walkability.
        cells: usize,
        /// First differing cell, row-major.
        first: (usize, usize),
    },
    /// A mask did not survive its compressed encoding unchanged.
    Transport,
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dimensions { authoritative, presentation } => write!(
                f,
                "dimensions differ: {}x{} vs {}x{}",
                authoritative.0, authoritative.1, presentation.0, presentation.1
            ),
            Self::Fingerprint { authoritative, presentation } => {
                write!(f, "fingerprints differ: {authoritative} vs {presentation}")
            }
            Self::Mask { cells, first } => write!(
                f,
                "collision masks differ in {cells} cells, first at ({}, {})",
                first.0, first.1
            ),
            Self::Transport => write!(f, "compressed mask transport is lossy"),
        }
    }
}

/// Lists every way the two instances disagree. Empty means identical.
#[must_use]
pub fn compare(authoritative: &World, presentation: &World) -> Vec<Divergence> {
    let mut found = Vec::new();

    let a_dims = (authoritative.mask().width(), authoritative.mask().height());
    let p_dims = (presentation.mask().width(), presentation.mask().height());
    if a_dims != p_dims {
        found.push(Divergence::Dimensions {
            authoritative: a_dims,
            presentation: p_dims,
        });
        return found;
    }

    let (a_print, p_print) = (authoritative.fingerprint(), presentation.fingerprint());
    if a_print != p_print {
        found.push(Divergence::Fingerprint {
            authoritative: a_print,
            presentation: p_print,
        });
    }

    if let Some(divergence) = compare_masks(authoritative.mask(), presentation.mask()) {
        found.push(divergence);
    }

    if !transport_is_lossless(authoritative.mask()) {
        found.push(Divergence::Transport);
    }

    found
}

/// Cell-by-cell mask comparison. Assumes equal dimensions.
#[must_use]
pub fn compare_masks(a: &CollisionMask, b: &CollisionMask) -> Option<Divergence> {
    let mut differing = a
        .cells()
        .as_slice()
        .iter()
        .zip(b.cells().as_slice())
        .enumerate()
        .filter(|(_, (x, y))| x != y)
        .map(|(i, _)| i);

    let first = differing.next()?;
    Some(Divergence::Mask {
        cells: 1 + differing.count(),
        first: a.cells().coords_of(first),
    })
}

/// True if the mask decodes from its compressed form unchanged.
#[must_use]
pub fn transport_is_lossless(mask: &CollisionMask) -> bool {
    CollisionMask::from_compressed(&mask.to_compressed()).is_ok_and(|decoded| &decoded == mask)
}
