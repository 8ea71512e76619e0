//! # Simplex Noise Implementation
//!
//! Deterministic 2D coherent noise built from the world's random stream.
//!
//! ## Determinism Guarantee
//!
//! The permutation table is shuffled with draws from the `WorldRng`, so the
//! noise needs no seed of its own. Sampling only uses `+ - * /` and
//! truncating casts on `f64`, which give the same bits on every platform.

use crate::rng::WorldRng;

/// Pre-computed permutation table for noise.
///
/// Built once per world from the random stream and reused.
#[derive(Clone)]
struct PermutationTable {
    /// 512-entry permutation table (256 entries, doubled for overflow handling).
    perm: [u8; 512],
    /// Gradient table (12 gradients for 2D simplex).
    grad: [[i8; 2]; 12],
}

impl PermutationTable {
    /// Shuffles a permutation table with 255 draws from `rng`.
    fn from_rng(rng: &mut WorldRng) -> Self {
        let mut perm = [0u8; 512];

        for (slot, value) in perm.iter_mut().zip(0..=u8::MAX) {
            *slot = value;
        }

        // Fisher-Yates shuffle driven by the world stream
        for i in (1..256usize).rev() {
            #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
            let j = rng.range_inclusive(0, i as i64) as usize;
            perm.swap(i, j);
        }

        // Double the table to avoid index wrapping
        for i in 0..256 {
            perm[256 + i] = perm[i];
        }

        let grad = [
            [1, 0], [1, 1], [0, 1], [-1, 1],
            [-1, 0], [-1, -1], [0, -1], [1, -1],
            [1, 0], [0, 1], [-1, 0], [0, -1],
        ];

        Self { perm, grad }
    }

    #[inline]
    fn get(&self, index: usize) -> u8 {
        self.perm[index & 511]
    }

    #[inline]
    fn gradient(&self, hash: u8) -> [i8; 2] {
        self.grad[(hash % 12) as usize]
    }
}

/// 2D Simplex noise generator.
///
/// Produces smooth, continuous noise values in the range [-1, 1].
///
/// # Example
///
/// ```rust
/// use highland_procedural::{SimplexNoise, WorldRng, WorldSeed};
///
/// let mut rng = WorldRng::new(WorldSeed::new(42));
/// let noise = SimplexNoise::from_rng(&mut rng);
///
/// let value = noise.noise2d(10.5, 20.3);
/// assert!((-1.0..=1.0).contains(&value));
/// ```
#[derive(Clone)]
pub struct SimplexNoise {
    perm_table: PermutationTable,
}

impl SimplexNoise {
    /// Skewing factor for 2D simplex grid.
    const F2: f64 = 0.366_025_403_784_439; // (sqrt(3) - 1) / 2
    /// Unskewing factor for 2D simplex grid.
    const G2: f64 = 0.211_324_865_405_187; // (3 - sqrt(3)) / 6

    /// Creates a noise field by consuming draws from the world stream.
    #[must_use]
    pub fn from_rng(rng: &mut WorldRng) -> Self {
        Self {
            perm_table: PermutationTable::from_rng(rng),
        }
    }

    /// Samples 2D simplex noise at the given coordinates.
    ///
    /// # Returns
    ///
    /// A value in the range [-1, 1].
    #[must_use]
    pub fn noise2d(&self, x: f64, y: f64) -> f64 {
        // Skew input coordinates to simplex grid
        let skew = (x + y) * Self::F2;
        let i = fast_floor(x + skew);
        let j = fast_floor(y + skew);

        // Unskew to get first corner in simplex
        let unskew = f64::from(i + j) * Self::G2;
        let x0 = x - (f64::from(i) - unskew);
        let y0 = y - (f64::from(j) - unskew);

        // Upper or lower triangle
        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - f64::from(i1) + Self::G2;
        let y1 = y0 - f64::from(j1) + Self::G2;
        let x2 = x0 - 1.0 + 2.0 * Self::G2;
        let y2 = y0 - 1.0 + 2.0 * Self::G2;

        #[allow(clippy::cast_sign_loss)]
        let ii = (i & 255) as usize;
        #[allow(clippy::cast_sign_loss)]
        let jj = (j & 255) as usize;
        #[allow(clippy::cast_sign_loss)]
        let (i1, j1) = (i1 as usize, j1 as usize);

        let gi0 = self.perm_table.get(ii + self.perm_table.get(jj) as usize);
        let gi1 = self.perm_table.get(ii + i1 + self.perm_table.get(jj + j1) as usize);
        let gi2 = self.perm_table.get(ii + 1 + self.perm_table.get(jj + 1) as usize);

        let n0 = self.contribution(x0, y0, gi0);
        let n1 = self.contribution(x1, y1, gi1);
        let n2 = self.contribution(x2, y2, gi2);

        // 70.0 normalizes the output; the clamp pins the contract
        (70.0 * (n0 + n1 + n2)).clamp(-1.0, 1.0)
    }

    #[inline]
    fn contribution(&self, x: f64, y: f64, gradient_index: u8) -> f64 {
        let t = 0.5 - x * x - y * y;
        if t < 0.0 {
            0.0
        } else {
            let grad = self.perm_table.gradient(gradient_index);
            let t2 = t * t;
            t2 * t2 * (x * f64::from(grad[0]) + y * f64::from(grad[1]))
        }
    }

    /// Generates octaved (fractal) noise.
    ///
    /// Octaves are summed in order, lowest frequency first, and normalized
    /// by the total amplitude.
    ///
    /// # Arguments
    ///
    /// * `x`, `y` - Coordinates
    /// * `octaves` - Number of noise layers
    /// * `persistence` - Amplitude decay per octave
    /// * `lacunarity` - Frequency increase per octave
    ///
    /// # Returns
    ///
    /// A value in the range [-1, 1].
    #[must_use]
    pub fn octaved(
        &self,
        x: f64,
        y: f64,
        octaves: u32,
        persistence: f64,
        lacunarity: f64,
    ) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_amplitude = 0.0;

        for _ in 0..octaves {
            total += self.noise2d(x * frequency, y * frequency) * amplitude;
            max_amplitude += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }

        if max_amplitude > 0.0 {
            total / max_amplitude
        } else {
            0.0
        }
    }
}

/// Floor that avoids the libm call.
#[inline]
#[allow(clippy::cast_possible_truncation)]
fn fast_floor(x: f64) -> i32 {
    let xi = x as i32;
    if x < f64::from(xi) { xi - 1 } else { xi }
}
