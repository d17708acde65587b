//! # Simplex Noise
//!
//! Deterministic 2D and 3D simplex noise plus fractal sums.
//!
//! Heightmaps sample the 2D variant over `(x, z)`; volumetric terrain samples
//! the 3D variant. Both return values in [-1, 1].
//!
//! ## Determinism Guarantee
//!
//! Given the same [`WorldSeed`], every sample is identical on every platform.
//! The permutation shuffle uses its own xorshift stream rather than a
//! library RNG whose algorithm could change between versions.

/// World seed for deterministic generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives an independent sub-seed for one purpose (heights, scatter, ...).
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut hash = self.0 ^ purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(0x1505_0F0C_A5E5_EED5)
    }
}

/// 2D gradients: the eight compass directions, with the axes repeated.
const GRAD2: [[i8; 2]; 12] = [
    [1, 0], [1, 1], [0, 1], [-1, 1],
    [-1, 0], [-1, -1], [0, -1], [1, -1],
    [1, 0], [0, 1], [-1, 0], [0, -1],
];

/// 3D gradients: midpoints of the 12 cube edges.
const GRAD3: [[i8; 3]; 12] = [
    [1, 1, 0], [-1, 1, 0], [1, -1, 0], [-1, -1, 0],
    [1, 0, 1], [-1, 0, 1], [1, 0, -1], [-1, 0, -1],
    [0, 1, 1], [0, -1, 1], [0, 1, -1], [0, -1, -1],
];

/// Seeded 256-entry permutation, doubled so lookups never wrap.
struct Permutation {
    perm: [u8; 512],
}

impl Permutation {
    fn new(seed: WorldSeed) -> Self {
        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().take(256).enumerate() {
            *slot = i as u8;
        }

        // Fisher-Yates driven by xorshift64. A zero state would stall the
        // generator, so it is nudged off zero first.
        let mut state = seed.value() | 1;
        for i in (1..256).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let j = (state % (i as u64 + 1)) as usize;
            perm.swap(i, j);
        }

        let (low, high) = perm.split_at_mut(256);
        high.copy_from_slice(low);
        Self { perm }
    }

    #[inline]
    fn get(&self, index: usize) -> usize {
        usize::from(self.perm[index & 511])
    }
}

/// Simplex noise generator.
///
/// # Example
///
/// ```rust
/// use isovox_procedural::{SimplexNoise, WorldSeed};
///
/// let noise = SimplexNoise::new(WorldSeed::new(42));
/// let v = noise.sample3(1.5, 2.25, -7.0);
/// assert!((-1.0..=1.0).contains(&v));
/// ```
pub struct SimplexNoise {
    perm: Permutation,
}

impl SimplexNoise {
    const F2: f64 = 0.366_025_403_784_439; // (sqrt(3) - 1) / 2
    const G2: f64 = 0.211_324_865_405_187; // (3 - sqrt(3)) / 6
    const F3: f64 = 1.0 / 3.0;
    const G3: f64 = 1.0 / 6.0;

    /// Creates a generator from a seed.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            perm: Permutation::new(seed),
        }
    }

    /// Samples 2D noise. Range [-1, 1].
    #[must_use]
    pub fn sample2(&self, x: f64, y: f64) -> f64 {
        let skew = (x + y) * Self::F2;
        let i = fast_floor(x + skew);
        let j = fast_floor(y + skew);

        let unskew = f64::from(i + j) * Self::G2;
        let x0 = x - (f64::from(i) - unskew);
        let y0 = y - (f64::from(j) - unskew);

        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - f64::from(i1) + Self::G2;
        let y1 = y0 - f64::from(j1) + Self::G2;
        let x2 = x0 - 1.0 + 2.0 * Self::G2;
        let y2 = y0 - 1.0 + 2.0 * Self::G2;

        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;
        let i1 = i1 as usize;
        let j1 = j1 as usize;

        let g0 = self.perm.get(ii + self.perm.get(jj));
        let g1 = self.perm.get(ii + i1 + self.perm.get(jj + j1));
        let g2 = self.perm.get(ii + 1 + self.perm.get(jj + 1));

        let n = corner2(x0, y0, g0) + corner2(x1, y1, g1) + corner2(x2, y2, g2);
        (70.0 * n).clamp(-1.0, 1.0)
    }

    /// Samples 3D noise. Range [-1, 1].
    #[must_use]
    pub fn sample3(&self, x: f64, y: f64, z: f64) -> f64 {
        let skew = (x + y + z) * Self::F3;
        let i = fast_floor(x + skew);
        let j = fast_floor(y + skew);
        let k = fast_floor(z + skew);

        let unskew = f64::from(i + j + k) * Self::G3;
        let x0 = x - (f64::from(i) - unskew);
        let y0 = y - (f64::from(j) - unskew);
        let z0 = z - (f64::from(k) - unskew);

        // Which of the six tetrahedra of the skewed cube holds the point.
        let ([i1, j1, k1], [i2, j2, k2]) = if x0 >= y0 {
            if y0 >= z0 {
                ([1, 0, 0], [1, 1, 0])
            } else if x0 >= z0 {
                ([1, 0, 0], [1, 0, 1])
            } else {
                ([0, 0, 1], [1, 0, 1])
            }
        } else if y0 < z0 {
            ([0, 0, 1], [0, 1, 1])
        } else if x0 < z0 {
            ([0, 1, 0], [0, 1, 1])
        } else {
            ([0, 1, 0], [1, 1, 0])
        };

        let x1 = x0 - f64::from(i1) + Self::G3;
        let y1 = y0 - f64::from(j1) + Self::G3;
        let z1 = z0 - f64::from(k1) + Self::G3;
        let x2 = x0 - f64::from(i2) + 2.0 * Self::G3;
        let y2 = y0 - f64::from(j2) + 2.0 * Self::G3;
        let z2 = z0 - f64::from(k2) + 2.0 * Self::G3;
        let x3 = x0 - 1.0 + 3.0 * Self::G3;
        let y3 = y0 - 1.0 + 3.0 * Self::G3;
        let z3 = z0 - 1.0 + 3.0 * Self::G3;

        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;
        let kk = (k & 255) as usize;
        let hash = |di: usize, dj: usize, dk: usize| {
            self.perm
                .get(ii + di + self.perm.get(jj + dj + self.perm.get(kk + dk)))
        };

        let g0 = hash(0, 0, 0);
        let g1 = hash(i1 as usize, j1 as usize, k1 as usize);
        let g2 = hash(i2 as usize, j2 as usize, k2 as usize);
        let g3 = hash(1, 1, 1);

        let n = corner3(x0, y0, z0, g0)
            + corner3(x1, y1, z1, g1)
            + corner3(x2, y2, z2, g2)
            + corner3(x3, y3, z3, g3);
        (32.0 * n).clamp(-1.0, 1.0)
    }

    /// Fractal 2D noise: `octaves` layers, each `lacunarity` times finer and
    /// `persistence` times weaker than the last. Range [-1, 1].
    #[must_use]
    pub fn octaved2(&self, x: f64, y: f64, octaves: u32, persistence: f64, lacunarity: f64) -> f64 {
        fractal(octaves, persistence, lacunarity, |f| self.sample2(x * f, y * f))
    }

    /// Fractal 3D noise. Range [-1, 1].
    #[must_use]
    pub fn octaved3(
        &self,
        x: f64,
        y: f64,
        z: f64,
        octaves: u32,
        persistence: f64,
        lacunarity: f64,
    ) -> f64 {
        fractal(octaves, persistence, lacunarity, |f| {
            self.sample3(x * f, y * f, z * f)
        })
    }
}

/// Weighted octave sum normalised by total amplitude.
fn fractal<F>(octaves: u32, persistence: f64, lacunarity: f64, sample: F) -> f64
where
    F: Fn(f64) -> f64,
{
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_amplitude = 0.0;

    for _ in 0..octaves.max(1) {
        total += sample(frequency) * amplitude;
        max_amplitude += amplitude;
        amplitude *= persistence;
        frequency *= lacunarity;
    }

    total / max_amplitude
}

#[inline]
fn corner2(x: f64, y: f64, hash: usize) -> f64 {
    let t = 0.5 - x * x - y * y;
    if t < 0.0 {
        return 0.0;
    }
    let g = GRAD2[hash % 12];
    let t2 = t * t;
    t2 * t2 * (x * f64::from(g[0]) + y * f64::from(g[1]))
}

#[inline]
fn corner3(x: f64, y: f64, z: f64, hash: usize) -> f64 {
    let t = 0.6 - x * x - y * y - z * z;
    if t < 0.0 {
        return 0.0;
    }
    let g = GRAD3[hash % 12];
    let t2 = t * t;
    t2 * t2 * (x * f64::from(g[0]) + y * f64::from(g[1]) + z * f64::from(g[2]))
}

/// Floor to `i32` without the libm call.
#[inline]
fn fast_floor(x: f64) -> i32 {
    let xi = x as i32;
    if x < f64::from(xi) {
        xi - 1
    } else {
        xi
    }
}

/// Maps a [-1, 1] noise value to [0, 1].
#[inline]
#[must_use]
pub fn unit(value: f64) -> f64 {
    (value + 1.0) * 0.5
}
