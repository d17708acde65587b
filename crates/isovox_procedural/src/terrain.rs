//! # Terrain Generators
//!
//! Three ways to fill a chunk:
//!
//! - [`SimplexTerrain`]: fractal 3D noise mapped straight to density. Caves,
//!   overhangs and floating islands.
//! - [`HeightmapTerrain`]: a 2D height function turned into a signed distance
//!   along Y. Rolling ground, used by the LOD tree.
//! - [`BlockTerrain`]: layered material columns for the block meshers.

use isovox_core::{Block, Density, DensityField, DensitySource, MaterialGrid};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::noise::{unit, SimplexNoise, WorldSeed};

/// Sub-seed purposes.
const PURPOSE_VOLUME: u64 = 0x766f_6c75_6d65;
const PURPOSE_HEIGHT: u64 = 0x6865_6967_6874;
const PURPOSE_SCATTER: u64 = 0x7363_6174_7465;

/// Converts a float density to a clamped sample.
#[inline]
fn quantize(value: f64) -> Density {
    value.round().clamp(-127.0, 127.0) as Density
}

/// Volumetric terrain from fractal 3D simplex noise.
///
/// `density = 255 * unit(fbm(p * scale)) - 127`, clamped to [-127, 127].
pub struct SimplexTerrain {
    noise: SimplexNoise,
    octaves: u32,
    persistence: f64,
    scale: f64,
}

impl SimplexTerrain {
    /// Default octave count.
    pub const OCTAVES: u32 = 16;
    /// Default amplitude falloff per octave.
    pub const PERSISTENCE: f64 = 0.5;
    /// Default base frequency.
    pub const SCALE: f64 = 0.07;

    /// Creates a generator with the default shape parameters.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            noise: SimplexNoise::new(seed.derive(PURPOSE_VOLUME)),
            octaves: Self::OCTAVES,
            persistence: Self::PERSISTENCE,
            scale: Self::SCALE,
        }
    }

    /// Overrides the octave count.
    #[must_use]
    pub const fn with_octaves(mut self, octaves: u32) -> Self {
        self.octaves = octaves;
        self
    }

    /// Fills a field anchored at the world origin.
    #[must_use]
    pub fn field(&self, dims: [usize; 3]) -> DensityField {
        let field = DensityField::sample_source(self, [0, 0, 0], 1, dims);
        tracing::debug!(?dims, solid = field.solid_count(), "simplex terrain generated");
        field
    }
}

impl DensitySource for SimplexTerrain {
    fn density(&self, x: i32, y: i32, z: i32) -> Density {
        let n = self.noise.octaved3(
            f64::from(x) * self.scale,
            f64::from(y) * self.scale,
            f64::from(z) * self.scale,
            self.octaves,
            self.persistence,
            2.0,
        );
        quantize(255.0 * unit(n) - 127.0)
    }
}

/// Ground surface from a 2D height function.
///
/// Density is the vertical distance to the surface times `steepness`:
/// negative below ground, positive above.
pub struct HeightmapTerrain {
    noise: SimplexNoise,
    base: f64,
    amplitude: f64,
    scale: f64,
    octaves: u32,
    steepness: f64,
}

impl HeightmapTerrain {
    /// Creates rolling ground between `base` and `base + amplitude`.
    #[must_use]
    pub fn new(seed: WorldSeed, base: f64, amplitude: f64) -> Self {
        Self {
            noise: SimplexNoise::new(seed.derive(PURPOSE_HEIGHT)),
            base,
            amplitude,
            scale: 0.09,
            octaves: 6,
            steepness: 24.0,
        }
    }

    /// Surface height at a world column.
    #[must_use]
    pub fn height(&self, x: i32, z: i32) -> f64 {
        let n = self.noise.octaved2(
            f64::from(x) * self.scale,
            f64::from(z) * self.scale,
            self.octaves,
            0.5,
            2.0,
        );
        self.base + self.amplitude * unit(n)
    }
}

impl DensitySource for HeightmapTerrain {
    fn density(&self, x: i32, y: i32, z: i32) -> Density {
        quantize((f64::from(y) - self.height(x, z)) * self.steepness)
    }
}

/// Layered block columns.
///
/// Each column gets a noise-driven height plus up to one block of jitter.
/// The bottom half is rock, then dirt, capped with grass. Caps at or below
/// the water line have a one in five chance of being water instead.
pub struct BlockTerrain {
    seed: WorldSeed,
    heights: SimplexNoise,
}

impl BlockTerrain {
    /// Probability that a low column is capped with water.
    pub const WATER_CHANCE: f32 = 0.2;

    /// Creates a generator.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            seed,
            heights: SimplexNoise::new(seed.derive(PURPOSE_HEIGHT)),
        }
    }

    /// Generates a cubic grid of `size` cells per axis.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    #[must_use]
    pub fn generate(&self, size: usize) -> MaterialGrid {
        let mut grid = MaterialGrid::new([size; 3]);
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed.derive(PURPOSE_SCATTER).value());
        let max_height = (size / 2).max(2);
        let water_line = max_height / 2;

        for x in 0..size {
            for z in 0..size {
                let n = unit(self.heights.octaved2(x as f64 * 0.05, z as f64 * 0.05, 4, 0.5, 2.0));
                let jitter = rng.gen_range(0..2);
                let height = (2 + (n * (max_height - 2) as f64) as usize + jitter).min(size);

                for y in 0..height {
                    let block = if y < height / 2 {
                        Block::Rock
                    } else if y + 1 < height {
                        Block::Dirt
                    } else if height <= water_line && rng.gen::<f32>() < Self::WATER_CHANCE {
                        Block::Water
                    } else {
                        Block::Grass
                    };
                    grid.set(x, y, z, block.id());
                }
            }
        }

        tracing::debug!(size, solid = grid.solid_count(), "block terrain generated");
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isovox_core::material::VoxelGrid;

    #[test]
    fn test_simplex_terrain_has_both_phases() {
        let field = SimplexTerrain::new(WorldSeed::new(7)).field([16, 16, 16]);
        let solid = field.solid_count();
        assert!(solid > 0, "expected some solid samples");
        assert!(solid < field.volume(), "expected some empty samples");
    }

    #[test]
    fn test_simplex_terrain_is_deterministic() {
        let a = SimplexTerrain::new(WorldSeed::new(99)).with_octaves(4).field([8, 8, 8]);
        let b = SimplexTerrain::new(WorldSeed::new(99)).with_octaves(4).field([8, 8, 8]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_heightmap_is_solid_below_surface() {
        let terrain = HeightmapTerrain::new(WorldSeed::new(3), 4.0, 6.0);
        for x in 0..8 {
            for z in 0..8 {
                let h = terrain.height(x, z);
                assert!((4.0..=10.0).contains(&h));
                assert!(terrain.density(x, 0, z) < 0, "column ({x},{z}) hollow at y=0");
                assert!(terrain.density(x, 12, z) > 0, "column ({x},{z}) solid at y=12");
            }
        }
    }

    #[test]
    fn test_block_columns_are_layered() {
        let grid = BlockTerrain::new(WorldSeed::new(5)).generate(16);
        assert_eq!(grid.get(0, 0, 0), Block::Rock.id());

        for x in 0..16 {
            for z in 0..16 {
                // Columns never float: once air starts it stays air.
                let mut seen_air = false;
                for y in 0..16 {
                    let solid = grid.is_solid_at(x, y, z);
                    assert!(!(seen_air && solid), "floating block at ({x},{y},{z})");
                    seen_air |= !solid;
                }
            }
        }
    }

    #[test]
    fn test_block_terrain_is_deterministic() {
        let a = BlockTerrain::new(WorldSeed::new(11)).generate(12);
        let b = BlockTerrain::new(WorldSeed::new(11)).generate(12);
        assert_eq!(a, b);
    }
}
