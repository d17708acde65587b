//! # Density Field
//!
//! Signed voxel samples addressed `[x][y][z]`.
//!
//! ## Sign Convention
//!
//! - Negative samples are solid
//! - Zero and positive samples are empty
//! - Magnitude approximates distance to the surface
//!
//! Samples outside the field read as 0, which makes everything beyond the
//! boundary empty. The isosurface passes rely on this to close the surface
//! at chunk edges.

use std::fmt;

use crate::error::{CoreError, CoreResult};

/// A single density sample.
pub type Density = i8;

/// Most solid representable sample.
pub const DENSITY_SOLID: Density = -127;

/// Most empty representable sample.
pub const DENSITY_EMPTY: Density = 127;

/// Smallest non-negative density that reads as empty at `isolevel`.
///
/// Meshers substitute this for samples beyond the field, so the outside
/// never turns solid when the isolevel is raised above 0.
#[must_use]
pub fn empty_density(isolevel: f32) -> Density {
    isolevel.ceil().clamp(0.0, f32::from(DENSITY_EMPTY)) as Density
}

/// A deterministic `f(x, y, z) -> density` over integer world coordinates.
///
/// Terrain generators implement this so chunks can be sampled at any
/// origin and stride.
pub trait DensitySource {
    /// Returns the density at a world coordinate.
    fn density(&self, x: i32, y: i32, z: i32) -> Density;
}

impl<F> DensitySource for F
where
    F: Fn(i32, i32, i32) -> Density,
{
    #[inline]
    fn density(&self, x: i32, y: i32, z: i32) -> Density {
        self(x, y, z)
    }
}

/// A dense 3D grid of density samples.
///
/// Storage is a single contiguous vector with Z varying fastest:
/// `samples[(x * dim_y + y) * dim_z + z]`.
#[derive(Clone, PartialEq, Eq)]
pub struct DensityField {
    dims: [usize; 3],
    samples: Vec<Density>,
}

impl DensityField {
    /// Creates a field of the given dimensions with every sample at 0.
    ///
    /// # Panics
    ///
    /// Panics if any dimension is zero.
    #[must_use]
    pub fn new(dims: [usize; 3]) -> Self {
        assert!(
            dims.iter().all(|&d| d > 0),
            "density field needs at least one sample per axis, got {dims:?}"
        );
        Self {
            dims,
            samples: vec![0; dims[0] * dims[1] * dims[2]],
        }
    }

    /// Fallible variant of [`DensityField::new`].
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDimensions`] if any dimension is zero.
    pub fn try_new(dims: [usize; 3]) -> CoreResult<Self> {
        if dims.iter().any(|&d| d == 0) {
            return Err(CoreError::InvalidDimensions {
                x: dims[0],
                y: dims[1],
                z: dims[2],
            });
        }
        Ok(Self::new(dims))
    }

    /// Creates a cubic field of `size` samples per axis.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    #[must_use]
    pub fn cubic(size: usize) -> Self {
        Self::new([size; 3])
    }

    /// Creates a field by evaluating `f` at every grid coordinate.
    ///
    /// # Panics
    ///
    /// Panics if any dimension is zero.
    #[must_use]
    pub fn from_fn<F>(dims: [usize; 3], mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> Density,
    {
        let mut field = Self::new(dims);
        for x in 0..dims[0] {
            for y in 0..dims[1] {
                for z in 0..dims[2] {
                    let i = field.index(x, y, z);
                    field.samples[i] = f(x, y, z);
                }
            }
        }
        field
    }

    /// Builds a field from nested `[x][y][z]` vectors.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDimensions`] for empty input and
    /// [`CoreError::RaggedField`] when rows differ in length.
    pub fn from_nested(data: &[Vec<Vec<Density>>]) -> CoreResult<Self> {
        let nx = data.len();
        let ny = data.first().map_or(0, Vec::len);
        let nz = data.first().and_then(|plane| plane.first()).map_or(0, Vec::len);
        let mut field = Self::try_new([nx, ny, nz])?;

        for (x, plane) in data.iter().enumerate() {
            if plane.len() != ny {
                return Err(CoreError::RaggedField {
                    axis: 'y',
                    expected: ny,
                    found: plane.len(),
                });
            }
            for (y, row) in plane.iter().enumerate() {
                if row.len() != nz {
                    return Err(CoreError::RaggedField {
                        axis: 'z',
                        expected: nz,
                        found: row.len(),
                    });
                }
                for (z, &value) in row.iter().enumerate() {
                    let i = field.index(x, y, z);
                    field.samples[i] = value;
                }
            }
        }
        Ok(field)
    }

    /// Samples a [`DensitySource`] on a regular lattice.
    ///
    /// Sample `(x, y, z)` reads world coordinate `origin + stride * (x, y, z)`.
    /// Adjacent chunks sampled with the same stride share their boundary
    /// samples exactly.
    ///
    /// # Panics
    ///
    /// Panics if any dimension is zero.
    #[must_use]
    pub fn sample_source<S>(source: &S, origin: [i32; 3], stride: i32, dims: [usize; 3]) -> Self
    where
        S: DensitySource + ?Sized,
    {
        Self::from_fn(dims, |x, y, z| {
            source.density(
                origin[0] + stride * x as i32,
                origin[1] + stride * y as i32,
                origin[2] + stride * z as i32,
            )
        })
    }

    /// Returns the dimensions `[x, y, z]`.
    #[inline]
    #[must_use]
    pub const fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// Returns the total number of samples.
    #[inline]
    #[must_use]
    pub fn volume(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if all three axes have the same length.
    #[inline]
    #[must_use]
    pub const fn is_cubic(&self) -> bool {
        self.dims[0] == self.dims[1] && self.dims[1] == self.dims[2]
    }

    /// Returns true if the coordinate lies inside the field.
    #[inline]
    #[must_use]
    pub const fn contains(&self, x: usize, y: usize, z: usize) -> bool {
        x < self.dims[0] && y < self.dims[1] && z < self.dims[2]
    }

    #[inline]
    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        debug_assert!(self.contains(x, y, z));
        (x * self.dims[1] + y) * self.dims[2] + z
    }

    /// Returns the sample at `(x, y, z)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the field.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize, z: usize) -> Density {
        assert!(
            self.contains(x, y, z),
            "sample ({x}, {y}, {z}) outside field {:?}",
            self.dims
        );
        self.samples[self.index(x, y, z)]
    }

    /// Returns the sample at `(x, y, z)`, or `None` outside the field.
    #[inline]
    #[must_use]
    pub fn try_get(&self, x: usize, y: usize, z: usize) -> Option<Density> {
        self.contains(x, y, z).then(|| self.samples[self.index(x, y, z)])
    }

    /// Sets the sample at `(x, y, z)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the field.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: Density) {
        assert!(
            self.contains(x, y, z),
            "sample ({x}, {y}, {z}) outside field {:?}",
            self.dims
        );
        let i = self.index(x, y, z);
        self.samples[i] = value;
    }

    /// Signed lookup that reads 0 outside the field.
    #[inline]
    #[must_use]
    pub fn sample(&self, x: i32, y: i32, z: i32) -> Density {
        self.sample_or(x, y, z, 0)
    }

    /// Signed lookup that reads `outside` beyond the field.
    #[inline]
    #[must_use]
    pub fn sample_or(&self, x: i32, y: i32, z: i32, outside: Density) -> Density {
        if x < 0 || y < 0 || z < 0 {
            return outside;
        }
        self.try_get(x as usize, y as usize, z as usize).unwrap_or(outside)
    }

    /// Returns true if the sample at `(x, y, z)` is solid.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the field.
    #[inline]
    #[must_use]
    pub fn is_solid(&self, x: usize, y: usize, z: usize) -> bool {
        self.get(x, y, z) < 0
    }

    /// Signed solidity test that treats everything outside as empty.
    #[inline]
    #[must_use]
    pub fn is_solid_at(&self, x: i32, y: i32, z: i32) -> bool {
        self.sample(x, y, z) < 0
    }

    /// Counts the solid samples.
    #[must_use]
    pub fn solid_count(&self) -> usize {
        self.samples.iter().filter(|&&v| v < 0).count()
    }

    /// Sets every sample to `value`.
    pub fn fill(&mut self, value: Density) {
        self.samples.fill(value);
    }

    /// Returns a copy padded by one empty sample on every side.
    ///
    /// `inflated.get(x + 1, y + 1, z + 1) == self.get(x, y, z)` for every
    /// valid coordinate and the border is 0.
    #[must_use]
    pub fn inflate(&self) -> Self {
        self.inflate_with(0)
    }

    /// Like [`inflate`](Self::inflate), with `border` in the padding.
    #[must_use]
    pub fn inflate_with(&self, border: Density) -> Self {
        let [nx, ny, nz] = self.dims;
        let mut inflated = Self::new([nx + 2, ny + 2, nz + 2]);
        inflated.fill(border);
        for x in 0..nx {
            for y in 0..ny {
                let src = self.index(x, y, 0);
                let dst = inflated.index(x + 1, y + 1, 1);
                inflated.samples[dst..dst + nz].copy_from_slice(&self.samples[src..src + nz]);
            }
        }
        inflated
    }

    /// Central-difference gradient at a grid point.
    ///
    /// The gradient points toward increasing density, which is out of the
    /// solid. Neighbours outside the field read as 0.
    #[must_use]
    pub fn gradient(&self, x: i32, y: i32, z: i32) -> [f32; 3] {
        self.gradient_or(x, y, z, 0)
    }

    /// Central-difference gradient with `outside` beyond the field.
    #[must_use]
    pub fn gradient_or(&self, x: i32, y: i32, z: i32, outside: Density) -> [f32; 3] {
        let at = |x, y, z| f32::from(self.sample_or(x, y, z, outside));
        let dx = at(x + 1, y, z) - at(x - 1, y, z);
        let dy = at(x, y + 1, z) - at(x, y - 1, z);
        let dz = at(x, y, z + 1) - at(x, y, z - 1);
        [dx * 0.5, dy * 0.5, dz * 0.5]
    }
}

impl fmt::Debug for DensityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DensityField")
            .field("dims", &self.dims)
            .field("solid", &self.solid_count())
            .finish()
    }
}
