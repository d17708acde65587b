//! # Block Materials
//!
//! Occupancy-with-material grids for the block-style meshers.
//!
//! The cuboid and greedy meshers only care whether a cell is solid and which
//! material its faces carry. [`VoxelGrid`] exposes exactly that, so they run
//! unchanged over a signed [`DensityField`] (every solid sample is material 1)
//! or over a [`MaterialGrid`] of blocks.

use crate::field::{DensityField, DENSITY_EMPTY, DENSITY_SOLID};

/// Material identifier. 0 is empty.
pub type MaterialId = u8;

/// The empty material.
pub const EMPTY: MaterialId = 0;

/// Material reported for solid density samples.
pub const SOLID: MaterialId = 1;

/// Terrain block kinds.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Block {
    /// Air.
    #[default]
    Empty = 0,
    /// Bedrock and deep stone.
    Rock = 1,
    /// Subsoil.
    Dirt = 2,
    /// Topsoil.
    Grass = 3,
    /// Standing water.
    Water = 4,
}

impl Block {
    /// Returns the material id.
    #[inline]
    #[must_use]
    pub const fn id(self) -> MaterialId {
        self as MaterialId
    }

    /// Maps a material id back to a block, if it names one.
    #[must_use]
    pub const fn from_id(id: MaterialId) -> Option<Self> {
        match id {
            0 => Some(Self::Empty),
            1 => Some(Self::Rock),
            2 => Some(Self::Dirt),
            3 => Some(Self::Grass),
            4 => Some(Self::Water),
            _ => None,
        }
    }
}

/// Read access to a grid of materials.
pub trait VoxelGrid {
    /// Dimensions `[x, y, z]`.
    fn dims(&self) -> [usize; 3];

    /// Material at an in-range coordinate.
    fn material(&self, x: usize, y: usize, z: usize) -> MaterialId;

    /// Material at a signed coordinate, [`EMPTY`] outside the grid.
    fn material_at(&self, x: i32, y: i32, z: i32) -> MaterialId {
        let [nx, ny, nz] = self.dims();
        if x < 0 || y < 0 || z < 0 || x as usize >= nx || y as usize >= ny || z as usize >= nz {
            return EMPTY;
        }
        self.material(x as usize, y as usize, z as usize)
    }

    /// Returns true if the signed coordinate is inside the grid and solid.
    fn is_solid_at(&self, x: i32, y: i32, z: i32) -> bool {
        self.material_at(x, y, z) != EMPTY
    }
}

impl VoxelGrid for DensityField {
    #[inline]
    fn dims(&self) -> [usize; 3] {
        DensityField::dims(self)
    }

    #[inline]
    fn material(&self, x: usize, y: usize, z: usize) -> MaterialId {
        if self.is_solid(x, y, z) {
            SOLID
        } else {
            EMPTY
        }
    }
}

/// A dense grid of material ids, laid out like [`DensityField`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaterialGrid {
    dims: [usize; 3],
    cells: Vec<MaterialId>,
}

impl MaterialGrid {
    /// Creates an all-empty grid.
    ///
    /// # Panics
    ///
    /// Panics if any dimension is zero.
    #[must_use]
    pub fn new(dims: [usize; 3]) -> Self {
        assert!(
            dims.iter().all(|&d| d > 0),
            "material grid needs at least one cell per axis, got {dims:?}"
        );
        Self {
            dims,
            cells: vec![EMPTY; dims[0] * dims[1] * dims[2]],
        }
    }

    #[inline]
    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        assert!(
            x < self.dims[0] && y < self.dims[1] && z < self.dims[2],
            "cell ({x}, {y}, {z}) outside grid {:?}",
            self.dims
        );
        (x * self.dims[1] + y) * self.dims[2] + z
    }

    /// Returns the material at `(x, y, z)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the grid.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize, z: usize) -> MaterialId {
        self.cells[self.index(x, y, z)]
    }

    /// Sets the material at `(x, y, z)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the grid.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, material: MaterialId) {
        let i = self.index(x, y, z);
        self.cells[i] = material;
    }

    /// Number of non-empty cells.
    #[must_use]
    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|&&m| m != EMPTY).count()
    }

    /// Binary density view: solid cells become [`DENSITY_SOLID`], the rest
    /// [`DENSITY_EMPTY`].
    #[must_use]
    pub fn to_density_field(&self) -> DensityField {
        DensityField::from_fn(self.dims, |x, y, z| {
            if self.get(x, y, z) == EMPTY {
                DENSITY_EMPTY
            } else {
                DENSITY_SOLID
            }
        })
    }
}

impl VoxelGrid for MaterialGrid {
    #[inline]
    fn dims(&self) -> [usize; 3] {
        self.dims
    }

    #[inline]
    fn material(&self, x: usize, y: usize, z: usize) -> MaterialId {
        self.get(x, y, z)
    }
}
