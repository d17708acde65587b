//! # Meshing Configuration
//!
//! Loaded once at startup from TOML. Every field has a default, so an empty
//! document is a valid configuration.
//!
//! ```toml
//! isolevel = 0.0
//! chunk_size = 32
//! mesher = "transvoxel"
//! gradient_normals = true
//! transvoxel_reuse = true
//! octree_min_leaf = 1.0
//! lod_levels = 3
//! worker_threads = 4
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{MeshingError, MeshingResult};
use crate::mesher::{Mesher, SurfaceExtractor};

/// Deepest LOD tree the config accepts.
pub const MAX_LOD_LEVELS: u32 = 8;

/// Meshing settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshingConfig {
    /// Density threshold between solid and empty.
    pub isolevel: f32,
    /// Samples per chunk axis.
    pub chunk_size: usize,
    /// Mesher used for chunks.
    pub mesher: Mesher,
    /// Gradient normals for Marching Cubes; flat face normals when false.
    pub gradient_normals: bool,
    /// Transvoxel vertex reuse.
    pub transvoxel_reuse: bool,
    /// Octree leaf edge length.
    pub octree_min_leaf: f32,
    /// Levels in the LOD chunk tree.
    pub lod_levels: u32,
    /// Mesh worker threads.
    pub worker_threads: usize,
}

impl Default for MeshingConfig {
    fn default() -> Self {
        Self {
            isolevel: 0.0,
            chunk_size: 32,
            mesher: Mesher::Transvoxel,
            gradient_normals: true,
            transvoxel_reuse: true,
            octree_min_leaf: 1.0,
            lod_levels: 3,
            worker_threads: 4,
        }
    }
}

impl MeshingConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`MeshingError::Toml`] for malformed documents and
    /// [`MeshingError::InvalidConfig`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> MeshingResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialises to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`MeshingError::TomlWrite`] if serialisation fails.
    pub fn to_toml(&self) -> MeshingResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// Checks every value is in range.
    ///
    /// # Errors
    ///
    /// Returns [`MeshingError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> MeshingResult<()> {
        if !self.isolevel.is_finite() {
            return Err(MeshingError::InvalidConfig(format!(
                "isolevel must be finite, got {}",
                self.isolevel
            )));
        }
        if self.chunk_size == 0 {
            return Err(MeshingError::InvalidConfig(
                "chunk_size must be at least 1".into(),
            ));
        }
        if self.worker_threads == 0 {
            return Err(MeshingError::InvalidConfig(
                "worker_threads must be at least 1".into(),
            ));
        }
        if !self.octree_min_leaf.is_finite() || self.octree_min_leaf <= 0.0 {
            return Err(MeshingError::InvalidConfig(format!(
                "octree_min_leaf must be positive, got {}",
                self.octree_min_leaf
            )));
        }
        if self.lod_levels > MAX_LOD_LEVELS {
            return Err(MeshingError::InvalidConfig(format!(
                "lod_levels must be at most {MAX_LOD_LEVELS}, got {}",
                self.lod_levels
            )));
        }
        Ok(())
    }

    /// The configured mesher with the configured options.
    #[must_use]
    pub fn extractor(&self) -> Box<dyn SurfaceExtractor> {
        self.mesher.extractor(self)
    }
}
