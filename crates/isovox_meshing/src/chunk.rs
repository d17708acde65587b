//! # Editable Terrain Chunk
//!
//! A chunk owns its shared density field and the mesh last extracted from
//! it. A voxel click runs the brush under the write lock, then re-extracts
//! the whole chunk from a snapshot taken under the read lock.

use std::sync::Arc;

use isovox_core::{
    apply_brush, share, DensityField, DensitySource, EditOp, MeshBuffer, SharedField,
};

use crate::config::MeshingConfig;
use crate::mesher::{Mesher, SurfaceExtractor};

/// A density field plus its current mesh.
pub struct TerrainChunk {
    field: SharedField,
    mesher: Mesher,
    extractor: Box<dyn SurfaceExtractor>,
    isolevel: f32,
    mesh: MeshBuffer,
    revision: u64,
}

impl TerrainChunk {
    /// Wraps `field` and extracts its initial mesh.
    #[must_use]
    pub fn new(field: DensityField, mesher: Mesher, isolevel: f32) -> Self {
        let extractor = mesher.extractor(&MeshingConfig::default());
        Self::with_extractor(share(field), mesher, extractor, isolevel)
    }

    /// Wraps `field` using the mesher and options from `config`.
    #[must_use]
    pub fn from_config(field: DensityField, config: &MeshingConfig) -> Self {
        Self::with_extractor(share(field), config.mesher, config.extractor(), config.isolevel)
    }

    /// Samples a `config.chunk_size`-wide cube of `source` with its minimum
    /// corner at `origin`, then wraps it like [`from_config`](Self::from_config).
    #[must_use]
    pub fn generate<S>(source: &S, origin: [i32; 3], config: &MeshingConfig) -> Self
    where
        S: DensitySource + ?Sized,
    {
        let field = DensityField::sample_source(source, origin, 1, [config.chunk_size; 3]);
        Self::from_config(field, config)
    }

    fn with_extractor(
        field: SharedField,
        mesher: Mesher,
        extractor: Box<dyn SurfaceExtractor>,
        isolevel: f32,
    ) -> Self {
        let mut chunk = Self {
            field,
            mesher,
            extractor,
            isolevel,
            mesh: MeshBuffer::new(),
            revision: 0,
        };
        chunk.remesh();
        chunk
    }

    /// Handle to the shared field, for readers on other threads.
    #[must_use]
    pub fn field(&self) -> SharedField {
        Arc::clone(&self.field)
    }

    /// Mesher in use.
    #[must_use]
    pub const fn mesher(&self) -> Mesher {
        self.mesher
    }

    /// Isolevel in use.
    #[must_use]
    pub const fn isolevel(&self) -> f32 {
        self.isolevel
    }

    /// The mesh from the last extraction.
    #[must_use]
    pub const fn mesh(&self) -> &MeshBuffer {
        &self.mesh
    }

    /// Number of extractions run so far, the initial one included.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Applies a brush edit at `(x, y, z)` and re-extracts the chunk.
    ///
    /// The mesh is rebuilt even when the brush changed nothing, so the
    /// result always reflects the current field.
    pub fn handle_voxel_click(&mut self, x: i32, y: i32, z: i32, op: EditOp) -> &MeshBuffer {
        let changed = apply_brush(&mut self.field.write(), x, y, z, op);
        tracing::trace!(x, y, z, ?op, changed, mesher = self.mesher.name(), "voxel click");
        self.remesh()
    }

    /// Re-extracts from a snapshot of the current field.
    pub fn remesh(&mut self) -> &MeshBuffer {
        let snapshot = self.field.read().clone();
        self.mesh = self.extractor.extract(&snapshot, self.isolevel);
        self.revision += 1;
        &self.mesh
    }
}

impl std::fmt::Debug for TerrainChunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerrainChunk")
            .field("mesher", &self.mesher)
            .field("isolevel", &self.isolevel)
            .field("triangles", &self.mesh.triangle_count())
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isovox_core::DENSITY_SOLID;

    #[test]
    fn test_fill_builds_a_surface() {
        let mut chunk = TerrainChunk::new(DensityField::cubic(8), Mesher::Transvoxel, 0.0);
        assert!(chunk.mesh().is_empty());
        assert_eq!(chunk.revision(), 1);

        let triangles = chunk.handle_voxel_click(4, 4, 4, EditOp::Fill).triangle_count();
        assert!(triangles > 0);
        assert_eq!(chunk.field().read().solid_count(), 27);
        assert_eq!(chunk.revision(), 2);
    }

    #[test]
    fn test_edits_clamp() {
        let mut chunk = TerrainChunk::new(DensityField::cubic(4), Mesher::Naive, 0.0);
        for _ in 0..300 {
            chunk.handle_voxel_click(1, 1, 1, EditOp::Fill);
        }
        assert_eq!(chunk.field().read().get(1, 1, 1), DENSITY_SOLID);

        for _ in 0..300 {
            chunk.handle_voxel_click(1, 1, 1, EditOp::Carve);
        }
        assert_eq!(chunk.field().read().get(1, 1, 1), 0);
        assert!(chunk.mesh().is_empty());
    }

    #[test]
    fn test_generate_uses_chunk_size() {
        let config = MeshingConfig {
            chunk_size: 12,
            mesher: Mesher::Culled,
            ..MeshingConfig::default()
        };
        let floor = |_x: i32, y: i32, _z: i32| -> i8 { if y < 3 { -40 } else { 40 } };
        let chunk = TerrainChunk::generate(&floor, [24, 0, -12], &config);

        assert_eq!(chunk.field().read().dims(), [12, 12, 12]);
        assert_eq!(chunk.field().read().solid_count(), 12 * 3 * 12);
        assert_eq!(chunk.mesher(), Mesher::Culled);
        assert!(chunk.mesh().triangle_count() > 0);
    }

    #[test]
    fn test_config_options_reach_the_extractor() {
        let mut field = DensityField::cubic(6);
        field.set(2, 2, 2, -60);
        let config = MeshingConfig {
            mesher: Mesher::Transvoxel,
            transvoxel_reuse: false,
            ..MeshingConfig::default()
        };
        let fresh = TerrainChunk::from_config(field.clone(), &config);
        let shared = TerrainChunk::new(field, Mesher::Transvoxel, 0.0);

        assert_eq!(fresh.mesh().triangle_count(), shared.mesh().triangle_count());
        assert!(fresh.mesh().vertex_count() > shared.mesh().vertex_count());
    }
}
