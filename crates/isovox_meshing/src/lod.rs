//! # LOD Chunk Tree
//!
//! Nested shells of Transvoxel chunks around the world origin.
//!
//! A node at level `L` covers `16 * 2^L` world units per axis and is meshed
//! as 16^3 cells sampled at stride `2^L`. Expanding a node splits it into 8
//! children one level down. The render plan refines only the first octant
//! at each level and renders the other seven at their own, coarser level:
//!
//! ```text
//! level 2   ┌───────────────┬───────────────┐
//!           │ 1             │ 1             │
//!           ├───────┬───────┤               │
//!           │ 0 │ 0 │ 1     │               │
//!           ├───┼───┤       │               │
//!           │ 0 │ 0 │       │               │
//!           └───┴───┴───────┴───────────────┘
//! ```
//!
//! Chunks of one level share their boundary samples exactly. Chunks at
//! different levels meet on stride-aligned faces with no transition cells,
//! so cracks can open there.

use std::time::Instant;

use isovox_core::{DensityField, DensitySource, MeshBuffer};

use crate::config::MeshingConfig;
use crate::transvoxel::Transvoxel;

/// Cells per chunk axis.
pub const CHUNK_CELLS: i32 = 16;

/// Samples per chunk axis.
pub const CHUNK_SAMPLES: usize = CHUNK_CELLS as usize + 1;

/// Node of the LOD tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LodNode {
    level: u32,
    origin: [i32; 3],
    children: Option<Box<[LodNode; 8]>>,
}

impl LodNode {
    /// Creates an unexpanded node.
    #[must_use]
    pub const fn new(level: u32, origin: [i32; 3]) -> Self {
        Self {
            level,
            origin,
            children: None,
        }
    }

    /// Creates a root `config.lod_levels` levels deep at `origin`, fully
    /// expanded.
    #[must_use]
    pub fn from_config(config: &MeshingConfig, origin: [i32; 3]) -> Self {
        let mut root = Self::new(config.lod_levels, origin);
        root.expand();
        root
    }

    /// Meshes this node's render plan with the isolevel and reuse setting
    /// from `config`.
    #[must_use]
    pub fn mesh<S>(&self, source: &S, config: &MeshingConfig) -> MeshBuffer
    where
        S: DensitySource + ?Sized,
    {
        let extractor = Transvoxel::new().with_reuse(config.transvoxel_reuse);
        mesh_plan(&self.render_plan(), source, config.isolevel, extractor)
    }

    /// Level of detail, 0 being the finest.
    #[inline]
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Minimum world corner.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> [i32; 3] {
        self.origin
    }

    /// World distance between samples.
    #[inline]
    #[must_use]
    pub const fn stride(&self) -> i32 {
        1 << self.level
    }

    /// World edge length.
    #[inline]
    #[must_use]
    pub const fn extent(&self) -> i32 {
        CHUNK_CELLS * self.stride()
    }

    /// Children, once expanded.
    #[must_use]
    pub fn children(&self) -> Option<&[LodNode; 8]> {
        self.children.as_deref()
    }

    /// Subdivides down to level 0.
    ///
    /// Child `i` sits at octant `i`: bit 2 = X, bit 1 = Y, bit 0 = Z.
    /// Level-0 nodes stay leaves.
    pub fn expand(&mut self) {
        if self.level == 0 {
            return;
        }
        let half = self.extent() / 2;
        let level = self.level - 1;
        let origin = self.origin;
        let mut children: Box<[LodNode; 8]> = Box::new(std::array::from_fn(|i| {
            LodNode::new(
                level,
                [
                    origin[0] + half * ((i as i32 >> 2) & 1),
                    origin[1] + half * ((i as i32 >> 1) & 1),
                    origin[2] + half * (i as i32 & 1),
                ],
            )
        }));
        for child in children.iter_mut() {
            child.expand();
        }
        self.children = Some(children);
    }

    /// Chunks to mesh: the first child is refined recursively, its siblings
    /// render at their own level.
    #[must_use]
    pub fn render_plan(&self) -> Vec<ChunkPlan> {
        let mut plan = Vec::new();
        self.collect_plan(&mut plan);
        plan
    }

    fn collect_plan(&self, plan: &mut Vec<ChunkPlan>) {
        let Some(children) = self.children() else {
            plan.push(self.chunk());
            return;
        };
        children[0].collect_plan(plan);
        plan.extend(children[1..].iter().map(LodNode::chunk));
    }

    /// This node as a single chunk.
    #[must_use]
    pub const fn chunk(&self) -> ChunkPlan {
        ChunkPlan {
            level: self.level,
            origin: self.origin,
        }
    }
}

/// One chunk of a render plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkPlan {
    /// Level of detail.
    pub level: u32,
    /// Minimum world corner.
    pub origin: [i32; 3],
}

impl ChunkPlan {
    /// World distance between samples.
    #[must_use]
    pub const fn stride(&self) -> i32 {
        1 << self.level
    }

    /// Samples the chunk's 17^3 lattice.
    #[must_use]
    pub fn sample<S: DensitySource + ?Sized>(&self, source: &S) -> DensityField {
        DensityField::sample_source(source, self.origin, self.stride(), [CHUNK_SAMPLES; 3])
    }

    /// Samples and extracts the chunk in world coordinates.
    #[must_use]
    pub fn extract<S: DensitySource + ?Sized>(
        &self,
        source: &S,
        isolevel: f32,
        extractor: Transvoxel,
    ) -> MeshBuffer {
        let field = self.sample(source);
        extractor
            .with_origin(self.origin)
            .with_stride(self.stride())
            .extract(&field, isolevel)
    }
}

/// Meshes every chunk of `plan` into one buffer.
#[must_use]
pub fn mesh_plan<S: DensitySource + ?Sized>(
    plan: &[ChunkPlan],
    source: &S,
    isolevel: f32,
    extractor: Transvoxel,
) -> MeshBuffer {
    let start = Instant::now();
    let mut mesh = MeshBuffer::new();
    for chunk in plan {
        mesh.append(&chunk.extract(source, isolevel, extractor));
    }
    tracing::debug!(
        mesher = "transvoxel_lod",
        chunks = plan.len(),
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "lod pass complete"
    );
    mesh
}
