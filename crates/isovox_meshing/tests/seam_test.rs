//! # Chunk Seam Tests
//!
//! Adjacent chunks meshed independently must agree exactly on their shared
//! face, or cracks open between them.

use std::collections::BTreeSet;

use isovox_core::{DensitySource, MeshBuffer};
use isovox_meshing::lod::{mesh_plan, ChunkPlan, LodNode, CHUNK_CELLS};
use isovox_meshing::Transvoxel;
use isovox_procedural::{HeightmapTerrain, WorldSeed};

/// Heightmap ground with no sample exactly on the isolevel.
fn ground(seed: u64) -> impl Fn(i32, i32, i32) -> i8 {
    let terrain = HeightmapTerrain::new(WorldSeed::new(seed), 4.0, 8.0);
    move |x, y, z| match terrain.density(x, y, z) {
        0 => 1,
        d => d,
    }
}

/// Bit patterns of every vertex lying on the plane `axis = value`.
fn on_plane(mesh: &MeshBuffer, axis: usize, value: f32) -> BTreeSet<[u32; 3]> {
    mesh.positions()
        .iter()
        .filter(|p| p[axis] == value)
        .map(|p| p.map(f32::to_bits))
        .collect()
}

/// Test: Neighbours along X produce bit-identical vertices on the shared face.
#[test]
fn test_adjacent_chunks_share_exact_vertices() {
    let source = ground(5);
    let left = ChunkPlan {
        level: 0,
        origin: [0, 0, 0],
    };
    let right = ChunkPlan {
        level: 0,
        origin: [CHUNK_CELLS, 0, 0],
    };

    let a = left.extract(&source, 0.0, Transvoxel::new());
    let b = right.extract(&source, 0.0, Transvoxel::new());
    let face = CHUNK_CELLS as f32;

    let from_left = on_plane(&a, 0, face);
    let from_right = on_plane(&b, 0, face);
    assert!(!from_left.is_empty(), "the ground should cross the shared face");
    assert_eq!(from_left, from_right);
}

/// Test: The same holds along Z and at a coarser stride.
#[test]
fn test_seams_hold_along_z_at_level_one() {
    let source = ground(11);
    let near = ChunkPlan {
        level: 1,
        origin: [0, 0, 0],
    };
    let far = ChunkPlan {
        level: 1,
        origin: [0, 0, 2 * CHUNK_CELLS],
    };

    let a = near.extract(&source, 0.0, Transvoxel::new());
    let b = far.extract(&source, 0.0, Transvoxel::new());
    let face = (2 * CHUNK_CELLS) as f32;

    let from_near = on_plane(&a, 2, face);
    assert!(!from_near.is_empty());
    assert_eq!(from_near, on_plane(&b, 2, face));
}

/// Test: Reuse does not move seam vertices.
#[test]
fn test_seam_vertices_do_not_depend_on_reuse() {
    let source = ground(5);
    let chunk = ChunkPlan {
        level: 0,
        origin: [0, 0, 0],
    };
    let shared = chunk.extract(&source, 0.0, Transvoxel::new());
    let fresh = chunk.extract(&source, 0.0, Transvoxel::new().with_reuse(false));
    let face = CHUNK_CELLS as f32;
    assert_eq!(on_plane(&shared, 0, face), on_plane(&fresh, 0, face));
}

/// Test: A full LOD plan meshes into one valid buffer.
#[test]
fn test_lod_plan_meshes_terrain() {
    let source = ground(5);
    let mut root = LodNode::new(2, [0, 0, 0]);
    root.expand();
    let plan = root.render_plan();
    assert_eq!(plan.len(), 15);

    let mesh = mesh_plan(&plan, &source, 0.0, Transvoxel::new());
    assert!(mesh.triangle_count() > 0);
    assert!(mesh.validate().is_ok());

    let expected: usize = plan
        .iter()
        .map(|chunk| chunk.extract(&source, 0.0, Transvoxel::new()).triangle_count())
        .sum();
    assert_eq!(mesh.triangle_count(), expected);
}
