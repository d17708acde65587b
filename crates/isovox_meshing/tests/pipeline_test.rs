//! # Pipeline Integration Tests
//!
//! Config file in, chunks edited and meshed on the worker pool out.

use std::time::Duration;

use isovox_core::{DensityField, EditOp, DENSITY_SOLID};
use isovox_meshing::{
    MeshJob, MeshWorkerPool, Mesher, MeshingConfig, MeshingError, TerrainChunk,
};
use isovox_procedural::{SimplexTerrain, WorldSeed};

const CONFIG: &str = r#"
isolevel = 0.0
chunk_size = 16
mesher = "marching_cubes"
gradient_normals = false
transvoxel_reuse = true
octree_min_leaf = 1.0
lod_levels = 2
worker_threads = 3
"#;

/// Test: A config survives a TOML round trip.
#[test]
fn test_config_round_trip() {
    let config = MeshingConfig::from_toml_str(CONFIG).unwrap();
    assert_eq!(config.mesher, Mesher::MarchingCubes);
    assert!(!config.gradient_normals);

    let text = config.to_toml().unwrap();
    assert_eq!(MeshingConfig::from_toml_str(&text).unwrap(), config);
}

/// Test: Out-of-range and malformed configs are rejected.
#[test]
fn test_config_rejections() {
    let bad = CONFIG.replace("worker_threads = 3", "worker_threads = 0");
    assert!(matches!(
        MeshingConfig::from_toml_str(&bad),
        Err(MeshingError::InvalidConfig(_))
    ));
    assert!(matches!(
        MeshingConfig::from_toml_str("chunk_size = \"big\""),
        Err(MeshingError::Toml(_))
    ));
}

/// Test: The pool meshes chunks exactly as a direct call would.
#[test]
fn test_worker_pool_meshes_terrain_chunks() {
    let config = MeshingConfig::from_toml_str(CONFIG).unwrap();
    let pool = MeshWorkerPool::new(&config).unwrap();
    assert_eq!(pool.worker_count(), 3);

    let terrain = SimplexTerrain::new(WorldSeed::new(21));
    let fields: Vec<DensityField> = (0..6)
        .map(|i| {
            let origin = [i * 16, 0, 0];
            DensityField::sample_source(&terrain, origin, 1, [config.chunk_size; 3])
        })
        .collect();

    for (id, field) in fields.iter().enumerate() {
        pool.submit(MeshJob {
            id: id as u64,
            field: field.clone(),
            mesher: config.mesher,
            isolevel: config.isolevel,
        })
        .unwrap();
    }

    let mut done = 0;
    while done < fields.len() {
        let Some(result) = pool.recv_timeout(Duration::from_secs(30)).unwrap() else {
            panic!("worker pool stalled after {done} results");
        };
        let field = &fields[result.id as usize];
        let direct = config.extractor().extract(field, config.isolevel);
        assert_eq!(result.mesh, direct);
        done += 1;
    }
    assert!(pool.try_recv().is_none());
}

/// Test: Fill and carve clamp, and the chunk mesh follows every edit.
#[test]
fn test_chunk_edits_clamp_and_remesh() {
    let config = MeshingConfig {
        mesher: Mesher::Greedy,
        ..MeshingConfig::default()
    };
    let mut chunk = TerrainChunk::from_config(DensityField::cubic(8), &config);
    assert!(chunk.mesh().is_empty());

    for _ in 0..200 {
        chunk.handle_voxel_click(3, 3, 3, EditOp::Fill);
    }
    assert_eq!(chunk.field().read().get(3, 3, 3), DENSITY_SOLID);
    // One 3x3x3 block merges into six quads.
    assert_eq!(chunk.mesh().triangle_count(), 12);

    for _ in 0..200 {
        chunk.handle_voxel_click(3, 3, 3, EditOp::Carve);
    }
    assert_eq!(chunk.field().read().get(3, 3, 3), 0);
    assert_eq!(chunk.field().read().solid_count(), 0);
    assert!(chunk.mesh().is_empty());
    assert_eq!(chunk.revision(), 401);
}
