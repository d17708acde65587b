//! # ISOVOX Meshing
//!
//! Surface extraction from voxel density fields.
//!
//! ## Meshers
//!
//! | Mesher | Output |
//! |---|---|
//! | `naive` / `culled` | one cube per solid voxel |
//! | `greedy` | merged coplanar block faces |
//! | `marching_cubes` | smooth isosurface, unshared vertices |
//! | `transvoxel` | smooth isosurface, shared vertices, seam-exact positions |
//! | `octree_cubes` / `dual_contour` | merged octree cubes / +Y top faces |
//! | `qef_dual_contour` | one QEF-placed vertex per surface cell |
//!
//! Every mesher answers to `extract(field, isolevel) -> MeshBuffer`, see
//! [`Mesher`] and [`SurfaceExtractor`].
//!
//! ## Around the Meshers
//!
//! - [`TerrainChunk`]: brush edits plus full re-extraction
//! - [`MeshWorkerPool`]: chunks meshed on worker threads
//! - [`LodNode`]: nested Transvoxel chunks at growing strides
//! - [`MeshingConfig`]: TOML-loaded settings
//!
//! ## Example
//!
//! ```rust
//! use isovox_core::DensityField;
//! use isovox_meshing::Mesher;
//!
//! let mut field = DensityField::cubic(4);
//! field.set(1, 1, 1, -64);
//!
//! let mesh = Mesher::Transvoxel.extract(&field, 0.0);
//! assert_eq!(mesh.triangle_count(), 8);
//! assert!(mesh.validate().is_ok());
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod chunk;
pub mod config;
pub mod error;
pub mod greedy;
pub mod lod;
pub mod marching_cubes;
pub mod mesher;
pub mod naive;
pub mod octree;
pub mod qef;
pub mod tables;
pub mod transvoxel;
pub mod worker;

pub use chunk::TerrainChunk;
pub use config::MeshingConfig;
pub use error::{MeshingError, MeshingResult};
pub use greedy::{GreedyMesher, GreedyQuad};
pub use lod::{mesh_plan, ChunkPlan, LodNode};
pub use marching_cubes::MarchingCubes;
pub use mesher::{IsoGrid, Mesher, SurfaceExtractor};
pub use naive::NaiveMesher;
pub use octree::{NodeState, Octree};
pub use qef::{Qef, QefDualContour};
pub use transvoxel::Transvoxel;
pub use worker::{MeshJob, MeshResult, MeshWorkerPool, PoolStats};
