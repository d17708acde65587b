//! # ISOVOX Core
//!
//! The data model shared by every voxel mesher:
//! - [`DensityField`]: signed samples, negative = solid
//! - [`MeshBuffer`]: positions, normals and counter-clockwise triangles
//!
//! ## Architecture Rules
//!
//! 1. **Extraction borrows, edits own** - meshers read a `&DensityField`,
//!    only brush edits mutate it
//! 2. **Outside is empty** - out-of-range samples read as 0
//! 3. **Contract violations panic** - bad indices are caller bugs, not errors
//!
//! ## Example
//!
//! ```rust
//! use isovox_core::{apply_brush, DensityField, EditOp};
//!
//! let mut field = DensityField::cubic(8);
//! apply_brush(&mut field, 4, 4, 4, EditOp::Fill);
//! assert_eq!(field.solid_count(), 27);
//! assert_eq!(field.inflate().dims(), [10, 10, 10]);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod edit;
pub mod error;
pub mod field;
pub mod material;
pub mod memory;
pub mod mesh;
pub mod sync;

pub use edit::{apply_brush, EditOp, BRUSH_RADIUS};
pub use error::{CoreError, CoreResult};
pub use field::{
    empty_density, Density, DensityField, DensitySource, DENSITY_EMPTY, DENSITY_SOLID,
};
pub use material::{Block, MaterialGrid, MaterialId, VoxelGrid};
pub use memory::{Arena, NodeId};
pub use mesh::{MeshBuffer, MeshVertex};
pub use sync::{share, DoubleBuffer, SharedField};
