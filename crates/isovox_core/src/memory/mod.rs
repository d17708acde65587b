//! # Memory Management
//!
//! Index-addressed storage for node graphs.
//!
//! Trees that need parent links (the material octree) store their nodes
//! here and refer to each other by [`NodeId`]. No reference cycles, O(1)
//! upward traversal.

mod arena;

pub use arena::{Arena, NodeId};
