//! # Synchronization Primitives
//!
//! ## The Problem
//!
//! ```text
//! Editor thread:   WRITE brush edits into a chunk's density field
//! Mesher thread:   READ the same field during extraction
//! ```
//!
//! ## The Solution
//!
//! - [`SharedField`]: one read/write lock per chunk. Edits hold the write
//!   lock only while the brush runs; extraction snapshots under the read lock
//!   and meshes its private copy.
//! - [`DoubleBuffer`]: two buffers owned by a single pass and swapped by move
//!   at each slice boundary. Never shared across threads.

mod double_buffer;
mod shared;

pub use double_buffer::DoubleBuffer;
pub use shared::{share, SharedField};
