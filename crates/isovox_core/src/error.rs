//! # Core Error Types
//!
//! Recoverable failures when building fields or checking mesh buffers.
//! Contract violations (out-of-range `get`/`set`) panic instead.

use thiserror::Error;

/// Errors raised by the core data model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A field was requested with a zero-length axis.
    #[error("invalid field dimensions {x}x{y}x{z}: every axis needs at least one sample")]
    InvalidDimensions {
        /// Samples along X.
        x: usize,
        /// Samples along Y.
        y: usize,
        /// Samples along Z.
        z: usize,
    },

    /// Nested voxel data did not form a box.
    #[error("ragged voxel data: expected {expected} entries along {axis}, found {found}")]
    RaggedField {
        /// Axis on which the mismatch was found.
        axis: char,
        /// Length established by the first row.
        expected: usize,
        /// Length actually found.
        found: usize,
    },

    /// A triangle references a vertex that does not exist.
    #[error("mesh index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// The offending index.
        index: u32,
        /// Number of vertices in the buffer.
        vertex_count: usize,
    },

    /// Position and normal streams disagree in length.
    #[error("mesh has {positions} positions but {normals} normals")]
    NormalCountMismatch {
        /// Number of positions.
        positions: usize,
        /// Number of normals.
        normals: usize,
    },

    /// The index stream does not divide into triangles.
    #[error("index buffer length {0} is not a multiple of 3")]
    IncompleteTriangle(usize),
}

/// Result alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
