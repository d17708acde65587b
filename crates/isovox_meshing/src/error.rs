//! # Meshing Error Types
//!
//! Extraction itself never fails. These cover the surfaces around it:
//! configuration, mesher lookup, field shape checks and the worker pool.

use isovox_core::CoreError;
use thiserror::Error;

/// Errors raised by the meshing crate.
#[derive(Error, Debug)]
pub enum MeshingError {
    /// A job was submitted after the pool shut down.
    #[error("mesh worker pool is closed")]
    PoolClosed,

    /// A configuration value is out of range.
    #[error("invalid meshing config: {0}")]
    InvalidConfig(String),

    /// A mesher name did not match any variant.
    #[error("unknown mesher '{0}'")]
    UnknownMesher(String),

    /// A mesher cannot run on a field of this shape.
    #[error("mesher '{mesher}' cannot mesh a field of dims {dims:?}")]
    UnsupportedField {
        /// Name of the rejecting mesher.
        mesher: &'static str,
        /// Dimensions of the rejected field.
        dims: [usize; 3],
    },

    /// The configuration text is not valid TOML for [`MeshingConfig`](crate::config::MeshingConfig).
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The configuration could not be written out.
    #[error("config write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    /// Core data model failure.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result alias for meshing operations.
pub type MeshingResult<T> = Result<T, MeshingError>;
