//! # ISOVOX Procedural Generation
//!
//! Deterministic density sources for the meshers to chew on.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed always produces the same field
//! 2. **Location-addressed**: every generator is a pure `f(x, y, z)`, so any
//!    chunk can be sampled at any origin and stride without its neighbours
//!
//! ## Example
//!
//! ```rust
//! use isovox_procedural::{SimplexTerrain, WorldSeed};
//!
//! let terrain = SimplexTerrain::new(WorldSeed::new(12345)).with_octaves(4);
//! let field = terrain.field([16, 16, 16]);
//! assert_eq!(field.dims(), [16, 16, 16]);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod noise;
pub mod terrain;

pub use noise::{SimplexNoise, WorldSeed};
pub use terrain::{BlockTerrain, HeightmapTerrain, SimplexTerrain};
