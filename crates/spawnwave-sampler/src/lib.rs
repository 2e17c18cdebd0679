//! Spawn-location sampling for spawnwave.
//!
//! A [`SpawnRegion`] describes where spawns may appear; [`sample`] draws one
//! position from it. Missing or invalid region parameters are configuration
//! errors and surface as [`SamplerError`].

pub mod error;
pub mod region;
pub mod sampler;
pub mod spline;

pub use spawnwave_core as core;

pub use error::SamplerError;
pub use region::{ColliderShape, RegionKind, SpawnRegion};
pub use sampler::{sample, validate};
pub use spline::Spline;
