//! Object pooling for spawnwave.
//!
//! A [`Pool`] recycles spawnlings through an active and an inactive set,
//! deciding between reuse and construction on every spawn. Entity creation,
//! visibility and destruction are delegated to a [`Host`], so the same pool
//! drives plain Rust objects ([`CodeHost`]) or a hecs scene ([`WorldHost`]).

pub mod code_host;
pub mod host;
pub mod pool;
pub mod shared;
pub mod spawnable;
pub mod world_host;

pub use spawnwave_core as core;

pub use code_host::{CodeHost, ObjectId};
pub use host::{Host, SceneCensus};
pub use pool::{ActiveIter, Pool, SpawnRequest};
pub use shared::SharedPool;
pub use spawnable::{PoolHandle, Spawnable};
pub use world_host::{Parent, SceneTransform, Visible, WorldHost};

#[cfg(test)]
mod tests;
