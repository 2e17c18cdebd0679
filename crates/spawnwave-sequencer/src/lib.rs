//! Wave sequencing for spawnwave.
//!
//! [`WaveSequencer`] walks an ordered list of waves on a cooperative tick:
//! each wave spawns a fixed count (or until spawning fails), paced by the
//! wave's inter-spawn delay, with a global delay between waves. Once every
//! wave was issued it polls the scene census and reports the drain.

pub mod error;
pub mod scenario;
pub mod sequencer;
pub mod wave;

pub use spawnwave_core as core;
pub use spawnwave_pool as pool;
pub use spawnwave_sampler as sampler;

pub use error::{ConfigError, SequencerError};
pub use scenario::Scenario;
pub use sequencer::{SequencerConfig, Spawned, WaveSequencer};
pub use wave::{BasicWave, Wave};
