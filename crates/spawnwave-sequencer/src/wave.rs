//! Wave descriptions.

use serde::{Deserialize, Serialize};

/// What the sequencer needs to know about a wave. Wave types may carry any
/// extra data (a path, a difficulty tier) for the per-spawn callback.
pub trait Wave {
    type Prefab;

    /// Spawns in this wave. 0 spawns until a spawn fails or the sequence is
    /// cancelled.
    fn count(&self) -> u32;

    /// Variants to choose from, uniformly at random. Empty means the pool's
    /// default prefab.
    fn variants(&self) -> &[Self::Prefab];

    /// Seconds between two spawns of this wave.
    fn time_between_spawns(&self) -> f32;

    fn is_endless(&self) -> bool {
        self.count() == 0
    }
}

/// A wave with no extra data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicWave<P> {
    pub count: u32,
    pub variants: Vec<P>,
    pub time_between_spawns: f32,
}

impl<P> BasicWave<P> {
    pub fn new(count: u32, variants: Vec<P>, time_between_spawns: f32) -> Self {
        Self {
            count,
            variants,
            time_between_spawns,
        }
    }
}

impl<P> Wave for BasicWave<P> {
    type Prefab = P;

    fn count(&self) -> u32 {
        self.count
    }

    fn variants(&self) -> &[P] {
        &self.variants
    }

    fn time_between_spawns(&self) -> f32 {
        self.time_between_spawns
    }
}
