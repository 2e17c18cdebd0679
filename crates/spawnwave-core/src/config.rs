//! Serializable pool configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_FILL;

/// Pool behavior flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Reuse despawned entities instead of constructing new ones.
    pub use_pooling: bool,
    /// With pooling disabled, permanently destroy despawned entities.
    pub destroy_unpooled: bool,
    /// Cap on simultaneously active entities. 0 = unbounded.
    pub max_spawns: usize,
    /// Largest gap a force-fill index request may construct.
    pub max_fill: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            use_pooling: true,
            destroy_unpooled: false,
            max_spawns: 0,
            max_fill: DEFAULT_MAX_FILL,
        }
    }
}

impl PoolConfig {
    /// Whether `active` entities already fill the cap.
    pub fn at_capacity(&self, active: usize) -> bool {
        self.max_spawns > 0 && active >= self.max_spawns
    }
}
