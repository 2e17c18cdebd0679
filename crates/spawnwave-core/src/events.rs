//! Lifecycle events emitted by the wave sequencer.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WaveEvent {
    /// Fired before the first spawn of a wave.
    WaveStarted { wave_index: usize },
    /// Fired once a wave stops spawning (count reached, spawn failed or vetoed).
    WaveEnded { wave_index: usize },
    /// Fired once, after all waves were issued and no spawnling is live.
    AllWavesDrained,
}
