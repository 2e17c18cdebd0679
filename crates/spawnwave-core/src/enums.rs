//! Enumeration types used throughout the engine.

use serde::{Deserialize, Serialize};

/// Which of a pool's two sets an entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Membership {
    Active,
    Inactive,
}

/// Wave sequencer state machine.
///
/// `Idle -> Running -> SpawnDelay -> Running -> ... -> WaveDelay -> Running(next)
/// -> ... -> AllWavesIssued -> Drained`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum SequencerPhase {
    /// Not started yet.
    #[default]
    Idle,
    /// About to attempt the next spawn of a wave.
    Running { wave_index: usize, spawns_done: usize },
    /// Suspended between two spawns of the same wave.
    SpawnDelay {
        wave_index: usize,
        spawns_done: usize,
        remaining_secs: f32,
    },
    /// Suspended after a wave ended, before the next one starts.
    WaveDelay { next_wave: usize, remaining_secs: f32 },
    /// Every wave has been issued (or the sequence was cancelled);
    /// polling the scene census until no spawnling is live.
    AllWavesIssued,
    /// Terminal. The drained event has fired.
    Drained,
}

impl SequencerPhase {
    /// Whether the sequence is still issuing spawns.
    pub fn is_issuing(&self) -> bool {
        matches!(
            self,
            SequencerPhase::Running { .. }
                | SequencerPhase::SpawnDelay { .. }
                | SequencerPhase::WaveDelay { .. }
        )
    }
}
