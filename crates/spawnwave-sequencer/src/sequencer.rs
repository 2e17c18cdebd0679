//! The wave sequencer state machine.
//!
//! Waiting is modeled as "resume after N seconds": every delay parks the
//! machine in a delay phase and `tick` consumes elapsed time from it. A
//! zero-length delay still yields until the next tick. Cancellation is
//! checked at every resumption point, so nothing is spawned after `cancel`.

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use spawnwave_core::config::PoolConfig;
use spawnwave_core::constants::DEFAULT_SEED;
use spawnwave_core::enums::SequencerPhase;
use spawnwave_core::events::WaveEvent;
use spawnwave_core::types::{SimTime, Vec3};
use spawnwave_pool::{Host, Pool, SceneCensus, SpawnRequest};
use spawnwave_sampler::{sample, validate, SpawnRegion};

use crate::error::SequencerError;
use crate::wave::Wave;

/// Configuration for a wave sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    /// Seconds between the end of one wave and the start of the next.
    pub time_between_waves: f32,
    /// RNG seed for variant and position choice. Same seed = same sequence.
    pub seed: u64,
    pub pool: PoolConfig,
    pub region: SpawnRegion,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            time_between_waves: 0.0,
            seed: DEFAULT_SEED,
            pool: PoolConfig::default(),
            region: SpawnRegion::Points {
                points: vec![Vec3::ZERO],
            },
        }
    }
}

/// What the per-spawn callback learns about a spawn.
pub struct Spawned<'a, W, E> {
    pub entity: E,
    pub wave: &'a W,
    pub wave_index: usize,
    /// Position within the wave; `None` for endless waves.
    pub spawn_index: Option<usize>,
}

/// Per-spawn callback. Returning `false` ends the current wave early.
pub type SpawnCallback<H, W> =
    Box<dyn FnMut(&mut Pool<H>, Spawned<'_, W, <H as Host>::Handle>) -> bool>;

pub struct WaveSequencer<H, W>
where
    H: Host + SceneCensus,
    W: Wave<Prefab = H::Prefab>,
{
    pool: Pool<H>,
    waves: Vec<W>,
    on_spawned: SpawnCallback<H, W>,
    region: SpawnRegion,
    time_between_waves: f32,
    parent: Option<H::Parent>,
    rng: ChaCha8Rng,
    phase: SequencerPhase,
    finished: bool,
    current_wave_index: usize,
    events: Vec<WaveEvent>,
    time: SimTime,
}

impl<H, W> WaveSequencer<H, W>
where
    H: Host + SceneCensus,
    W: Wave<Prefab = H::Prefab>,
{
    /// Create a sequencer owning a fresh pool built from `config.pool`.
    pub fn new(host: H, default_prefab: H::Prefab, waves: Vec<W>, config: SequencerConfig) -> Self {
        let pool = Pool::new(host, default_prefab).with_config(config.pool);
        Self::from_pool(pool, waves, config)
    }

    /// Create a sequencer around an existing pool. `config.pool` is ignored.
    pub fn from_pool(pool: Pool<H>, waves: Vec<W>, config: SequencerConfig) -> Self {
        Self {
            pool,
            waves,
            on_spawned: Box::new(|_, _| true),
            region: config.region,
            time_between_waves: config.time_between_waves,
            parent: None,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            phase: SequencerPhase::Idle,
            finished: false,
            current_wave_index: 0,
            events: Vec::new(),
            time: SimTime::default(),
        }
    }

    /// Install the per-spawn callback.
    pub fn with_on_spawned(
        mut self,
        callback: impl FnMut(&mut Pool<H>, Spawned<'_, W, H::Handle>) -> bool + 'static,
    ) -> Self {
        self.on_spawned = Box::new(callback);
        self
    }

    /// Attach every spawn under `parent`.
    pub fn with_parent(mut self, parent: H::Parent) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Validate the spawn region and begin the first wave, running it up to
    /// its first suspension point (so the first spawn happens immediately).
    pub fn start(&mut self) -> Result<(), SequencerError> {
        if self.phase != SequencerPhase::Idle {
            return Err(SequencerError::AlreadyStarted);
        }
        validate(&self.region)?;

        if self.waves.is_empty() {
            self.finished = true;
            self.phase = SequencerPhase::AllWavesIssued;
        } else {
            self.begin_wave(0);
        }
        self.advance(0.0)
    }

    /// Advance by `dt` seconds of scheduler time.
    pub fn tick(&mut self, dt: f32) -> Result<(), SequencerError> {
        if matches!(self.phase, SequencerPhase::Idle | SequencerPhase::Drained) {
            return Ok(());
        }
        let dt = delay_secs(dt);
        self.time.advance(dt);
        self.advance(dt)
    }

    /// Abort the sequence at the next resumption point. No further spawns
    /// happen; the sequencer proceeds to polling for the drain.
    pub fn cancel(&mut self) {
        self.finished = true;
    }

    /// Take the events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<WaveEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn phase(&self) -> SequencerPhase {
        self.phase
    }

    /// Set once every wave was issued, or when cancelled.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_drained(&self) -> bool {
        self.phase == SequencerPhase::Drained
    }

    pub fn current_wave_index(&self) -> usize {
        self.current_wave_index
    }

    pub fn current_wave(&self) -> Option<&W> {
        if self.phase == SequencerPhase::Idle {
            return None;
        }
        self.waves.get(self.current_wave_index)
    }

    pub fn waves(&self) -> &[W] {
        &self.waves
    }

    pub fn elapsed(&self) -> SimTime {
        self.time
    }

    pub fn pool(&self) -> &Pool<H> {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut Pool<H> {
        &mut self.pool
    }

    /// Run the state machine until it suspends, consuming up to `budget`
    /// seconds of delay.
    fn advance(&mut self, mut budget: f32) -> Result<(), SequencerError> {
        loop {
            if self.finished && self.phase.is_issuing() {
                debug!("wave sequence cancelled in wave {}", self.current_wave_index);
                self.phase = SequencerPhase::AllWavesIssued;
            }

            match self.phase {
                SequencerPhase::Idle | SequencerPhase::Drained => return Ok(()),

                SequencerPhase::AllWavesIssued => {
                    if !self.pool.host().any_live() {
                        info!("all waves drained after {:.2}s", self.time.elapsed_secs);
                        self.events.push(WaveEvent::AllWavesDrained);
                        self.phase = SequencerPhase::Drained;
                    }
                    return Ok(());
                }

                SequencerPhase::Running {
                    wave_index,
                    spawns_done,
                } => {
                    if !self.spawn_next(wave_index, spawns_done)? {
                        if self.end_wave(wave_index) {
                            return Ok(());
                        }
                        continue;
                    }
                    let delay = delay_secs(self.waves[wave_index].time_between_spawns());
                    self.phase = SequencerPhase::SpawnDelay {
                        wave_index,
                        spawns_done: spawns_done + 1,
                        remaining_secs: delay,
                    };
                    if delay == 0.0 {
                        return Ok(());
                    }
                }

                SequencerPhase::SpawnDelay {
                    wave_index,
                    spawns_done,
                    remaining_secs,
                } => {
                    if remaining_secs > budget {
                        self.phase = SequencerPhase::SpawnDelay {
                            wave_index,
                            spawns_done,
                            remaining_secs: remaining_secs - budget,
                        };
                        return Ok(());
                    }
                    budget -= remaining_secs.max(0.0);

                    let count = self.waves[wave_index].count() as usize;
                    if count > 0 && spawns_done >= count {
                        if self.end_wave(wave_index) {
                            return Ok(());
                        }
                    } else {
                        self.phase = SequencerPhase::Running {
                            wave_index,
                            spawns_done,
                        };
                    }
                }

                SequencerPhase::WaveDelay {
                    next_wave,
                    remaining_secs,
                } => {
                    if remaining_secs > budget {
                        self.phase = SequencerPhase::WaveDelay {
                            next_wave,
                            remaining_secs: remaining_secs - budget,
                        };
                        return Ok(());
                    }
                    budget -= remaining_secs.max(0.0);

                    if next_wave < self.waves.len() {
                        self.begin_wave(next_wave);
                    } else {
                        debug!("all {} waves issued", self.waves.len());
                        self.finished = true;
                        self.phase = SequencerPhase::AllWavesIssued;
                    }
                }
            }
        }
    }

    fn begin_wave(&mut self, wave_index: usize) {
        debug!("wave {wave_index} started");
        self.current_wave_index = wave_index;
        self.events.push(WaveEvent::WaveStarted { wave_index });
        self.phase = SequencerPhase::Running {
            wave_index,
            spawns_done: 0,
        };
    }

    /// Close a wave and park in the inter-wave delay. Returns `true` when the
    /// delay is zero and the machine must yield until the next tick.
    fn end_wave(&mut self, wave_index: usize) -> bool {
        debug!("wave {wave_index} ended");
        let delay = delay_secs(self.time_between_waves);
        self.events.push(WaveEvent::WaveEnded { wave_index });
        self.phase = SequencerPhase::WaveDelay {
            next_wave: wave_index + 1,
            remaining_secs: delay,
        };
        delay == 0.0
    }

    /// Pick a variant and a position, spawn, and ask the callback whether to
    /// keep going. `false` when the pool refused or the callback vetoed.
    fn spawn_next(&mut self, wave_index: usize, spawns_done: usize) -> Result<bool, SequencerError> {
        let wave = &self.waves[wave_index];
        let variant = wave.variants().choose(&mut self.rng);
        let position = sample(&self.region, &mut self.rng)?;

        let mut request = SpawnRequest::<H>::new().at(position);
        if let Some(prefab) = variant {
            request = request.prefab(prefab);
        }
        if let Some(parent) = self.parent {
            request = request.parent(parent);
        }

        let Some(entity) = self.pool.spawn(request) else {
            debug!("wave {wave_index}: pool refused spawn {spawns_done}");
            return Ok(false);
        };

        let spawned = Spawned {
            entity,
            wave,
            wave_index,
            spawn_index: (!wave.is_endless()).then_some(spawns_done),
        };
        Ok((self.on_spawned)(&mut self.pool, spawned))
    }
}

/// Negative, NaN and infinite delays count as zero: yield until the next tick.
fn delay_secs(secs: f32) -> f32 {
    if secs.is_finite() && secs > 0.0 {
        secs
    } else {
        0.0
    }
}
