//! Engine constants and tuning parameters.

/// Default scheduler tick rate (Hz) used by headless drivers.
pub const TICK_RATE: u32 = 30;

/// Seconds per tick at the default tick rate.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

/// Rejection-sampling attempts against a polygon before falling back to the origin.
pub const POLYGON_SAMPLE_ATTEMPTS: usize = 100;

/// Largest gap a single force-fill request may construct.
pub const DEFAULT_MAX_FILL: usize = 1024;

/// Default RNG seed for the wave sequencer.
pub const DEFAULT_SEED: u64 = 42;
