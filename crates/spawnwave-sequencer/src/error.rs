use std::path::PathBuf;

use thiserror::Error;

use spawnwave_sampler::SamplerError;

#[derive(Debug, Error)]
pub enum SequencerError {
    #[error("invalid spawn region: {0}")]
    Region(#[from] SamplerError),

    #[error("wave sequence already started")]
    AlreadyStarted,
}

/// Failures while loading a scenario.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed scenario: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid spawn region: {0}")]
    Region(#[from] SamplerError),
}
