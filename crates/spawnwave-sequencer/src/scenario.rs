//! Scenario files: sequencer configuration plus the wave list, as JSON.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use spawnwave_sampler::validate;

use crate::error::ConfigError;
use crate::sequencer::SequencerConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario<W> {
    #[serde(flatten)]
    pub config: SequencerConfig,
    pub waves: Vec<W>,
}

impl<W: DeserializeOwned> Scenario<W> {
    /// Parse and validate. A bad spawn region is rejected here rather than
    /// on the first spawn.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let scenario: Self = serde_json::from_str(json)?;
        validate(&scenario.config.region)?;
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}
