//! File-based defaults for the engine and logging.
//!
//! ```toml
//! [engine]
//! num_states = 10
//! damping = 0.2
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```
//!
//! Every key is optional.

use crate::core::{Value, DEFAULT_DAMPING};
use crate::engine::{GenerationRequest, StepCount, DEFAULT_NUM_STATES};
use crate::operators::DEFAULT_MAX_OFFSET;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub num_states: usize,
    pub damping: f64,
    pub initial_state: usize,
    /// Largest constant `c` for synthesised `x + y + c` operators
    pub max_offset: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            num_states: DEFAULT_NUM_STATES,
            damping: DEFAULT_DAMPING,
            initial_state: 0,
            max_offset: DEFAULT_MAX_OFFSET,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty`, `compact` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let path_str = path_ref.display().to_string();
        let content = fs::read_to_string(path_ref).map_err(|source| ConfigError::Read {
            path: path_str.clone(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path_str,
            source,
        })
    }
}

impl EngineConfig {
    /// A request carrying these defaults.
    pub fn request(&self, seeds: Vec<Value>, steps: StepCount) -> GenerationRequest {
        GenerationRequest::new(seeds, steps)
            .with_num_states(self.num_states)
            .with_initial_state(self.initial_state)
            .with_damping(self.damping)
            .with_max_offset(self.max_offset)
    }
}
