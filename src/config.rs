//! Configuration for mask generation.

use crate::core::{BoundaryPolicy, MaskBuilder, MaskError, RunEnd};
use crate::spindle::ReaderOptions;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Signal sampling and window duration
    pub sampling: SamplingConfig,

    /// States that survive masking
    pub keep_states: Vec<String>,

    /// Zero-based column holding the state in SPINDLE files
    pub column: usize,

    /// Options for the delimited-text reader
    pub reader: ReaderOptions,

    /// Handling of runs touching the first or last window
    pub boundary_policy: BoundaryPolicy,

    /// Where each section stops relative to its last kept window
    pub run_end: RunEnd,

    /// Default directory for exported masks
    pub export_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("somnum");

        Self {
            sampling: SamplingConfig::default(),
            keep_states: vec!["n".to_string()],
            column: 1,
            reader: ReaderOptions::default(),
            boundary_policy: BoundaryPolicy::default(),
            run_end: RunEnd::default(),
            export_path: data_dir.join("exports"),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content).map_err(ConfigError::Parse)?;
        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Self::config_path())
    }

    /// Save configuration to a specific file, creating parent directories.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("somnum")
            .join("config.json")
    }

    /// The keep-set as a lookup set.
    pub fn keep_set(&self) -> HashSet<String> {
        self.keep_states.iter().cloned().collect()
    }

    /// A mask builder for the configured sampling and policies.
    pub fn mask_builder(&self) -> Result<MaskBuilder, MaskError> {
        Ok(
            MaskBuilder::new(self.sampling.fs, self.sampling.unit)?
                .with_boundary_policy(self.boundary_policy)
                .with_run_end(self.run_end),
        )
    }
}

/// Sampling rate of the target signal and duration of one scored window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Samples per second
    pub fs: f64,
    /// Seconds per window
    pub unit: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            fs: 256.0,
            unit: 4.0,
        }
    }
}

/// Parse a comma-separated list of states, e.g. `"r, n"`.
///
/// Blank entries are dropped and duplicates removed, preserving first-seen order.
pub fn parse_states(s: &str) -> Vec<String> {
    let mut states: Vec<String> = Vec::new();
    for state in s.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !states.iter().any(|seen| seen == state) {
            states.push(state.to_string());
        }
    }
    states
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}
