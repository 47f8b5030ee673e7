//! Run configuration, loadable from RON and overridable from the command
//! line.
//!
//! ```ron
//! (
//!     input: Some("io/input1.txt"),
//!     output: Some("io/output1.txt"),
//!     process_count: 10,
//!     rules: (heal_when_wounded: true),
//! )
//! ```

use std::path::{Path, PathBuf};

use elements_cluster::ClusterConfig;
use elements_core::config::RuleConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File not found.
    #[error("Config file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] ron::error::SpannedError),
}

/// Settings for a single run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Input file.
    pub input: Option<PathBuf>,
    /// Output file.
    pub output: Option<PathBuf>,
    /// Total ranks, coordinator included.
    pub process_count: usize,
    /// Battle rules.
    pub rules: RuleConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        let cluster = ClusterConfig::default();
        Self {
            input: None,
            output: None,
            process_count: cluster.process_count,
            rules: cluster.rules,
        }
    }
}

impl RunConfig {
    /// Load from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Load from a RON string.
    pub fn from_ron_str(ron: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(ron)?)
    }

    /// The cluster settings for this run.
    #[must_use]
    pub const fn cluster(&self) -> ClusterConfig {
        ClusterConfig {
            process_count: self.process_count,
            rules: self.rules,
        }
    }
}
