//! # Elements Cluster
//!
//! Runs the battle across ranks: one coordinator and a square grid of
//! workers, each on its own OS thread, talking only through tagged,
//! `bincode`-encoded messages.
//!
//! The protocol per wave is:
//!
//! 1. the coordinator sends each worker its field (tag `Wave`),
//! 2. workers run every round, trading packs with up to eight neighbors
//!    (tags `Move`, `Action`, `Flood`),
//! 3. workers send their owned cells back (tag `Wave`).

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod coordinator;
pub mod error;
pub mod launch;
pub mod messages;
pub mod node;
pub mod transport;

use elements_core::config::RuleConfig;
use serde::{Deserialize, Serialize};

pub use coordinator::{Scenario, SimulationOutcome};
pub use error::{ClusterError, Result};
pub use launch::simulate;

/// Cluster configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Total ranks, coordinator included.
    pub process_count: usize,
    /// Battle rules shared by every worker.
    pub rules: RuleConfig,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            process_count: 5,
            rules: RuleConfig::default(),
        }
    }
}
