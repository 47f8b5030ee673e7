//! Error type for the command-line runner.

use elements_cluster::ClusterError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::input::InputError;

/// Result type alias using [`HeadlessError`].
pub type Result<T> = std::result::Result<T, HeadlessError>;

/// Anything that can stop a run.
#[derive(Debug, Error)]
pub enum HeadlessError {
    /// Bad input file.
    #[error(transparent)]
    Input(#[from] InputError),

    /// Bad configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The simulation itself failed.
    #[error(transparent)]
    Cluster(#[from] ClusterError),

    /// Writing results failed.
    #[error("Failed to write {path}: {error}")]
    Write {
        /// Destination.
        path: String,
        /// Underlying IO failure.
        #[source]
        error: std::io::Error,
    },

    /// No input file was given on the command line or in the config.
    #[error("No input file given (use --input or set `input` in the config)")]
    MissingInput,

    /// Repeated runs disagreed.
    #[error("Runs diverged: {0:?}")]
    NonDeterministic(Vec<u64>),
}
