//! Error types for the battle simulation core.

use thiserror::Error;

use crate::coord::Coord;

/// Result type alias using [`SimError`].
pub type Result<T> = std::result::Result<T, SimError>;

/// Top-level error type for the simulation core.
///
/// None of these are recoverable: the round barrier has no notion of a
/// transient failure, so callers abort the run when they see one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    /// A worker was asked to touch a coordinate its field does not track.
    #[error("Worker {rank} has no cell at {coord}")]
    UnknownCoordinate {
        /// Rank of the worker that detected the violation.
        rank: usize,
        /// The offending coordinate.
        coord: Coord,
    },

    /// The process count or board size cannot form a square worker grid.
    #[error("Invalid topology: {0}")]
    InvalidTopology(String),

    /// A board or wave description is inconsistent.
    #[error("Invalid board: {0}")]
    InvalidBoard(String),

    /// Invalid simulation state.
    #[error("Invalid simulation state: {0}")]
    InvalidState(String),
}
