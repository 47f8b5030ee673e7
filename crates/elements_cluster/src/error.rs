//! Error types for the cluster runtime.

use elements_core::error::SimError;
use thiserror::Error;

use crate::transport::Tag;

/// Result type alias using [`ClusterError`].
pub type Result<T> = std::result::Result<T, ClusterError>;

/// Failures while running ranks.
///
/// Every variant is fatal: there are no retries and no timeouts.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// The simulation core rejected something.
    #[error(transparent)]
    Sim(#[from] SimError),

    /// A peer went away while this rank still expected traffic from it.
    #[error("Rank {rank} lost its link to rank {peer}")]
    Disconnected {
        /// The rank that noticed.
        rank: usize,
        /// The peer that is gone.
        peer: usize,
    },

    /// A rank addressed a peer that does not exist.
    #[error("Rank {rank} has no link to rank {peer}")]
    NoSuchPeer {
        /// The sending or receiving rank.
        rank: usize,
        /// The requested peer.
        peer: usize,
    },

    /// A payload could not be encoded or decoded.
    #[error("Codec error on tag {tag:?}: {error}")]
    Codec {
        /// Tag of the offending message.
        tag: Tag,
        /// Underlying bincode failure.
        #[source]
        error: bincode::Error,
    },

    /// A rank thread panicked.
    #[error("Rank {0} panicked")]
    Panicked(usize),

    /// A rank thread could not be started.
    #[error("Failed to spawn rank {rank}: {error}")]
    Spawn {
        /// The rank that failed to start.
        rank: usize,
        /// Underlying IO failure.
        #[source]
        error: std::io::Error,
    },
}

impl ClusterError {
    /// Whether this error only reports that some other rank died first.
    #[must_use]
    pub const fn is_disconnect(&self) -> bool {
        matches!(self, Self::Disconnected { .. })
    }
}
