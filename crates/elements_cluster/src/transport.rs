//! Tagged point-to-point messaging between ranks.
//!
//! Every ordered pair of ranks gets its own unbounded channel, so a send
//! never blocks and a receive names both the peer and the tag it expects.
//! Messages that arrive with another tag are stashed until asked for.
//! When a peer's thread ends, its senders drop and any receive waiting on
//! it fails with [`ClusterError::Disconnected`] once its queue is drained.

use std::collections::VecDeque;

use crossbeam_channel::{unbounded, Receiver, Sender};
use elements_core::pack::PhaseKind;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{ClusterError, Result};

/// Message kind, used to match receives with sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// Coordinator to worker field, and worker to coordinator report.
    Wave,
    /// Run parameters sent once before the first wave.
    Setup,
    /// Move phase packs.
    Move,
    /// Action phase packs.
    Action,
    /// Flood phase packs.
    Flood,
}

impl Tag {
    /// The tag carrying packs of `phase`.
    #[must_use]
    pub const fn for_phase(phase: PhaseKind) -> Self {
        match phase {
            PhaseKind::Move => Self::Move,
            PhaseKind::Action => Self::Action,
            PhaseKind::Flood => Self::Flood,
        }
    }

    /// Numeric tag value, for logs.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Wave => 0,
            Self::Setup => 1,
            Self::Move => 2,
            Self::Action => 4,
            Self::Flood => 6,
        }
    }
}

/// One encoded message in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Sending rank.
    pub from: usize,
    /// Message kind.
    pub tag: Tag,
    /// `bincode`-encoded body.
    pub payload: Vec<u8>,
}

/// A rank's view of the message fabric.
#[derive(Debug)]
pub struct Endpoint {
    rank: usize,
    outboxes: Vec<Option<Sender<Envelope>>>,
    inboxes: Vec<Option<Receiver<Envelope>>>,
    stash: Vec<VecDeque<Envelope>>,
}

/// Wire up `process_count` fully connected endpoints, indexed by rank.
#[must_use]
pub fn mesh(process_count: usize) -> Vec<Endpoint> {
    let mut endpoints: Vec<Endpoint> = (0..process_count)
        .map(|rank| Endpoint {
            rank,
            outboxes: (0..process_count).map(|_| None).collect(),
            inboxes: (0..process_count).map(|_| None).collect(),
            stash: (0..process_count).map(|_| VecDeque::new()).collect(),
        })
        .collect();

    for from in 0..process_count {
        for to in 0..process_count {
            if from != to {
                let (sender, receiver) = unbounded();
                endpoints[from].outboxes[to] = Some(sender);
                endpoints[to].inboxes[from] = Some(receiver);
            }
        }
    }
    endpoints
}

impl Endpoint {
    /// This endpoint's rank.
    #[must_use]
    pub const fn rank(&self) -> usize {
        self.rank
    }

    /// Number of ranks in the fabric.
    #[must_use]
    pub fn process_count(&self) -> usize {
        self.outboxes.len()
    }

    /// Encode `message` and queue it for `to`.
    pub fn send<T: Serialize>(&self, to: usize, tag: Tag, message: &T) -> Result<()> {
        let outbox = self
            .outboxes
            .get(to)
            .and_then(Option::as_ref)
            .ok_or(ClusterError::NoSuchPeer {
                rank: self.rank,
                peer: to,
            })?;
        let payload =
            bincode::serialize(message).map_err(|error| ClusterError::Codec { tag, error })?;
        trace!(from = self.rank, to, tag = tag.code(), bytes = payload.len(), "send");
        outbox
            .send(Envelope {
                from: self.rank,
                tag,
                payload,
            })
            .map_err(|_| ClusterError::Disconnected {
                rank: self.rank,
                peer: to,
            })
    }

    /// Block until a message with `tag` arrives from `from`, then decode it.
    pub fn recv<T: DeserializeOwned>(&mut self, from: usize, tag: Tag) -> Result<T> {
        let envelope = self.next_matching(from, tag)?;
        trace!(
            rank = self.rank,
            from,
            tag = tag.code(),
            bytes = envelope.payload.len(),
            "recv"
        );
        bincode::deserialize(&envelope.payload).map_err(|error| ClusterError::Codec { tag, error })
    }

    fn next_matching(&mut self, from: usize, tag: Tag) -> Result<Envelope> {
        let no_peer = ClusterError::NoSuchPeer {
            rank: self.rank,
            peer: from,
        };
        let stash = self.stash.get_mut(from).ok_or(no_peer)?;
        if let Some(index) = stash.iter().position(|envelope| envelope.tag == tag) {
            if let Some(envelope) = stash.remove(index) {
                return Ok(envelope);
            }
        }

        let inbox = self
            .inboxes
            .get(from)
            .and_then(Option::as_ref)
            .ok_or(ClusterError::NoSuchPeer {
                rank: self.rank,
                peer: from,
            })?;
        loop {
            let envelope = inbox.recv().map_err(|_| ClusterError::Disconnected {
                rank: self.rank,
                peer: from,
            })?;
            if envelope.tag == tag {
                return Ok(envelope);
            }
            self.stash[from].push_back(envelope);
        }
    }
}
