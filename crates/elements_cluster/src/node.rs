//! The worker rank's main loop.

use elements_core::config::RuleConfig;
use elements_core::error::SimError;
use elements_core::pack::{Pack, PhaseKind};
use elements_core::topology::{GridLayout, COORDINATOR_RANK};
use elements_core::worker::{Exchange, Worker};
use tracing::{debug, info};

use crate::error::{ClusterError, Result};
use crate::messages::{SetupInfo, WaveField, WaveReport};
use crate::transport::{Endpoint, Tag};

/// Pack exchange over a rank's endpoint.
///
/// Sends to every neighbor first, then receives from each in neighbor
/// order. Sends never block, so the pattern cannot deadlock.
pub struct NeighborExchange<'a> {
    endpoint: &'a mut Endpoint,
    neighbors: Vec<usize>,
}

impl<'a> NeighborExchange<'a> {
    /// Exchange with `neighbors` through `endpoint`.
    pub fn new(endpoint: &'a mut Endpoint, neighbors: Vec<usize>) -> Self {
        Self {
            endpoint,
            neighbors,
        }
    }
}

impl Exchange for NeighborExchange<'_> {
    type Error = ClusterError;

    fn exchange(&mut self, phase: PhaseKind, outgoing: &[Pack]) -> Result<Vec<Vec<Pack>>> {
        let tag = Tag::for_phase(phase);
        for &neighbor in &self.neighbors {
            self.endpoint.send(neighbor, tag, &outgoing)?;
        }
        self.neighbors
            .iter()
            .map(|&neighbor| self.endpoint.recv(neighbor, tag))
            .collect()
    }
}

/// Run a worker rank to completion.
///
/// Returns the final field hash.
pub fn run_worker(mut endpoint: Endpoint, rules: RuleConfig) -> Result<u64> {
    let rank = endpoint.rank();
    let setup: SetupInfo = endpoint.recv(COORDINATOR_RANK, Tag::Setup)?;
    let layout = GridLayout::new(endpoint.process_count(), setup.board_size)?;
    if layout.grid_size != setup.grid_size {
        return Err(SimError::InvalidTopology(format!(
            "rank {rank} computed grid size {} but the coordinator sent {}",
            layout.grid_size, setup.grid_size
        ))
        .into());
    }

    let topology = layout.worker(rank)?;
    let neighbors = topology.neighbor_ranks();
    debug!(rank, ?neighbors, grid_position = ?topology.grid_position(), "Worker starting");
    let mut worker = Worker::new(topology, rules);

    for wave in 0..setup.wave_count {
        let field: WaveField = endpoint.recv(COORDINATOR_RANK, Tag::Wave)?;
        if field.wave != wave {
            return Err(SimError::InvalidState(format!(
                "rank {rank} expected wave {wave}, got wave {}",
                field.wave
            ))
            .into());
        }
        let mut exchange = NeighborExchange::new(&mut endpoint, neighbors.clone());
        let tiles = worker.run_wave(&field.tiles, setup.rounds_per_wave, &mut exchange)?;
        let report = WaveReport {
            wave,
            tiles,
            state_hash: worker.state_hash(),
        };
        endpoint.send(COORDINATOR_RANK, Tag::Wave, &report)?;
        debug!(rank, wave, hash = report.state_hash, "Wave reported");
    }

    let hash = worker.state_hash();
    info!(rank, waves = setup.wave_count, hash, "Worker finished");
    Ok(hash)
}
