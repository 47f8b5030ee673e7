//! The coordinating rank: hands out waves, collects reports.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use elements_core::error::SimError;
use elements_core::partition::{partition, Board};
use elements_core::topology::GridLayout;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::Result;
use crate::messages::{SetupInfo, WaveField, WaveReport};
use crate::transport::{Endpoint, Tag};

/// Everything needed to run a simulation: one placement board per wave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Side length of the board.
    pub board_size: usize,
    /// Units placed per faction per wave, as declared.
    pub units_per_wave: usize,
    /// Move/action rounds per wave.
    pub rounds_per_wave: usize,
    /// Fresh placements for each wave, in order.
    pub waves: Vec<Board>,
}

impl Scenario {
    /// Check every wave board matches the declared size.
    pub fn validate(&self) -> std::result::Result<(), SimError> {
        if self.board_size == 0 {
            return Err(SimError::InvalidBoard("board size must be positive".into()));
        }
        for (index, board) in self.waves.iter().enumerate() {
            if board.size() != self.board_size {
                return Err(SimError::InvalidBoard(format!(
                    "wave {} board is {}x{}, expected {}",
                    index + 1,
                    board.size(),
                    board.size(),
                    self.board_size
                )));
            }
        }
        Ok(())
    }
}

/// Result of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    /// The board after the last wave.
    pub final_board: Board,
    /// The assembled board after each wave.
    pub wave_boards: Vec<Board>,
    /// Per-worker field hashes after the last wave, by rank.
    pub worker_hashes: Vec<u64>,
}

impl SimulationOutcome {
    /// Hash of the final board and every worker field.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        combined_hash(&(self.final_board.state_hash(), &self.worker_hashes))
    }
}

fn combined_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Run the coordinating rank.
pub fn run_coordinator(
    mut endpoint: Endpoint,
    layout: &GridLayout,
    scenario: &Scenario,
) -> Result<SimulationOutcome> {
    scenario.validate()?;
    let setup = SetupInfo {
        board_size: scenario.board_size,
        units_per_wave: scenario.units_per_wave,
        rounds_per_wave: scenario.rounds_per_wave,
        wave_count: scenario.waves.len(),
        grid_size: layout.grid_size,
    };
    for rank in layout.worker_ranks() {
        endpoint.send(rank, Tag::Setup, &setup)?;
    }
    info!(
        workers = layout.worker_count(),
        board_size = setup.board_size,
        waves = setup.wave_count,
        rounds = setup.rounds_per_wave,
        "Simulation started"
    );

    let mut wave_boards = Vec::with_capacity(scenario.waves.len());
    let mut worker_hashes = vec![0; layout.worker_count()];
    for (wave, placements) in scenario.waves.iter().enumerate() {
        for (rank, tiles) in partition(placements, layout)? {
            endpoint.send(rank, Tag::Wave, &WaveField { wave, tiles })?;
        }

        let mut board = Board::new(scenario.board_size);
        for rank in layout.worker_ranks() {
            let report: WaveReport = endpoint.recv(rank, Tag::Wave)?;
            if report.wave != wave {
                error!(rank, expected = wave, got = report.wave, "Report for wrong wave");
                return Err(SimError::InvalidState(format!(
                    "rank {rank} reported wave {} during wave {wave}",
                    report.wave
                ))
                .into());
            }
            board.apply_report(&report.tiles)?;
            worker_hashes[rank - 1] = report.state_hash;
        }
        debug!(wave, units = board.unit_count(), hash = board.state_hash(), "Wave assembled");
        wave_boards.push(board);
    }

    let final_board = wave_boards
        .last()
        .cloned()
        .unwrap_or_else(|| Board::new(scenario.board_size));
    info!(units = final_board.unit_count(), census = ?final_board.census(), "Simulation finished");
    Ok(SimulationOutcome {
        final_board,
        wave_boards,
        worker_hashes,
    })
}
