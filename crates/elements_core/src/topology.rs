//! Rank layout: which rank coordinates, which ranks work, and where each
//! worker's sub-grid sits on the board.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::region::OwnedRect;

/// Rank of the coordinating process.
pub const COORDINATOR_RANK: usize = 0;

/// The whole grid of ranks for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    /// Every rank, coordinator included.
    pub process_count: usize,
    /// Workers along one side of the worker grid.
    pub grid_edge_length: usize,
    /// Side length of the board.
    pub board_size: usize,
    /// Side length of each worker's owned sub-grid.
    pub grid_size: usize,
}

impl GridLayout {
    /// Lay out `process_count` ranks over an `n x n` board.
    ///
    /// One rank coordinates; the rest form the largest square grid that
    /// fits. Ranks beyond that square take no part in the run.
    pub fn new(process_count: usize, board_size: usize) -> Result<Self> {
        if process_count < 2 {
            return Err(SimError::InvalidTopology(format!(
                "need at least 2 processes (1 coordinator + 1 worker), got {process_count}"
            )));
        }
        let grid_edge_length = integer_sqrt(process_count - 1);
        if board_size == 0 || board_size % grid_edge_length != 0 {
            return Err(SimError::InvalidTopology(format!(
                "board size {board_size} cannot be split across a {grid_edge_length}x{grid_edge_length} worker grid"
            )));
        }
        Ok(Self {
            process_count,
            grid_edge_length,
            board_size,
            grid_size: board_size / grid_edge_length,
        })
    }

    /// Number of participating workers.
    #[must_use]
    pub const fn worker_count(&self) -> usize {
        self.grid_edge_length * self.grid_edge_length
    }

    /// Ranks of participating workers, ascending.
    pub fn worker_ranks(&self) -> impl Iterator<Item = usize> {
        1..=self.worker_count()
    }

    /// Whether `rank` is a participating worker.
    #[must_use]
    pub const fn is_worker(&self, rank: usize) -> bool {
        rank >= 1 && rank <= self.worker_count()
    }

    /// Topology of one worker.
    pub fn worker(&self, rank: usize) -> Result<WorkerTopology> {
        if !self.is_worker(rank) {
            return Err(SimError::InvalidTopology(format!(
                "rank {rank} is not a worker in a grid of {}",
                self.worker_count()
            )));
        }
        Ok(WorkerTopology {
            rank,
            grid_edge_length: self.grid_edge_length,
            grid_size: self.grid_size,
            board_size: self.board_size,
        })
    }
}

/// Immutable placement of a single worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerTopology {
    /// This worker's rank (1-based; 0 is the coordinator).
    pub rank: usize,
    /// Workers along one side of the worker grid.
    pub grid_edge_length: usize,
    /// Side length of the owned sub-grid.
    pub grid_size: usize,
    /// Side length of the board.
    pub board_size: usize,
}

impl WorkerTopology {
    /// `(row, col)` of this worker within the worker grid.
    #[must_use]
    pub const fn grid_position(&self) -> (usize, usize) {
        let index = self.rank - 1;
        (index / self.grid_edge_length, index % self.grid_edge_length)
    }

    /// The board rectangle this worker owns.
    #[must_use]
    pub const fn owned_rect(&self) -> OwnedRect {
        let (grid_row, grid_col) = self.grid_position();
        OwnedRect::new(
            (grid_row * self.grid_size) as i32,
            (grid_col * self.grid_size) as i32,
            self.grid_size as i32,
        )
    }

    /// Ranks of the up to eight adjacent workers: north, south, west, east,
    /// then the four diagonals.
    #[must_use]
    pub fn neighbor_ranks(&self) -> Vec<usize> {
        let (row, col) = self.grid_position();
        let edge = self.grid_edge_length;
        let rank = self.rank;
        let (up, down) = (row > 0, row + 1 < edge);
        let (left, right) = (col > 0, col + 1 < edge);

        let mut ranks = Vec::with_capacity(8);
        if up {
            ranks.push(rank - edge);
        }
        if down {
            ranks.push(rank + edge);
        }
        if left {
            ranks.push(rank - 1);
        }
        if right {
            ranks.push(rank + 1);
        }
        if up && left {
            ranks.push(rank - edge - 1);
        }
        if up && right {
            ranks.push(rank - edge + 1);
        }
        if down && left {
            ranks.push(rank + edge - 1);
        }
        if down && right {
            ranks.push(rank + edge + 1);
        }
        ranks
    }
}

/// Largest `r` with `r * r <= n`.
#[must_use]
pub fn integer_sqrt(n: usize) -> usize {
    let mut root = 0;
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    root
}
