//! Payloads exchanged between the coordinator and workers.

use elements_core::coord::Coord;
use elements_core::field::Tile;
use serde::{Deserialize, Serialize};

/// Run parameters, sent once to every worker before the first wave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupInfo {
    /// Side length of the board.
    pub board_size: usize,
    /// Units placed per faction per wave, as declared by the input.
    pub units_per_wave: usize,
    /// Move/action rounds per wave.
    pub rounds_per_wave: usize,
    /// Number of waves.
    pub wave_count: usize,
    /// Side length of each worker's owned sub-grid.
    pub grid_size: usize,
}

/// One worker's slice of a wave: owned sub-grid plus halo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveField {
    /// Zero-based wave index.
    pub wave: usize,
    /// Every field coordinate with its tile.
    pub tiles: Vec<(Coord, Tile)>,
}

/// A worker's owned cells at the end of a wave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveReport {
    /// Zero-based wave index.
    pub wave: usize,
    /// Owned coordinates with their tiles.
    pub tiles: Vec<(Coord, Tile)>,
    /// Field hash after the wave.
    pub state_hash: u64,
}
