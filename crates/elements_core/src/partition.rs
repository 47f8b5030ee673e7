//! Whole-board state and its split into per-worker fields.
//!
//! The coordinator holds a [`Board`] only at wave boundaries: one per wave
//! for the freshly placed units, and one assembled from worker reports.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::coord::Coord;
use crate::error::{Result, SimError};
use crate::factions::Faction;
use crate::field::Tile;
use crate::region::OwnedRect;
use crate::topology::GridLayout;

/// A square board of tiles. Every tile is on the board, so none is
/// [`Tile::OutOfBounds`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    tiles: Vec<Tile>,
}

impl Board {
    /// An empty `size x size` board.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            tiles: vec![Tile::Empty; size * size],
        }
    }

    /// Side length.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        coord
            .in_board(self.size as i32)
            .then(|| coord.row as usize * self.size + coord.col as usize)
    }

    /// Tile at `coord`; off-board reads as [`Tile::OutOfBounds`].
    #[must_use]
    pub fn get(&self, coord: Coord) -> Tile {
        self.index(coord)
            .map_or(Tile::OutOfBounds, |index| self.tiles[index])
    }

    /// Place a unit of `faction` (or clear with `None`) at `coord`.
    pub fn set(&mut self, coord: Coord, faction: Option<Faction>) -> Result<()> {
        self.put(coord, faction.map_or(Tile::Empty, Tile::Unit))
    }

    /// Write a tile. Rejects off-board coordinates and out-of-bounds tiles.
    pub fn put(&mut self, coord: Coord, tile: Tile) -> Result<()> {
        if tile == Tile::OutOfBounds {
            return Err(SimError::InvalidBoard(format!(
                "cannot store an out-of-bounds tile at {coord}"
            )));
        }
        let index = self.index(coord).ok_or_else(|| {
            SimError::InvalidBoard(format!("{coord} is outside a {0}x{0} board", self.size))
        })?;
        self.tiles[index] = tile;
        Ok(())
    }

    /// Every coordinate and tile in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Tile)> + '_ {
        let size = self.size;
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            (
                Coord::new((index / size) as i32, (index % size) as i32),
                *tile,
            )
        })
    }

    /// Rows of tiles, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.size.max(1))
    }

    /// Number of units of each faction, in [`Faction::ALL`] order.
    #[must_use]
    pub fn census(&self) -> [usize; 4] {
        let mut counts = [0; 4];
        for faction in self.tiles.iter().filter_map(|tile| tile.faction()) {
            counts[faction as usize] += 1;
        }
        counts
    }

    /// Number of occupied tiles.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.census().iter().sum()
    }

    /// The field handed to the worker owning `owned`: the owned rectangle
    /// plus a halo ring, with off-board ring cells marked out of bounds.
    #[must_use]
    pub fn field_tiles(&self, owned: &OwnedRect) -> Vec<(Coord, Tile)> {
        owned.with_halo().map(|coord| (coord, self.get(coord))).collect()
    }

    /// Write a worker's end-of-wave report back onto the board.
    pub fn apply_report(&mut self, report: &[(Coord, Tile)]) -> Result<()> {
        for (coord, tile) in report {
            self.put(*coord, *tile)?;
        }
        Ok(())
    }

    /// Hash of every tile, for determinism checks.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

/// Split `board` into one field per worker, ordered by rank.
pub fn partition(board: &Board, layout: &GridLayout) -> Result<Vec<(usize, Vec<(Coord, Tile)>)>> {
    if board.size() != layout.board_size {
        return Err(SimError::InvalidBoard(format!(
            "board is {}x{} but the layout expects {}",
            board.size(),
            board.size(),
            layout.board_size
        )));
    }
    layout
        .worker_ranks()
        .map(|rank| {
            let owned = layout.worker(rank)?.owned_rect();
            Ok((rank, board.field_tiles(&owned)))
        })
        .collect()
}
