//! Cell states, worker fields and read-only neighborhood snapshots.
//!
//! # Determinism
//!
//! Fields are backed by a `BTreeMap` keyed by [`Coord`], so every walk over
//! a field visits cells in row-major order. Phase output and resolution
//! order therefore never depend on hashing.

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::coord::Coord;
use crate::factions::Faction;
use crate::unit::Unit;

/// Placeholder returned when a lookup misses the field entirely.
static OUT_OF_BOUNDS: Cell = Cell::OutOfBounds;

/// Board-level description of a cell, as exchanged between coordinator and
/// workers. Carries only the faction, never live stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Nothing here.
    Empty,
    /// A fresh unit of this faction.
    Unit(Faction),
    /// Halo cell past the board edge.
    OutOfBounds,
}

impl Tile {
    /// Output-file code; anything without a unit renders as `.`.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Unit(faction) => faction.code(),
            Self::Empty | Self::OutOfBounds => '.',
        }
    }

    /// The faction standing here, if any.
    #[must_use]
    pub const fn faction(self) -> Option<Faction> {
        match self {
            Self::Unit(faction) => Some(faction),
            Self::Empty | Self::OutOfBounds => None,
        }
    }
}

/// Live state of one cell inside a worker's field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// On the board, unoccupied.
    Empty,
    /// On the board, holding exactly one unit.
    Occupied(Unit),
    /// Past the board edge. Never occupied, never a move or flood target.
    OutOfBounds,
}

impl Cell {
    /// Build a cell from its board-level description.
    #[must_use]
    pub fn from_tile(tile: Tile, coord: Coord) -> Self {
        match tile {
            Tile::Empty => Self::Empty,
            Tile::Unit(faction) => Self::Occupied(Unit::new(faction, coord)),
            Tile::OutOfBounds => Self::OutOfBounds,
        }
    }

    /// Board-level description of this cell.
    #[must_use]
    pub fn tile(&self) -> Tile {
        match self {
            Self::Empty => Tile::Empty,
            Self::Occupied(unit) => Tile::Unit(unit.faction),
            Self::OutOfBounds => Tile::OutOfBounds,
        }
    }

    /// The unit in this cell, if any.
    #[must_use]
    pub const fn unit(&self) -> Option<&Unit> {
        match self {
            Self::Occupied(unit) => Some(unit),
            Self::Empty | Self::OutOfBounds => None,
        }
    }

    /// Mutable access to the unit in this cell, if any.
    pub fn unit_mut(&mut self) -> Option<&mut Unit> {
        match self {
            Self::Occupied(unit) => Some(unit),
            Self::Empty | Self::OutOfBounds => None,
        }
    }

    /// Whether this is an on-board, unoccupied cell.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// A worker's local view of the board: owned sub-grid plus halo ring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    board_size: i32,
    cells: BTreeMap<Coord, Cell>,
}

impl Field {
    /// Create an empty field (no tracked coordinates) for an `n x n` board.
    #[must_use]
    pub fn new(board_size: i32) -> Self {
        Self {
            board_size,
            cells: BTreeMap::new(),
        }
    }

    /// Build a field from board-level tiles.
    pub fn from_tiles(board_size: i32, tiles: impl IntoIterator<Item = (Coord, Tile)>) -> Self {
        let cells = tiles
            .into_iter()
            .map(|(coord, tile)| (coord, Cell::from_tile(tile, coord)))
            .collect();
        Self { board_size, cells }
    }

    /// Side length of the whole board.
    #[must_use]
    pub const fn board_size(&self) -> i32 {
        self.board_size
    }

    /// Number of tracked coordinates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the field tracks no coordinates yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether `coord` is tracked by this field.
    #[must_use]
    pub fn contains(&self, coord: Coord) -> bool {
        self.cells.contains_key(&coord)
    }

    /// The cell at `coord`, if tracked.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<&Cell> {
        self.cells.get(&coord)
    }

    /// The cell at `coord`, treating untracked coordinates as out of bounds.
    #[must_use]
    pub fn cell(&self, coord: Coord) -> &Cell {
        self.cells.get(&coord).unwrap_or(&OUT_OF_BOUNDS)
    }

    /// The unit at `coord`, if any.
    #[must_use]
    pub fn unit(&self, coord: Coord) -> Option<&Unit> {
        self.cells.get(&coord).and_then(Cell::unit)
    }

    /// Mutable access to the unit at `coord`, if any.
    pub fn unit_mut(&mut self, coord: Coord) -> Option<&mut Unit> {
        self.cells.get_mut(&coord).and_then(Cell::unit_mut)
    }

    /// Replace the cell at a tracked coordinate and return the old value.
    ///
    /// Returns `None` and leaves the field untouched when `coord` is not
    /// tracked; fields never grow after the first wave.
    pub fn replace(&mut self, coord: Coord, cell: Cell) -> Option<Cell> {
        self.cells
            .get_mut(&coord)
            .map(|slot| std::mem::replace(slot, cell))
    }

    /// Insert or overwrite a cell, growing the field if needed.
    pub fn insert(&mut self, coord: Coord, cell: Cell) {
        self.cells.insert(coord, cell);
    }

    /// Remove the unit at `coord`, leaving the cell empty.
    pub fn take_unit(&mut self, coord: Coord) -> Option<Unit> {
        let slot = self.cells.get_mut(&coord)?;
        match std::mem::replace(slot, Cell::Empty) {
            Cell::Occupied(unit) => Some(unit),
            other => {
                *slot = other;
                None
            }
        }
    }

    /// Iterate over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Cell)> {
        self.cells.iter().map(|(coord, cell)| (*coord, cell))
    }

    /// Iterate over occupied cells in row-major order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.cells.values().filter_map(Cell::unit)
    }

    /// Iterate mutably over every unit.
    pub fn units_mut(&mut self) -> impl Iterator<Item = &mut Unit> {
        self.cells.values_mut().filter_map(Cell::unit_mut)
    }

    /// Snapshot the cells at `coords`.
    #[must_use]
    pub fn sample(&self, coords: impl IntoIterator<Item = Coord>) -> Surroundings {
        let cells = coords
            .into_iter()
            .map(|coord| (coord, self.cell(coord).clone()))
            .collect();
        Surroundings {
            board_size: self.board_size,
            cells,
        }
    }

    /// Snapshot the square of the given radius around `center`.
    #[must_use]
    pub fn window(&self, center: Coord, radius: i32) -> Surroundings {
        self.sample(center.square(radius))
    }

    /// Hash of every cell, for determinism checks.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.board_size.hash(&mut hasher);
        self.cells.len().hash(&mut hasher);
        for (coord, cell) in &self.cells {
            coord.hash(&mut hasher);
            cell.hash(&mut hasher);
        }
        hasher.finish()
    }
}

/// A read-only copy of some cells around a unit.
///
/// Decisions are made against snapshots so they stay pure functions of what
/// the unit could see, independent of later mutation of the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surroundings {
    board_size: i32,
    cells: BTreeMap<Coord, Cell>,
}

impl Surroundings {
    /// Build a snapshot directly from cells.
    #[must_use]
    pub fn from_cells(board_size: i32, cells: impl IntoIterator<Item = (Coord, Cell)>) -> Self {
        Self {
            board_size,
            cells: cells.into_iter().collect(),
        }
    }

    /// Side length of the whole board.
    #[must_use]
    pub const fn board_size(&self) -> i32 {
        self.board_size
    }

    /// The cell at `coord`. Off-board or unsampled cells read as out of bounds.
    #[must_use]
    pub fn cell(&self, coord: Coord) -> &Cell {
        if !coord.in_board(self.board_size) {
            return &OUT_OF_BOUNDS;
        }
        self.cells.get(&coord).unwrap_or(&OUT_OF_BOUNDS)
    }

    /// Mark `coord` as empty, e.g. the cell a mover is about to leave.
    pub fn vacate(&mut self, coord: Coord) {
        if let Some(slot) = self.cells.get_mut(&coord) {
            *slot = Cell::Empty;
        }
    }

    /// Iterate over sampled cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Cell)> {
        self.cells.iter().map(|(coord, cell)| (*coord, cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_field() -> Field {
        Field::from_tiles(
            3,
            Coord::new(1, 1).square(1).map(|c| {
                let tile = if c == Coord::new(0, 0) {
                    Tile::Unit(Faction::Earth)
                } else {
                    Tile::Empty
                };
                (c, tile)
            }),
        )
    }

    #[test]
    fn test_from_tiles_spawns_units_at_their_coordinate() {
        let field = small_field();
        let unit = field.unit(Coord::new(0, 0)).unwrap();
        assert_eq!(unit.faction, Faction::Earth);
        assert_eq!(unit.coord, Coord::new(0, 0));
        assert_eq!(field.len(), 9);
    }

    #[test]
    fn test_replace_never_grows() {
        let mut field = small_field();
        assert!(field.replace(Coord::new(9, 9), Cell::Empty).is_none());
        assert!(!field.contains(Coord::new(9, 9)));
        assert_eq!(field.len(), 9);
    }

    #[test]
    fn test_take_unit_leaves_empty() {
        let mut field = small_field();
        let unit = field.take_unit(Coord::new(0, 0));
        assert!(unit.is_some());
        assert!(field.cell(Coord::new(0, 0)).is_empty());
        assert!(field.take_unit(Coord::new(0, 0)).is_none());
    }

    #[test]
    fn test_untracked_reads_as_out_of_bounds() {
        let field = small_field();
        assert_eq!(field.cell(Coord::new(-1, 0)), &Cell::OutOfBounds);
    }

    #[test]
    fn test_surroundings_off_board_is_out_of_bounds() {
        let field = small_field();
        let window = field.window(Coord::new(0, 0), 1);
        assert_eq!(window.cell(Coord::new(-1, -1)), &Cell::OutOfBounds);
        assert!(window.cell(Coord::new(1, 1)).is_empty());
    }

    #[test]
    fn test_tile_codes() {
        assert_eq!(Tile::Empty.code(), '.');
        assert_eq!(Tile::OutOfBounds.code(), '.');
        assert_eq!(Tile::Unit(Faction::Water).code(), 'W');
    }

    #[test]
    fn test_state_hash_tracks_changes() {
        let mut field = small_field();
        let before = field.state_hash();
        assert_eq!(before, small_field().state_hash());
        field.unit_mut(Coord::new(0, 0)).unwrap().health -= 1;
        assert_ne!(before, field.state_hash());
    }
}
