//! Region classification relative to a worker's owned sub-grid.

use serde::{Deserialize, Serialize};

use crate::coord::Coord;
use crate::field::Field;

/// Width of the halo ring, and the depth a cell must sit inside the owned
/// rectangle before no neighbor can see it.
pub const HALO_WIDTH: i32 = 3;

/// Where a coordinate sits from one worker's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    /// Owned and at least [`HALO_WIDTH`] cells from the owned boundary.
    /// Invisible to every neighbor.
    Interior,
    /// Owned but close enough to the boundary to appear in a neighbor's halo.
    Boundary,
    /// Tracked in the field but owned by someone else (or off-board).
    Halo,
    /// Not tracked at all.
    OutOfRange,
}

impl Region {
    /// Numeric level used in logs: 3 interior, 2 boundary, 1 halo, 0 out of range.
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::Interior => 3,
            Self::Boundary => 2,
            Self::Halo => 1,
            Self::OutOfRange => 0,
        }
    }

    /// Whether this worker is the authority for the coordinate.
    #[must_use]
    pub const fn is_owned(self) -> bool {
        matches!(self, Self::Interior | Self::Boundary)
    }
}

/// The square sub-grid a worker owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnedRect {
    /// Row of the top-left owned cell.
    pub top: i32,
    /// Column of the top-left owned cell.
    pub left: i32,
    /// Side length.
    pub size: i32,
}

impl OwnedRect {
    /// Create an owned rectangle.
    #[must_use]
    pub const fn new(top: i32, left: i32, size: i32) -> Self {
        Self { top, left, size }
    }

    /// Whether `coord` lies inside the rectangle.
    #[must_use]
    pub const fn contains(&self, coord: Coord) -> bool {
        coord.row >= self.top
            && coord.row < self.top + self.size
            && coord.col >= self.left
            && coord.col < self.left + self.size
    }

    /// Whether `coord` is deep enough inside that no halo reaches it.
    #[must_use]
    pub const fn contains_interior(&self, coord: Coord) -> bool {
        coord.row >= self.top + HALO_WIDTH
            && coord.row <= self.top + self.size - HALO_WIDTH - 1
            && coord.col >= self.left + HALO_WIDTH
            && coord.col <= self.left + self.size - HALO_WIDTH - 1
    }

    /// The rectangle grown by the halo ring. Not clipped to the board.
    pub fn with_halo(&self) -> impl Iterator<Item = Coord> {
        let (top, left, size) = (self.top, self.left, self.size);
        (top - HALO_WIDTH..top + size + HALO_WIDTH).flat_map(move |row| {
            (left - HALO_WIDTH..left + size + HALO_WIDTH).map(move |col| Coord::new(row, col))
        })
    }

    /// Owned coordinates in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Coord> {
        let (top, left, size) = (self.top, self.left, self.size);
        (top..top + size).flat_map(move |row| (left..left + size).map(move |col| Coord::new(row, col)))
    }
}

/// Classify `coord` for the worker owning `owned` and holding `field`.
#[must_use]
pub fn classify(coord: Coord, owned: &OwnedRect, field: &Field) -> Region {
    if owned.contains_interior(coord) {
        Region::Interior
    } else if owned.contains(coord) {
        Region::Boundary
    } else if field.contains(coord) {
        Region::Halo
    } else {
        Region::OutOfRange
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Tile;

    fn field_for(owned: &OwnedRect) -> Field {
        Field::from_tiles(20, owned.with_halo().map(|c| (c, Tile::Empty)))
    }

    #[test]
    fn test_classify_each_region() {
        let owned = OwnedRect::new(0, 0, 10);
        let field = field_for(&owned);
        assert_eq!(classify(Coord::new(5, 5), &owned, &field), Region::Interior);
        assert_eq!(classify(Coord::new(3, 3), &owned, &field), Region::Interior);
        assert_eq!(classify(Coord::new(6, 6), &owned, &field), Region::Interior);
        assert_eq!(classify(Coord::new(2, 5), &owned, &field), Region::Boundary);
        assert_eq!(classify(Coord::new(7, 5), &owned, &field), Region::Boundary);
        assert_eq!(classify(Coord::new(10, 5), &owned, &field), Region::Halo);
        assert_eq!(classify(Coord::new(-3, -3), &owned, &field), Region::Halo);
        assert_eq!(
            classify(Coord::new(13, 5), &owned, &field),
            Region::OutOfRange
        );
    }

    #[test]
    fn test_small_rect_has_no_interior() {
        let owned = OwnedRect::new(5, 5, 5);
        assert_eq!(owned.cells().filter(|&c| owned.contains_interior(c)).count(), 0);
    }

    #[test]
    fn test_with_halo_size() {
        let owned = OwnedRect::new(4, 8, 4);
        assert_eq!(owned.with_halo().count(), 10 * 10);
        assert_eq!(owned.cells().count(), 16);
    }

    #[test]
    fn test_levels() {
        assert_eq!(Region::Interior.level(), 3);
        assert_eq!(Region::Boundary.level(), 2);
        assert_eq!(Region::Halo.level(), 1);
        assert!(Region::Boundary.is_owned());
        assert!(!Region::Halo.is_owned());
    }
}
