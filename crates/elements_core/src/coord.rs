//! Board coordinates and relative offsets.
//!
//! Coordinates are global: every worker addresses the board with the same
//! `(row, col)` pairs. Halo cells past the board edge have negative or
//! `>= N` components, so both parts are signed.

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// A `(row, col)` position on the board.
///
/// Ordering is lexicographic on `(row, col)`, which is also the order the
/// simulation uses for every tie-break and for deterministic iteration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Coord {
    /// Row index.
    pub row: i32,
    /// Column index.
    pub col: i32,
}

impl Coord {
    /// Create a coordinate.
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Whether this coordinate lies on an `n x n` board.
    #[must_use]
    pub const fn in_board(self, n: i32) -> bool {
        self.row >= 0 && self.row < n && self.col >= 0 && self.col < n
    }

    /// Step `times` cells in the direction of `offset`.
    #[must_use]
    pub const fn step(self, offset: Offset, times: i32) -> Self {
        Self {
            row: self.row + offset.d_row * times,
            col: self.col + offset.d_col * times,
        }
    }

    /// All coordinates within Chebyshev distance `radius`, self included,
    /// in row-major order.
    pub fn square(self, radius: i32) -> impl Iterator<Item = Coord> {
        (self.row - radius..=self.row + radius).flat_map(move |row| {
            (self.col - radius..=self.col + radius).map(move |col| Coord::new(row, col))
        })
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(i32, i32)> for Coord {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

/// A relative direction used by attack patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Offset {
    /// Row delta.
    pub d_row: i32,
    /// Column delta.
    pub d_col: i32,
}

impl Offset {
    /// Create an offset.
    #[must_use]
    pub const fn new(d_row: i32, d_col: i32) -> Self {
        Self { d_row, d_col }
    }
}

impl Add<Offset> for Coord {
    type Output = Coord;

    fn add(self, rhs: Offset) -> Coord {
        self.step(rhs, 1)
    }
}

/// The four orthogonal neighbors.
pub const ORTHOGONAL: [Offset; 4] = [
    Offset::new(-1, 0),
    Offset::new(1, 0),
    Offset::new(0, -1),
    Offset::new(0, 1),
];

/// The four diagonal neighbors.
pub const DIAGONAL: [Offset; 4] = [
    Offset::new(-1, -1),
    Offset::new(-1, 1),
    Offset::new(1, -1),
    Offset::new(1, 1),
];

/// All eight neighbors in row-major order.
pub const ALL_EIGHT: [Offset; 8] = [
    Offset::new(-1, -1),
    Offset::new(-1, 0),
    Offset::new(-1, 1),
    Offset::new(0, -1),
    Offset::new(0, 1),
    Offset::new(1, -1),
    Offset::new(1, 0),
    Offset::new(1, 1),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_row_major() {
        let mut coords = vec![Coord::new(1, 0), Coord::new(0, 5), Coord::new(0, 1)];
        coords.sort();
        assert_eq!(
            coords,
            vec![Coord::new(0, 1), Coord::new(0, 5), Coord::new(1, 0)]
        );
    }

    #[test]
    fn test_in_board() {
        assert!(Coord::new(0, 0).in_board(5));
        assert!(Coord::new(4, 4).in_board(5));
        assert!(!Coord::new(-1, 2).in_board(5));
        assert!(!Coord::new(2, 5).in_board(5));
    }

    #[test]
    fn test_step_twice() {
        let c = Coord::new(3, 3).step(Offset::new(-1, 1), 2);
        assert_eq!(c, Coord::new(1, 5));
    }

    #[test]
    fn test_square_radius_one() {
        let cells: Vec<_> = Coord::new(1, 1).square(1).collect();
        assert_eq!(cells.len(), 9);
        assert_eq!(cells[0], Coord::new(0, 0));
        assert_eq!(cells[8], Coord::new(2, 2));
    }
}
