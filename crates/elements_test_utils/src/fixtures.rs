//! Test fixtures and helpers.
//!
//! Pre-built boards and workers for consistent testing.

use elements_core::prelude::*;

/// Build an `n x n` board holding the given units.
///
/// # Panics
///
/// Panics if a placement is off the board.
#[must_use]
pub fn board_with(n: usize, units: &[(Faction, (i32, i32))]) -> Board {
    let mut board = Board::new(n);
    for (faction, at) in units {
        board
            .set(Coord::from(*at), Some(*faction))
            .expect("fixture placement must be on the board");
    }
    board
}

/// A worker that owns the whole `n x n` board and has received `board` as
/// its first wave.
///
/// # Panics
///
/// Panics if `board` is empty-sized.
#[must_use]
pub fn solo_worker(board: &Board) -> Worker {
    solo_worker_with(board, RuleConfig::default())
}

/// Like [`solo_worker`] with explicit rules.
///
/// # Panics
///
/// Panics if `board` is empty-sized.
#[must_use]
pub fn solo_worker_with(board: &Board, rules: RuleConfig) -> Worker {
    let layout = GridLayout::new(2, board.size()).expect("one worker fits any board");
    let mut worker = Worker::new(layout.worker(1).expect("rank 1 is a worker"), rules);
    let owned = *worker.owned_rect();
    worker
        .receive_wave(&board.field_tiles(&owned))
        .expect("first wave is always accepted");
    worker
}

/// The canonical two-unit skirmish: Earth at (2, 2) next to Fire at (2, 3)
/// on a 5x5 board.
#[must_use]
pub fn skirmish() -> Board {
    board_with(5, &[(Faction::Earth, (2, 2)), (Faction::Fire, (2, 3))])
}

/// A 12x12 board with units of every faction spread across all four
/// quadrants, so a four-worker run has traffic over every boundary.
#[must_use]
pub fn crowded_board() -> Board {
    let mut board = Board::new(12);
    for row in 0..12 {
        for col in 0..12 {
            if (row * 5 + col * 3) % 7 == 0 {
                let faction = Faction::ALL[((row + 2 * col) % 4) as usize];
                board
                    .set(Coord::new(row, col), Some(faction))
                    .expect("loop stays on the board");
            }
        }
    }
    board
}
