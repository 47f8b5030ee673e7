//! Output file rendering: one line per board row, codes separated by
//! single spaces, `.` for empty cells.

use std::fmt::Write as _;
use std::path::Path;

use elements_core::partition::Board;

/// Render a board in output-file format, with a trailing newline per row.
#[must_use]
pub fn render_board(board: &Board) -> String {
    let mut text = String::with_capacity(board.size() * board.size() * 2);
    for row in board.rows() {
        let line: Vec<String> = row.iter().map(|tile| tile.code().to_string()).collect();
        // Writing to a String cannot fail.
        let _ = writeln!(text, "{}", line.join(" "));
    }
    text
}

/// Write a board to `path`, creating parent directories as needed.
pub fn write_board(path: &Path, board: &Board) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, render_board(board))
}

#[cfg(test)]
mod tests {
    use super::*;
    use elements_core::coord::Coord;
    use elements_core::factions::Faction;

    #[test]
    fn test_render_small_board() {
        let mut board = Board::new(3);
        board.set(Coord::new(0, 1), Some(Faction::Water)).unwrap();
        board.set(Coord::new(2, 2), Some(Faction::Air)).unwrap();
        assert_eq!(render_board(&board), ". W .\n. . .\n. . A\n");
    }

    #[test]
    fn test_render_empty_board() {
        assert_eq!(render_board(&Board::new(0)), "");
    }
}
