//! Input file parsing.
//!
//! ```text
//! 6 2 2 3            <- N, wave count, units per wave, rounds per wave
//! Wave 1:            <- header, content ignored
//! Earth: 0 0, 1 1    <- "row col" pairs, comma separated, may be empty
//! Fire: 5 5
//! Water:
//! Air: 2 3, 3 2
//! Wave 2:
//! ...
//! ```
//!
//! Within a wave, later lines overwrite earlier ones at the same coordinate.

use std::path::Path;

use elements_cluster::Scenario;
use elements_core::coord::Coord;
use elements_core::factions::Faction;
use elements_core::partition::Board;
use thiserror::Error;
use tracing::{debug, warn};

/// Lines per wave block: header plus one line per faction.
const LINES_PER_WAVE: usize = 5;

/// Problems with an input file. Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum InputError {
    /// The file could not be read.
    #[error("Failed to read input {path}: {error}")]
    Io {
        /// Path that failed.
        path: String,
        /// Underlying IO failure.
        #[source]
        error: std::io::Error,
    },

    /// The first line is missing or malformed.
    #[error("Line 1: {0}")]
    Header(String),

    /// A faction line is malformed.
    #[error("Line {line}: {message}")]
    Syntax {
        /// Offending line.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// A placement lies outside the board.
    #[error("Line {line}: ({row}, {col}) is outside a {size}x{size} board")]
    OutOfRange {
        /// Offending line.
        line: usize,
        /// Parsed row.
        row: i64,
        /// Parsed column.
        col: i64,
        /// Board size.
        size: usize,
    },

    /// Fewer wave blocks than the header declares.
    #[error("Header declares {expected} waves but only {found} are present")]
    MissingWaves {
        /// Declared wave count.
        expected: usize,
        /// Complete wave blocks found.
        found: usize,
    },
}

/// Read and parse an input file.
pub fn load_input(path: &Path) -> Result<Scenario, InputError> {
    let text = std::fs::read_to_string(path).map_err(|error| InputError::Io {
        path: path.display().to_string(),
        error,
    })?;
    parse_input(&text)
}

/// Parse input text into a scenario.
pub fn parse_input(text: &str) -> Result<Scenario, InputError> {
    let lines: Vec<&str> = text.lines().collect();
    let header = lines
        .first()
        .ok_or_else(|| InputError::Header("input is empty".into()))?;
    let numbers: Vec<usize> = header
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<_, _>>()
        .map_err(|error| InputError::Header(format!("expected four integers: {error}")))?;
    let [board_size, wave_count, units_per_wave, rounds_per_wave] = numbers[..] else {
        return Err(InputError::Header(format!(
            "expected 4 integers (N, waves, units per wave, rounds per wave), found {}",
            numbers.len()
        )));
    };
    if board_size == 0 {
        return Err(InputError::Header("board size must be positive".into()));
    }

    let body = trim_trailing_blank(&lines[1..]);
    let found = body.len() / LINES_PER_WAVE;
    if found < wave_count {
        return Err(InputError::MissingWaves {
            expected: wave_count,
            found,
        });
    }
    if found > wave_count || body.len() % LINES_PER_WAVE != 0 {
        warn!(
            declared = wave_count,
            present = found,
            "Input has lines past the declared waves; ignoring them"
        );
    }

    let waves = (0..wave_count)
        .map(|wave| {
            let start = wave * LINES_PER_WAVE;
            parse_wave(&body[start..start + LINES_PER_WAVE], start + 2, board_size, units_per_wave)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Scenario {
        board_size,
        units_per_wave,
        rounds_per_wave,
        waves,
    })
}

fn trim_trailing_blank<'a>(lines: &'a [&'a str]) -> &'a [&'a str] {
    let end = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .map_or(0, |last| last + 1);
    &lines[..end]
}

/// Parse one wave block. `first_line` is the 1-based number of its header.
fn parse_wave(
    block: &[&str],
    first_line: usize,
    board_size: usize,
    units_per_wave: usize,
) -> Result<Board, InputError> {
    let mut board = Board::new(board_size);
    for (offset, faction) in Faction::ALL.into_iter().enumerate() {
        let line = first_line + 1 + offset;
        let placements = parse_faction_line(block[offset + 1], line, faction, board_size)?;
        if placements.len() != units_per_wave {
            debug!(
                line,
                faction = faction.label(),
                placed = placements.len(),
                declared = units_per_wave,
                "Placement count differs from units per wave"
            );
        }
        for coord in placements {
            board
                .set(coord, Some(faction))
                .map_err(|error| InputError::Syntax {
                    line,
                    message: error.to_string(),
                })?;
        }
    }
    Ok(board)
}

fn parse_faction_line(
    text: &str,
    line: usize,
    faction: Faction,
    board_size: usize,
) -> Result<Vec<Coord>, InputError> {
    let syntax = |message: String| InputError::Syntax { line, message };
    let (label, list) = text
        .split_once(':')
        .ok_or_else(|| syntax(format!("expected \"{}: ...\"", faction.label())))?;
    if label.trim() != faction.label() {
        return Err(syntax(format!(
            "expected the {} line, found \"{}\"",
            faction.label(),
            label.trim()
        )));
    }

    list.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let parts: Vec<i64> = pair
                .split_whitespace()
                .map(str::parse)
                .collect::<Result<_, _>>()
                .map_err(|error| syntax(format!("bad coordinate \"{pair}\": {error}")))?;
            let [row, col] = parts[..] else {
                return Err(syntax(format!("expected \"row col\", found \"{pair}\"")));
            };
            let size = board_size as i64;
            if !(0..size).contains(&row) || !(0..size).contains(&col) {
                return Err(InputError::OutOfRange {
                    line,
                    row,
                    col,
                    size: board_size,
                });
            }
            Ok(Coord::new(row as i32, col as i32))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use elements_core::field::Tile;

    const SAMPLE: &str = "\
5 2 1 1
Wave 1:
Earth: 2 2
Fire: 2 3
Water:
Air: 0 0
Wave 2:
Earth: 4 4
Fire:
Water: 1 1
Air: 4 4
";

    #[test]
    fn test_parses_header_and_waves() {
        let scenario = parse_input(SAMPLE).unwrap();
        assert_eq!(scenario.board_size, 5);
        assert_eq!(scenario.units_per_wave, 1);
        assert_eq!(scenario.rounds_per_wave, 1);
        assert_eq!(scenario.waves.len(), 2);
        let first = &scenario.waves[0];
        assert_eq!(first.get(Coord::new(2, 2)), Tile::Unit(Faction::Earth));
        assert_eq!(first.get(Coord::new(2, 3)), Tile::Unit(Faction::Fire));
        assert_eq!(first.get(Coord::new(0, 0)), Tile::Unit(Faction::Air));
        assert_eq!(first.unit_count(), 3);
    }

    #[test]
    fn test_later_line_overwrites_earlier() {
        let scenario = parse_input(SAMPLE).unwrap();
        assert_eq!(
            scenario.waves[1].get(Coord::new(4, 4)),
            Tile::Unit(Faction::Air)
        );
    }

    #[test]
    fn test_missing_wave_is_an_error() {
        let text = "5 3 1 1\nWave 1:\nEarth:\nFire:\nWater:\nAir:\n";
        assert!(matches!(
            parse_input(text),
            Err(InputError::MissingWaves {
                expected: 3,
                found: 1
            })
        ));
    }

    #[test]
    fn test_out_of_range_placement() {
        let text = "4 1 1 1\nWave 1:\nEarth: 4 0\nFire:\nWater:\nAir:\n";
        assert!(matches!(
            parse_input(text),
            Err(InputError::OutOfRange { line: 3, row: 4, .. })
        ));
    }

    #[test]
    fn test_wrong_label() {
        let text = "4 1 1 1\nWave 1:\nEarth:\nWater:\nFire:\nAir:\n";
        let error = parse_input(text).unwrap_err();
        assert!(matches!(error, InputError::Syntax { line: 4, .. }));
        assert!(error.to_string().contains("Fire"));
    }

    #[test]
    fn test_bad_header() {
        assert!(matches!(parse_input(""), Err(InputError::Header(_))));
        assert!(matches!(parse_input("5 1 x 1"), Err(InputError::Header(_))));
        assert!(matches!(parse_input("5 1 1"), Err(InputError::Header(_))));
    }

    #[test]
    fn test_extra_waves_are_ignored() {
        let text = "3 1 0 0\nWave 1:\nEarth:\nFire:\nWater:\nAir: 1 1\nWave 2:\nEarth: 0 0\nFire:\nWater:\nAir:\n";
        let scenario = parse_input(text).unwrap();
        assert_eq!(scenario.waves.len(), 1);
    }

    #[test]
    fn test_malformed_pair() {
        let text = "4 1 1 1\nWave 1:\nEarth: 1\nFire:\nWater:\nAir:\n";
        assert!(matches!(
            parse_input(text),
            Err(InputError::Syntax { line: 3, .. })
        ));
    }
}
