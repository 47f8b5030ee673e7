//! JSON run summaries.

use std::path::Path;

use elements_cluster::SimulationOutcome;
use elements_core::factions::Faction;
use elements_core::partition::Board;
use serde::{Deserialize, Serialize};

/// Units per faction on a board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Census {
    /// Earth units.
    pub earth: usize,
    /// Fire units.
    pub fire: usize,
    /// Water units.
    pub water: usize,
    /// Air units.
    pub air: usize,
}

impl Census {
    /// Count units on `board`.
    #[must_use]
    pub fn of(board: &Board) -> Self {
        let [earth, fire, water, air] = board.census();
        Self {
            earth,
            fire,
            water,
            air,
        }
    }

    /// Count for one faction.
    #[must_use]
    pub const fn get(&self, faction: Faction) -> usize {
        match faction {
            Faction::Earth => self.earth,
            Faction::Fire => self.fire,
            Faction::Water => self.water,
            Faction::Air => self.air,
        }
    }

    /// Total units.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.earth + self.fire + self.water + self.air
    }
}

/// What one run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Input file, as given.
    pub input: String,
    /// Side length of the board.
    pub board_size: usize,
    /// Waves simulated.
    pub waves: usize,
    /// Rounds per wave.
    pub rounds_per_wave: usize,
    /// Ranks used, coordinator included.
    pub process_count: usize,
    /// Units left on the final board.
    pub census: Census,
    /// Units after each wave.
    pub wave_census: Vec<Census>,
    /// Combined hash of final board and worker fields.
    pub state_hash: u64,
}

impl RunSummary {
    /// Summarize a finished run.
    #[must_use]
    pub fn new(
        input: &Path,
        rounds_per_wave: usize,
        process_count: usize,
        outcome: &SimulationOutcome,
    ) -> Self {
        Self {
            input: input.display().to_string(),
            board_size: outcome.final_board.size(),
            waves: outcome.wave_boards.len(),
            rounds_per_wave,
            process_count,
            census: Census::of(&outcome.final_board),
            wave_census: outcome.wave_boards.iter().map(Census::of).collect(),
            state_hash: outcome.state_hash(),
        }
    }

    /// Save as pretty JSON.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        save_json(path, self)
    }
}

/// Write any serializable value as pretty JSON, creating parent directories.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}
