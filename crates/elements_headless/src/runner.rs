//! Single runs and determinism verification.

use std::path::Path;

use elements_cluster::{simulate, ClusterConfig, Scenario, SimulationOutcome};
use tracing::{info, warn};

use crate::error::{HeadlessError, Result};
use crate::input::load_input;
use crate::output::{render_board, write_board};
use crate::summary::RunSummary;

/// Parse `input`, simulate it, and write the final board to `output` if
/// given. With `trace_waves`, each wave's board is logged as it was
/// assembled.
pub fn run_file(
    input: &Path,
    output: Option<&Path>,
    cluster: &ClusterConfig,
    trace_waves: bool,
) -> Result<(SimulationOutcome, RunSummary)> {
    let scenario = load_input(input)?;
    let outcome = run_scenario(&scenario, cluster)?;

    if trace_waves {
        for (wave, board) in outcome.wave_boards.iter().enumerate() {
            info!(wave = wave + 1, "Board after wave\n{}", render_board(board));
        }
    }
    if let Some(path) = output {
        write_board(path, &outcome.final_board).map_err(|error| HeadlessError::Write {
            path: path.display().to_string(),
            error,
        })?;
        info!(path = %path.display(), "Final board written");
    }

    let summary = RunSummary::new(
        input,
        scenario.rounds_per_wave,
        cluster.process_count,
        &outcome,
    );
    Ok((outcome, summary))
}

/// Simulate an already parsed scenario.
pub fn run_scenario(scenario: &Scenario, cluster: &ClusterConfig) -> Result<SimulationOutcome> {
    info!(
        board_size = scenario.board_size,
        waves = scenario.waves.len(),
        rounds = scenario.rounds_per_wave,
        processes = cluster.process_count,
        "Running scenario"
    );
    Ok(simulate(cluster, scenario)?)
}

/// Run `input` `runs` times and check every run ends in the same state.
///
/// Returns the agreed hash.
pub fn verify_file(input: &Path, cluster: &ClusterConfig, runs: usize) -> Result<u64> {
    let scenario = load_input(input)?;
    let hashes = (0..runs.max(1))
        .map(|_| run_scenario(&scenario, cluster).map(|outcome| outcome.state_hash()))
        .collect::<Result<Vec<u64>>>()?;

    if hashes.windows(2).all(|pair| pair[0] == pair[1]) {
        info!(runs = hashes.len(), hash = hashes[0], "Runs agree");
        Ok(hashes[0])
    } else {
        warn!(?hashes, "Runs diverged");
        Err(HeadlessError::NonDeterministic(hashes))
    }
}
