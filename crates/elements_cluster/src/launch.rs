//! Starting every rank and collecting the result.

use std::thread;

use elements_core::topology::{GridLayout, COORDINATOR_RANK};
use tracing::{debug, info, warn};

use crate::coordinator::{run_coordinator, Scenario, SimulationOutcome};
use crate::error::{ClusterError, Result};
use crate::node::run_worker;
use crate::transport::mesh;
use crate::ClusterConfig;

/// Run `scenario` across `config.process_count` ranks.
///
/// Rank 0 coordinates on the calling thread; every worker rank gets its own
/// named OS thread. Ranks beyond the largest square worker grid are created
/// and immediately dropped.
pub fn simulate(config: &ClusterConfig, scenario: &Scenario) -> Result<SimulationOutcome> {
    scenario.validate()?;
    let layout = GridLayout::new(config.process_count, scenario.board_size)?;
    info!(
        processes = config.process_count,
        workers = layout.worker_count(),
        grid_size = layout.grid_size,
        "Launching ranks"
    );

    let mut endpoints = mesh(config.process_count).into_iter();
    let coordinator = endpoints
        .next()
        .ok_or(ClusterError::NoSuchPeer {
            rank: COORDINATOR_RANK,
            peer: COORDINATOR_RANK,
        })?;
    let rules = config.rules;

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(layout.worker_count());
        for endpoint in endpoints {
            let rank = endpoint.rank();
            if !layout.is_worker(rank) {
                debug!(rank, "Rank outside the worker grid exits");
                continue;
            }
            let handle = thread::Builder::new()
                .name(format!("rank-{rank}"))
                .spawn_scoped(scope, move || run_worker(endpoint, rules))
                .map_err(|error| ClusterError::Spawn { rank, error })?;
            handles.push((rank, handle));
        }

        let outcome = run_coordinator(coordinator, &layout, scenario);

        let mut failures = Vec::new();
        for (rank, handle) in handles {
            match handle.join() {
                Ok(Ok(_)) => {}
                Ok(Err(error)) => failures.push(error),
                Err(_) => failures.push(ClusterError::Panicked(rank)),
            }
        }
        pick_root_cause(outcome, failures)
    })
}

/// A failing rank makes its peers fail with disconnects; report the
/// failure that started the cascade.
fn pick_root_cause(
    outcome: Result<SimulationOutcome>,
    failures: Vec<ClusterError>,
) -> Result<SimulationOutcome> {
    let coordinator_error = match outcome {
        Ok(done) if failures.is_empty() => return Ok(done),
        Ok(_) => None,
        Err(error) => Some(error),
    };
    for error in &failures {
        warn!(%error, "Rank failed");
    }
    let mut errors = failures;
    errors.extend(coordinator_error);
    let root = errors
        .iter()
        .position(|error| !error.is_disconnect())
        .unwrap_or(0);
    Err(errors.swap_remove(root))
}
