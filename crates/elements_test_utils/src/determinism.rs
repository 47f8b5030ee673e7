//! Determinism testing utilities.
//!
//! Provides a harness for verifying that the simulation produces identical
//! results given identical inputs.
//!
//! # Testing Strategy
//!
//! Every worker must reach the same state no matter how its threads are
//! scheduled. Sources of non-determinism include:
//!
//! - **HashMap iteration order**: fields are `BTreeMap`s and every phase
//!   walks them in row-major order.
//! - **Message arrival order**: received packs are grouped per neighbor and
//!   neighbors are visited in a fixed order.
//! - **System randomness**: none. Units decide from their surroundings only.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use elements_core::prelude::*;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of steps simulated per run.
    pub steps: usize,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for deterministic simulation).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that every run agreed, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        assert!(
            self.is_deterministic,
            "Simulation is non-deterministic!\n\
             Runs: {}\n\
             Steps: {}\n\
             Unique hashes: {} (expected 1)\n\
             All hashes: {:?}",
            self.hashes.len(),
            self.steps,
            self.unique_hashes().len(),
            self.hashes
        );
    }
}

/// Run a simulation several times and verify the final hashes agree.
///
/// * `runs` - Number of independent runs
/// * `steps` - Steps per run
/// * `setup` - Builds a fresh initial state
/// * `step` - Advances the state by one step
/// * `hash` - Hashes the final state
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    steps: usize,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let hashes: Vec<u64> = (0..runs)
        .map(|_| {
            let mut state = setup();
            for _ in 0..steps {
                step(&mut state);
            }
            hash(&state)
        })
        .collect();

    DeterminismResult {
        is_deterministic: hashes.windows(2).all(|w| w[0] == w[1]),
        hashes,
        steps,
    }
}

/// Run an isolated worker twice for `rounds` rounds and compare hashes.
///
/// # Panics
///
/// Panics if a round fails.
pub fn verify_worker_determinism<F>(setup: F, rounds: usize) -> bool
where
    F: Fn() -> Worker,
{
    verify_determinism(
        2,
        rounds,
        setup,
        |worker| {
            worker
                .run_round(&mut Isolated)
                .expect("isolated round cannot fail");
        },
        Worker::state_hash,
    )
    .is_deterministic
}

/// Step two identical isolated workers round by round.
///
/// Returns `None` if they never diverge, `Some(round)` for the first round
/// after which their hashes differ.
///
/// # Panics
///
/// Panics if a round fails.
pub fn find_first_divergence<F>(setup: F, rounds: usize) -> Option<usize>
where
    F: Fn() -> Worker,
{
    let mut first = setup();
    let mut second = setup();
    if first.state_hash() != second.state_hash() {
        return Some(0);
    }
    for round in 1..=rounds {
        first.run_round(&mut Isolated).expect("isolated round");
        second.run_round(&mut Isolated).expect("isolated round");
        if first.state_hash() != second.state_hash() {
            return Some(round);
        }
    }
    None
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for boards and coordinates.
pub mod strategies {
    use elements_core::prelude::*;
    use proptest::prelude::*;

    /// Any faction.
    pub fn arb_faction() -> impl Strategy<Value = Faction> {
        prop::sample::select(Faction::ALL.to_vec())
    }

    /// A coordinate on an `n x n` board.
    pub fn arb_coord(n: usize) -> impl Strategy<Value = Coord> {
        let n = n as i32;
        (0..n, 0..n).prop_map(|(row, col)| Coord::new(row, col))
    }

    /// Up to `max_units` placements on an `n x n` board. Later placements
    /// may repeat a coordinate, as input files may.
    pub fn arb_placements(
        n: usize,
        max_units: usize,
    ) -> impl Strategy<Value = Vec<(Faction, Coord)>> {
        prop::collection::vec((arb_faction(), arb_coord(n)), 0..=max_units)
    }

    /// An `n x n` board with up to `max_units` units.
    pub fn arb_board(n: usize, max_units: usize) -> impl Strategy<Value = Board> {
        arb_placements(n, max_units).prop_map(move |placements| {
            let mut board = Board::new(n);
            for (faction, coord) in placements {
                // Strategy coordinates are always on the board.
                let _ = board.set(coord, Some(faction));
            }
            board
        })
    }
}
