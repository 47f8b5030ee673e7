//! Property and scenario tests for the phase engine.

use elements_core::combat::mitigated_damage;
use elements_core::prelude::*;
use elements_test_utils::determinism::{
    find_first_divergence, strategies::arb_board, verify_worker_determinism,
};
use elements_test_utils::fixtures::{board_with, crowded_board, skirmish, solo_worker};
use proptest::prelude::*;

fn assemble(n: usize, report: &[(Coord, Tile)]) -> Board {
    let mut board = Board::new(n);
    board.apply_report(report).unwrap();
    board
}

#[test]
fn test_skirmish_wave_output() {
    let board = skirmish();
    let mut worker = solo_worker(&board);
    worker.run_round(&mut Isolated).unwrap();
    let floods = worker.flood_phase();
    worker.resolve_floods(&floods, &[]).unwrap();
    worker.end_wave();

    assert_eq!(worker.field().unit(Coord::new(2, 2)).unwrap().health, 16);
    assert_eq!(worker.field().unit(Coord::new(2, 3)).unwrap().health, 10);

    let result = assemble(5, &worker.report());
    for (coord, tile) in result.iter() {
        let expected = match (coord.row, coord.col) {
            (2, 2) => 'E',
            (2, 3) => 'F',
            _ => '.',
        };
        assert_eq!(tile.code(), expected, "at {coord}");
    }
}

#[test]
fn test_fire_power_resets_every_wave() {
    let board = board_with(5, &[(Faction::Fire, (1, 1)), (Faction::Air, (1, 2))]);
    let mut worker = solo_worker(&board);
    for _ in 0..4 {
        worker.run_round(&mut Isolated).unwrap();
    }
    worker.end_wave();
    for unit in worker.field().units() {
        if unit.faction == Faction::Fire {
            assert_eq!(unit.attack_power, 4);
        }
    }
}

#[test]
fn test_crowded_board_is_deterministic() {
    let board = crowded_board();
    assert!(verify_worker_determinism(|| solo_worker(&board), 10));
    assert_eq!(find_first_divergence(|| solo_worker(&board), 10), None);
}

proptest! {
    #[test]
    fn prop_partition_report_round_trip(board in arb_board(9, 30)) {
        let layout = GridLayout::new(10, 9).unwrap();
        let mut result = Board::new(9);
        for (rank, tiles) in partition(&board, &layout).unwrap() {
            let mut worker = Worker::new(layout.worker(rank).unwrap(), RuleConfig::default());
            worker.receive_wave(&tiles).unwrap();
            result.apply_report(&worker.report()).unwrap();
        }
        prop_assert_eq!(result, board);
    }

    #[test]
    fn prop_region_classification_is_stable(board in arb_board(8, 10), row in -3i32..11, col in -3i32..11) {
        let layout = GridLayout::new(5, 8).unwrap();
        let worker = {
            let mut w = Worker::new(layout.worker(4).unwrap(), RuleConfig::default());
            let owned = *w.owned_rect();
            w.receive_wave(&board.field_tiles(&owned)).unwrap();
            w
        };
        let coord = Coord::new(row, col);
        prop_assert_eq!(worker.region(coord), worker.region(coord));
    }

    #[test]
    fn prop_earth_takes_half_damage(raw in 0i32..40) {
        prop_assert_eq!(mitigated_damage(Faction::Earth, raw), raw / 2);
        prop_assert_eq!(mitigated_damage(Faction::Water, raw), raw);
    }

    #[test]
    fn prop_units_never_linger_dead(board in arb_board(7, 25), rounds in 1usize..6) {
        let mut worker = solo_worker(&board);
        for _ in 0..rounds {
            worker.run_round(&mut Isolated).unwrap();
            prop_assert!(worker.field().units().all(Unit::is_alive));
        }
    }

    #[test]
    fn prop_inferno_never_exceeds_cap(board in arb_board(7, 30), rounds in 1usize..8) {
        let mut worker = solo_worker(&board);
        for _ in 0..rounds {
            worker.run_round(&mut Isolated).unwrap();
        }
        for unit in worker.field().units() {
            if unit.faction == Faction::Fire {
                prop_assert!((4..=6).contains(&unit.attack_power));
            }
        }
        worker.end_wave();
        for unit in worker.field().units() {
            if unit.faction == Faction::Fire {
                prop_assert_eq!(unit.attack_power, 4);
            }
        }
    }
}
