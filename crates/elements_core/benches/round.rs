//! Phase engine benchmarks for elements_core.
//!
//! Run with: `cargo bench -p elements_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use elements_core::prelude::*;

/// A single worker owning a crowded 30x30 board.
fn crowded_worker() -> Worker {
    let layout = GridLayout::new(2, 30).expect("valid layout");
    let mut board = Board::new(30);
    for row in 0..30 {
        for col in 0..30 {
            if (row * 7 + col * 3) % 4 == 0 {
                let faction = Faction::ALL[((row + col) % 4) as usize];
                board
                    .set(Coord::new(row, col), Some(faction))
                    .expect("on board");
            }
        }
    }
    let mut worker = Worker::new(layout.worker(1).expect("worker rank"), RuleConfig::default());
    let owned = *worker.owned_rect();
    worker
        .receive_wave(&board.field_tiles(&owned))
        .expect("first wave");
    worker
}

pub fn round_benchmark(c: &mut Criterion) {
    let worker = crowded_worker();

    c.bench_function("action_phase_30x30", |b| {
        b.iter(|| black_box(worker.action_phase()));
    });

    c.bench_function("move_phase_30x30", |b| {
        b.iter(|| black_box(worker.move_phase()));
    });

    c.bench_function("round_30x30", |b| {
        b.iter_batched(
            || worker.clone(),
            |mut w| {
                w.run_round(&mut Isolated).expect("isolated round");
                black_box(w.state_hash())
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, round_benchmark);
criterion_main!(benches);
