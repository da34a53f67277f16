//! Simulation benchmarks for dragon_core.
//!
//! Run with: `cargo bench -p dragon_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dragon_core::arena::Arena;
use dragon_core::input::{ActorIntents, InputIntents};
use dragon_core::simulation::Simulation;

/// Runs simulation benchmarks for the dragon_core crate.
pub fn simulation_benchmark(c: &mut Criterion) {
    let arena = Arena::default();
    let circling = InputIntents::new(
        ActorIntents {
            move_up: true,
            move_right: true,
            ..ActorIntents::IDLE
        },
        ActorIntents {
            move_down: true,
            move_left: true,
            ..ActorIntents::IDLE
        },
    );

    c.bench_function("tick_idle", |b| {
        let mut sim = Simulation::new();
        b.iter(|| black_box(sim.tick(black_box(&InputIntents::IDLE), arena)));
    });

    c.bench_function("tick_moving", |b| {
        let mut sim = Simulation::new();
        b.iter(|| black_box(sim.tick(black_box(&circling), arena)));
    });

    c.bench_function("state_hash", |b| {
        let sim = Simulation::new();
        b.iter(|| black_box(sim.state_hash()));
    });
}

criterion_group!(benches, simulation_benchmark);
criterion_main!(benches);
