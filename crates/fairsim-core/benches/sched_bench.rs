//! Scheduler Benchmark Suite
//!
//! Baseline for the engine's two cost centres: the ordered-index churn of
//! a saturated ready set, and arrival promotion across a staggered
//! workload. Workloads are generated deterministically so every run
//! measures the same dispatch sequence.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fairsim_core::domain::SimulationBuilder;

/// N tasks, all at time zero, nice values cycling over a small spread.
fn saturated_workload(n: u32) -> SimulationBuilder {
    let mut builder = SimulationBuilder::new()
        .time_quantum_ns(24_000_000)
        .min_granularity_ns(1_000_000);
    for i in 0..n {
        let nice = [-5i8, 0, 0, 5][(i % 4) as usize];
        builder = builder.task(0, nice, 8_000_000);
    }
    builder
}

/// N tasks arriving every 500us, forcing steady promotion traffic.
fn staggered_workload(n: u32) -> SimulationBuilder {
    let mut builder = SimulationBuilder::new()
        .time_quantum_ns(24_000_000)
        .min_granularity_ns(1_000_000);
    for i in 0..n {
        builder = builder.task(u64::from(i) * 500_000, 0, 4_000_000);
    }
    builder
}

fn bench_saturated_ready_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_all_saturated");

    for n in [10u32, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, &n| {
            b.iter(|| {
                let mut sched = saturated_workload(n).build().unwrap();
                sched.run_all_tasks();
                black_box(sched.runtime_ns())
            });
        });
    }

    group.finish();
}

fn bench_staggered_arrivals(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_all_staggered");

    for n in [10u32, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, &n| {
            b.iter(|| {
                let mut sched = staggered_workload(n).build().unwrap();
                sched.run_all_tasks();
                black_box(sched.completed().len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_saturated_ready_set, bench_staggered_arrivals);
criterion_main!(benches);
