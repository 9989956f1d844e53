//! Benchmarks for the clock read path and the precise delay

use criterion::{criterion_group, criterion_main, Criterion};

use tickd_runtime::{delay_precise, ticks_ms, ticks_ns};

fn bench_clock_reads(c: &mut Criterion) {
    c.bench_function("ticks_ns", |b| b.iter(ticks_ns));
    c.bench_function("ticks_ms", |b| b.iter(ticks_ms));
}

fn bench_delay_precise(c: &mut Criterion) {
    let mut group = c.benchmark_group("delay_precise");
    group.sample_size(20);
    group.bench_function("10us", |b| b.iter(|| delay_precise(10_000)));
    group.bench_function("100us", |b| b.iter(|| delay_precise(100_000)));
    group.finish();
}

criterion_group!(benches, bench_clock_reads, bench_delay_precise);
criterion_main!(benches);
