//! Benchmarks for the ticket limiter
//!
//! Measures:
//! - Uncontended try_acquire/release
//! - Scoped execute throughput on a runtime
//! - Contended execute with more tasks than tickets

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tokio::task::JoinSet;
use tollkit_limiter::TicketLimiter;

fn try_acquire_release(c: &mut Criterion) {
    let mut group = c.benchmark_group("limiter/try_acquire");

    for &capacity in &[1, 16, 256] {
        group.bench_with_input(
            BenchmarkId::from_parameter(capacity),
            &capacity,
            |b, &capacity| {
                let limiter = TicketLimiter::new(capacity);
                b.iter(|| black_box(limiter.try_acquire()));
            },
        );
    }

    group.finish();
}

fn execute_uncontended(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let limiter = TicketLimiter::new(16);

    c.bench_function("limiter/execute", |b| {
        b.to_async(&rt).iter(|| {
            let limiter = limiter.clone();
            async move { black_box(limiter.execute(|| async { 1_u64 }).await) }
        });
    });
}

fn execute_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("limiter/contended");
    let rt = tokio::runtime::Runtime::new().unwrap();

    for &capacity in &[1, 4, 32] {
        group.bench_with_input(
            BenchmarkId::from_parameter(capacity),
            &capacity,
            |b, &capacity| {
                let limiter = TicketLimiter::new(capacity);
                b.to_async(&rt).iter(|| {
                    let limiter = limiter.clone();
                    async move {
                        let mut set = JoinSet::new();
                        for i in 0..64_u64 {
                            let limiter = limiter.clone();
                            set.spawn(async move {
                                limiter
                                    .execute(|| async move {
                                        tokio::task::yield_now().await;
                                        i
                                    })
                                    .await
                            });
                        }
                        while let Some(res) = set.join_next().await {
                            black_box(res.unwrap());
                        }
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    try_acquire_release,
    execute_uncontended,
    execute_contended
);
criterion_main!(benches);
