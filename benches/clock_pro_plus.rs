//! Benchmarks for ClockProPlusCache.
//!
//! Run with: `cargo bench --bench clock_pro_plus`

use clockkit::policy::clock_pro_plus::ClockProPlusCache;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};

// ============================================================================
// Insert + Get benchmarks (mixed operations)
// ============================================================================

fn bench_insert_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("clock_pro_plus_policy");
    let ops_per_iter = 1024u64 * 2;
    group.throughput(Throughput::Elements(ops_per_iter));

    group.bench_function("insert_get", |b| {
        b.iter_batched(
            || {
                let mut cache = ClockProPlusCache::new(1024).unwrap();
                for i in 0..1024u64 {
                    cache.insert(i, i);
                }
                cache
            },
            |mut cache| {
                for i in 0..1024u64 {
                    cache.insert(std::hint::black_box(i + 10_000), i);
                    let _ = std::hint::black_box(cache.get(&std::hint::black_box(i)));
                }
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

// ============================================================================
// Eviction churn benchmarks (continuous eviction pressure)
// ============================================================================

fn bench_eviction_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("clock_pro_plus_policy");
    group.throughput(Throughput::Elements(4096));

    group.bench_function("eviction_churn", |b| {
        b.iter_batched(
            || {
                let mut cache = ClockProPlusCache::new(1024).unwrap();
                for i in 0..1024u64 {
                    cache.insert(i, i);
                }
                cache
            },
            |mut cache| {
                // Every insert is a distinct key, so each one runs the full
                // miss path: hand sweeps, eviction, test-page pruning.
                for i in 0..4096u64 {
                    cache.insert(std::hint::black_box(100_000 + i), i);
                }
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

// ============================================================================
// Working set + scan (ghost hits and adaptation on the hot path)
// ============================================================================

fn bench_working_set_with_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("clock_pro_plus_policy");
    group.throughput(Throughput::Elements(4096));

    group.bench_function("working_set_with_scan", |b| {
        b.iter_batched(
            || {
                let mut cache = ClockProPlusCache::new(1024).unwrap();
                for i in 0..1024u64 {
                    cache.insert(i, i);
                }
                cache
            },
            |mut cache| {
                for i in 0..4096u64 {
                    // Re-reference a small working set between scan inserts,
                    // repeatedly revisiting recently evicted keys to exercise
                    // ghost resurrection.
                    let _ = cache.get(&std::hint::black_box(i % 128));
                    cache.insert(std::hint::black_box(50_000 + (i % 1500)), i);
                }
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_get,
    bench_eviction_churn,
    bench_working_set_with_scan
);
criterion_main!(benches);
