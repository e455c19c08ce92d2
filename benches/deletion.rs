//! Deletion strategy benchmarks.
//!
//! Compares the full-scan deletion against the index-driven one at low and
//! high selectivity, plus the cost of building the five indexes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use boxscoredb::deletion::{delete_ft_pct_above_indexed, delete_ft_pct_above_linear, TombstoneMap};
use boxscoredb::index::IndexManager;
use boxscoredb::{GameRecord, PageStore};

const RECORDS: usize = 25_000;

fn build_store(count: usize) -> PageStore {
    let mut store = PageStore::new();
    for i in 0..count {
        // Deterministic spread of FT% over [0.5, 1.0].
        let ft = 0.5 + ((i * 7919) % 1000) as f32 / 2000.0;
        store.add_record(&GameRecord {
            game_date: format!("20{:02}-{:02}-{:02}", 3 + i % 20, 1 + i % 12, 1 + i % 28)
                .parse()
                .unwrap(),
            team_id_home: 1610612737 + (i % 30) as i32,
            pts_home: 80 + (i % 70) as i32,
            fg_pct_home: 0.35 + (i % 30) as f32 / 100.0,
            ft_pct_home: ft,
            ..GameRecord::default()
        });
    }
    store
}

fn bench_delete(c: &mut Criterion) {
    let store = build_store(RECORDS);
    let mut indexes = IndexManager::new();
    indexes.build(&store);

    let mut group = c.benchmark_group("delete_ft_pct_above");
    group.throughput(Throughput::Elements(RECORDS as u64));

    // 0.99 deletes ~2%, 0.60 deletes ~80%.
    for threshold in [0.99f32, 0.90, 0.60] {
        group.bench_with_input(
            BenchmarkId::new("linear", threshold),
            &threshold,
            |b, &threshold| {
                b.iter_with_setup(
                    || TombstoneMap::for_store(&store),
                    |mut tombstones| {
                        black_box(delete_ft_pct_above_linear(&store, &mut tombstones, threshold))
                    },
                );
            },
        );

        group.bench_with_input(
            BenchmarkId::new("indexed", threshold),
            &threshold,
            |b, &threshold| {
                b.iter_with_setup(
                    || TombstoneMap::for_store(&store),
                    |mut tombstones| {
                        black_box(delete_ft_pct_above_indexed(
                            &store,
                            &indexes,
                            &mut tombstones,
                            threshold,
                        ))
                    },
                );
            },
        );
    }

    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");

    for count in [1_000usize, 10_000] {
        let store = build_store(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("all_five", count), &store, |b, store| {
            b.iter(|| {
                let mut indexes = IndexManager::new();
                indexes.build(black_box(store));
                indexes
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_delete, bench_build);
criterion_main!(benches);
