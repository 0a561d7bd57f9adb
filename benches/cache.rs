//! Façade overhead: expiration checks and write-back on every read.

use std::hint::black_box;
use std::time::Duration;

use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use tiercache::builder::CacheBuilder;
use tiercache::dependency::ManualDependency;
use tiercache::entry::Entry;
use tiercache::registry::StrategyKind;

const ENTRIES: u64 = 1024;

fn bench_get_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_get_hit");
    group.throughput(Throughput::Elements(ENTRIES));
    let keys: Vec<String> = (0..ENTRIES).map(|i| format!("key:{i}")).collect();

    group.bench_function("plain", |b| {
        let mut cache = CacheBuilder::new(ENTRIES as isize).build::<u64>().unwrap();
        for (i, key) in keys.iter().enumerate() {
            cache.save(Entry::new(key.as_str(), i as u64).unwrap()).unwrap();
        }
        b.iter(|| {
            for key in &keys {
                black_box(cache.get_value(key).unwrap());
            }
        })
    });

    group.bench_function("sliding_and_dependency", |b| {
        let signal = ManualDependency::new();
        let mut cache = CacheBuilder::new(ENTRIES as isize).build::<u64>().unwrap();
        for (i, key) in keys.iter().enumerate() {
            let mut entry = Entry::new(key.as_str(), i as u64).unwrap();
            entry.set_sliding_expiration(Duration::from_secs(3600));
            entry.add_dependency(signal.clone());
            cache.save(entry).unwrap();
        }
        b.iter(|| {
            for key in &keys {
                black_box(cache.get_value(key).unwrap());
            }
        })
    });

    group.bench_function("concurrent_handle", |b| {
        let mut cache = CacheBuilder::new(ENTRIES as isize)
            .build_concurrent::<u64>()
            .unwrap();
        for (i, key) in keys.iter().enumerate() {
            cache.save(Entry::new(key.as_str(), i as u64).unwrap()).unwrap();
        }
        b.iter(|| {
            for key in &keys {
                black_box(cache.get_value(key).unwrap());
            }
        })
    });
    group.finish();
}

fn bench_two_tier_fallthrough(c: &mut Criterion) {
    let mut group = c.benchmark_group("two_tier");
    group.throughput(Throughput::Elements(ENTRIES));

    group.bench_function("fallthrough_and_refill", |b| {
        b.iter_batched(
            || {
                let mut cache = CacheBuilder::new(64)
                    .strategy(StrategyKind::Lru)
                    .tier(StrategyKind::Fifo, 0)
                    .build::<u64>()
                    .unwrap();
                for i in 0..ENTRIES {
                    cache.save(Entry::new(format!("key:{i}"), i).unwrap()).unwrap();
                }
                cache
            },
            |mut cache| {
                for i in 0..ENTRIES {
                    black_box(cache.get_value(&format!("key:{i}")).unwrap());
                }
                cache
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_get_hit, bench_two_tier_fallthrough);
criterion_main!(benches);
