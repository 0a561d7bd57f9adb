//! Shared caches across threads.

use std::sync::{Arc, Barrier};
use std::thread;

use tiercache::prelude::*;

const THREADS: usize = 8;
const PER_THREAD: u64 = 200;

fn entry(key: String, value: u64) -> Entry<u64> {
    Entry::new(key, value).unwrap()
}

#[test]
fn cloned_caches_see_each_others_writes() {
    let cache = CacheBuilder::new(0).build_concurrent::<u64>().unwrap();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let mut cache = cache.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..PER_THREAD {
                    cache.save(entry(format!("{t}:{i}"), i)).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let mut reader = cache.clone();
    for t in 0..THREADS {
        for i in 0..PER_THREAD {
            assert_eq!(reader.get_value(&format!("{t}:{i}")).unwrap(), Some(i));
        }
    }
}

#[test]
fn bounded_strategies_stay_within_capacity_under_contention() {
    const CAPACITY: isize = 64;

    for kind in StrategyKind::ALL {
        let cache = CacheBuilder::new(CAPACITY)
            .strategy(kind)
            .build_concurrent::<u64>()
            .unwrap();
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let mut cache = cache.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    for i in 0..PER_THREAD {
                        let key = format!("k{}", (t as u64 * 31 + i) % 150);
                        if i % 3 == 0 {
                            cache.get(&key).unwrap();
                        } else {
                            cache.save(entry(key, i)).unwrap();
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let storage = cache.storage();
        let resident = (0..150)
            .filter(|k| {
                storage
                    .read()
                    .peek(&format!("k{k}"))
                    .unwrap()
                    .is_some()
            })
            .count();
        // ARC's peek also answers from its ghost lists.
        if kind != StrategyKind::Arc {
            assert!(resident <= CAPACITY as usize, "{kind}: {resident}");
        }
    }
}

#[test]
fn readers_and_writers_interleave() {
    let cache = CacheBuilder::new(128)
        .strategy(StrategyKind::Fifo)
        .build_concurrent::<u64>()
        .unwrap();
    let mut seed = cache.clone();
    for i in 0..32u64 {
        seed.save(entry(format!("warm{i}"), i)).unwrap();
    }

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let mut cache = cache.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..PER_THREAD {
                    if t % 2 == 0 {
                        let key = format!("warm{}", i % 32);
                        let value = cache.get_value(&key).unwrap();
                        assert!(value.is_none_or(|v| v == i % 32));
                    } else {
                        cache.save(entry(format!("w{t}:{i}"), i)).unwrap();
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(cache.storage().handle_count(), 2);
}
