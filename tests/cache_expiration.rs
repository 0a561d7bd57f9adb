//! Expiration handling through the cache façade.

use std::fs::File;
use std::io::Write;
use std::thread;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use tiercache::prelude::*;

fn lru_cache() -> Cache<String> {
    CacheBuilder::new(16).build().unwrap()
}

fn entry(key: &str, value: &str) -> Entry<String> {
    Entry::new(key, value.to_string()).unwrap()
}

#[test]
fn entry_without_policy_never_expires() {
    let mut cache = lru_cache();
    cache.save(entry("a", "alpha")).unwrap();
    thread::sleep(Duration::from_millis(10));
    assert_eq!(cache.get_value("a").unwrap().as_deref(), Some("alpha"));
}

#[test]
fn absolute_deadline_in_future_is_served() {
    let mut cache = lru_cache();
    let mut e = entry("a", "alpha");
    e.set_absolute_expiration(Utc::now() + TimeDelta::hours(1));
    cache.save(e).unwrap();
    assert!(cache.get("a").unwrap().is_some());
}

#[test]
fn absolute_deadline_passes() {
    let mut cache = lru_cache();
    let mut e = entry("a", "alpha");
    e.set_absolute_expiration(Utc::now() + TimeDelta::milliseconds(30));
    cache.save(e).unwrap();

    assert!(cache.get("a").unwrap().is_some());
    thread::sleep(Duration::from_millis(80));
    assert!(cache.get("a").unwrap().is_none());
}

#[test]
fn sliding_window_is_refreshed_by_reads() {
    let mut cache = lru_cache();
    let mut e = entry("a", "alpha");
    e.set_sliding_expiration(Duration::from_millis(300));
    cache.save(e).unwrap();

    for _ in 0..4 {
        thread::sleep(Duration::from_millis(50));
        assert!(cache.get("a").unwrap().is_some());
    }
    thread::sleep(Duration::from_millis(700));
    assert!(cache.get("a").unwrap().is_none());
}

#[test]
fn expired_entry_is_removed_from_every_tier() {
    let mut cache: Cache<String> = CacheBuilder::new(4)
        .tier(StrategyKind::Fifo, 16)
        .build()
        .unwrap();
    let signal = ManualDependency::new();
    let mut e = entry("a", "alpha");
    e.add_dependency(signal.clone());
    cache.save(e).unwrap();

    signal.trigger();
    assert!(cache.get("a").unwrap().is_none());
    assert!(cache.storage().peek("a").unwrap().is_none());
}

#[test]
fn manual_dependency_shared_by_many_entries() {
    let mut cache = lru_cache();
    let config_changed = ManualDependency::new();
    for key in ["a", "b", "c"] {
        let mut e = entry(key, key);
        e.add_dependency(config_changed.clone());
        cache.save(e).unwrap();
    }
    cache.save(entry("independent", "x")).unwrap();

    config_changed.trigger();
    for key in ["a", "b", "c"] {
        assert!(cache.get(key).unwrap().is_none(), "{key}");
    }
    assert!(cache.get("independent").unwrap().is_some());
}

#[test]
fn file_dependency_expires_on_modification() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("routes.json");
    File::create(&path).unwrap().write_all(b"{}").unwrap();

    let mut cache = lru_cache();
    let dependency = FileDependency::new(&path);
    let recorded = dependency.last_modified();
    let mut e = entry("routes", "{}");
    e.add_dependency(dependency);
    cache.save(e).unwrap();
    assert!(cache.get("routes").unwrap().is_some());

    let file = File::options().write(true).open(&path).unwrap();
    file.set_modified(recorded + Duration::from_secs(5)).unwrap();
    assert!(cache.get("routes").unwrap().is_none());
}

#[test]
fn file_dependency_expires_when_file_is_deleted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("routes.json");
    File::create(&path).unwrap().write_all(b"{}").unwrap();

    let mut cache = lru_cache();
    let mut e = entry("routes", "{}");
    e.add_dependency(FileDependency::new(&path));
    cache.save(e).unwrap();

    std::fs::remove_file(&path).unwrap();
    assert!(cache.get("routes").unwrap().is_none());
}

#[test]
fn resaving_replaces_policy() {
    let mut cache = lru_cache();
    let mut e = entry("a", "old");
    e.set_absolute_expiration(Utc::now() - TimeDelta::seconds(1));
    cache.save(e).unwrap();
    cache.save(entry("a", "new")).unwrap();
    assert_eq!(cache.get_value("a").unwrap().as_deref(), Some("new"));
}

#[test]
fn remove_then_get_misses() {
    let mut cache = lru_cache();
    cache.remove("never-saved").unwrap();
    cache.save(entry("a", "alpha")).unwrap();
    cache.remove("a").unwrap();
    assert!(cache.get("a").unwrap().is_none());
}
