//! Cache façade.
//!
//! [`Cache`] wraps any [`Storage`] of [`Entry`] values and layers expiration
//! on top of it. Storages only store; the façade decides freshness on every
//! read.
//!
//! ## Read path
//!
//! ```text
//!   get(key)
//!     │
//!     ├─ key empty ───────────────────────────► Err(EmptyKey)
//!     │
//!     ├─ storage.get(key) ── Err ─────────────► Err(Get { key })
//!     │        │
//!     │        └─ None ───────────────────────► Ok(None)
//!     │
//!     ├─ entry.has_expired()
//!     │        └─ yes ─► storage.remove(key) ─► Ok(None)      (Err → RemoveExpired)
//!     │
//!     └─ touch accessed_at ─► storage.save(key, entry) ─► Ok(Some(entry))
//!                                                            (Err → Touch)
//! ```
//!
//! The write-back refreshes the sliding window in the storage's copy. For
//! strategies that track saves (LRU, MRU, ARC) it also counts as a save. On
//! ARC the re-saved entry goes back into T1 through the normal replacement
//! step, so on a full storage a hit demotes another resident entry to a ghost
//! list.
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//!
//! use tiercache::cache::Cache;
//! use tiercache::entry::Entry;
//! use tiercache::policy::lru::LruStorage;
//!
//! let mut cache = Cache::new(LruStorage::new(100));
//!
//! let mut entry = Entry::new("user:7", "Ada".to_string()).unwrap();
//! entry.set_sliding_expiration(Duration::from_secs(60));
//! cache.save(entry).unwrap();
//!
//! let hit = cache.get("user:7").unwrap().unwrap();
//! assert_eq!(hit.value(), "Ada");
//! assert!(hit.accessed_at().is_some());
//! assert!(cache.get("user:8").unwrap().is_none());
//! ```

use std::fmt;
use std::marker::PhantomData;

use tracing::debug;

use crate::entry::Entry;
use crate::error::CacheError;
use crate::storage::{BoxedStorage, Storage};

/// Expiration-aware front end over a storage of entries.
pub struct Cache<V, S = BoxedStorage<Entry<V>>> {
    storage: S,
    _payload: PhantomData<fn() -> V>,
}

impl<V, S> Cache<V, S>
where
    S: Storage<Entry<V>>,
{
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            _payload: PhantomData,
        }
    }

    /// Removes every entry.
    pub fn clear(&mut self) -> Result<(), CacheError> {
        self.storage.clear().map_err(CacheError::Clear)
    }

    /// Removes the entry stored under `key`; a missing key is not an error.
    pub fn remove(&mut self, key: &str) -> Result<(), CacheError> {
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }
        self.storage
            .remove(key)
            .map_err(|source| CacheError::Remove {
                key: key.to_owned(),
                source,
            })
    }

    /// Stores `entry` under its own key, replacing any previous entry.
    pub fn save(&mut self, entry: Entry<V>) -> Result<(), CacheError> {
        let key = entry.key().to_owned();
        self.storage
            .save(&key, entry)
            .map_err(|source| CacheError::Save { key, source })
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}

impl<V, S> Cache<V, S>
where
    V: Clone,
    S: Storage<Entry<V>>,
{
    /// Returns the live entry stored under `key`.
    ///
    /// An expired entry is removed from storage and reported as a miss. A
    /// live entry has its access time bumped and is written back before
    /// being returned.
    pub fn get(&mut self, key: &str) -> Result<Option<Entry<V>>, CacheError> {
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }

        let found = self.storage.get(key).map_err(|source| CacheError::Get {
            key: key.to_owned(),
            source,
        })?;
        let Some(mut entry) = found else {
            return Ok(None);
        };

        if entry.has_expired() {
            debug!(key, "cache: removing expired entry");
            self.storage
                .remove(key)
                .map_err(|source| CacheError::RemoveExpired {
                    key: key.to_owned(),
                    source,
                })?;
            return Ok(None);
        }

        entry.touch();
        self.storage
            .save(key, entry.clone())
            .map_err(|source| CacheError::Touch {
                key: key.to_owned(),
                source,
            })?;
        Ok(Some(entry))
    }

    /// Like [`get`](Self::get), but returns only the payload.
    pub fn get_value(&mut self, key: &str) -> Result<Option<V>, CacheError> {
        Ok(self.get(key)?.map(Entry::into_value))
    }
}

impl<V, S: Clone> Clone for Cache<V, S> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            _payload: PhantomData,
        }
    }
}

impl<V, S: fmt::Debug> fmt::Debug for Cache<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("storage", &self.storage)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;
    use std::time::Duration;

    use chrono::{TimeDelta, Utc};

    use super::*;
    use crate::dependency::ManualDependency;
    use crate::policy::arc::{ArcList, ArcStorage};
    use crate::policy::fifo::FifoStorage;
    use crate::policy::lru::LruStorage;
    use crate::storage::testing::{FailOn, FailingStorage};

    fn entry(key: &str, value: u32) -> Entry<u32> {
        Entry::new(key, value).unwrap()
    }

    mod basic_operations {
        use super::*;

        #[test]
        fn save_then_get() {
            let mut cache = Cache::new(LruStorage::new(10));
            cache.save(entry("a", 1)).unwrap();

            let hit = cache.get("a").unwrap().unwrap();
            assert_eq!(hit.key(), "a");
            assert_eq!(*hit.value(), 1);
            assert_eq!(cache.get_value("a").unwrap(), Some(1));
        }

        #[test]
        fn save_twice_overwrites() {
            let mut cache = Cache::new(FifoStorage::new(10));
            cache.save(entry("a", 1)).unwrap();
            cache.save(entry("a", 2)).unwrap();
            assert_eq!(cache.get_value("a").unwrap(), Some(2));
            assert_eq!(cache.storage().len(), 1);
        }

        #[test]
        fn miss_is_none() {
            let mut cache: Cache<u32, _> = Cache::new(LruStorage::new(10));
            assert!(cache.get("missing").unwrap().is_none());
        }

        #[test]
        fn remove_missing_key_is_ok() {
            let mut cache: Cache<u32, _> = Cache::new(LruStorage::new(10));
            cache.remove("missing").unwrap();
            cache.save(entry("a", 1)).unwrap();
            cache.remove("a").unwrap();
            assert!(cache.get("a").unwrap().is_none());
        }

        #[test]
        fn clear_drops_everything() {
            let mut cache = Cache::new(LruStorage::new(10));
            cache.save(entry("a", 1)).unwrap();
            cache.save(entry("b", 2)).unwrap();
            cache.clear().unwrap();
            assert!(cache.storage().is_empty());
        }

        #[test]
        fn empty_keys_are_rejected() {
            let mut cache: Cache<u32, _> = Cache::new(LruStorage::new(10));
            assert!(matches!(cache.get(""), Err(CacheError::EmptyKey)));
            assert!(matches!(cache.remove(""), Err(CacheError::EmptyKey)));
        }

        #[test]
        fn boxed_storage_is_the_default() {
            let storage: BoxedStorage<Entry<u32>> = Box::new(LruStorage::new(2));
            let mut cache: Cache<u32> = Cache::new(storage);
            cache.save(entry("a", 1)).unwrap();
            assert_eq!(cache.get_value("a").unwrap(), Some(1));
        }

        #[test]
        fn type_erased_cache_is_debug() {
            let storage: BoxedStorage<Entry<u32>> = Box::new(LruStorage::new(2));
            let mut cache: Cache<u32> = Cache::new(storage);
            cache.save(entry("a", 1)).unwrap();
            let printed = format!("{cache:?}");
            assert!(printed.contains("LruStorage"), "{printed}");
            assert!(printed.contains("len: 1"), "{printed}");
        }
    }

    mod expiration {
        use super::*;

        #[test]
        fn get_bumps_accessed_at_in_storage() {
            let mut cache = Cache::new(LruStorage::new(10));
            cache.save(entry("a", 1)).unwrap();
            assert!(cache.storage().peek("a").unwrap().unwrap().accessed_at().is_none());

            let hit = cache.get("a").unwrap().unwrap();
            let stored = cache.storage().peek("a").unwrap().unwrap();
            assert_eq!(stored.accessed_at(), hit.accessed_at());
            assert!(stored.accessed_at().is_some());
        }

        #[test]
        fn absolute_deadline_in_past_is_removed() {
            let mut cache = Cache::new(LruStorage::new(10));
            let mut e = entry("a", 1);
            e.set_absolute_expiration(Utc::now() - TimeDelta::seconds(1));
            cache.save(e).unwrap();

            assert!(cache.get("a").unwrap().is_none());
            assert!(!cache.storage().contains("a"));
        }

        #[test]
        fn sliding_window_lapses() {
            let mut cache = Cache::new(LruStorage::new(10));
            let mut e = entry("a", 1);
            e.set_sliding_expiration(Duration::from_millis(20));
            cache.save(e).unwrap();

            assert!(cache.get("a").unwrap().is_some());
            std::thread::sleep(Duration::from_millis(60));
            assert!(cache.get("a").unwrap().is_none());
            assert!(!cache.storage().contains("a"));
        }

        #[test]
        fn changed_dependency_expires_entry() {
            let signal = ManualDependency::new();
            let mut cache = Cache::new(LruStorage::new(10));
            let mut e = entry("a", 1);
            e.add_dependency(signal.clone());
            cache.save(e).unwrap();

            assert!(cache.get("a").unwrap().is_some());
            signal.trigger();
            assert!(cache.get("a").unwrap().is_none());
        }
    }

    mod write_back {
        use super::*;

        #[test]
        fn arc_hit_demotes_another_resident() {
            let mut cache = Cache::new(ArcStorage::new(2));
            for key in ["x", "y", "z"] {
                cache.save(entry(key, 0)).unwrap();
            }
            // T2 = [y], then w pushes z into B1.
            cache.storage_mut().get("y").unwrap();
            cache.save(entry("w", 1)).unwrap();
            assert!(cache.storage().contains("w"));
            assert!(cache.storage().contains("y"));

            assert_eq!(cache.get_value("w").unwrap(), Some(1));

            let arc = cache.storage();
            assert_eq!(arc.residency("w"), Some(ArcList::T1));
            assert_eq!(arc.residency("y"), Some(ArcList::B2));
            assert_eq!(arc.residency("z"), Some(ArcList::B1));
            assert_eq!(arc.len(), 1);
            arc.debug_validate_invariants();
        }

        #[test]
        fn write_back_refills_earlier_tier_after_fall_through() {
            let storage = crate::multilevel::MultiLevelStorage::new(vec![
                Box::new(LruStorage::<Entry<u32>>::new(1)) as BoxedStorage<Entry<u32>>,
                Box::new(FifoStorage::<Entry<u32>>::new(10)),
            ])
            .unwrap();
            let mut cache = Cache::new(storage);
            cache.save(entry("a", 1)).unwrap();
            cache.save(entry("b", 2)).unwrap();
            assert!(cache.storage().tier(0).unwrap().peek("a").unwrap().is_none());

            cache.get("a").unwrap();
            assert!(cache.storage().tier(0).unwrap().peek("a").unwrap().is_some());
        }
    }

    mod storage_failures {
        use super::*;

        fn failing(op: FailOn) -> Cache<u32, FailingStorage<Entry<u32>>> {
            let mut storage = FailingStorage::default();
            storage.values.insert("a".to_string(), entry("a", 1));
            storage.fail_on = Some(op);
            Cache::new(storage)
        }

        #[test]
        fn clear_failure_is_wrapped() {
            let err = failing(FailOn::Clear).clear().unwrap_err();
            assert!(matches!(err, CacheError::Clear(_)));
            assert!(err.source().is_some());
        }

        #[test]
        fn remove_failure_carries_key() {
            let err = failing(FailOn::Remove).remove("a").unwrap_err();
            assert!(matches!(err, CacheError::Remove { .. }));
            assert_eq!(err.key(), Some("a"));
        }

        #[test]
        fn save_failure_carries_key() {
            let err = failing(FailOn::Save).save(entry("b", 2)).unwrap_err();
            assert!(matches!(err, CacheError::Save { .. }));
            assert_eq!(err.key(), Some("b"));
        }

        #[test]
        fn get_failure_is_wrapped() {
            let err = failing(FailOn::Get).get("a").unwrap_err();
            assert!(matches!(err, CacheError::Get { .. }));
        }

        #[test]
        fn write_back_failure_is_touch() {
            let err = failing(FailOn::Save).get("a").unwrap_err();
            assert!(matches!(err, CacheError::Touch { .. }));
        }

        #[test]
        fn expired_removal_failure_is_remove_expired() {
            let mut cache = failing(FailOn::Remove);
            let signal = ManualDependency::new();
            if let Some(stored) = cache.storage_mut().values.get_mut("a") {
                stored.add_dependency(signal.clone());
            }
            signal.trigger();

            let err = cache.get("a").unwrap_err();
            assert!(matches!(err, CacheError::RemoveExpired { .. }));
        }

        #[test]
        fn validation_happens_before_storage() {
            let mut cache = failing(FailOn::Get);
            assert!(matches!(cache.get(""), Err(CacheError::EmptyKey)));
            assert_eq!(cache.storage().calls, 0);
        }
    }
}
