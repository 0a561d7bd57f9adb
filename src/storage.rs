//! # Storage Contract
//!
//! Every backing strategy, the concurrency wrapper and the multilevel composer
//! implement [`Storage`]. The [`Cache`](crate::cache::Cache) façade depends on
//! nothing else, so an out-of-process backend only has to satisfy these
//! operations to get the façade's expiration semantics for free.
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                          Storage<V>                              │
//!   │                                                                  │
//!   │  clear(&mut)            → Result<()>                             │
//!   │  remove(&mut, &str)     → Result<()>          missing key = Ok   │
//!   │  save(&mut, &str, V)    → Result<()>          insert or update   │
//!   │  get(&mut, &str)        → Result<Option<V>>   miss = None        │
//!   │  peek(&, &str)          → Result<Option<V>>   no bookkeeping     │
//!   │  reads_mutate(&)        → bool                                   │
//!   └──────────────────────────────────────────────────────────────────┘
//!          ▲                     ▲                      ▲
//!          │                     │                      │
//!   policy::* strategies   ConcurrentStorage   MultiLevelStorage / remote backends
//! ```
//!
//! ## `get` vs `peek`
//!
//! `get` is the lookup the façade uses: strategies may update eviction
//! metadata (LRU recency, LFU counts, ARC list promotion). `peek` returns the
//! same value without touching that metadata. Strategies whose `get` never
//! mutates (FIFO, MRU) report [`reads_mutate`](Storage::reads_mutate) as
//! `false`, which lets [`ConcurrentStorage`](crate::concurrent::ConcurrentStorage)
//! serve their reads under a shared lock.
//!
//! ## Errors
//!
//! Only genuine failures (I/O, connection) are errors. A missing key is
//! `Ok(None)` from `get`/`peek` and `Ok(())` from `remove`. The in-memory
//! strategies never fail.
//!
//! ## Example
//!
//! ```
//! use tiercache::policy::lru::LruStorage;
//! use tiercache::storage::Storage;
//!
//! fn warm<S: Storage<u32>>(storage: &mut S, data: &[(&str, u32)]) {
//!     for (key, value) in data {
//!         storage.save(key, *value).unwrap();
//!     }
//! }
//!
//! let mut storage = LruStorage::new(10);
//! warm(&mut storage, &[("a", 1), ("b", 2)]);
//! assert_eq!(storage.get("a").unwrap(), Some(1));
//! assert_eq!(storage.get("zzz").unwrap(), None);
//! ```

use std::fmt;

use crate::error::StorageError;

/// Key-addressed storage consumed by the cache façade.
///
/// Implementations must be printable so that wrappers holding them, such as
/// [`Cache`](crate::cache::Cache), stay `Debug` even when type-erased.
pub trait Storage<V>: fmt::Debug {
    /// Removes every stored value.
    fn clear(&mut self) -> Result<(), StorageError>;

    /// Removes the value stored under `key`; a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;

    /// Inserts or overwrites the value stored under `key`.
    fn save(&mut self, key: &str, value: V) -> Result<(), StorageError>;

    /// Looks up `key`, updating eviction metadata where the strategy tracks reads.
    fn get(&mut self, key: &str) -> Result<Option<V>, StorageError>;

    /// Looks up `key` without updating eviction metadata.
    fn peek(&self, key: &str) -> Result<Option<V>, StorageError>;

    /// Reports whether [`get`](Self::get) mutates internal state.
    ///
    /// When `false`, `get` and `peek` are interchangeable.
    fn reads_mutate(&self) -> bool {
        true
    }
}

/// Type-erased storage, as produced by the
/// [`StrategyRegistry`](crate::registry::StrategyRegistry).
pub type BoxedStorage<V> = Box<dyn Storage<V> + Send + Sync>;

impl<V, S> Storage<V> for Box<S>
where
    S: Storage<V> + ?Sized,
{
    fn clear(&mut self) -> Result<(), StorageError> {
        (**self).clear()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn save(&mut self, key: &str, value: V) -> Result<(), StorageError> {
        (**self).save(key, value)
    }

    fn get(&mut self, key: &str) -> Result<Option<V>, StorageError> {
        (**self).get(key)
    }

    fn peek(&self, key: &str) -> Result<Option<V>, StorageError> {
        (**self).peek(key)
    }

    fn reads_mutate(&self) -> bool {
        (**self).reads_mutate()
    }
}
