//! Thread-safe storage wrapper.
//!
//! [`ConcurrentStorage`] puts any [`Storage`] behind an
//! `Arc<parking_lot::RwLock<_>>`. Clones share the same storage, so one
//! handle per thread is the intended use.
//!
//! ## Locking
//!
//! ```text
//!   ┌────────────────────────────────────────────────────────────────────┐
//!   │                     ConcurrentStorage<S>                           │
//!   │                                                                    │
//!   │   Arc<RwLock<S>>                                                   │
//!   │                                                                    │
//!   │   clear / remove / save ──────────────► write lock                 │
//!   │                                                                    │
//!   │   get ──► S::reads_mutate()?                                       │
//!   │             false (FIFO, MRU) ────────► read lock  + S::peek       │
//!   │             true  (LRU, LFU, ARC) ────► write lock + S::get        │
//!   │                                                                    │
//!   │   peek ───────────────────────────────► read lock  + S::peek       │
//!   └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Strategies whose reads update recency or frequency cannot run those
//! updates under a shared guard, so their reads are serialized with writes.
//! Reads against strategies that never reorder proceed in parallel.
//!
//! Each call is atomic on its own. Sequences of calls are not: the
//! [`Cache`](crate::cache::Cache) read path (`get`, expiry check, then `save`
//! or `remove`) locks separately for each step. A `remove` or `save` from
//! another handle that lands in between can be overwritten by the write-back,
//! which may restore a removed entry or put an older copy over a newer one.
//!
//! ## Example
//!
//! ```
//! use std::thread;
//!
//! use tiercache::concurrent::ConcurrentStorage;
//! use tiercache::policy::fifo::FifoStorage;
//!
//! let storage = ConcurrentStorage::new(FifoStorage::<u64>::new(0));
//! let handles: Vec<_> = (0..4u64)
//!     .map(|t| {
//!         let storage = storage.clone();
//!         thread::spawn(move || storage.save(&format!("t{t}"), t).unwrap())
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! assert_eq!(storage.get("t3").unwrap(), Some(3));
//! assert_eq!(storage.read().len(), 4);
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::StorageError;
use crate::storage::Storage;

/// Shared, lock-protected storage.
pub struct ConcurrentStorage<S> {
    inner: Arc<RwLock<S>>,
}

impl<S> ConcurrentStorage<S> {
    pub fn new(storage: S) -> Self {
        Self {
            inner: Arc::new(RwLock::new(storage)),
        }
    }

    /// Locks the wrapped storage for inspection.
    pub fn read(&self) -> RwLockReadGuard<'_, S> {
        self.inner.read()
    }

    /// Locks the wrapped storage exclusively.
    pub fn write(&self) -> RwLockWriteGuard<'_, S> {
        self.inner.write()
    }

    /// Number of handles sharing this storage.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Returns the wrapped storage if this is the last handle.
    pub fn try_into_inner(self) -> Result<S, Self> {
        Arc::try_unwrap(self.inner)
            .map(RwLock::into_inner)
            .map_err(|inner| Self { inner })
    }

    pub fn clear<V>(&self) -> Result<(), StorageError>
    where
        S: Storage<V>,
    {
        self.inner.write().clear()
    }

    pub fn remove<V>(&self, key: &str) -> Result<(), StorageError>
    where
        S: Storage<V>,
    {
        self.inner.write().remove(key)
    }

    pub fn save<V>(&self, key: &str, value: V) -> Result<(), StorageError>
    where
        S: Storage<V>,
    {
        self.inner.write().save(key, value)
    }

    /// Looks up `key`, taking the exclusive lock only if the wrapped storage
    /// updates bookkeeping on reads.
    pub fn get<V>(&self, key: &str) -> Result<Option<V>, StorageError>
    where
        S: Storage<V>,
    {
        {
            let guard = self.inner.read();
            if !guard.reads_mutate() {
                return guard.peek(key);
            }
        }
        self.inner.write().get(key)
    }

    pub fn peek<V>(&self, key: &str) -> Result<Option<V>, StorageError>
    where
        S: Storage<V>,
    {
        self.inner.read().peek(key)
    }
}

impl<S> Clone for ConcurrentStorage<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for ConcurrentStorage<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_read() {
            Some(storage) => f
                .debug_struct("ConcurrentStorage")
                .field("storage", &*storage)
                .finish(),
            None => f
                .debug_struct("ConcurrentStorage")
                .finish_non_exhaustive(),
        }
    }
}

impl<V, S> Storage<V> for ConcurrentStorage<S>
where
    S: Storage<V>,
{
    fn clear(&mut self) -> Result<(), StorageError> {
        ConcurrentStorage::<S>::clear::<V>(self)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        ConcurrentStorage::<S>::remove::<V>(self, key)
    }

    fn save(&mut self, key: &str, value: V) -> Result<(), StorageError> {
        ConcurrentStorage::<S>::save::<V>(self, key, value)
    }

    fn get(&mut self, key: &str) -> Result<Option<V>, StorageError> {
        ConcurrentStorage::<S>::get::<V>(self, key)
    }

    fn peek(&self, key: &str) -> Result<Option<V>, StorageError> {
        ConcurrentStorage::<S>::peek::<V>(self, key)
    }

    fn reads_mutate(&self) -> bool {
        self.inner.read().reads_mutate()
    }
}
