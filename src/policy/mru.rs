//! MRU (Most Recently Used) replacement strategy.
//!
//! The opposite of LRU: when the storage is full, the entry saved most
//! recently is the one evicted. Useful for cyclic scans, where the entry just
//! written is the one least likely to be read again before the cycle repeats.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          MruStorage<V>                              │
//! │                                                                     │
//! │   KeyedList<String, V>                                              │
//! │                                                                     │
//! │   head (MRU, EVICT HERE)                        tail (LRU, keep)    │
//! │     [k3] ◄──► [k2] ◄──► [k1]                                        │
//! │     newest               oldest                                     │
//! │                                                                     │
//! │   • Saves move or insert at head                                    │
//! │   • Reads leave the order alone                                     │
//! │   • Overflow pops the head before the new key is inserted           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use tiercache::policy::mru::MruStorage;
//! use tiercache::storage::Storage;
//!
//! let mut mru = MruStorage::new(2);
//! mru.save("a", 1).unwrap();
//! mru.save("b", 2).unwrap();
//! mru.save("c", 3).unwrap();
//!
//! assert!(mru.contains("a"));
//! assert!(!mru.contains("b"));
//! assert!(mru.contains("c"));
//! ```

use std::fmt;

use tracing::trace;

use crate::ds::KeyedList;
use crate::error::StorageError;
use crate::policy::{at_capacity, capacity_from_signed, preallocation};
use crate::registry::{StrategyKind, StrategyRegistry};
use crate::storage::{BoxedStorage, Storage};

/// Storage that evicts the most recently saved entry.
pub struct MruStorage<V> {
    entries: KeyedList<String, V>,
    capacity: usize,
}

impl<V> MruStorage<V> {
    /// Creates an MRU storage holding at most `capacity` entries (0 = unbounded).
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: KeyedList::with_capacity(preallocation(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    /// Key of the most recently saved entry, next in line for eviction.
    pub fn peek_mru(&self) -> Option<&str> {
        self.entries.front().map(|(key, _)| key.as_str())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.entries.debug_validate_invariants();
        if self.capacity > 0 {
            assert!(
                self.entries.len() <= self.capacity,
                "len({}) > capacity({})",
                self.entries.len(),
                self.capacity
            );
        }
    }
}

impl<V> fmt::Debug for MruStorage<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MruStorage")
            .field("len", &self.entries.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl<V: Clone> Storage<V> for MruStorage<V> {
    fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }

    fn save(&mut self, key: &str, value: V) -> Result<(), StorageError> {
        if !self.entries.contains(key)
            && at_capacity(self.entries.len(), self.capacity)
            && let Some((evicted, _)) = self.entries.pop_front()
        {
            trace!(key = %evicted, capacity = self.capacity, "mru: evicted most recently used entry");
        }
        self.entries.push_front(key.to_owned(), value);
        Ok(())
    }

    fn get(&mut self, key: &str) -> Result<Option<V>, StorageError> {
        self.peek(key)
    }

    fn peek(&self, key: &str) -> Result<Option<V>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn reads_mutate(&self) -> bool {
        false
    }
}

fn construct<V: Clone + Send + Sync + 'static>(capacity: isize) -> BoxedStorage<V> {
    Box::new(MruStorage::new(capacity_from_signed(capacity)))
}

/// Registers MRU under [`StrategyKind::Mru`].
pub fn register<V: Clone + Send + Sync + 'static>(registry: &mut StrategyRegistry<V>) {
    registry.register(StrategyKind::Mru, construct::<V>);
}
