//! LFU (Least Frequently Used) replacement strategy.
//!
//! Every entry carries an access count. Reads bump it; overwrites keep it;
//! overflow evicts the entry with the lowest count.
//!
//! ## Architecture
//!
//! ```text
//!   ┌────────────────────────────────────────────────────────────────────┐
//!   │                         LfuStorage<V>                              │
//!   │                                                                    │
//!   │   IndexedMinHeap<String, V>                                        │
//!   │                                                                    │
//!   │                 ("b", count 0)   ◄── evicted first                 │
//!   │                 /            \                                     │
//!   │     ("a", count 2)          ("c", count 1)                         │
//!   │                                                                    │
//!   │   positions: "a" → 1, "b" → 0, "c" → 2                             │
//!   └────────────────────────────────────────────────────────────────────┘
//!
//!   save(new key, full):  pop_min, then push with count 0
//!   save(existing key):   value replaced, count kept
//!   get(hit):             count += 1, sift down
//! ```
//!
//! ## Ties
//!
//! Entries with equal counts are evicted in heap order, which depends on the
//! history of sifts. No particular order among equals is guaranteed.
//!
//! ## Example
//!
//! ```
//! use tiercache::policy::lfu::LfuStorage;
//! use tiercache::storage::Storage;
//!
//! let mut lfu = LfuStorage::new(2);
//! lfu.save("a", 1).unwrap();
//! lfu.save("b", 2).unwrap();
//! lfu.get("a").unwrap();
//! lfu.get("a").unwrap();
//! lfu.save("c", 3).unwrap();
//!
//! assert!(lfu.contains("a"));
//! assert!(!lfu.contains("b"));
//! assert_eq!(lfu.frequency("a"), Some(2));
//! ```

use std::fmt;

use tracing::trace;

use crate::ds::IndexedMinHeap;
use crate::error::StorageError;
use crate::policy::{at_capacity, capacity_from_signed, preallocation};
use crate::registry::{StrategyKind, StrategyRegistry};
use crate::storage::{BoxedStorage, Storage};

/// Access-count ordered storage that evicts the least frequently read entry.
pub struct LfuStorage<V> {
    heap: IndexedMinHeap<String, V>,
    capacity: usize,
}

impl<V> LfuStorage<V> {
    /// Creates an LFU storage holding at most `capacity` entries (0 = unbounded).
    pub fn new(capacity: usize) -> Self {
        Self {
            heap: IndexedMinHeap::with_capacity(preallocation(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.heap.contains(key)
    }

    /// Number of reads served for `key` since it was first saved.
    pub fn frequency(&self, key: &str) -> Option<u64> {
        self.heap.count(key)
    }

    /// Key with the lowest access count, next in line for eviction.
    pub fn peek_lfu(&self) -> Option<(&str, u64)> {
        self.heap
            .peek_min()
            .map(|(key, _, count)| (key.as_str(), count))
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.heap.debug_validate_invariants();
        if self.capacity > 0 {
            assert!(
                self.heap.len() <= self.capacity,
                "len({}) > capacity({})",
                self.heap.len(),
                self.capacity
            );
        }
    }
}

impl<V> fmt::Debug for LfuStorage<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuStorage")
            .field("len", &self.heap.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl<V: Clone> Storage<V> for LfuStorage<V> {
    fn clear(&mut self) -> Result<(), StorageError> {
        self.heap.clear();
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.heap.remove(key);
        Ok(())
    }

    fn save(&mut self, key: &str, value: V) -> Result<(), StorageError> {
        if !self.heap.contains(key)
            && at_capacity(self.heap.len(), self.capacity)
            && let Some((evicted, _, count)) = self.heap.pop_min()
        {
            trace!(key = %evicted, count, capacity = self.capacity, "lfu: evicted least frequently used entry");
        }
        self.heap.push(key.to_owned(), value);
        Ok(())
    }

    fn get(&mut self, key: &str) -> Result<Option<V>, StorageError> {
        Ok(self.heap.increment(key).cloned())
    }

    fn peek(&self, key: &str) -> Result<Option<V>, StorageError> {
        Ok(self.heap.get(key).cloned())
    }
}

fn construct<V: Clone + Send + Sync + 'static>(capacity: isize) -> BoxedStorage<V> {
    Box::new(LfuStorage::new(capacity_from_signed(capacity)))
}

/// Registers LFU under [`StrategyKind::Lfu`].
pub fn register<V: Clone + Send + Sync + 'static>(registry: &mut StrategyRegistry<V>) {
    registry.register(StrategyKind::Lfu, construct::<V>);
}
