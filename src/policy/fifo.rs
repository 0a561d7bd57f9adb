//! FIFO (First In, First Out) replacement strategy.
//!
//! Entries are kept in insertion order. Overwriting a key updates its value
//! where it stands, and reads never reorder, so the entry evicted on overflow
//! is always the one inserted longest ago.
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────────────────────────────────────────────────────────────┐
//!   │                        FifoStorage<V>                               │
//!   │                                                                     │
//!   │   KeyedList<String, V>                                              │
//!   │                                                                     │
//!   │   front ──► [k4] ◄──► [k3] ◄──► [k2] ◄──► [k1] ◄── back             │
//!   │             newest                         oldest                   │
//!   │             INSERT HERE                    EVICT HERE               │
//!   └─────────────────────────────────────────────────────────────────────┘
//!
//!   save(new key, full):  pop_back (evict k1), push_front(new)
//!   save(existing key):   value replaced in place, order untouched
//!   get(key):             lookup only
//! ```
//!
//! ## Operations
//!
//! | Operation | Time | Notes                               |
//! |-----------|------|-------------------------------------|
//! | `save`    | O(1) | May evict the oldest entry          |
//! | `get`     | O(1) | Identical to `peek`                 |
//! | `remove`  | O(1) |                                     |
//! | `clear`   | O(n) |                                     |
//!
//! ## Example
//!
//! ```
//! use tiercache::policy::fifo::FifoStorage;
//! use tiercache::storage::Storage;
//!
//! let mut fifo = FifoStorage::new(2);
//! fifo.save("a", 1).unwrap();
//! fifo.save("b", 2).unwrap();
//! fifo.get("a").unwrap(); // reads do not protect "a"
//! fifo.save("c", 3).unwrap();
//!
//! assert!(!fifo.contains("a"));
//! assert!(fifo.contains("b"));
//! assert!(fifo.contains("c"));
//! ```

use std::fmt;

use tracing::trace;

use crate::ds::KeyedList;
use crate::error::StorageError;
use crate::policy::{at_capacity, capacity_from_signed, preallocation};
use crate::registry::{StrategyKind, StrategyRegistry};
use crate::storage::{BoxedStorage, Storage};

/// Insertion-ordered storage that evicts the oldest entry.
pub struct FifoStorage<V> {
    entries: KeyedList<String, V>,
    capacity: usize,
}

impl<V> FifoStorage<V> {
    /// Creates a FIFO storage holding at most `capacity` entries (0 = unbounded).
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

    /// Key that the next overflowing save would evict.
    pub fn oldest(&self) -> Option<&str> {
        self.entries.back().map(|(key, _)| key.as_str())
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

impl<V> fmt::Debug for FifoStorage<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FifoStorage")
            .field("len", &self.entries.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl<V: Clone> Storage<V> for FifoStorage<V> {
    fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }

    fn save(&mut self, key: &str, value: V) -> Result<(), StorageError> {
        if let Some(slot) = self.entries.get_mut(key) {
            *slot = value;
            return Ok(());
        }

        if at_capacity(self.entries.len(), self.capacity)
            && let Some((evicted, _)) = self.entries.pop_back()
        {
            trace!(key = %evicted, capacity = self.capacity, "fifo: evicted oldest entry");
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
    Box::new(FifoStorage::new(capacity_from_signed(capacity)))
}

/// Registers FIFO under [`StrategyKind::Fifo`].
pub fn register<V: Clone + Send + Sync + 'static>(registry: &mut StrategyRegistry<V>) {
    registry.register(StrategyKind::Fifo, construct::<V>);
}
