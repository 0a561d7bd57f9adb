//! # Least Recently Used (LRU) Strategy
//!
//! Every save and every read moves the entry to the front of a recency list;
//! overflow evicts from the back.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                          LruStorage<V>                               │
//!   │                                                                      │
//!   │   ┌──────────────────────────────────────────────────────────────┐   │
//!   │   │  KeyedList<String, V>                                        │   │
//!   │   │                                                              │   │
//!   │   │  index: FxHashMap<String, SlotId> ──┐                        │   │
//!   │   │                                     ▼                        │   │
//!   │   │  head ──► [A] ◄──► [B] ◄──► [C] ◄── tail                     │   │
//!   │   │           MRU                 LRU                            │   │
//!   │   └──────────────────────────────────────────────────────────────┘   │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations Flow
//!
//! ```text
//!   SAVE new key (storage full, capacity = 3)
//!   ═══════════════════════════════════════════════════════════════════════
//!
//!     head ──► [A] ◄──► [B] ◄──► [C] ◄── tail
//!
//!   save(D):
//!     1. Evict [C] from tail
//!     2. Add [D] at head
//!
//!     head ──► [D] ◄──► [A] ◄──► [B] ◄── tail
//!
//!   GET existing key
//!   ═══════════════════════════════════════════════════════════════════════
//!
//!   get(B):
//!     head ──► [B] ◄──► [D] ◄──► [A] ◄── tail
//! ```
//!
//! ## Example
//!
//! ```
//! use tiercache::policy::lru::LruStorage;
//! use tiercache::storage::Storage;
//!
//! let mut lru = LruStorage::new(2);
//! lru.save("a", 1).unwrap();
//! lru.save("b", 2).unwrap();
//! lru.get("a").unwrap();
//! lru.save("c", 3).unwrap();
//!
//! assert!(lru.contains("a"));
//! assert!(!lru.contains("b"));
//! ```

use std::fmt;

use tracing::trace;

use crate::ds::KeyedList;
use crate::error::StorageError;
use crate::policy::{at_capacity, capacity_from_signed, preallocation};
use crate::registry::{StrategyKind, StrategyRegistry};
use crate::storage::{BoxedStorage, Storage};

/// Recency-ordered storage that evicts the least recently used entry.
pub struct LruStorage<V> {
    entries: KeyedList<String, V>,
    capacity: usize,
}

impl<V> LruStorage<V> {
    /// Creates an LRU storage holding at most `capacity` entries (0 = unbounded).
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

    /// Key of the least recently used entry, next in line for eviction.
    pub fn peek_lru(&self) -> Option<&str> {
        self.entries.back().map(|(key, _)| key.as_str())
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
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

impl<V> fmt::Debug for LruStorage<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruStorage")
            .field("len", &self.entries.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl<V: Clone> Storage<V> for LruStorage<V> {
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
            && let Some((evicted, _)) = self.entries.pop_back()
        {
            trace!(key = %evicted, capacity = self.capacity, "lru: evicted least recently used entry");
        }
        self.entries.push_front(key.to_owned(), value);
        Ok(())
    }

    fn get(&mut self, key: &str) -> Result<Option<V>, StorageError> {
        if !self.entries.touch(key) {
            return Ok(None);
        }
        Ok(self.entries.get(key).cloned())
    }

    fn peek(&self, key: &str) -> Result<Option<V>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }
}

fn construct<V: Clone + Send + Sync + 'static>(capacity: isize) -> BoxedStorage<V> {
    Box::new(LruStorage::new(capacity_from_signed(capacity)))
}

/// Registers LRU under [`StrategyKind::Lru`].
pub fn register<V: Clone + Send + Sync + 'static>(registry: &mut StrategyRegistry<V>) {
    registry.register(StrategyKind::Lru, construct::<V>);
}

#[cfg(test)]
mod tests {
    use super::*;

    mod basic_operations {
        use super::*;

        #[test]
        fn new_storage_is_empty() {
            let lru: LruStorage<u32> = LruStorage::new(4);
            assert!(lru.is_empty());
            assert_eq!(lru.capacity(), 4);
            assert_eq!(lru.peek_lru(), None);
            assert!(lru.reads_mutate());
        }

        #[test]
        fn save_overwrites_value() {
            let mut lru = LruStorage::new(4);
            lru.save("a", 1).unwrap();
            lru.save("a", 2).unwrap();
            assert_eq!(lru.len(), 1);
            assert_eq!(lru.get("a").unwrap(), Some(2));
        }

        #[test]
        fn miss_returns_none() {
            let mut lru: LruStorage<u32> = LruStorage::new(4);
            assert_eq!(lru.get("a").unwrap(), None);
            assert_eq!(lru.peek("a").unwrap(), None);
        }

        #[test]
        fn remove_and_clear() {
            let mut lru = LruStorage::new(4);
            lru.save("a", 1).unwrap();
            lru.save("b", 2).unwrap();
            lru.remove("a").unwrap();
            lru.remove("a").unwrap();
            assert!(!lru.contains("a"));
            lru.clear().unwrap();
            assert!(lru.is_empty());
            lru.debug_validate_invariants();
        }
    }

    mod recency_behavior {
        use super::*;

        #[test]
        fn get_moves_entry_to_front() {
            let mut lru = LruStorage::new(3);
            lru.save("a", 1).unwrap();
            lru.save("b", 2).unwrap();
            lru.save("c", 3).unwrap();
            assert_eq!(lru.keys().collect::<Vec<_>>(), ["c", "b", "a"]);

            lru.get("a").unwrap();
            assert_eq!(lru.keys().collect::<Vec<_>>(), ["a", "c", "b"]);
            assert_eq!(lru.peek_lru(), Some("b"));
        }

        #[test]
        fn peek_does_not_reorder() {
            let mut lru = LruStorage::new(3);
            lru.save("a", 1).unwrap();
            lru.save("b", 2).unwrap();
            assert_eq!(lru.peek("a").unwrap(), Some(1));
            assert_eq!(lru.peek_lru(), Some("a"));
        }

        #[test]
        fn save_existing_moves_to_front() {
            let mut lru = LruStorage::new(2);
            lru.save("a", 1).unwrap();
            lru.save("b", 2).unwrap();
            lru.save("a", 3).unwrap();
            lru.save("c", 4).unwrap();
            assert!(lru.contains("a"));
            assert!(!lru.contains("b"));
        }
    }

    mod eviction_behavior {
        use super::*;

        #[test]
        fn evicts_least_recently_used() {
            let mut lru = LruStorage::new(2);
            lru.save("a", 1).unwrap();
            lru.save("b", 2).unwrap();
            lru.get("a").unwrap();
            lru.save("c", 3).unwrap();

            assert!(lru.contains("a"));
            assert!(!lru.contains("b"));
            assert!(lru.contains("c"));
            lru.debug_validate_invariants();
        }

        #[test]
        fn capacity_one_keeps_latest() {
            let mut lru = LruStorage::new(1);
            lru.save("a", 1).unwrap();
            lru.save("b", 2).unwrap();
            assert_eq!(lru.len(), 1);
            assert_eq!(lru.get("b").unwrap(), Some(2));
        }

        #[test]
        fn zero_capacity_is_unbounded() {
            let mut lru = LruStorage::new(0);
            for i in 0..500 {
                lru.save(&i.to_string(), i).unwrap();
            }
            assert_eq!(lru.len(), 500);
        }
    }
}
