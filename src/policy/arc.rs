//! ARC (Adaptive Replacement Cache) strategy.
//!
//! ARC balances recency against frequency by splitting resident entries into
//! two lists and remembering recently evicted keys in two ghost lists. A hit
//! on a ghost tells ARC which side it evicted too eagerly, and the target
//! size `p` of the recency side moves accordingly.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                           ArcStorage<V>                              │
//!   │                                                                      │
//!   │   resident (≤ c)                      ghosts (keys + last value)     │
//!   │   ┌───────────────────────────┐       ┌───────────────────────────┐  │
//!   │   │ T1: seen once recently    │──────►│ B1: evicted from T1       │  │
//!   │   │ MRU [k] ◄──► [k] LRU      │       │ MRU [k] ◄──► [k] LRU      │  │
//!   │   └───────────────────────────┘       └───────────────────────────┘  │
//!   │   ┌───────────────────────────┐       ┌───────────────────────────┐  │
//!   │   │ T2: seen at least twice   │──────►│ B2: evicted from T2       │  │
//!   │   │ MRU [k] ◄──► [k] LRU      │       │ MRU [k] ◄──► [k] LRU      │  │
//!   │   └───────────────────────────┘       └───────────────────────────┘  │
//!   │                                                                      │
//!   │   p: target size of T1, 0 ≤ p ≤ c                                    │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Get
//!
//! ```text
//!   hit in T1  → move to MRU of T2
//!   hit in T2  → refresh in T2
//!   hit in B1  → p = min(c, p + max(|B2| / |B1|, 1)); replace(); move to T2
//!   hit in B2  → p = max(0, p - max(|B1| / |B2|, 1)); replace(); move to T2
//!   otherwise  → miss
//! ```
//!
//! Ghosts keep the value they held when demoted, so a ghost hit is served.
//!
//! ## Save
//!
//! ```text
//!   1. remove key from T1, T2, B1, B2
//!   2. if |T1| + |B1| == c:
//!        |T1| < c  → drop LRU of B1, replace()
//!        otherwise → drop LRU of T1
//!      else if |T1| + |T2| + |B1| + |B2| >= c:
//!        total == 2c → drop LRU of B2
//!        replace()
//!   3. insert at MRU of T1
//!
//!   replace(): |T1| >= max(1, p) → demote LRU of T1 to B1
//!              otherwise         → demote LRU of T2 to B2
//! ```
//!
//! With a capacity of 0 (unbounded) step 2 is skipped, so nothing is ever
//! demoted and the ghost lists stay empty.
//!
//! ## Example
//!
//! ```
//! use tiercache::policy::arc::{ArcList, ArcStorage};
//! use tiercache::storage::Storage;
//!
//! let mut arc = ArcStorage::new(2);
//! arc.save("a", 1).unwrap();
//! arc.get("a").unwrap();
//! arc.save("b", 2).unwrap();
//! arc.save("c", 3).unwrap();
//!
//! assert_eq!(arc.residency("a"), Some(ArcList::T2));
//! assert_eq!(arc.residency("b"), Some(ArcList::B1));
//!
//! // Ghost hit: served, promoted, and p grows toward recency.
//! assert_eq!(arc.get("b").unwrap(), Some(2));
//! assert_eq!(arc.residency("b"), Some(ArcList::T2));
//! assert_eq!(arc.p_value(), 1);
//! ```

use std::fmt;

use tracing::trace;

use crate::ds::KeyedList;
use crate::error::StorageError;
use crate::policy::{capacity_from_signed, preallocation};
use crate::registry::{StrategyKind, StrategyRegistry};
use crate::storage::{BoxedStorage, Storage};

/// The ARC list a key currently sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArcList {
    /// Resident, seen once recently.
    T1,
    /// Resident, seen at least twice recently.
    T2,
    /// Ghost demoted from `T1`.
    B1,
    /// Ghost demoted from `T2`.
    B2,
}

impl ArcList {
    pub fn is_resident(self) -> bool {
        matches!(self, Self::T1 | Self::T2)
    }

    pub fn is_ghost(self) -> bool {
        !self.is_resident()
    }
}

/// Adaptive storage balancing recency (`T1`) against frequency (`T2`).
pub struct ArcStorage<V> {
    t1: KeyedList<String, V>,
    t2: KeyedList<String, V>,
    b1: KeyedList<String, V>,
    b2: KeyedList<String, V>,
    p: usize,
    capacity: usize,
}

impl<V> ArcStorage<V> {
    /// Creates an ARC storage holding at most `capacity` resident entries
    /// (0 = unbounded).
    pub fn new(capacity: usize) -> Self {
        let reserve = preallocation(capacity);
        Self {
            t1: KeyedList::with_capacity(reserve),
            t2: KeyedList::with_capacity(reserve),
            b1: KeyedList::with_capacity(reserve),
            b2: KeyedList::with_capacity(reserve),
            p: 0,
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of resident entries (`T1` + `T2`).
    pub fn len(&self) -> usize {
        self.t1.len() + self.t2.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `key` is resident. Ghost keys are not counted.
    pub fn contains(&self, key: &str) -> bool {
        self.t1.contains(key) || self.t2.contains(key)
    }

    /// Current target size of `T1`.
    pub fn p_value(&self) -> usize {
        self.p
    }

    pub fn t1_len(&self) -> usize {
        self.t1.len()
    }

    pub fn t2_len(&self) -> usize {
        self.t2.len()
    }

    pub fn b1_len(&self) -> usize {
        self.b1.len()
    }

    pub fn b2_len(&self) -> usize {
        self.b2.len()
    }

    /// Which list holds `key`, if any.
    pub fn residency(&self, key: &str) -> Option<ArcList> {
        if self.t1.contains(key) {
            Some(ArcList::T1)
        } else if self.t2.contains(key) {
            Some(ArcList::T2)
        } else if self.b1.contains(key) {
            Some(ArcList::B1)
        } else if self.b2.contains(key) {
            Some(ArcList::B2)
        } else {
            None
        }
    }

    fn total_len(&self) -> usize {
        self.t1.len() + self.t2.len() + self.b1.len() + self.b2.len()
    }

    /// Demotes one resident entry to its ghost list.
    fn replace(&mut self) {
        if self.t1.len() >= self.p.max(1) {
            if let Some((key, value)) = self.t1.pop_back() {
                trace!(key = %key, p = self.p, "arc: demoted T1 entry to B1");
                self.b1.push_front(key, value);
            }
        } else if let Some((key, value)) = self.t2.pop_back() {
            trace!(key = %key, p = self.p, "arc: demoted T2 entry to B2");
            self.b2.push_front(key, value);
        }
    }

    /// Frees room for one new `T1` entry in a bounded storage.
    fn make_room(&mut self) {
        let c = self.capacity;
        if self.t1.len() + self.b1.len() == c {
            if self.t1.len() < c {
                self.b1.pop_back();
                self.replace();
            } else if let Some((key, _)) = self.t1.pop_back() {
                trace!(key = %key, capacity = c, "arc: evicted T1 entry");
            }
            return;
        }

        let total = self.total_len();
        if total >= c {
            if total == 2 * c {
                self.b2.pop_back();
            }
            self.replace();
        }
    }

    fn remove_everywhere(&mut self, key: &str) {
        self.t1.remove(key);
        self.t2.remove(key);
        self.b1.remove(key);
        self.b2.remove(key);
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.t1.debug_validate_invariants();
        self.t2.debug_validate_invariants();
        self.b1.debug_validate_invariants();
        self.b2.debug_validate_invariants();

        for key in self.t1.keys() {
            assert!(
                !self.t2.contains(key) && !self.b1.contains(key) && !self.b2.contains(key),
                "key {key:?} in T1 and another list"
            );
        }
        for key in self.t2.keys() {
            assert!(
                !self.b1.contains(key) && !self.b2.contains(key),
                "key {key:?} in T2 and a ghost list"
            );
        }
        for key in self.b1.keys() {
            assert!(!self.b2.contains(key), "key {key:?} in B1 and B2");
        }

        let c = self.capacity;
        if c == 0 {
            assert!(self.b1.is_empty() && self.b2.is_empty(), "unbounded ARC has ghosts");
            assert_eq!(self.p, 0, "unbounded ARC adapted p");
            return;
        }
        assert!(self.p <= c, "p({}) > capacity({})", self.p, c);
        assert!(
            self.len() <= c,
            "|T1|({}) + |T2|({}) > capacity({})",
            self.t1.len(),
            self.t2.len(),
            c
        );
        assert!(
            self.t1.len() + self.b1.len() <= c,
            "|T1|({}) + |B1|({}) > capacity({})",
            self.t1.len(),
            self.b1.len(),
            c
        );
        assert!(
            self.total_len() <= 2 * c,
            "total({}) > 2 * capacity({})",
            self.total_len(),
            c
        );
    }
}

impl<V: Clone> ArcStorage<V> {
    /// Moves a ghost hit into `T2` and returns its value.
    fn promote_ghost(&mut self, key: &str, from: ArcList) -> Option<V> {
        let value = match from {
            ArcList::B1 => self.b1.remove(key),
            ArcList::B2 => self.b2.remove(key),
            ArcList::T1 | ArcList::T2 => None,
        }?;
        self.t2.push_front(key.to_owned(), value.clone());
        Some(value)
    }
}

impl<V> fmt::Debug for ArcStorage<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArcStorage")
            .field("t1", &self.t1.len())
            .field("t2", &self.t2.len())
            .field("b1", &self.b1.len())
            .field("b2", &self.b2.len())
            .field("p", &self.p)
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl<V: Clone> Storage<V> for ArcStorage<V> {
    fn clear(&mut self) -> Result<(), StorageError> {
        self.t1.clear();
        self.t2.clear();
        self.b1.clear();
        self.b2.clear();
        self.p = 0;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.remove_everywhere(key);
        Ok(())
    }

    fn save(&mut self, key: &str, value: V) -> Result<(), StorageError> {
        self.remove_everywhere(key);
        if self.capacity > 0 {
            self.make_room();
        }
        self.t1.push_front(key.to_owned(), value);
        Ok(())
    }

    fn get(&mut self, key: &str) -> Result<Option<V>, StorageError> {
        if let Some(value) = self.t1.remove(key) {
            self.t2.push_front(key.to_owned(), value.clone());
            return Ok(Some(value));
        }

        if self.t2.touch(key) {
            return Ok(self.t2.get(key).cloned());
        }

        if self.b1.contains(key) {
            let delta = (self.b2.len() / self.b1.len().max(1)).max(1);
            self.p = self.p.saturating_add(delta).min(self.capacity);
            trace!(key, p = self.p, "arc: ghost hit in B1");
            self.replace();
            return Ok(self.promote_ghost(key, ArcList::B1));
        }

        if self.b2.contains(key) {
            let delta = (self.b1.len() / self.b2.len().max(1)).max(1);
            self.p = self.p.saturating_sub(delta);
            trace!(key, p = self.p, "arc: ghost hit in B2");
            self.replace();
            return Ok(self.promote_ghost(key, ArcList::B2));
        }

        Ok(None)
    }

    fn peek(&self, key: &str) -> Result<Option<V>, StorageError> {
        let value = self
            .t1
            .get(key)
            .or_else(|| self.t2.get(key))
            .or_else(|| self.b1.get(key))
            .or_else(|| self.b2.get(key));
        Ok(value.cloned())
    }
}

fn construct<V: Clone + Send + Sync + 'static>(capacity: isize) -> BoxedStorage<V> {
    Box::new(ArcStorage::new(capacity_from_signed(capacity)))
}

/// Registers ARC under [`StrategyKind::Arc`].
pub fn register<V: Clone + Send + Sync + 'static>(registry: &mut StrategyRegistry<V>) {
    registry.register(StrategyKind::Arc, construct::<V>);
}
