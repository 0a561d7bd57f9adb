//! Ordered key/value list with O(1) lookup by key.
//!
//! The shared building block of the FIFO, LRU, MRU and ARC strategies: an
//! [`IntrusiveList`] holding `(K, V)` pairs plus an index from key to node.
//!
//! ## Architecture
//!
//! ```text
//!   index: FxHashMap<K, SlotId>        list: IntrusiveList<(K, V)>
//!   ┌─────────┬─────────┐              head ─► [A] ◄──► [B] ◄──► [C] ◄── tail
//!   │  key A  │  id_1   │              front                          back
//!   │  key B  │  id_2   │              (newest / MRU)       (oldest / LRU)
//!   └─────────┴─────────┘
//! ```
//!
//! ## Behavior
//! - `push_front(k, v)`: inserts at the front, or replaces the value and moves
//!   an existing key to the front
//! - `touch(k)`: moves an existing key to the front
//! - `pop_front()` / `pop_back()`: removes an end, returning the pair
//! - `remove(k)`: deletes from list and index
//!
//! ## Performance
//! - every operation except `clear` and iteration is O(1) average
//!
//! `debug_validate_invariants()` is available in debug/test builds.
use std::borrow::Borrow;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::intrusive_list::IntrusiveList;
use crate::ds::slot_arena::SlotId;

/// Ordered list of key/value pairs indexed by key.
#[derive(Debug)]
pub struct KeyedList<K, V> {
    list: IntrusiveList<(K, V)>,
    index: FxHashMap<K, SlotId>,
}

impl<K, V> KeyedList<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            list: IntrusiveList::new(),
            index: FxHashMap::default(),
        }
    }

    /// Creates an empty list with room for `capacity` pairs.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            list: IntrusiveList::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Returns the value for `key` without changing its position.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = *self.index.get(key)?;
        self.list.get(id).map(|(_, value)| value)
    }

    /// Returns a mutable reference to the value without changing its position.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = *self.index.get(key)?;
        self.list.get_mut(id).map(|(_, value)| value)
    }

    /// Inserts `key` at the front, returning the previous value if it was present.
    pub fn push_front(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&id) = self.index.get(&key) {
            self.list.move_to_front(id);
            return self
                .list
                .get_mut(id)
                .map(|(_, slot)| std::mem::replace(slot, value));
        }

        let id = self.list.push_front((key.clone(), value));
        self.index.insert(key, id);
        None
    }

    /// Moves `key` to the front; returns `false` if it is not present.
    pub fn touch<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.index.get(key) {
            Some(&id) => self.list.move_to_front(id),
            None => false,
        }
    }

    /// Returns the front pair (newest / most recently used).
    pub fn front(&self) -> Option<(&K, &V)> {
        self.list.front().map(|(key, value)| (key, value))
    }

    /// Returns the back pair (oldest / least recently used).
    pub fn back(&self) -> Option<(&K, &V)> {
        self.list.back().map(|(key, value)| (key, value))
    }

    pub fn pop_front(&mut self) -> Option<(K, V)> {
        let (key, value) = self.list.pop_front()?;
        self.index.remove(&key);
        Some((key, value))
    }

    pub fn pop_back(&mut self) -> Option<(K, V)> {
        let (key, value) = self.list.pop_back()?;
        self.index.remove(&key);
        Some((key, value))
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = self.index.remove(key)?;
        self.list.remove(id).map(|(_, value)| value)
    }

    pub fn clear(&mut self) {
        self.list.clear();
        self.index.clear();
    }

    /// Iterates keys from front to back.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.list.iter().map(|(key, _)| key)
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.list.debug_validate_invariants();
        assert_eq!(self.list.len(), self.index.len());
        for (key, &id) in &self.index {
            let (stored, _) = self.list.get(id).expect("indexed node missing");
            assert!(stored == key, "index points at a node with another key");
        }
    }
}

impl<K, V> Default for KeyedList<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
