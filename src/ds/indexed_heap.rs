//! Binary min-heap keyed by access count, with a position index.
//!
//! Backs the LFU strategy. Unlike a lazy heap that pushes a fresh entry on
//! every update and skips stale ones on pop, each key owns exactly one heap
//! slot and the index tracks where it currently sits, so a count bump is a
//! single sift.
//!
//! ## Architecture
//!
//! ```text
//!   positions: FxHashMap<K, usize>        nodes: Vec<HeapNode>  (min-heap on count)
//!   ┌─────────┬─────┐                     ┌─────┬─────────────────────────┐
//!   │ "B"     │  0  │ ──────────────────► │  0  │ ("B", v, count=1)       │ ← min
//!   │ "C"     │  1  │ ──────────────────► │  1  │ ("C", v, count=4)       │
//!   │ "A"     │  2  │ ──────────────────► │  2  │ ("A", v, count=9)       │
//!   └─────────┴─────┘                     └─────┴─────────────────────────┘
//! ```
//!
//! ## Operations
//! - `push`: O(log n), new keys start with count 0
//! - `increment`: O(log n), sifts the bumped node down
//! - `pop_min` / `remove`: O(log n)
//! - lookups: O(1)
//!
//! ## Ties
//! Nodes with equal counts have no secondary order: which one surfaces first
//! depends on heap position, i.e. on the history of swaps. Callers must not
//! rely on FIFO-among-equals.

use std::borrow::Borrow;
use std::hash::Hash;

use rustc_hash::FxHashMap;

#[derive(Debug)]
struct HeapNode<K, V> {
    key: K,
    value: V,
    count: u64,
}

/// Min-heap of `(key, value)` pairs ordered by access count.
#[derive(Debug)]
pub struct IndexedMinHeap<K, V> {
    nodes: Vec<HeapNode<K, V>>,
    positions: FxHashMap<K, usize>,
}

impl<K, V> IndexedMinHeap<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            positions: FxHashMap::default(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            positions: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.positions.contains_key(key)
    }

    /// Returns the value without touching its count.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let pos = *self.positions.get(key)?;
        Some(&self.nodes[pos].value)
    }

    /// Returns the current access count for `key`.
    pub fn count<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let pos = *self.positions.get(key)?;
        Some(self.nodes[pos].count)
    }

    /// Inserts a new key with count 0, or replaces the value of an existing key
    /// (keeping its count). Returns the previous value.
    pub fn push(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&pos) = self.positions.get(&key) {
            return Some(std::mem::replace(&mut self.nodes[pos].value, value));
        }

        let pos = self.nodes.len();
        self.positions.insert(key.clone(), pos);
        self.nodes.push(HeapNode {
            key,
            value,
            count: 0,
        });
        self.sift_up(pos);
        None
    }

    /// Bumps the access count of `key` and returns its value.
    pub fn increment<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let pos = *self.positions.get(key)?;
        self.nodes[pos].count = self.nodes[pos].count.saturating_add(1);
        let pos = self.sift_down(pos);
        Some(&self.nodes[pos].value)
    }

    /// Returns the node with the lowest count.
    pub fn peek_min(&self) -> Option<(&K, &V, u64)> {
        self.nodes
            .first()
            .map(|node| (&node.key, &node.value, node.count))
    }

    /// Removes the node with the lowest count.
    pub fn pop_min(&mut self) -> Option<(K, V, u64)> {
        if self.nodes.is_empty() {
            return None;
        }
        let node = self.remove_at(0);
        Some((node.key, node.value, node.count))
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let pos = *self.positions.get(key)?;
        Some(self.remove_at(pos).value)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.positions.clear();
    }

    fn remove_at(&mut self, pos: usize) -> HeapNode<K, V> {
        let last = self.nodes.len() - 1;
        self.swap(pos, last);
        let node = self.nodes.pop().expect("heap is non-empty");
        self.positions.remove(&node.key);
        if pos < self.nodes.len() {
            let pos = self.sift_up(pos);
            self.sift_down(pos);
        }
        node
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.nodes.swap(a, b);
        if let Some(slot) = self.positions.get_mut(&self.nodes[a].key) {
            *slot = a;
        }
        if let Some(slot) = self.positions.get_mut(&self.nodes[b].key) {
            *slot = b;
        }
    }

    fn sift_up(&mut self, mut pos: usize) -> usize {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.nodes[pos].count >= self.nodes[parent].count {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
        pos
    }

    fn sift_down(&mut self, mut pos: usize) -> usize {
        let len = self.nodes.len();
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut smallest = pos;
            if left < len && self.nodes[left].count < self.nodes[smallest].count {
                smallest = left;
            }
            if right < len && self.nodes[right].count < self.nodes[smallest].count {
                smallest = right;
            }
            if smallest == pos {
                return pos;
            }
            self.swap(pos, smallest);
            pos = smallest;
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.nodes.len(), self.positions.len());
        for (pos, node) in self.nodes.iter().enumerate() {
            assert_eq!(self.positions.get(&node.key), Some(&pos));
            if pos > 0 {
                let parent = (pos - 1) / 2;
                assert!(
                    self.nodes[parent].count <= node.count,
                    "heap order violated at {}",
                    pos
                );
            }
        }
    }
}

impl<K, V> Default for IndexedMinHeap<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
