//! Tiered storage composition.
//!
//! [`MultiLevelStorage`] stacks several storages, typically a small fast
//! in-process tier in front of a larger or remote one. Writes go to every
//! tier; reads stop at the first tier that has the key.
//!
//! ```text
//!   save / remove / clear                 get / peek
//!   ═════════════════════                 ══════════
//!
//!   ┌─────────┐                           ┌─────────┐
//!   │ tier 0  │ ◄── 1st                   │ tier 0  │ ── hit? ──► return
//!   ├─────────┤                           ├─────────┤      │ miss
//!   │ tier 1  │ ◄── 2nd                   │ tier 1  │ ◄────┘ ── hit? ──► return
//!   ├─────────┤                           ├─────────┤             │ miss
//!   │ tier 2  │ ◄── 3rd                   │ tier 2  │ ◄───────────┘ ...
//!   └─────────┘                           └─────────┘
//!
//!   first failure stops the fan-out      no back-fill of earlier tiers
//! ```
//!
//! A tier that evicted a key on its own is not refilled from a later tier;
//! the next [`save`](Storage::save) of that key writes it everywhere again.
//!
//! ## Example
//!
//! ```
//! use tiercache::multilevel::MultiLevelStorage;
//! use tiercache::policy::{fifo::FifoStorage, lru::LruStorage};
//! use tiercache::storage::Storage;
//!
//! let mut storage = MultiLevelStorage::<u32>::new(vec![
//!     Box::new(LruStorage::<u32>::new(1)),
//!     Box::new(FifoStorage::<u32>::new(100)),
//! ])
//! .unwrap();
//!
//! storage.save("a", 1).unwrap();
//! storage.save("b", 2).unwrap(); // pushes "a" out of tier 0
//! assert_eq!(storage.get("a").unwrap(), Some(1)); // served by tier 1
//! ```

use std::fmt;

use crate::error::{CacheError, StorageError};
use crate::storage::{BoxedStorage, Storage};

/// Ordered stack of storages queried front to back.
pub struct MultiLevelStorage<V> {
    tiers: Vec<BoxedStorage<V>>,
}

impl<V> MultiLevelStorage<V> {
    /// Composes `tiers`, queried in the given order.
    ///
    /// Fails with [`CacheError::NoTiers`] if `tiers` is empty.
    pub fn new(tiers: Vec<BoxedStorage<V>>) -> Result<Self, CacheError> {
        if tiers.is_empty() {
            return Err(CacheError::NoTiers);
        }
        Ok(Self { tiers })
    }

    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    pub fn tier(&self, index: usize) -> Option<&BoxedStorage<V>> {
        self.tiers.get(index)
    }

    pub fn tier_mut(&mut self, index: usize) -> Option<&mut BoxedStorage<V>> {
        self.tiers.get_mut(index)
    }

    pub fn tiers(&self) -> &[BoxedStorage<V>] {
        &self.tiers
    }

    pub fn into_tiers(self) -> Vec<BoxedStorage<V>> {
        self.tiers
    }

    fn for_each_tier(
        &mut self,
        mut op: impl FnMut(&mut BoxedStorage<V>) -> Result<(), StorageError>,
    ) -> Result<(), StorageError> {
        for (index, tier) in self.tiers.iter_mut().enumerate() {
            op(tier).map_err(|err| StorageError::tier(index, err))?;
        }
        Ok(())
    }
}

impl<V: Clone> Storage<V> for MultiLevelStorage<V> {
    fn clear(&mut self) -> Result<(), StorageError> {
        self.for_each_tier(|tier| tier.clear())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.for_each_tier(|tier| tier.remove(key))
    }

    fn save(&mut self, key: &str, value: V) -> Result<(), StorageError> {
        self.for_each_tier(|tier| tier.save(key, value.clone()))
    }

    fn get(&mut self, key: &str) -> Result<Option<V>, StorageError> {
        for (index, tier) in self.tiers.iter_mut().enumerate() {
            if let Some(value) = tier.get(key).map_err(|err| StorageError::tier(index, err))? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    fn peek(&self, key: &str) -> Result<Option<V>, StorageError> {
        for (index, tier) in self.tiers.iter().enumerate() {
            if let Some(value) = tier.peek(key).map_err(|err| StorageError::tier(index, err))? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    fn reads_mutate(&self) -> bool {
        self.tiers.iter().any(|tier| tier.reads_mutate())
    }
}

impl<V> fmt::Debug for MultiLevelStorage<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiLevelStorage")
            .field("tiers", &self.tiers.len())
            .finish()
    }
}
