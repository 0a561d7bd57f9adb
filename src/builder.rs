//! Cache builder and configuration.
//!
//! [`CacheBuilder`] turns a [`CacheConfig`] (strategy, capacity, optional
//! extra tiers) into a ready [`Cache`]. With the `serde` feature the config
//! types can be loaded from any serde format.
//!
//! ```text
//!   CacheConfig { capacity, strategy, tiers: [TierConfig, ...] }
//!        │
//!        ▼
//!   registry.create(strategy, capacity)          ── tier 0
//!   registry.create(tier.strategy, tier.capacity) ── tier 1..n
//!        │
//!        ├─ one tier   ─► BoxedStorage
//!        └─ many tiers ─► MultiLevelStorage ─► BoxedStorage
//!        │
//!        ▼
//!   Cache<V>  or  Cache<V, ConcurrentStorage<..>>
//! ```
//!
//! ## Example
//!
//! ```
//! use tiercache::builder::CacheBuilder;
//! use tiercache::entry::Entry;
//! use tiercache::registry::StrategyKind;
//!
//! let mut cache = CacheBuilder::new(2)
//!     .strategy(StrategyKind::Lfu)
//!     .tier(StrategyKind::Fifo, 100)
//!     .build::<String>()
//!     .unwrap();
//!
//! cache.save(Entry::new("a", "alpha".to_string()).unwrap()).unwrap();
//! assert_eq!(cache.get_value("a").unwrap().as_deref(), Some("alpha"));
//! ```

use tracing::debug;

use crate::cache::Cache;
use crate::concurrent::ConcurrentStorage;
use crate::entry::Entry;
use crate::error::CacheError;
use crate::multilevel::MultiLevelStorage;
use crate::registry::{StrategyKind, StrategyRegistry};
use crate::storage::BoxedStorage;

/// Capacity used by [`CacheConfig::default`].
pub const DEFAULT_CAPACITY: isize = 1000;

/// One additional storage tier behind the primary strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TierConfig {
    pub strategy: StrategyKind,
    /// Values `<= 0` mean unbounded.
    pub capacity: isize,
}

/// Declarative cache layout.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CacheConfig {
    /// Capacity of the primary tier. Values `<= 0` mean unbounded.
    pub capacity: isize,
    pub strategy: StrategyKind,
    /// Tiers queried after the primary one, in order.
    pub tiers: Vec<TierConfig>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            strategy: StrategyKind::Lru,
            tiers: Vec::new(),
        }
    }
}

impl CacheConfig {
    /// Primary tier followed by the extra tiers.
    pub fn layout(&self) -> impl Iterator<Item = TierConfig> + '_ {
        std::iter::once(TierConfig {
            strategy: self.strategy,
            capacity: self.capacity,
        })
        .chain(self.tiers.iter().copied())
    }
}

/// Fluent builder over [`CacheConfig`].
#[derive(Debug, Clone, Default)]
pub struct CacheBuilder {
    config: CacheConfig,
}

impl CacheBuilder {
    /// Starts a builder for an LRU cache of `capacity` entries.
    pub fn new(capacity: isize) -> Self {
        Self {
            config: CacheConfig {
                capacity,
                ..CacheConfig::default()
            },
        }
    }

    pub fn from_config(config: CacheConfig) -> Self {
        Self { config }
    }

    /// Sets the primary strategy.
    pub fn strategy(mut self, strategy: StrategyKind) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Appends a tier behind those already configured.
    pub fn tier(mut self, strategy: StrategyKind, capacity: isize) -> Self {
        self.config.tiers.push(TierConfig { strategy, capacity });
        self
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Builds the backing storage from `registry`.
    pub fn build_storage<V>(
        &self,
        registry: &StrategyRegistry<Entry<V>>,
    ) -> Result<BoxedStorage<Entry<V>>, CacheError>
    where
        V: Clone + Send + Sync + 'static,
    {
        if let Some(missing) = self
            .config
            .layout()
            .find(|tier| !registry.available(tier.strategy))
        {
            return Err(CacheError::UnavailableStrategy(missing.strategy));
        }

        let mut tiers: Vec<BoxedStorage<Entry<V>>> = self
            .config
            .layout()
            .map(|tier| registry.create(tier.strategy, tier.capacity))
            .collect();

        debug!(
            strategy = %self.config.strategy,
            capacity = self.config.capacity,
            tiers = tiers.len(),
            "building cache storage"
        );

        if tiers.len() == 1
            && let Some(only) = tiers.pop()
        {
            return Ok(only);
        }
        Ok(Box::new(MultiLevelStorage::new(tiers)?))
    }

    /// Builds a cache using strategies from `registry`.
    pub fn build_with_registry<V>(
        &self,
        registry: &StrategyRegistry<Entry<V>>,
    ) -> Result<Cache<V>, CacheError>
    where
        V: Clone + Send + Sync + 'static,
    {
        Ok(Cache::new(self.build_storage(registry)?))
    }

    /// Builds a cache using every strategy compiled into this build.
    pub fn build<V>(&self) -> Result<Cache<V>, CacheError>
    where
        V: Clone + Send + Sync + 'static,
    {
        self.build_with_registry(&StrategyRegistry::builtin())
    }

    /// Builds a cache whose clones share one lock-protected storage.
    pub fn build_concurrent<V>(
        &self,
    ) -> Result<Cache<V, ConcurrentStorage<BoxedStorage<Entry<V>>>>, CacheError>
    where
        V: Clone + Send + Sync + 'static,
    {
        let storage = self.build_storage(&StrategyRegistry::builtin())?;
        Ok(Cache::new(ConcurrentStorage::new(storage)))
    }
}

impl From<CacheConfig> for CacheBuilder {
    fn from(config: CacheConfig) -> Self {
        Self::from_config(config)
    }
}
