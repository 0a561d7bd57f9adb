//! Strategy registry.
//!
//! Maps each [`StrategyKind`] to a constructor producing a boxed
//! [`Storage`](crate::storage::Storage). A registry is filled once, usually
//! through [`StrategyRegistry::builtin`], and only read afterwards.
//!
//! ```text
//!   StrategyKind ──► slot ──► fn(isize) -> BoxedStorage<V>
//!
//!   Fifo  ─► [ ctor | None ]     (None: feature `policy-fifo` disabled)
//!   Lfu   ─► [ ctor | None ]
//!   Lru   ─► [ ctor | None ]
//!   Mru   ─► [ ctor | None ]
//!   Arc   ─► [ ctor | None ]
//! ```
//!
//! Misuse is a programming error and panics: registering a kind twice, or
//! creating a kind that nothing registered.
//!
//! ## Example
//!
//! ```
//! use tiercache::registry::{StrategyKind, StrategyRegistry};
//! use tiercache::storage::Storage;
//!
//! let registry = StrategyRegistry::<String>::builtin();
//! let kind: StrategyKind = "lru".parse().unwrap();
//! assert!(registry.available(kind));
//!
//! let mut storage = registry.create(kind, 128);
//! storage.save("greeting", "hello".to_string()).unwrap();
//! assert_eq!(storage.get("greeting").unwrap().as_deref(), Some("hello"));
//! ```

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::ParseStrategyError;
use crate::storage::BoxedStorage;

/// Built-in replacement strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StrategyKind {
    Fifo,
    Lfu,
    Lru,
    Mru,
    Arc,
}

impl StrategyKind {
    /// Every kind, in declaration order.
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::Fifo,
        StrategyKind::Lfu,
        StrategyKind::Lru,
        StrategyKind::Mru,
        StrategyKind::Arc,
    ];

    /// Lower-case name accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Fifo => "fifo",
            StrategyKind::Lfu => "lfu",
            StrategyKind::Lru => "lru",
            StrategyKind::Mru => "mru",
            StrategyKind::Arc => "arc",
        }
    }

    /// Whether the cargo feature providing this strategy is enabled.
    pub fn compiled_in(self) -> bool {
        match self {
            StrategyKind::Fifo => cfg!(feature = "policy-fifo"),
            StrategyKind::Lfu => cfg!(feature = "policy-lfu"),
            StrategyKind::Lru => cfg!(feature = "policy-lru"),
            StrategyKind::Mru => cfg!(feature = "policy-mru"),
            StrategyKind::Arc => cfg!(feature = "policy-arc"),
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseStrategyError(s.to_string()))
    }
}

const KIND_COUNT: usize = StrategyKind::ALL.len();

/// Constructor stored in a registry slot. Capacities `<= 0` mean unbounded.
pub type StrategyConstructor<V> = fn(isize) -> BoxedStorage<V>;

/// Table of strategy constructors for payload type `V`.
pub struct StrategyRegistry<V> {
    constructors: [Option<StrategyConstructor<V>>; KIND_COUNT],
}

impl<V> StrategyRegistry<V> {
    /// Creates a registry with no strategies.
    pub fn empty() -> Self {
        Self {
            constructors: [None; KIND_COUNT],
        }
    }

    /// Registers `constructor` for `kind`.
    ///
    /// # Panics
    ///
    /// Panics if `kind` already has a constructor.
    pub fn register(&mut self, kind: StrategyKind, constructor: StrategyConstructor<V>) {
        let slot = &mut self.constructors[kind.slot()];
        if slot.is_some() {
            panic!("cache: strategy {kind} is already registered");
        }
        *slot = Some(constructor);
        debug!(strategy = %kind, "registered cache strategy");
    }

    /// Reports whether `kind` has a constructor.
    pub fn available(&self, kind: StrategyKind) -> bool {
        self.constructors[kind.slot()].is_some()
    }

    /// Kinds that have a constructor, in declaration order.
    pub fn kinds(&self) -> impl Iterator<Item = StrategyKind> + '_ {
        StrategyKind::ALL
            .into_iter()
            .filter(|kind| self.available(*kind))
    }

    /// Builds a storage of the given kind.
    ///
    /// # Panics
    ///
    /// Panics if `kind` is not [`available`](Self::available).
    pub fn create(&self, kind: StrategyKind, capacity: isize) -> BoxedStorage<V> {
        match self.constructors[kind.slot()] {
            Some(constructor) => constructor(capacity),
            None => panic!("cache: requested strategy {kind} is unavailable"),
        }
    }
}

impl<V: Clone + Send + Sync + 'static> StrategyRegistry<V> {
    /// Creates a registry holding every strategy enabled by cargo features.
    pub fn builtin() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::empty();
        #[cfg(feature = "policy-fifo")]
        crate::policy::fifo::register(&mut registry);
        #[cfg(feature = "policy-lfu")]
        crate::policy::lfu::register(&mut registry);
        #[cfg(feature = "policy-lru")]
        crate::policy::lru::register(&mut registry);
        #[cfg(feature = "policy-mru")]
        crate::policy::mru::register(&mut registry);
        #[cfg(feature = "policy-arc")]
        crate::policy::arc::register(&mut registry);
        registry
    }
}

impl<V: Clone + Send + Sync + 'static> Default for StrategyRegistry<V> {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<V> fmt::Debug for StrategyRegistry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("available", &self.kinds().collect::<Vec<_>>())
            .finish()
    }
}
