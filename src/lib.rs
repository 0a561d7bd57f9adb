//! tiercache: expiring cache entries over pluggable replacement strategies.
//!
//! A [`Cache`] holds [`Entry`] values with absolute, sliding and
//! dependency-based expiration on top of any [`Storage`]. Storages come from
//! the [`policy`] strategies (FIFO, LRU, MRU, LFU, ARC), can be stacked with
//! [`MultiLevelStorage`] and shared across threads with
//! [`ConcurrentStorage`].

pub mod builder;
pub mod cache;
pub mod concurrent;
pub mod dependency;
pub mod ds;
pub mod entry;
pub mod error;
pub mod multilevel;
pub mod policy;
pub mod prelude;
pub mod registry;
pub mod storage;

pub use crate::builder::{CacheBuilder, CacheConfig, TierConfig};
pub use crate::cache::Cache;
pub use crate::concurrent::ConcurrentStorage;
pub use crate::dependency::{Dependency, FileDependency, ManualDependency};
pub use crate::entry::Entry;
pub use crate::error::{CacheError, StorageError};
pub use crate::multilevel::MultiLevelStorage;
pub use crate::registry::{StrategyKind, StrategyRegistry};
pub use crate::storage::{BoxedStorage, Storage};
