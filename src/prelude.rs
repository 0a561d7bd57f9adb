pub use crate::builder::{CacheBuilder, CacheConfig, TierConfig};
pub use crate::cache::Cache;
pub use crate::concurrent::ConcurrentStorage;
pub use crate::dependency::{Dependency, FileDependency, ManualDependency};
pub use crate::entry::Entry;
pub use crate::error::{CacheError, StorageError};
pub use crate::multilevel::MultiLevelStorage;
#[cfg(feature = "policy-arc")]
pub use crate::policy::arc::{ArcList, ArcStorage};
#[cfg(feature = "policy-fifo")]
pub use crate::policy::fifo::FifoStorage;
#[cfg(feature = "policy-lfu")]
pub use crate::policy::lfu::LfuStorage;
#[cfg(feature = "policy-lru")]
pub use crate::policy::lru::LruStorage;
#[cfg(feature = "policy-mru")]
pub use crate::policy::mru::MruStorage;
pub use crate::registry::{StrategyKind, StrategyRegistry};
pub use crate::storage::{BoxedStorage, Storage};
