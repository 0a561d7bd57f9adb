//! Eviction strategies.
//!
//! Each strategy is an in-memory [`Storage`](crate::storage::Storage) with a
//! fixed capacity. Saving a new key into a full strategy evicts one entry
//! first; which entry depends on the strategy:
//!
//! | Strategy        | Evicts on overflow                    | `get` reorders |
//! |-----------------|---------------------------------------|----------------|
//! | [`FifoStorage`] | oldest inserted                       | no             |
//! | [`LruStorage`]  | least recently used                   | yes            |
//! | [`MruStorage`]  | most recently saved                   | no             |
//! | [`LfuStorage`]  | lowest access count                   | yes (count)    |
//! | [`ArcStorage`]  | adaptive between recency and frequency | yes            |
//!
//! A capacity of 0 means unbounded. Each strategy sits behind a cargo feature
//! (`policy-fifo`, `policy-lru`, ...) and exposes a `register` function used
//! by [`StrategyRegistry::builtin`](crate::registry::StrategyRegistry::builtin).

#[cfg(feature = "policy-arc")]
pub mod arc;
#[cfg(feature = "policy-fifo")]
pub mod fifo;
#[cfg(feature = "policy-lfu")]
pub mod lfu;
#[cfg(feature = "policy-lru")]
pub mod lru;
#[cfg(feature = "policy-mru")]
pub mod mru;

#[cfg(feature = "policy-arc")]
pub use arc::ArcStorage;
#[cfg(feature = "policy-fifo")]
pub use fifo::FifoStorage;
#[cfg(feature = "policy-lfu")]
pub use lfu::LfuStorage;
#[cfg(feature = "policy-lru")]
pub use lru::LruStorage;
#[cfg(feature = "policy-mru")]
pub use mru::MruStorage;

/// Upper bound on slots reserved up front; larger capacities grow on demand.
const MAX_PREALLOCATED: usize = 4096;

/// Maps a registry capacity to a strategy capacity. Values `<= 0` mean unbounded.
pub(crate) fn capacity_from_signed(capacity: isize) -> usize {
    usize::try_from(capacity).unwrap_or(0)
}

pub(crate) fn preallocation(capacity: usize) -> usize {
    capacity.min(MAX_PREALLOCATED)
}

/// `true` once a bounded strategy holding `len` entries must evict before inserting.
pub(crate) fn at_capacity(len: usize, capacity: usize) -> bool {
    capacity > 0 && len >= capacity
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_capacity_is_unbounded() {
        assert_eq!(capacity_from_signed(-5), 0);
        assert_eq!(capacity_from_signed(0), 0);
        assert_eq!(capacity_from_signed(42), 42);
    }

    #[test]
    fn unbounded_is_never_at_capacity() {
        assert!(!at_capacity(usize::MAX, 0));
        assert!(!at_capacity(1, 2));
        assert!(at_capacity(2, 2));
    }

    #[test]
    fn preallocation_is_capped() {
        assert_eq!(preallocation(10), 10);
        assert_eq!(preallocation(usize::MAX), MAX_PREALLOCATED);
    }
}
