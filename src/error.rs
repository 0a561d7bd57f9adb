//! Error types for the tiercache library.
//!
//! ## Key Components
//!
//! - [`StorageError`]: Returned by [`Storage`](crate::storage::Storage)
//!   implementations for genuine backend failures (I/O, connection). A missing
//!   key is never a `StorageError`; it is `Ok(None)`.
//! - [`CacheError`]: Returned by the [`Cache`](crate::cache::Cache) façade and
//!   constructors. Either a validation failure (empty key, no tiers, strategy
//!   compiled out) or a storage failure wrapped with the operation and key
//!   that triggered it.
//! - [`ParseStrategyError`]: Returned when a strategy name does not match any
//!   [`StrategyKind`](crate::registry::StrategyKind).
//!
//! ## Example Usage
//!
//! ```
//! use tiercache::entry::Entry;
//! use tiercache::error::CacheError;
//!
//! let err = Entry::new("", 1).unwrap_err();
//! assert!(matches!(err, CacheError::EmptyKey));
//! assert_eq!(err.to_string(), "cache: key of entry cannot be empty");
//! ```

use thiserror::Error;

use crate::registry::StrategyKind;

/// Boxed error type carried by [`StorageError::Backend`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ---------------------------------------------------------------------------
// StorageError
// ---------------------------------------------------------------------------

/// Failure reported by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A backend-specific failure (I/O, connection, encoding).
    #[error("storage backend failure: {0}")]
    Backend(#[source] BoxError),

    /// A failure in one tier of a multilevel storage.
    #[error("storage tier #{index} failed")]
    Tier {
        index: usize,
        #[source]
        source: Box<StorageError>,
    },
}

impl StorageError {
    /// Wraps any backend error.
    pub fn backend(err: impl Into<BoxError>) -> Self {
        Self::Backend(err.into())
    }

    pub(crate) fn tier(index: usize, source: StorageError) -> Self {
        Self::Tier {
            index,
            source: Box::new(source),
        }
    }
}

// ---------------------------------------------------------------------------
// CacheError
// ---------------------------------------------------------------------------

/// Error returned by the cache façade and storage constructors.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache: key of entry cannot be empty")]
    EmptyKey,

    #[error("cache: storage tiers cannot be empty")]
    NoTiers,

    #[error("cache: strategy {0} is not available in this build")]
    UnavailableStrategy(StrategyKind),

    #[error("cache: could not clear entries")]
    Clear(#[source] StorageError),

    #[error("cache: could not remove entry with key {key:?}")]
    Remove {
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("cache: could not save entry with key {key:?}")]
    Save {
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("cache: could not get entry with key {key:?}")]
    Get {
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("cache: could not remove expired entry with key {key:?}")]
    RemoveExpired {
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("cache: could not refresh access time of entry with key {key:?}")]
    Touch {
        key: String,
        #[source]
        source: StorageError,
    },
}

impl CacheError {
    /// Returns `true` for argument validation failures, which never mutate storage.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyKey | Self::NoTiers | Self::UnavailableStrategy(_)
        )
    }

    /// Returns the key involved in a wrapped storage failure, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Remove { key, .. }
            | Self::Save { key, .. }
            | Self::Get { key, .. }
            | Self::RemoveExpired { key, .. }
            | Self::Touch { key, .. } => Some(key),
            Self::EmptyKey | Self::NoTiers | Self::UnavailableStrategy(_) | Self::Clear(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ParseStrategyError
// ---------------------------------------------------------------------------

/// Error returned when parsing an unknown strategy name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown cache strategy {0:?} (expected one of fifo, lfu, lru, mru, arc)")]
pub struct ParseStrategyError(pub(crate) String);

impl ParseStrategyError {
    /// Returns the name that failed to parse.
    pub fn name(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
