//! Cache entry model.
//!
//! An [`Entry`] carries one cached value together with the metadata the
//! façade needs to decide whether it is still fresh:
//!
//! ```text
//!   Entry<V>
//!   ┌──────────────────────────┬──────────────────────────────────────────┐
//!   │ key                      │ non-empty String                         │
//!   │ value                    │ V                                        │
//!   │ created_at               │ set once by `Entry::new`                 │
//!   │ accessed_at              │ bumped by the façade on every served get │
//!   │ absolute_expiration      │ optional wall-clock deadline             │
//!   │ sliding_expiration       │ optional idle period                     │
//!   │ dependencies             │ ordered change-detectors                 │
//!   └──────────────────────────┴──────────────────────────────────────────┘
//! ```
//!
//! ## Expiration
//!
//! Expiration is derived, never stored. [`Entry::has_expired_at`] evaluates,
//! in order, stopping at the first that holds:
//!
//! 1. absolute deadline set and earlier than `now`
//! 2. sliding period set and `(accessed_at or created_at) + period` earlier
//!    than `now`
//! 3. any dependency reporting [`has_changed`](Dependency::has_changed)
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//!
//! use chrono::Utc;
//! use tiercache::entry::Entry;
//!
//! let mut entry = Entry::new("session:42", vec![1u8, 2, 3]).unwrap();
//! entry.set_sliding_expiration(Duration::from_secs(30));
//!
//! let later = Utc::now() + chrono::Duration::seconds(60);
//! assert!(!entry.has_expired());
//! assert!(entry.has_expired_at(later));
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::dependency::Dependency;
use crate::error::CacheError;

/// One cached value with timestamps, expiration settings and dependencies.
///
/// Cloning an entry clones the value and shares the dependency handles.
#[derive(Clone)]
pub struct Entry<V> {
    key: String,
    value: V,
    created_at: DateTime<Utc>,
    accessed_at: Option<DateTime<Utc>>,
    absolute_expiration: Option<DateTime<Utc>>,
    sliding_expiration: Option<Duration>,
    dependencies: Vec<Arc<dyn Dependency>>,
}

impl<V> Entry<V> {
    /// Creates an entry stamped with the current time.
    ///
    /// Fails with [`CacheError::EmptyKey`] if `key` is empty.
    pub fn new(key: impl Into<String>, value: V) -> Result<Self, CacheError> {
        let key = key.into();
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }

        Ok(Self {
            key,
            value,
            created_at: Utc::now(),
            accessed_at: None,
            absolute_expiration: None,
            sliding_expiration: None,
            dependencies: Vec::new(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_value(self) -> V {
        self.value
    }

    pub fn set_value(&mut self, value: V) {
        self.value = value;
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Time the façade last returned this entry, `None` if never served.
    pub fn accessed_at(&self) -> Option<DateTime<Utc>> {
        self.accessed_at
    }

    pub fn absolute_expiration(&self) -> Option<DateTime<Utc>> {
        self.absolute_expiration
    }

    /// Sets a wall-clock deadline after which the entry is expired.
    pub fn set_absolute_expiration(&mut self, deadline: DateTime<Utc>) {
        self.absolute_expiration = Some(deadline);
    }

    pub fn clear_absolute_expiration(&mut self) {
        self.absolute_expiration = None;
    }

    pub fn sliding_expiration(&self) -> Option<Duration> {
        self.sliding_expiration
    }

    /// Sets the idle period; a zero period clears it.
    pub fn set_sliding_expiration(&mut self, period: Duration) {
        self.sliding_expiration = (!period.is_zero()).then_some(period);
    }

    pub fn dependencies(&self) -> &[Arc<dyn Dependency>] {
        &self.dependencies
    }

    /// Replaces the dependency list.
    pub fn set_dependencies<I>(&mut self, dependencies: I)
    where
        I: IntoIterator<Item = Arc<dyn Dependency>>,
    {
        self.dependencies = dependencies.into_iter().collect();
    }

    /// Appends one dependency to the end of the list.
    pub fn add_dependency(&mut self, dependency: impl Dependency + 'static) {
        self.dependencies.push(Arc::new(dependency));
    }

    /// Reports whether the entry is expired right now.
    pub fn has_expired(&self) -> bool {
        self.has_expired_at(Utc::now())
    }

    /// Reports whether the entry is expired at `now`.
    pub fn has_expired_at(&self, now: DateTime<Utc>) -> bool {
        if let Some(deadline) = self.absolute_expiration
            && deadline < now
        {
            return true;
        }

        if let Some(period) = self.sliding_expiration {
            let since = self.accessed_at.unwrap_or(self.created_at);
            // An unrepresentable deadline is treated as never reached.
            let idle_deadline = TimeDelta::from_std(period)
                .ok()
                .and_then(|delta| since.checked_add_signed(delta));
            if let Some(idle_deadline) = idle_deadline
                && idle_deadline < now
            {
                return true;
            }
        }

        self.dependencies.iter().any(|dep| dep.has_changed())
    }

    pub(crate) fn touch(&mut self) {
        self.touch_at(Utc::now());
    }

    pub(crate) fn touch_at(&mut self, now: DateTime<Utc>) {
        self.accessed_at = Some(now);
    }
}

impl<V: fmt::Debug> fmt::Debug for Entry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("created_at", &self.created_at)
            .field("accessed_at", &self.accessed_at)
            .field("absolute_expiration", &self.absolute_expiration)
            .field("sliding_expiration", &self.sliding_expiration)
            .field("dependencies", &self.dependencies.len())
            .finish()
    }
}
