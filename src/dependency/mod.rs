//! External change-detectors attached to cache entries.
//!
//! A [`Dependency`] answers a single question: has the thing this entry was
//! derived from changed since the entry was built? The façade consults every
//! dependency of an entry on read; any one reporting a change makes the entry
//! expired regardless of its timers.
//!
//! ## Provided dependencies
//!
//! | Type                 | Changes when                                          |
//! |----------------------|-------------------------------------------------------|
//! | [`FileDependency`]   | the watched file is modified, removed or unreadable    |
//! | [`ManualDependency`] | [`ManualDependency::trigger`] is called on any clone   |
//!
//! ## Example
//!
//! ```
//! use tiercache::dependency::ManualDependency;
//! use tiercache::entry::Entry;
//!
//! let signal = ManualDependency::new();
//! let mut entry = Entry::new("config", "v1").unwrap();
//! entry.add_dependency(signal.clone());
//! assert!(!entry.has_expired());
//!
//! signal.trigger();
//! assert!(entry.has_expired());
//! ```

use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub mod file;

pub use file::FileDependency;

/// Capability consulted by an entry to decide whether it must be treated as
/// expired.
///
/// Implementations should be free of side effects: the façade may call
/// `has_changed` on every read.
pub trait Dependency: Debug + Send + Sync {
    /// Reports whether the watched condition changed.
    fn has_changed(&self) -> bool;
}

impl<D: Dependency + ?Sized> Dependency for Arc<D> {
    fn has_changed(&self) -> bool {
        (**self).has_changed()
    }
}

/// Dependency flipped explicitly by application code.
///
/// Clones share one flag, so the handle kept by the application and the one
/// attached to entries observe the same state.
#[derive(Debug, Clone, Default)]
pub struct ManualDependency {
    changed: Arc<AtomicBool>,
}

impl ManualDependency {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks every entry holding this dependency as expired.
    pub fn trigger(&self) {
        self.changed.store(true, Ordering::Release);
    }

    pub fn reset(&self) {
        self.changed.store(false, Ordering::Release);
    }
}

impl Dependency for ManualDependency {
    fn has_changed(&self) -> bool {
        self.changed.load(Ordering::Acquire)
    }
}
