//! Thread-safe counterparts of `kiln_types::Lazy` and `kiln_types::Memoizer`.
//!
//! The single-threaded types keep their state in `Cell`s and `&mut self`.
//! These wrap the same semantics in `OnceLock` and `Mutex` so they can sit in
//! a `static` or behind an `Arc`.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::ops::Deref;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// A value computed on first access, shareable across threads.
///
/// Concurrent first callers block until one of them has run the producer; the
/// producer runs at most once.
pub struct SyncLazy<T, F = fn() -> T> {
    value: OnceLock<T>,
    init: Mutex<Option<F>>,
}

impl<T, F: FnOnce() -> T> SyncLazy<T, F> {
    pub const fn new(init: F) -> Self {
        Self {
            value: OnceLock::new(),
            init: Mutex::new(Some(init)),
        }
    }

    /// # Panics
    ///
    /// Panics if an earlier call's producer panicked.
    pub fn get(&self) -> &T {
        self.value.get_or_init(|| {
            let init = self
                .init
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take();
            match init {
                Some(init) => {
                    tracing::trace!("SyncLazy value initializing");
                    init()
                }
                None => panic!("SyncLazy instance has previously been poisoned"),
            }
        })
    }
}

impl<T, F> SyncLazy<T, F> {
    pub fn is_computed(&self) -> bool {
        self.value.get().is_some()
    }
}

impl<T, F: FnOnce() -> T> Deref for SyncLazy<T, F> {
    type Target = T;

    fn deref(&self) -> &T {
        self.get()
    }
}

impl<T: fmt::Debug, F> fmt::Debug for SyncLazy<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_tuple("SyncLazy");
        match self.value.get() {
            Some(value) => d.field(value),
            None => d.field(&format_args!("<uninit>")),
        };
        d.finish()
    }
}

/// A memoizer that can be called from several threads at once.
///
/// Each key gets its own `OnceLock` slot. The map lock is held only long
/// enough to find or insert the slot, so computations for different keys run
/// in parallel while the function still runs at most once per key.
pub struct SyncMemoizer<K, V, F> {
    slots: Mutex<HashMap<K, Arc<OnceLock<V>>>>,
    function: F,
}

impl<K, V, F> SyncMemoizer<K, V, F>
where
    K: Eq + Hash + Clone,
    V: Clone,
    F: Fn(&K) -> V,
{
    pub fn new(function: F) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            function,
        }
    }

    pub fn apply(&self, key: K) -> V {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(key.clone()).or_default())
        };
        slot.get_or_init(|| {
            tracing::trace!("SyncMemoizer miss");
            (self.function)(&key)
        })
        .clone()
    }
}

impl<K, V, F> SyncMemoizer<K, V, F>
where
    K: Eq + Hash,
{
    /// Number of keys with a computed value.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| slot.get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: &K) -> bool {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .is_some_and(|slot| slot.get().is_some())
    }

    pub fn clear(&self) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl<K, V, F> fmt::Debug for SyncMemoizer<K, V, F>
where
    K: Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncMemoizer")
            .field("cached", &self.len())
            .finish_non_exhaustive()
    }
}
