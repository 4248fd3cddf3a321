//! Deferred values computed on first access.
//!
//! [`Lazy`] holds an infallible producer that runs at most once. [`TryLazy`]
//! holds a fallible producer and keeps it around until an attempt succeeds.

use std::cell::{Cell, OnceCell, RefCell};
use std::fmt;
use std::ops::Deref;

/// A value computed by `F` the first time it is requested.
///
/// The producer is dropped as soon as it has run, so anything it captured is
/// released along with it.
///
/// If the producer panics the holder is poisoned: the producer has already
/// been consumed, and every later [`get`](Self::get) panics as well.
pub struct Lazy<T, F = fn() -> T> {
    value: OnceCell<T>,
    init: Cell<Option<F>>,
}

impl<T, F: FnOnce() -> T> Lazy<T, F> {
    /// Wrap `init` without running it.
    pub const fn new(init: F) -> Self {
        Self {
            value: OnceCell::new(),
            init: Cell::new(Some(init)),
        }
    }

    /// Alias for [`Lazy::new`].
    pub const fn of(init: F) -> Self {
        Self::new(init)
    }

    /// Return the value, running the producer if this is the first call.
    ///
    /// # Panics
    ///
    /// Panics if an earlier call's producer panicked.
    pub fn get(&self) -> &T {
        self.value.get_or_init(|| match self.init.take() {
            Some(init) => {
                tracing::trace!("Lazy value initializing");
                init()
            }
            None => panic!("Lazy instance has previously been poisoned"),
        })
    }

    /// Consume the holder, returning the value only if it was computed.
    pub fn into_inner(self) -> Option<T> {
        self.value.into_inner()
    }
}

impl<T, F> Lazy<T, F> {
    pub fn is_computed(&self) -> bool {
        self.value.get().is_some()
    }

    /// The value if it has already been computed. Never runs the producer.
    pub fn peek(&self) -> Option<&T> {
        self.value.get()
    }
}

impl<T, F: FnOnce() -> T> Deref for Lazy<T, F> {
    type Target = T;

    fn deref(&self) -> &T {
        self.get()
    }
}

impl<T: fmt::Debug, F> fmt::Debug for Lazy<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_tuple("Lazy");
        match self.value.get() {
            Some(value) => d.field(value),
            None => d.field(&format_args!("<uninit>")),
        };
        d.finish()
    }
}

/// A value computed by a fallible producer.
///
/// A failed attempt leaves the holder uncomputed and keeps the producer, so the
/// next [`get`](Self::get) tries again. The producer is dropped after the first
/// success.
pub struct TryLazy<T, F> {
    value: OnceCell<T>,
    init: RefCell<Option<F>>,
}

impl<T, E, F> TryLazy<T, F>
where
    F: FnMut() -> Result<T, E>,
{
    pub const fn new(init: F) -> Self {
        Self {
            value: OnceCell::new(),
            init: RefCell::new(Some(init)),
        }
    }

    /// Return the value, attempting initialization if none is stored yet.
    ///
    /// # Panics
    ///
    /// Panics if the producer re-enters `get` on the same holder.
    pub fn get(&self) -> Result<&T, E> {
        if let Some(value) = self.value.get() {
            return Ok(value);
        }

        let mut slot = self.init.borrow_mut();
        let value = match slot.as_mut() {
            Some(init) => match init() {
                Ok(value) => value,
                Err(err) => {
                    tracing::debug!("TryLazy initialization failed; will retry on next access");
                    return Err(err);
                }
            },
            // The producer is only cleared after `value` has been set.
            None => unreachable!("TryLazy producer missing before initialization"),
        };
        *slot = None;
        drop(slot);

        Ok(self.value.get_or_init(|| value))
    }

    pub fn is_computed(&self) -> bool {
        self.value.get().is_some()
    }

    pub fn into_inner(self) -> Option<T> {
        self.value.into_inner()
    }
}

impl<T: fmt::Debug, F> fmt::Debug for TryLazy<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_tuple("TryLazy");
        match self.value.get() {
            Some(value) => d.field(value),
            None => d.field(&format_args!("<uninit>")),
        };
        d.finish()
    }
}
