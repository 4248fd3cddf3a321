//! Composable boolean tests.

use std::fmt;
use std::sync::Arc;

/// A shareable test over `&T`.
///
/// Combinators evaluate left to right and short-circuit.
pub struct Predicate<T: ?Sized> {
    test: Arc<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T: ?Sized> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Self {
            test: Arc::clone(&self.test),
        }
    }
}

impl<T: ?Sized + 'static> Predicate<T> {
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            test: Arc::new(test),
        }
    }

    pub fn always() -> Self {
        Self::new(|_| true)
    }

    pub fn never() -> Self {
        Self::new(|_| false)
    }

    pub fn test(&self, value: &T) -> bool {
        (self.test)(value)
    }

    #[must_use]
    pub fn and(&self, other: &Self) -> Self {
        let (a, b) = (self.clone(), other.clone());
        Self::new(move |value| a.test(value) && b.test(value))
    }

    #[must_use]
    pub fn or(&self, other: &Self) -> Self {
        let (a, b) = (self.clone(), other.clone());
        Self::new(move |value| a.test(value) || b.test(value))
    }

    #[must_use]
    pub fn negate(&self) -> Self {
        let inner = self.clone();
        Self::new(move |value| !inner.test(value))
    }

    /// Passes when every predicate passes. An empty set always passes.
    pub fn all_of(predicates: impl IntoIterator<Item = Self>) -> Self {
        let predicates: Vec<Self> = predicates.into_iter().collect();
        Self::new(move |value| predicates.iter().all(|p| p.test(value)))
    }

    /// Passes when any predicate passes. An empty set never passes.
    pub fn any_of(predicates: impl IntoIterator<Item = Self>) -> Self {
        let predicates: Vec<Self> = predicates.into_iter().collect();
        Self::new(move |value| predicates.iter().any(|p| p.test(value)))
    }

    /// Borrowing adapter for iterator filters: `iter.filter(p.as_fn())`.
    pub fn as_fn(&self) -> impl Fn(&&T) -> bool + '_ {
        move |value: &&T| self.test(value)
    }
}

impl<T: ?Sized> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").finish_non_exhaustive()
    }
}
