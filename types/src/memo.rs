//! Single-argument memoization.
//!
//! Keys are compared by value (`Eq + Hash`). Caches are unbounded: every
//! distinct key stays until [`Memoizer::clear`] or drop.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::hash::Hash;

/// Caches the results of `function` keyed by its input.
pub struct Memoizer<K, V, F> {
    cache: HashMap<K, V>,
    function: F,
}

impl<K, V, F> Memoizer<K, V, F>
where
    K: Eq + Hash,
    F: Fn(&K) -> V,
{
    pub fn new(function: F) -> Self {
        Self {
            cache: HashMap::new(),
            function,
        }
    }

    /// Return the cached result for `key`, computing and storing it on a miss.
    pub fn apply(&mut self, key: K) -> &V {
        let cached = self.cache.len();
        match self.cache.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                tracing::trace!(cached, "Memoizer miss");
                let value = (self.function)(entry.key());
                entry.insert(value)
            }
        }
    }
}

impl<K, V, F> Memoizer<K, V, F> {
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool
    where
        K: Eq + Hash,
    {
        self.cache.contains_key(key)
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// The wrapped function, uncached.
    pub fn function(&self) -> &F {
        &self.function
    }
}

impl<K, V, F> fmt::Debug for Memoizer<K, V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoizer")
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}

/// Wrap `function` in a closure that owns a [`Memoizer`].
///
/// Results are cloned out of the cache on every call.
pub fn memoize<K, V, F>(function: F) -> impl FnMut(K) -> V
where
    K: Eq + Hash,
    V: Clone,
    F: Fn(&K) -> V,
{
    let mut memo = Memoizer::new(function);
    move |key| memo.apply(key).clone()
}

/// Memoizer for fallible functions. Errors are returned to the caller and never
/// cached, so the next call with the same key computes again.
pub struct TryMemoizer<K, V, F> {
    cache: HashMap<K, V>,
    function: F,
}

impl<K, V, E, F> TryMemoizer<K, V, F>
where
    K: Eq + Hash,
    F: Fn(&K) -> Result<V, E>,
{
    pub fn new(function: F) -> Self {
        Self {
            cache: HashMap::new(),
            function,
        }
    }

    pub fn try_apply(&mut self, key: K) -> Result<&V, E> {
        match self.cache.entry(key) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let value = (self.function)(entry.key())?;
                Ok(entry.insert(value))
            }
        }
    }
}

impl<K, V, F> TryMemoizer<K, V, F> {
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool
    where
        K: Eq + Hash,
    {
        self.cache.contains_key(key)
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

impl<K, V, F> fmt::Debug for TryMemoizer<K, V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TryMemoizer")
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}

/// Memoizer whose function can recurse through the cache.
///
/// The function receives the key and a `recurse` callback. Sub-results obtained
/// through `recurse` are cached like top-level calls, which is what makes
/// memoized fibonacci linear.
///
/// ```
/// use kiln_types::RecursiveMemoizer;
///
/// let mut fib = RecursiveMemoizer::new(|&n: &u64, recurse: &mut dyn FnMut(u64) -> u64| {
///     if n < 2 {
///         n
///     } else {
///         recurse(n - 1) + recurse(n - 2)
///     }
/// });
/// assert_eq!(fib.apply(80), 23_416_728_348_467_685);
/// ```
pub struct RecursiveMemoizer<K, V, F> {
    cache: HashMap<K, V>,
    function: F,
}

impl<K, V, F> RecursiveMemoizer<K, V, F>
where
    K: Eq + Hash,
    V: Clone,
    F: Fn(&K, &mut dyn FnMut(K) -> V) -> V,
{
    pub fn new(function: F) -> Self {
        Self {
            cache: HashMap::new(),
            function,
        }
    }

    pub fn apply(&mut self, key: K) -> V {
        compute(&self.function, &mut self.cache, key)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

fn compute<K, V, F>(function: &F, cache: &mut HashMap<K, V>, key: K) -> V
where
    K: Eq + Hash,
    V: Clone,
    F: Fn(&K, &mut dyn FnMut(K) -> V) -> V,
{
    if let Some(value) = cache.get(&key) {
        return value.clone();
    }
    let value = function(&key, &mut |sub| compute(function, cache, sub));
    cache.insert(key, value.clone());
    value
}

impl<K, V, F> fmt::Debug for RecursiveMemoizer<K, V, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecursiveMemoizer")
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}
