//! Function composition, currying and partial application.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// `x -> g(f(x))`.
pub fn and_then<A, B, C>(f: impl Fn(A) -> B, g: impl Fn(B) -> C) -> impl Fn(A) -> C {
    move |a| g(f(a))
}

/// `x -> f(g(x))`, the mirror of [`and_then`].
pub fn compose<A, B, C>(f: impl Fn(B) -> C, g: impl Fn(A) -> B) -> impl Fn(A) -> C {
    move |a| f(g(a))
}

pub fn identity<T>(value: T) -> T {
    value
}

/// Split a two-argument function into a chain of single-argument ones.
///
/// ```
/// let add = kiln_types::curry(|a: i32, b: i32| a + b);
/// let add5 = add(5);
/// assert_eq!(add5(3), 8);
/// ```
pub fn curry<A, B, R, F>(f: F) -> impl Fn(A) -> Box<dyn Fn(B) -> R + Send + Sync>
where
    A: Clone + Send + Sync + 'static,
    B: 'static,
    R: 'static,
    F: Fn(A, B) -> R + Send + Sync + 'static,
{
    let f = Arc::new(f);
    move |a: A| -> Box<dyn Fn(B) -> R + Send + Sync> {
        let f = Arc::clone(&f);
        Box::new(move |b| f(a.clone(), b))
    }
}

/// Inverse of [`curry`].
pub fn uncurry<A, B, R, G, F>(f: F) -> impl Fn(A, B) -> R
where
    F: Fn(A) -> G,
    G: Fn(B) -> R,
{
    move |a, b| f(a)(b)
}

/// Fix the first argument of a two-argument function.
pub fn partial<A, B, R>(f: impl Fn(A, B) -> R, a: A) -> impl Fn(B) -> R
where
    A: Clone,
{
    move |b| f(a.clone(), b)
}

/// Turn a fallible function into one that discards the error.
pub fn lift<T, R, E>(f: impl Fn(T) -> Result<R, E>) -> impl Fn(T) -> Option<R> {
    move |t| f(t).ok()
}

/// Turn a fallible function into one that panics on error.
///
/// # Panics
///
/// The returned closure panics with the error's `Debug` output when `f` fails.
pub fn unchecked<T, R, E: fmt::Debug>(f: impl Fn(T) -> Result<R, E>) -> impl Fn(T) -> R {
    move |t| match f(t) {
        Ok(value) => value,
        Err(err) => panic!("unchecked function failed: {err:?}"),
    }
}

/// A step that takes its input together with a shared context.
///
/// The context is threaded unchanged through [`Transformer::and_then`] chains.
pub trait Transformer<T, R, C> {
    fn transform(&self, input: T, context: &C) -> R;

    fn and_then<V, G>(self, after: G) -> AndThen<Self, G, R>
    where
        Self: Sized,
        G: Fn(R, &C) -> V,
    {
        AndThen {
            first: self,
            after,
            _mid: PhantomData,
        }
    }
}

impl<T, R, C, F> Transformer<T, R, C> for F
where
    F: Fn(T, &C) -> R,
{
    fn transform(&self, input: T, context: &C) -> R {
        self(input, context)
    }
}

/// Returned by [`Transformer::and_then`].
pub struct AndThen<A, G, R> {
    first: A,
    after: G,
    _mid: PhantomData<fn() -> R>,
}

impl<T, R, V, C, A, G> Transformer<T, V, C> for AndThen<A, G, R>
where
    A: Transformer<T, R, C>,
    G: Fn(R, &C) -> V,
{
    fn transform(&self, input: T, context: &C) -> V {
        (self.after)(self.first.transform(input, context), context)
    }
}
