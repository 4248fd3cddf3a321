//! Core function-composition utilities for Kiln.
//!
//! This crate is pure: no IO, no threads, no global state. Everything in it
//! runs synchronously on the caller's thread.
//!
//! - **`lazy`**: values computed on first access ([`Lazy`], [`TryLazy`])
//! - **`memo`**: per-key result caches ([`Memoizer`], [`TryMemoizer`], [`RecursiveMemoizer`])
//! - **`pipeline`**: ordered `T -> T` stage lists ([`Pipeline`], [`TryPipeline`])
//! - **`predicate`**: composable boolean tests ([`Predicate`])
//! - **`compose`**: composition, currying and partial application helpers

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions
#![allow(clippy::must_use_candidate)]

pub mod compose;
pub mod lazy;
pub mod memo;
pub mod pipeline;
pub mod predicate;

pub use compose::{
    Transformer, and_then, compose, curry, identity, lift, partial, uncurry, unchecked,
};
pub use lazy::{Lazy, TryLazy};
pub use memo::{Memoizer, RecursiveMemoizer, TryMemoizer, memoize};
pub use pipeline::{Pipeline, PipelineBuilder, TryPipeline, TryPipelineBuilder};
pub use predicate::Predicate;
