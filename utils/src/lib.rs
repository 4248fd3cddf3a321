//! Shared infrastructure utilities for Kiln.
//!
//! This crate provides pieces that multiple Kiln crates need but that don't
//! belong in the pure `kiln-types` crate:
//!
//! - **`sync`**: Thread-safe lazy values and memoizers
//! - **`text`**: String stages for `Pipeline<String>`

pub mod sync;
pub mod text;

pub use sync::{SyncLazy, SyncMemoizer};
pub use text::{SLUG_MAX_LEN, TextError, slug_pipeline};
