//! Configuration for CSS inlining
//!
//! `InlineOptions` carries the per-pass knobs (`base_url`, `cache`) that the
//! engine passes through to resource loaders.

pub mod types;

pub use types::{CachePolicy, InlineOptions};
