//! Error types for CSS inlining
//!
//! Only [`InvalidUrl`] and [`FetchError`] exist as Rust errors. Per-resource load
//! failures are never propagated; they become [`InliningError`] records.
//!
//! [`InliningError`]: super::types::InliningError

use thiserror::Error;

/// The text is not `url(...)` functional notation.
///
/// Recoverable: callers read it as "not a resource reference" (e.g. `local(...)`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid url: {0}")]
pub struct InvalidUrl(pub String);

/// A loader could not retrieve a resource
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to fetch {url}: {reason}")]
pub struct FetchError {
    pub url: String,
    pub reason: String,
}

impl FetchError {
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Wrap an `anyhow` chain from the download internals
    pub fn from_anyhow(url: impl Into<String>, error: &anyhow::Error) -> Self {
        Self::new(url, format!("{error:#}"))
    }
}
