//! Options passed through every inlining pass
//!
//! The engine never interprets these beyond URL joining; both knobs are
//! handed verbatim to the resource loader.

use serde::{Deserialize, Serialize};

/// Cache behaviour requested from the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CachePolicy {
    /// Let the transport cache as it normally would
    #[default]
    Default,
    /// Bypass caches (the HTTP loader adds a cache-busting query parameter)
    None,
}

/// Immutable configuration for one inlining pass
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineOptions {
    /// Base for resolving relative URLs when no stylesheet-relative base applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) base_url: Option<String>,
    #[serde(default)]
    pub(crate) cache: CachePolicy,
}

impl InlineOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_cache(mut self, cache: CachePolicy) -> Self {
        self.cache = cache;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    #[must_use]
    pub fn cache(&self) -> CachePolicy {
        self.cache
    }

    /// Whether the caller asked to circumvent caches
    #[must_use]
    pub fn bypass_cache(&self) -> bool {
        self.cache == CachePolicy::None
    }
}
