//! Resource loader seam between the inlining engine and the transport

use std::future::Future;
use std::pin::Pin;

use super::errors::FetchError;
use crate::config::InlineOptions;

/// Type alias for a loader future
pub type LoaderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, FetchError>> + Send + 'a>>;

/// Everything the engine needs from the outside world.
///
/// URLs handed to the loader have already been joined against the relevant
/// base. `options` is passed through untouched so implementations can honour
/// `cache` (and see `base_url` if they need it).
pub trait ResourceLoader: Send + Sync {
    /// Fetch stylesheet text
    fn fetch_text<'a>(&'a self, url: &'a str, options: &'a InlineOptions) -> LoaderFuture<'a, String>;

    /// Fetch raw bytes (fonts)
    fn fetch_binary<'a>(
        &'a self,
        url: &'a str,
        options: &'a InlineOptions,
    ) -> LoaderFuture<'a, Vec<u8>>;

    /// Fetch an image and return it as a `data:` URI.
    ///
    /// An empty string is a valid result for a zero-byte resource.
    fn image_data_uri<'a>(
        &'a self,
        url: &'a str,
        options: &'a InlineOptions,
    ) -> LoaderFuture<'a, String>;

    /// Join a possibly relative URL onto a base
    fn join_url(&self, base: Option<&str>, url: &str) -> String {
        super::utils::join_url(base, url)
    }
}
