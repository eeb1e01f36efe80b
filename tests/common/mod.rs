//! Test utilities and helper functions for the inliner test suite

use std::collections::HashMap;
use std::time::Duration;

use kodegen_tools_inline_css::InlineOptions;
use kodegen_tools_inline_css::inline_css::{FetchError, LoaderFuture, ResourceLoader};
use mockito::{Mock, Server};
use parking_lot::Mutex;

/// Which loader method was called
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Text,
    Binary,
    Image,
}

/// One recorded loader call
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderCall {
    pub kind: CallKind,
    pub url: String,
    pub options: InlineOptions,
}

/// In-memory [`ResourceLoader`] serving canned responses
///
/// Unknown URLs fail. Every call is recorded in order of issue.
#[allow(dead_code)]
#[derive(Default)]
pub struct MockLoader {
    texts: HashMap<String, String>,
    binaries: HashMap<String, Vec<u8>>,
    images: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    identity_join: bool,
    calls: Mutex<Vec<LoaderCall>>,
}

#[allow(dead_code)]
impl MockLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, url: &str, css: &str) -> Self {
        self.texts.insert(url.to_string(), css.to_string());
        self
    }

    pub fn with_binary(mut self, url: &str, bytes: &[u8]) -> Self {
        self.binaries.insert(url.to_string(), bytes.to_vec());
        self
    }

    pub fn with_image(mut self, url: &str, data_uri: &str) -> Self {
        self.images.insert(url.to_string(), data_uri.to_string());
        self
    }

    /// Delay the response for `url`, to make completion order differ from issue order
    pub fn with_delay(mut self, url: &str, millis: u64) -> Self {
        self.delays
            .insert(url.to_string(), Duration::from_millis(millis));
        self
    }

    /// Return URLs unjoined, ignoring any base
    pub fn with_identity_join(mut self) -> Self {
        self.identity_join = true;
        self
    }

    pub fn calls(&self) -> Vec<LoaderCall> {
        self.calls.lock().clone()
    }

    pub fn urls_of(&self, kind: CallKind) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.url.clone())
            .collect()
    }

    pub fn call_count(&self, kind: CallKind) -> usize {
        self.urls_of(kind).len()
    }

    fn record(&self, kind: CallKind, url: &str, options: &InlineOptions) {
        self.calls.lock().push(LoaderCall {
            kind,
            url: url.to_string(),
            options: options.clone(),
        });
    }

    async fn respond<T: Clone>(
        &self,
        table: &HashMap<String, T>,
        url: &str,
    ) -> Result<T, FetchError> {
        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }
        table
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::new(url, "not mocked"))
    }
}

impl ResourceLoader for MockLoader {
    fn fetch_text<'a>(&'a self, url: &'a str, options: &'a InlineOptions) -> LoaderFuture<'a, String> {
        self.record(CallKind::Text, url, options);
        Box::pin(self.respond(&self.texts, url))
    }

    fn fetch_binary<'a>(
        &'a self,
        url: &'a str,
        options: &'a InlineOptions,
    ) -> LoaderFuture<'a, Vec<u8>> {
        self.record(CallKind::Binary, url, options);
        Box::pin(self.respond(&self.binaries, url))
    }

    fn image_data_uri<'a>(
        &'a self,
        url: &'a str,
        options: &'a InlineOptions,
    ) -> LoaderFuture<'a, String> {
        self.record(CallKind::Image, url, options);
        Box::pin(self.respond(&self.images, url))
    }

    fn join_url(&self, base: Option<&str>, url: &str) -> String {
        if self.identity_join {
            url.to_string()
        } else {
            kodegen_tools_inline_css::inline_css::join_url(base, url)
        }
    }
}

/// Sets up a mock HTTP server
#[allow(dead_code)]
pub async fn setup_mock_server() -> mockito::ServerGuard {
    Server::new_async().await
}

/// Creates a mock endpoint that returns a stylesheet
#[allow(dead_code)]
pub async fn create_css_mock(server: &mut Server, path: &str, css: &str) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "text/css; charset=utf-8")
        .with_body(css)
        .create_async()
        .await
}

/// Creates a mock endpoint that returns binary content of the given type
#[allow(dead_code)]
pub async fn create_binary_mock(server: &mut Server, path: &str, content_type: &str, body: &[u8]) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", content_type)
        .with_body(body)
        .create_async()
        .await
}

/// Creates a mock endpoint that returns an error
#[allow(dead_code)]
pub async fn create_error_mock(server: &mut Server, path: &str, status: usize) -> Mock {
    server
        .mock("GET", path)
        .with_status(status)
        .with_body("Error")
        .create_async()
        .await
}

/// Helper to create test URLs
#[allow(dead_code)]
pub fn test_url(server: &Server, path: &str) -> String {
    format!("{}{}", server.url(), path)
}
