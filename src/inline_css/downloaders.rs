//! Download functionality for stylesheets, images and fonts
//!
//! [`HttpLoader`] is the production [`ResourceLoader`]. It fetches `http(s)`
//! URLs with reqwest and reads `file:` URLs and bare paths from disk, enforcing
//! per-kind timeouts and size limits from [`InlineConfig`].
//!
//! ## Usage
//!
//! ```ignore
//! use kodegen_tools_inline_css::inline_css::{HttpLoader, InlineConfig, inline_stylesheet};
//! use kodegen_tools_inline_css::InlineOptions;
//!
//! let loader = HttpLoader::new(InlineConfig::default());
//! let options = InlineOptions::new().with_base_url("https://example.com/css/site.css");
//! let result = inline_stylesheet(css, &loader, &options).await;
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use futures::StreamExt;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_ENCODING, CACHE_CONTROL, CONTENT_TYPE, USER_AGENT};
use url::Url;

use super::css_url::is_data_uri;
use super::errors::FetchError;
use super::loader::{LoaderFuture, ResourceLoader};
use super::utils::encode_data_uri;
use crate::config::InlineOptions;
use crate::utils::constants::{
    CACHE_BUST_PARAM, CHROME_USER_AGENT, DEFAULT_CSS_TIMEOUT, DEFAULT_FONT_TIMEOUT,
    DEFAULT_IMAGE_TIMEOUT, MAX_CSS_SIZE, MAX_FONT_SIZE, MAX_IMAGE_SIZE,
};
use crate::utils::url_utils::{image_mime_from_extension, local_path};

/// Configuration for download timeouts and size limits
#[derive(Debug, Clone)]
pub struct InlineConfig {
    /// Timeout for stylesheet downloads
    pub css_timeout: Duration,
    /// Timeout for image downloads
    pub image_timeout: Duration,
    /// Timeout for font downloads
    pub font_timeout: Duration,

    /// Maximum size for stylesheet downloads (bytes)
    pub max_css_size: usize,

    /// Maximum size for image downloads (bytes)
    /// Images larger than this should not be inlined as data URLs
    pub max_image_size: usize,

    /// Maximum size for font downloads (bytes)
    pub max_font_size: usize,

    pub user_agent: String,
}

impl Default for InlineConfig {
    fn default() -> Self {
        Self {
            css_timeout: DEFAULT_CSS_TIMEOUT,
            image_timeout: DEFAULT_IMAGE_TIMEOUT,
            font_timeout: DEFAULT_FONT_TIMEOUT,

            max_css_size: MAX_CSS_SIZE,
            max_image_size: MAX_IMAGE_SIZE,
            max_font_size: MAX_FONT_SIZE,

            user_agent: CHROME_USER_AGENT.to_string(),
        }
    }
}

/// What is being downloaded; selects timeout, size cap and `Accept` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DownloadKind {
    Stylesheet,
    Image,
    Font,
}

impl DownloadKind {
    fn label(self) -> &'static str {
        match self {
            Self::Stylesheet => "CSS",
            Self::Image => "Image",
            Self::Font => "Font",
        }
    }

    fn accept(self) -> &'static str {
        match self {
            Self::Stylesheet => "text/css,*/*;q=0.1",
            Self::Image => "image/avif,image/webp,image/apng,image/*,*/*;q=0.8",
            Self::Font => "font/woff2,font/woff,application/font-woff,*/*;q=0.8",
        }
    }

    fn timeout(self, config: &InlineConfig) -> Duration {
        match self {
            Self::Stylesheet => config.css_timeout,
            Self::Image => config.image_timeout,
            Self::Font => config.font_timeout,
        }
    }

    fn max_size(self, config: &InlineConfig) -> usize {
        match self {
            Self::Stylesheet => config.max_css_size,
            Self::Image => config.max_image_size,
            Self::Font => config.max_font_size,
        }
    }
}

/// Downloaded bytes plus the server-declared content type, if any
struct Download {
    bytes: Vec<u8>,
    content_type: Option<String>,
}

/// Production resource loader over HTTP(S) and the local filesystem
#[derive(Debug, Clone)]
pub struct HttpLoader {
    // Client already uses Arc internally, so cloning the loader is cheap
    client: Client,
    config: InlineConfig,
}

impl Default for HttpLoader {
    fn default() -> Self {
        Self::new(InlineConfig::default())
    }
}

impl HttpLoader {
    #[must_use]
    pub fn new(config: InlineConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Use a preconfigured client (proxies, TLS roots)
    #[must_use]
    pub fn with_client(client: Client, config: InlineConfig) -> Self {
        Self { client, config }
    }

    async fn download(
        &self,
        url: &str,
        kind: DownloadKind,
        options: &InlineOptions,
    ) -> Result<Download> {
        if let Some(path) = local_path(url) {
            return read_local(&path, kind, &self.config).await;
        }

        let mut parsed = Url::parse(url).with_context(|| format!("Invalid URL: {url}"))?;
        match parsed.scheme() {
            "http" | "https" => {}
            scheme => anyhow::bail!("Unsupported URL scheme '{scheme}'"),
        }

        if options.bypass_cache() {
            let stamp = chrono::Utc::now().timestamp_millis().to_string();
            parsed
                .query_pairs_mut()
                .append_pair(CACHE_BUST_PARAM, &stamp);
        }

        self.download_http(parsed, kind, options).await
    }

    /// Handles HTTP download with streaming, size limits, and timeout.
    async fn download_http(
        &self,
        url: Url,
        kind: DownloadKind,
        options: &InlineOptions,
    ) -> Result<Download> {
        let label = kind.label();
        let max_size = kind.max_size(&self.config);

        let mut request = self
            .client
            .get(url)
            .timeout(kind.timeout(&self.config))
            .header(USER_AGENT, &self.config.user_agent)
            .header(ACCEPT, kind.accept())
            .header(ACCEPT_ENCODING, "gzip, deflate, br");
        if options.bypass_cache() {
            request = request.header(CACHE_CONTROL, "no-cache");
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to download {label}"))?;

        // Check status
        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "{label} download failed with status: {}",
                response.status()
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // Get expected size and enforce limit BEFORE downloading
        let expected_size = response.content_length().unwrap_or(0);
        if expected_size > max_size as u64 {
            return Err(anyhow::anyhow!(
                "{label} too large: {expected_size} bytes exceeds limit of {max_size} bytes"
            ));
        }

        let mut buffer = if expected_size > 0 {
            Vec::with_capacity(expected_size as usize)
        } else {
            Vec::new()
        };

        // Stream response with size checking (second line of defense)
        let mut stream = response.bytes_stream();
        let mut total_size = 0;

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.with_context(|| format!("Failed to read {label} chunk"))?;

            // Check BEFORE accumulating
            let new_total = total_size + chunk.len();
            if new_total > max_size {
                return Err(anyhow::anyhow!(
                    "{label} download exceeded size limit during download: {new_total} bytes (max: {max_size})"
                ));
            }

            buffer.extend_from_slice(&chunk);
            total_size = new_total;
        }

        Ok(Download {
            bytes: buffer,
            content_type,
        })
    }
}

async fn read_local(path: &Path, kind: DownloadKind, config: &InlineConfig) -> Result<Download> {
    let label = kind.label();
    let max_size = kind.max_size(config);

    let metadata = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("Failed to stat {label} file {}", path.display()))?;
    if metadata.len() > max_size as u64 {
        return Err(anyhow::anyhow!(
            "{label} file too large: {} bytes exceeds limit of {max_size} bytes",
            metadata.len()
        ));
    }

    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {label} file {}", path.display()))?;

    Ok(Download {
        bytes,
        content_type: None,
    })
}

/// Decode stylesheet bytes, dropping a UTF-8 byte order mark
fn decode_text(bytes: Vec<u8>) -> Result<String> {
    let text = String::from_utf8(bytes).context("CSS content is not valid UTF-8")?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// Media type from a `Content-Type` header value, parameters dropped
fn media_type(content_type: &str) -> Option<&str> {
    let media = content_type.split(';').next()?.trim();
    (!media.is_empty()).then_some(media)
}

impl ResourceLoader for HttpLoader {
    fn fetch_text<'a>(&'a self, url: &'a str, options: &'a InlineOptions) -> LoaderFuture<'a, String> {
        Box::pin(async move {
            let download = self
                .download(url, DownloadKind::Stylesheet, options)
                .await
                .map_err(|e| FetchError::from_anyhow(url, &e))?;
            decode_text(download.bytes).map_err(|e| FetchError::from_anyhow(url, &e))
        })
    }

    fn fetch_binary<'a>(
        &'a self,
        url: &'a str,
        options: &'a InlineOptions,
    ) -> LoaderFuture<'a, Vec<u8>> {
        Box::pin(async move {
            self.download(url, DownloadKind::Font, options)
                .await
                .map(|download| download.bytes)
                .map_err(|e| FetchError::from_anyhow(url, &e))
        })
    }

    fn image_data_uri<'a>(
        &'a self,
        url: &'a str,
        options: &'a InlineOptions,
    ) -> LoaderFuture<'a, String> {
        Box::pin(async move {
            if is_data_uri(url) {
                return Ok(url.to_string());
            }

            let download = self
                .download(url, DownloadKind::Image, options)
                .await
                .map_err(|e| FetchError::from_anyhow(url, &e))?;

            let mime = download
                .content_type
                .as_deref()
                .and_then(media_type)
                .unwrap_or_else(|| image_mime_from_extension(url));

            log::debug!(
                "Encoded image {url} as {mime} ({} bytes)",
                download.bytes.len()
            );
            Ok(encode_data_uri(&download.bytes, mime))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_byte_order_mark() {
        let bytes = "\u{feff}p { color: red; }".as_bytes().to_vec();
        assert_eq!(decode_text(bytes).unwrap(), "p { color: red; }");
    }

    #[test]
    fn rejects_invalid_utf8() {
        assert!(decode_text(vec![0xff, 0xfe, 0x00]).is_err());
    }

    #[test]
    fn media_type_drops_parameters() {
        assert_eq!(media_type("image/png; charset=binary"), Some("image/png"));
        assert_eq!(media_type("image/gif"), Some("image/gif"));
        assert_eq!(media_type("  ;q=1"), None);
    }

    #[test]
    fn default_config_uses_shared_limits() {
        let config = InlineConfig::default();
        assert_eq!(config.max_css_size, MAX_CSS_SIZE);
        assert_eq!(DownloadKind::Font.max_size(&config), MAX_FONT_SIZE);
        assert_eq!(DownloadKind::Image.timeout(&config), DEFAULT_IMAGE_TIMEOUT);
    }
}
