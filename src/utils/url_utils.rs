//! URL and path manipulation utilities.
//!
//! This module maps between the URLs the inliner works with and the local
//! files the loader and CLI read.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use url::Url;

/// Check if a URL is fetchable over HTTP(S)
#[must_use]
pub fn is_http_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Local filesystem path for a `file:` URL or a bare (relative or absolute) path
///
/// Returns `None` for URLs with any other scheme.
#[must_use]
pub fn local_path(url: &str) -> Option<PathBuf> {
    match Url::parse(url) {
        Ok(parsed) if parsed.scheme() == "file" => parsed.to_file_path().ok(),
        // Windows drive letters parse as a one-letter scheme
        Ok(parsed) if parsed.scheme().len() == 1 => Some(PathBuf::from(url)),
        Ok(_) => None,
        Err(_) => Some(PathBuf::from(strip_query_and_fragment(url))),
    }
}

/// Turn CLI input (URL or path) into the URL used as the top-level base
pub fn input_to_url(input: &str) -> Result<String> {
    if is_http_url(input) || input.starts_with("file:") {
        return Ok(input.to_string());
    }

    let path = Path::new(input);
    let absolute = std::fs::canonicalize(path)
        .with_context(|| format!("Failed to resolve input path {}", path.display()))?;
    let url = Url::from_file_path(&absolute)
        .map_err(|()| anyhow::anyhow!("Path is not absolute: {}", absolute.display()))?;

    Ok(url.to_string())
}

/// Lowercased file extension of a URL's path, ignoring query and fragment
#[must_use]
pub fn url_extension(url: &str) -> Option<String> {
    Path::new(strip_query_and_fragment(url))
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// Image MIME type from a URL's extension
#[must_use]
pub fn image_mime_from_extension(url: &str) -> &'static str {
    match url_extension(url).as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("ico") => "image/x-icon",
        Some("avif") => "image/avif",
        _ => "application/octet-stream",
    }
}

fn strip_query_and_fragment(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}
