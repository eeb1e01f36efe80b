//! Utility functions for URL handling and resource resolution

use anyhow::{Context, Result};
use base64::Engine;
use url::Url;

/// Origin used to resolve against bases that are themselves relative
const SYNTHETIC_ORIGIN: &str = "http://relative.invalid";

/// Resolve a potentially relative URL against an absolute base URL
///
/// This function ensures proper percent-encoding of query parameters,
/// fixing issues with URLs from stylesheets that have unencoded special characters
/// (e.g., Google Fonts URLs with `:`, `,`, `@`, `;` in query strings).
pub fn resolve_url(base_url: &str, url: &str) -> Result<String> {
    let base = Url::parse(base_url).context("Invalid base URL")?;
    let mut resolved = base.join(url).context("Failed to resolve URL")?;

    // Some servers (like Google Fonts) strictly require proper percent-encoding
    if resolved.query().is_some() {
        let query_pairs: Vec<(String, String)> = resolved
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        resolved.query_pairs_mut().clear();
        for (key, value) in query_pairs {
            resolved.query_pairs_mut().append_pair(&key, &value);
        }
    }

    Ok(resolved.to_string())
}

/// Join `url` onto `base`, tolerating missing and relative bases
///
/// - no (or empty) base: `url` is returned unchanged
/// - `data:` URIs are returned unchanged
/// - absolute base: standard URL resolution via [`resolve_url`]
/// - relative base (`below/some.css`): resolved as a path, result stays relative
///
/// Never fails; an unresolvable combination falls back to `url` itself.
#[must_use]
pub fn join_url(base: Option<&str>, url: &str) -> String {
    let Some(base) = base.filter(|b| !b.trim().is_empty()) else {
        return url.to_string();
    };
    if super::css_url::is_data_uri(url) {
        return url.to_string();
    }

    if Url::parse(base).is_ok() {
        return match resolve_url(base, url) {
            Ok(resolved) => resolved,
            Err(e) => {
                log::warn!("Failed to resolve '{url}' against base '{base}': {e}");
                url.to_string()
            }
        };
    }

    join_relative(base, url).unwrap_or_else(|| url.to_string())
}

fn join_relative(base: &str, url: &str) -> Option<String> {
    let origin = Url::parse(&format!("{SYNTHETIC_ORIGIN}/")).ok()?;
    let resolved = origin.join(base).ok()?.join(url).ok()?;

    if resolved.origin() != origin.origin() {
        // `url` carried its own scheme or host
        return Some(resolved.to_string());
    }

    let serialized = resolved.as_str();
    let keep_leading_slash = base.starts_with('/') || url.starts_with('/');
    let stripped = if keep_leading_slash {
        serialized.strip_prefix(SYNTHETIC_ORIGIN)?
    } else {
        serialized.strip_prefix(SYNTHETIC_ORIGIN)?.strip_prefix('/')?
    };
    Some(stripped.to_string())
}

/// Build a `data:<mime>;base64,...` URI from raw bytes
pub(crate) fn encode_data_uri(bytes: &[u8], mime: &str) -> String {
    // Encode to base64 directly from buffer
    let encoded_capacity = base64::encoded_len(bytes.len(), true).unwrap_or(0);
    let mut encoded = String::with_capacity(encoded_capacity + 13 + mime.len());

    encoded.push_str("data:");
    encoded.push_str(mime);
    encoded.push_str(";base64,");

    // Use STANDARD encoding for better compatibility
    base64::engine::general_purpose::STANDARD.encode_string(bytes, &mut encoded);

    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_google_fonts_url_encoding() {
        let base_url = "https://www.example.com/";
        let google_fonts_url = "https://fonts.googleapis.com/css2?family=Inter:ital,wght@0,400;0,500;1,400&display=swap";

        let result = resolve_url(base_url, google_fonts_url).unwrap();

        assert!(result.contains("%40"), "@ should be encoded as %40");
        assert!(result.contains("%3B"), "; should be encoded as %3B");
        assert!(result.contains("0%2C400"), ", should be encoded as %2C");
        assert!(result.starts_with("https://fonts.googleapis.com/css2?"));
    }

    #[test]
    fn test_relative_url_resolution() {
        let result = resolve_url("https://example.com/path/page.html", "../styles/main.css").unwrap();
        assert_eq!(result, "https://example.com/styles/main.css");
    }

    #[test]
    fn join_without_base_returns_url() {
        assert_eq!(join_url(None, "that.css"), "that.css");
        assert_eq!(join_url(Some(""), "that.css"), "that.css");
    }

    #[test]
    fn join_against_relative_base() {
        assert_eq!(join_url(Some("below/some.css"), "../green.png"), "green.png");
        assert_eq!(join_url(Some("below/some.css"), "fake.woff"), "below/fake.woff");
        assert_eq!(join_url(Some("url_base/page.html"), "that.css"), "url_base/that.css");
        assert_eq!(join_url(Some("some_base_url/"), "a.png"), "some_base_url/a.png");
    }

    #[test]
    fn join_against_root_relative_base_keeps_slash() {
        assert_eq!(join_url(Some("/css/site.css"), "img/a.png"), "/css/img/a.png");
    }

    #[test]
    fn join_keeps_absolute_and_data_urls() {
        assert_eq!(
            join_url(Some("below/some.css"), "https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
        assert_eq!(
            join_url(Some("https://example.com/"), "data:image/png;base64,AAA"),
            "data:image/png;base64,AAA"
        );
    }

    #[test]
    fn encodes_data_uri_with_mime() {
        assert_eq!(
            encode_data_uri(b"this is not a font", "font/woff"),
            "data:font/woff;base64,dGhpcyBpcyBub3QgYSBmb250"
        );
        assert_eq!(encode_data_uri(b"font", "image/png"), "data:image/png;base64,Zm9udA==");
        assert_eq!(encode_data_uri(b"", "font/woff"), "data:font/woff;base64,");
    }

    #[test]
    fn join_against_absolute_base() {
        assert_eq!(
            join_url(Some("https://example.com/css/site.css"), "../img/a.png"),
            "https://example.com/img/a.png"
        );
    }
}
