//! `url(...)` extraction and formatting

use lazy_static::lazy_static;
use regex::Regex;

use super::errors::InvalidUrl;

lazy_static! {
    // Only space, tab, CR, LF and form feed count as CSS whitespace here;
    // other Unicode whitespace belongs to the URL.
    static ref CSS_URL_REGEX: Regex =
        Regex::new(r#"(?s)^url\([ \t\r\n\x0C]*(?:"(.*)"|'(.*)'|(.*?))[ \t\r\n\x0C]*\)$"#)
            .expect("BUG: hardcoded url() regex is invalid - this is a compile-time bug");
}

/// Extract the bare URL from `url(...)` functional notation.
///
/// Quotes and surrounding CSS whitespace are stripped. A `data:` URI is returned
/// unchanged. Anything else (for example `local("Font")`) is rejected with
/// [`InvalidUrl`], which callers treat as "not a resource reference".
pub fn extract_url(css_url: &str) -> Result<String, InvalidUrl> {
    let captures = CSS_URL_REGEX
        .captures(css_url)
        .ok_or_else(|| InvalidUrl(css_url.to_string()))?;

    let url = captures
        .get(1)
        .or_else(|| captures.get(2))
        .or_else(|| captures.get(3))
        .map(|m| m.as_str())
        .unwrap_or_default();

    Ok(url.to_string())
}

/// Format a URL back into `url("...")` notation
#[must_use]
pub fn format_css_url(url: &str) -> String {
    let mut escaped = String::with_capacity(url.len() + 7);
    escaped.push_str("url(\"");
    for ch in url.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\a "),
            _ => escaped.push(ch),
        }
    }
    escaped.push_str("\")");
    escaped
}

/// `data:` URIs are already inlined and never fetched
#[must_use]
pub fn is_data_uri(url: &str) -> bool {
    url.get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}
