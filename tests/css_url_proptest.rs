//! Property tests for `url(...)` extraction

use kodegen_tools_inline_css::inline_css::{extract_url, format_css_url};
use proptest::prelude::*;

/// URL bodies without quotes, parens or CSS whitespace at the edges
fn url_body() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_./:?=&%#-]{1,40}"
}

/// Any mix of the whitespace characters CSS trims inside `url(...)`
fn css_whitespace() -> impl Strategy<Value = String> {
    proptest::collection::vec(prop_oneof![Just(' '), Just('\t'), Just('\n'), Just('\r'), Just('\u{c}')], 0..4)
        .prop_map(|chars| chars.into_iter().collect())
}

fn quote() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just(""), Just("'"), Just("\"")]
}

proptest! {
    #[test]
    fn extracts_inner_url_for_any_quoting_and_whitespace(
        url in url_body(),
        lead in css_whitespace(),
        trail in css_whitespace(),
        q in quote(),
    ) {
        let css = format!("url({lead}{q}{url}{q}{trail})");
        prop_assert_eq!(extract_url(&css).unwrap(), url);
    }

    #[test]
    fn keeps_other_unicode_whitespace(url in url_body()) {
        let css = format!("url(\u{2003}\u{3000}{url})");
        prop_assert_eq!(extract_url(&css).unwrap(), format!("\u{2003}\u{3000}{url}"));
    }

    #[test]
    fn rejects_text_without_url_notation(text in "[a-z0-9 \"'()]{0,30}") {
        prop_assume!(!text.starts_with("url("));
        prop_assert!(extract_url(&text).is_err());
    }

    #[test]
    fn formatted_urls_extract_back(url in "[^\"\\\\\n]{0,40}") {
        prop_assume!(url.trim_matches(|c: char| " \t\r\u{c}".contains(c)) == url);
        prop_assert_eq!(extract_url(&format_css_url(&url)).unwrap(), url);
    }
}
