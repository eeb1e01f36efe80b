//! Rebase resource URLs of a fetched stylesheet onto the stylesheet's own URL
//!
//! Once an imported sheet is spliced into its parent, relative references in it
//! would otherwise be resolved against the wrong document.

use std::ops::Range;

use super::css_url::{extract_url, format_css_url, is_data_uri};
use super::value::{font_sources, splice, url_token_ranges};
use crate::cssom::{CssRule, DeclarationBlock};

/// Properties whose `url(...)` tokens reference background images
pub(crate) fn is_background_property(name: &str) -> bool {
    name.eq_ignore_ascii_case("background") || name.eq_ignore_ascii_case("background-image")
}

/// Make every relative resource URL in `rules` absolute relative to `base_url`,
/// using the default URL join.
pub fn adjust_paths(base_url: &str, rules: &mut [CssRule]) {
    adjust_paths_with(base_url, rules, &super::utils::join_url);
}

/// [`adjust_paths`] with a caller-supplied join primitive
pub fn adjust_paths_with(
    base_url: &str,
    rules: &mut [CssRule],
    join: &dyn Fn(Option<&str>, &str) -> String,
) {
    let resolve = |url: &str| join(Some(base_url), url);

    for rule in rules.iter_mut() {
        match rule {
            CssRule::Style(style_rule) => adjust_backgrounds(&mut style_rule.style, &resolve),
            CssRule::FontFace(font_face) => adjust_font_sources(&mut font_face.style, &resolve),
            CssRule::Import(import) => {
                import.href = resolve(&import.href);
            }
            CssRule::Other(_) => {}
        }
    }
}

fn adjust_backgrounds(style: &mut DeclarationBlock, resolve: &dyn Fn(&str) -> String) {
    for declaration in style.iter_mut() {
        if !is_background_property(&declaration.name) {
            continue;
        }
        let ranges = url_token_ranges(&declaration.value);
        if let Some(rewritten) = rebase_ranges(&declaration.value, ranges, resolve) {
            declaration.value = rewritten;
        }
    }
}

fn adjust_font_sources(style: &mut DeclarationBlock, resolve: &dyn Fn(&str) -> String) {
    for declaration in style.iter_mut() {
        if !declaration.name.eq_ignore_ascii_case("src") {
            continue;
        }
        let ranges = font_sources(&declaration.value)
            .into_iter()
            .filter_map(|source| source.url)
            .collect();
        if let Some(rewritten) = rebase_ranges(&declaration.value, ranges, resolve) {
            declaration.value = rewritten;
        }
    }
}

/// Rewrite the `url(...)` tokens at `ranges`; `None` when nothing changed
fn rebase_ranges(
    value: &str,
    ranges: Vec<Range<usize>>,
    resolve: &dyn Fn(&str) -> String,
) -> Option<String> {
    let replacements: Vec<(Range<usize>, String)> = ranges
        .into_iter()
        .filter_map(|range| {
            let url = extract_url(&value[range.clone()]).ok()?;
            if is_data_uri(&url) {
                return None;
            }
            let resolved = resolve(&url);
            (resolved != url).then(|| (range, format_css_url(&resolved)))
        })
        .collect();

    (!replacements.is_empty()).then(|| splice(value, replacements))
}
