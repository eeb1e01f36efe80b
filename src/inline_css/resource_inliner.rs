//! Background image and web font inlining
//!
//! Resources are collected in encounter order, fetched concurrently and written
//! back by their recorded position, so neither the rewritten values nor the
//! error list depend on which fetch finished first.

use std::collections::BTreeMap;
use std::ops::Range;

use futures::future::join_all;

use super::css_url::{extract_url, format_css_url, is_data_uri};
use super::errors::FetchError;
use super::loader::ResourceLoader;
use super::path_adjuster::is_background_property;
use super::types::{InliningError, ResourceOutcome, ResourceType};
use super::utils::encode_data_uri;
use super::value::{font_sources, splice, url_token_ranges};
use crate::config::InlineOptions;
use crate::cssom::{CssRule, DeclarationBlock};
use crate::utils::url_extension;

/// A single `url(...)` token waiting to be inlined
#[derive(Debug)]
struct ResourceJob {
    rule: usize,
    declaration: usize,
    range: Range<usize>,
    /// Joined URL, as handed to the loader and reported on failure
    url: String,
    kind: JobKind,
}

#[derive(Debug)]
enum JobKind {
    BackgroundImage,
    Font { format: Option<String> },
}

impl JobKind {
    fn resource_type(&self) -> ResourceType {
        match self {
            Self::BackgroundImage => ResourceType::BackgroundImage,
            Self::Font { .. } => ResourceType::FontFace,
        }
    }
}

/// Replace external background images and `@font-face` sources in `rules` with
/// `data:` URIs.
///
/// URLs are joined against `options.base_url`. Values that are already data
/// URIs, `local(...)` font sources and anything that is not `url(...)` are left
/// alone. A failed fetch keeps the original token and records one error per
/// URL; other resources in the pass are unaffected.
///
/// Returns once every fetch has settled.
pub async fn inline_resources<L>(
    rules: &mut [CssRule],
    loader: &L,
    options: &InlineOptions,
) -> ResourceOutcome
where
    L: ResourceLoader + ?Sized,
{
    let jobs = collect_jobs(rules, loader, options.base_url());
    if jobs.is_empty() {
        return ResourceOutcome::default();
    }
    log::debug!("Inlining {} resource(s)", jobs.len());

    let results = join_all(jobs.iter().map(|job| fetch_resource(job, loader, options))).await;

    let mut outcome = ResourceOutcome::default();
    let mut replacements: BTreeMap<(usize, usize), Vec<(Range<usize>, String)>> = BTreeMap::new();

    for (job, result) in jobs.into_iter().zip(results) {
        match result {
            Ok(data_uri) => {
                outcome.changed = true;
                replacements
                    .entry((job.rule, job.declaration))
                    .or_default()
                    .push((job.range, format_css_url(&data_uri)));
            }
            Err(e) => {
                let resource_type = job.kind.resource_type();
                log::warn!("Failed to inline {} {}: {}", resource_type.label(), job.url, e.reason);
                outcome
                    .errors
                    .push(InliningError::unable_to_load(resource_type, job.url));
            }
        }
    }

    for ((rule, declaration), edits) in replacements {
        let Some(target) = rules
            .get_mut(rule)
            .and_then(declarations_mut)
            .and_then(|style| style.iter_mut().nth(declaration))
        else {
            continue;
        };
        target.value = splice(&target.value, edits);
    }

    log::info!(
        "Resource inlining finished: changed={}, {} error(s)",
        outcome.changed,
        outcome.errors.len()
    );
    outcome
}

fn declarations_mut(rule: &mut CssRule) -> Option<&mut DeclarationBlock> {
    match rule {
        CssRule::Style(style_rule) => Some(&mut style_rule.style),
        CssRule::FontFace(font_face) => Some(&mut font_face.style),
        CssRule::Import(_) | CssRule::Other(_) => None,
    }
}

fn collect_jobs<L>(rules: &[CssRule], loader: &L, base_url: Option<&str>) -> Vec<ResourceJob>
where
    L: ResourceLoader + ?Sized,
{
    let mut jobs = Vec::new();

    for (rule_index, rule) in rules.iter().enumerate() {
        match rule {
            CssRule::Style(style_rule) => {
                for (declaration_index, declaration) in style_rule.style.iter().enumerate() {
                    if !is_background_property(&declaration.name) {
                        continue;
                    }
                    for range in url_token_ranges(&declaration.value) {
                        let Some(url) = external_url(&declaration.value[range.clone()]) else {
                            continue;
                        };
                        jobs.push(ResourceJob {
                            rule: rule_index,
                            declaration: declaration_index,
                            range,
                            url: loader.join_url(base_url, &url),
                            kind: JobKind::BackgroundImage,
                        });
                    }
                }
            }
            CssRule::FontFace(font_face) => {
                for (declaration_index, declaration) in font_face.style.iter().enumerate() {
                    if !declaration.name.eq_ignore_ascii_case("src") {
                        continue;
                    }
                    for source in font_sources(&declaration.value) {
                        let Some(range) = source.url else {
                            continue;
                        };
                        let Some(url) = external_url(&declaration.value[range.clone()]) else {
                            continue;
                        };
                        jobs.push(ResourceJob {
                            rule: rule_index,
                            declaration: declaration_index,
                            range,
                            url: loader.join_url(base_url, &url),
                            kind: JobKind::Font {
                                format: source.format,
                            },
                        });
                    }
                }
            }
            CssRule::Import(_) | CssRule::Other(_) => {}
        }
    }

    jobs
}

/// The URL inside a `url(...)` token, unless it is already inlined
fn external_url(token: &str) -> Option<String> {
    let url = extract_url(token).ok()?;
    (!is_data_uri(&url)).then_some(url)
}

async fn fetch_resource<L>(
    job: &ResourceJob,
    loader: &L,
    options: &InlineOptions,
) -> Result<String, FetchError>
where
    L: ResourceLoader + ?Sized,
{
    match &job.kind {
        JobKind::BackgroundImage => loader.image_data_uri(&job.url, options).await,
        JobKind::Font { format } => {
            let bytes = loader.fetch_binary(&job.url, options).await?;
            let mime = font_mime_type(&job.url, format.as_deref());
            log::debug!("Inlined font {} as {mime} ({} bytes)", job.url, bytes.len());
            Ok(encode_data_uri(&bytes, &mime))
        }
    }
}

/// MIME type for a font, from its `format()` hint or else its file extension
#[must_use]
pub fn font_mime_type(url: &str, format: Option<&str>) -> String {
    if let Some(format) = format.map(str::trim).filter(|f| !f.is_empty()) {
        let format = format.to_ascii_lowercase();
        return match format.as_str() {
            "embedded-opentype" => "application/vnd.ms-fontobject".to_string(),
            "svg" => "image/svg+xml".to_string(),
            _ => format!("font/{format}"),
        };
    }

    match url_extension(url).as_deref() {
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/truetype",
        Some("otf") => "font/opentype",
        Some("eot") => "application/vnd.ms-fontobject",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_format_wins_over_extension() {
        assert_eq!(font_mime_type("fake.ttf", Some("opentype")), "font/opentype");
        assert_eq!(font_mime_type("fake.woff", Some("WOFF2")), "font/woff2");
        assert_eq!(font_mime_type("fake", Some("truetype")), "font/truetype");
        assert_eq!(
            font_mime_type("fake.eot", Some("embedded-opentype")),
            "application/vnd.ms-fontobject"
        );
        assert_eq!(font_mime_type("fake.svg", Some("svg")), "image/svg+xml");
        assert_eq!(font_mime_type("fake", Some("collection")), "font/collection");
    }

    #[test]
    fn extension_sniffing_without_format() {
        assert_eq!(font_mime_type("fake.woff", None), "font/woff");
        assert_eq!(font_mime_type("fonts/fake.woff2?v=3#iefix", None), "font/woff2");
        assert_eq!(font_mime_type("https://cdn.example.com/a/Fake.TTF", None), "font/truetype");
        assert_eq!(font_mime_type("fake.otf", None), "font/opentype");
        assert_eq!(font_mime_type("fake.eot?#iefix", None), "application/vnd.ms-fontobject");
        assert_eq!(font_mime_type("fake", None), "application/octet-stream");
        assert_eq!(font_mime_type("fake.bin", Some("  ")), "application/octet-stream");
    }

    #[test]
    fn external_url_skips_data_and_non_urls() {
        assert_eq!(external_url("url(a.png)").as_deref(), Some("a.png"));
        assert_eq!(external_url("url(\"data:image/png;base64,AAA\")"), None);
        assert_eq!(external_url("local(\"Font\")"), None);
    }
}
