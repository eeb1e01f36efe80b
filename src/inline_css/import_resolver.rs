//! Recursive `@import` resolution
//!
//! Every `@import` at one nesting level is fetched concurrently. Each fetch is
//! tagged with its slot index so the fetched rules land where the import was,
//! whatever order the fetches complete in. Nested sheets are resolved the same
//! way, one slot at a time, before being spliced into their parent.

use std::collections::HashSet;

use futures::future::{BoxFuture, join_all};
use parking_lot::Mutex;

use super::errors::FetchError;
use super::loader::ResourceLoader;
use super::path_adjuster::adjust_paths_with;
use super::types::{ImportOutcome, InliningError, ResourceType};
use crate::config::InlineOptions;
use crate::cssom::{CssRule, RuleList, parse_stylesheet};

/// Stylesheet URLs already fetched (or being fetched) during one top-level
/// resolution. Shared by reference with every recursive call.
#[derive(Debug, Default)]
pub struct VisitedImports {
    urls: Mutex<HashSet<String>>,
}

impl VisitedImports {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `url` as visited; `false` if it already was
    pub fn mark(&self, url: &str) -> bool {
        self.urls.lock().insert(url.to_string())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.lock().is_empty()
    }
}

/// What happened to the import in one slot
enum ImportSlot {
    /// Fetched and parsed; these rules replace the import
    Inlined {
        rules: RuleList,
        errors: Vec<InliningError>,
    },
    /// Already visited in this resolution; the import is dropped
    Duplicate,
    Failed(InliningError),
}

/// Replace every `@import` in `rules` with the rules of the stylesheet it names.
///
/// Import targets are fetched at `options.base_url` joined with the href. Paths
/// inside a fetched sheet are rebased onto the href itself, not the joined URL,
/// so everything stays relative to the same base and later passes join it once.
/// A URL already in `visited` is dropped without fetching, which also breaks
/// import cycles. A failed fetch removes the import and records a `stylesheet`
/// error.
///
/// Never fails: all problems are reported in [`ImportOutcome::errors`].
pub async fn resolve_imports<L>(
    rules: &mut RuleList,
    visited: &VisitedImports,
    loader: &L,
    options: &InlineOptions,
) -> ImportOutcome
where
    L: ResourceLoader + ?Sized,
{
    let outcome = resolve_level(rules, visited, loader, options).await;
    log::debug!(
        "Resolved @imports: {} stylesheet(s) visited, {} error(s)",
        visited.len(),
        outcome.errors.len()
    );
    outcome
}

/// An import whose URL was not seen before
struct PendingImport {
    /// Href relative to the base URL, rebased through any enclosing sheets
    href: String,
    /// `href` joined with the base URL; fetched and recorded in errors
    url: String,
}

fn resolve_level<'a, L>(
    rules: &'a mut RuleList,
    visited: &'a VisitedImports,
    loader: &'a L,
    options: &'a InlineOptions,
) -> BoxFuture<'a, ImportOutcome>
where
    L: ResourceLoader + ?Sized,
{
    Box::pin(async move {
        // Marking happens here, before any fetch is polled, so two siblings
        // naming the same URL never both fetch it.
        let mut pending = Vec::new();
        for rule in rules.iter() {
            let CssRule::Import(import) = rule else {
                continue;
            };
            let url = loader.join_url(options.base_url(), &import.href);
            if visited.mark(&url) {
                pending.push(Some(PendingImport {
                    href: import.href.clone(),
                    url,
                }));
            } else {
                log::debug!("Skipping already imported stylesheet: {url}");
                pending.push(None);
            }
        }

        if pending.is_empty() {
            return ImportOutcome::default();
        }

        let fetches = pending.iter().map(|slot| async move {
            match slot {
                Some(import) => Some(loader.fetch_text(&import.url, options).await),
                None => None,
            }
        });
        let fetched = join_all(fetches).await;

        // Nested levels run one slot at a time so their imports are marked in
        // source order, whichever fetch completed first.
        let mut slots = Vec::with_capacity(pending.len());
        for (import, result) in pending.into_iter().zip(fetched) {
            let slot = match (import, result) {
                (Some(import), Some(result)) => {
                    load_import(import, result, visited, loader, options).await
                }
                _ => ImportSlot::Duplicate,
            };
            slots.push(slot);
        }

        splice_slots(rules, slots)
    })
}

async fn load_import<L>(
    import: PendingImport,
    fetched: Result<String, FetchError>,
    visited: &VisitedImports,
    loader: &L,
    options: &InlineOptions,
) -> ImportSlot
where
    L: ResourceLoader + ?Sized,
{
    let PendingImport { href, url } = import;
    match fetched {
        Ok(css_text) => {
            log::debug!("Fetched stylesheet {url} ({} chars)", css_text.len());
            let mut nested = parse_stylesheet(&css_text);
            adjust_paths_with(&href, &mut nested, &|base, path| loader.join_url(base, path));

            let outcome = resolve_level(&mut nested, visited, loader, options).await;
            ImportSlot::Inlined {
                rules: nested,
                errors: outcome.errors,
            }
        }
        Err(e) => {
            log::warn!("Failed to load stylesheet {url}: {}", e.reason);
            ImportSlot::Failed(InliningError::unable_to_load(ResourceType::Stylesheet, url))
        }
    }
}

/// Rebuild `rules` with every import replaced by its slot's outcome
fn splice_slots(rules: &mut RuleList, slots: Vec<ImportSlot>) -> ImportOutcome {
    let mut outcome = ImportOutcome::default();
    let mut slots = slots.into_iter();
    let original = std::mem::take(rules);
    rules.reserve(original.len());

    for rule in original {
        if !rule.is_import() {
            rules.push(rule);
            continue;
        }
        match slots.next() {
            Some(ImportSlot::Inlined {
                rules: fetched,
                errors,
            }) => {
                outcome.has_changes = true;
                outcome.errors.extend(errors);
                rules.extend(fetched);
            }
            Some(ImportSlot::Duplicate) => outcome.has_changes = true,
            Some(ImportSlot::Failed(error)) => outcome.errors.push(error),
            None => rules.push(rule),
        }
    }

    outcome
}
