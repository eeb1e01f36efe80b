//! Stylesheet inlining orchestration
//!
//! Runs the full pipeline over one stylesheet: parse, resolve `@import`s,
//! inline background images and fonts, serialise.

use super::import_resolver::{VisitedImports, resolve_imports};
use super::loader::ResourceLoader;
use super::resource_inliner::inline_resources;
use super::types::InliningResult;
use crate::config::InlineOptions;
use crate::cssom::{self, parse_stylesheet};

/// Inline every external resource referenced by `css`
///
/// Imports are resolved before resources so that images and fonts of imported
/// sheets are inlined too. Errors from both passes are concatenated, import
/// errors first. Never fails.
pub async fn inline_stylesheet<L>(css: &str, loader: &L, options: &InlineOptions) -> InliningResult
where
    L: ResourceLoader + ?Sized,
{
    let mut rules = parse_stylesheet(css);

    // One visited set per top-level call
    let visited = VisitedImports::new();
    let imports = resolve_imports(&mut rules, &visited, loader, options).await;
    let resources = inline_resources(&mut rules, loader, options).await;

    let mut failures = imports.errors;
    failures.extend(resources.errors);

    let result = InliningResult {
        css: cssom::css_text(&rules),
        has_changes: imports.has_changes || resources.changed,
        failures,
    };

    if result.has_failures() {
        log::warn!(
            "Inlined stylesheet with {} failure(s) out of {} rule(s)",
            result.failures.len(),
            rules.len()
        );
    } else {
        log::info!("Inlined stylesheet: {} rule(s), changed={}", rules.len(), result.has_changes);
    }

    result
}
