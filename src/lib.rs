pub mod config;
pub mod cssom;
pub mod inline_css;
pub mod utils;

pub use config::{CachePolicy, InlineOptions};
pub use cssom::{CssRule, RuleList, parse_stylesheet};
pub use inline_css::{
    HttpLoader, ImportOutcome, InlineConfig, InliningError, InliningResult, ResourceLoader,
    ResourceOutcome, ResourceType, VisitedImports, adjust_paths, extract_url, inline_resources,
    inline_stylesheet, resolve_imports,
};

/// Inline a stylesheet over HTTP and the local filesystem with default limits
pub async fn inline(css: &str, options: &InlineOptions) -> InliningResult {
    let loader = HttpLoader::default();
    inline_stylesheet(css, &loader, options).await
}
