//! CSS resource inlining
//!
//! This module resolves `@import` chains and replaces background images and web
//! fonts referenced from a stylesheet with embedded `data:` URIs, producing a
//! self-contained stylesheet.

// Sub-modules
pub mod css_url;
pub mod downloaders;
pub mod errors;
pub mod import_resolver;
pub mod loader;
pub mod orchestrator;
pub mod path_adjuster;
pub mod resource_inliner;
pub mod types;
pub mod utils;
pub mod value;

// Re-exports for public API
pub use css_url::{extract_url, format_css_url, is_data_uri};
pub use downloaders::{HttpLoader, InlineConfig};
pub use errors::{FetchError, InvalidUrl};
pub use import_resolver::{VisitedImports, resolve_imports};
pub use loader::{LoaderFuture, ResourceLoader};
pub use orchestrator::inline_stylesheet;
pub use path_adjuster::{adjust_paths, adjust_paths_with};
pub use resource_inliner::{font_mime_type, inline_resources};
pub use types::{ImportOutcome, InliningError, InliningResult, ResourceOutcome, ResourceType};
pub use utils::{join_url, resolve_url};
