//! Shared configuration constants for the inliner
//!
//! Default values used by the HTTP loader and the CLI, kept in one place to
//! avoid magic numbers.

use std::time::Duration;

/// Stylesheet download timeout: 30 seconds
pub const DEFAULT_CSS_TIMEOUT: Duration = Duration::from_secs(30);

/// Image download timeout: 60 seconds
///
/// Images are larger than stylesheets on average and often come from slower
/// CDNs.
pub const DEFAULT_IMAGE_TIMEOUT: Duration = Duration::from_secs(60);

/// Font download timeout: 60 seconds
pub const DEFAULT_FONT_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum stylesheet size: 2 MiB
///
/// Based on the 99th percentile of real-world CSS plus margin.
/// Typical: 50-200KB, large frameworks: 500KB-1MB.
pub const MAX_CSS_SIZE: usize = 2 * 1024 * 1024;

/// Maximum image size: 5 MiB
///
/// Anything bigger should not end up as a data URI.
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

/// Maximum font size: 5 MiB
///
/// Typical WOFF2: 20-150KB, full CJK fonts: several MB.
pub const MAX_FONT_SIZE: usize = 5 * 1024 * 1024;

/// Query parameter appended when caches must be bypassed
pub const CACHE_BUST_PARAM: &str = "_";

/// Chrome user agent string sent with every HTTP request
///
/// Updated: 2025-01-29 to Chrome 132 (current stable)
///
/// Reference: https://chromiumdash.appspot.com/schedule
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
