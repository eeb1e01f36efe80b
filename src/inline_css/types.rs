//! Type definitions for resource inlining

use serde::{Deserialize, Serialize};

/// Resource type for error tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceType {
    Stylesheet,
    BackgroundImage,
    FontFace,
}

impl ResourceType {
    /// Human-readable resource label used in error messages
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ResourceType::Stylesheet => "stylesheet",
            ResourceType::BackgroundImage => "background-image",
            ResourceType::FontFace => "font-face",
        }
    }
}

/// Error record for a resource that could not be loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InliningError {
    pub resource_type: ResourceType,
    pub url: String,
    pub msg: String,
}

impl InliningError {
    /// Build the record with the standard `Unable to load <kind> <url>` message
    pub fn unable_to_load(resource_type: ResourceType, url: impl Into<String>) -> Self {
        let url = url.into();
        let msg = format!("Unable to load {} {url}", resource_type.label());
        Self {
            resource_type,
            url,
            msg,
        }
    }
}

impl std::fmt::Display for InliningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.msg)
    }
}

/// Result of `@import` resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    /// At least one import was replaced by fetched rules or dropped as a duplicate
    pub has_changes: bool,
    /// Failures from every nesting level, in encounter order
    pub errors: Vec<InliningError>,
}

/// Result of inlining background images and fonts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceOutcome {
    /// At least one URL was rewritten to a data URI
    pub changed: bool,
    pub errors: Vec<InliningError>,
}

/// Result of the full inlining pipeline with success and failure tracking
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InliningResult {
    pub css: String,
    pub has_changes: bool,
    pub failures: Vec<InliningError>,
}

impl InliningResult {
    /// Check if any failures occurred
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Failures of one resource kind
    pub fn failures_of(&self, resource_type: ResourceType) -> impl Iterator<Item = &InliningError> {
        self.failures
            .iter()
            .filter(move |f| f.resource_type == resource_type)
    }
}
