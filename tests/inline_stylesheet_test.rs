//! End-to-end tests for the full stylesheet pipeline

mod common;

use common::{CallKind, MockLoader};
use kodegen_tools_inline_css::inline_css::{ResourceType, inline_stylesheet};
use kodegen_tools_inline_css::InlineOptions;

#[tokio::test]
async fn inlines_imported_sheet_and_its_resources() {
    let css = "@import url(\"css/theme.css\");\nbody { margin: 0; }";
    let loader = MockLoader::new()
        .with_text(
            "https://example.com/css/theme.css",
            "h1 { background: url(\"../img/logo.png\") no-repeat; }\n\
             @font-face { font-family: Brand; src: url(\"fonts/brand.woff2\") format(\"woff2\"); }",
        )
        .with_image("https://example.com/img/logo.png", "data:image/png;base64,TE9HTw==")
        .with_binary("https://example.com/css/fonts/brand.woff2", b"font");
    let options = InlineOptions::new().with_base_url("https://example.com/index.html");

    let result = inline_stylesheet(css, &loader, &options).await;

    assert!(result.has_changes);
    assert!(!result.has_failures());
    assert_eq!(
        result.css,
        "h1 { background: url(\"data:image/png;base64,TE9HTw==\") no-repeat; }\n\
         @font-face { font-family: Brand; src: url(\"data:font/woff2;base64,Zm9udA==\") format(\"woff2\"); }\n\
         body { margin: 0; }"
    );
}

#[tokio::test]
async fn joins_imported_resources_with_a_relative_base_once() {
    let loader = MockLoader::new()
        .with_text("url_base/that.css", "div { background-image: url(\"img/x.png\"); }")
        .with_image("url_base/img/x.png", "data:image/png;base64,eA==");
    let options = InlineOptions::new().with_base_url("url_base/page.html");

    let result = inline_stylesheet("@import url(\"that.css\");", &loader, &options).await;

    assert!(result.failures.is_empty(), "{:?}", result.failures);
    assert_eq!(loader.urls_of(CallKind::Image), vec!["url_base/img/x.png"]);
    assert_eq!(result.css, "div { background-image: url(\"data:image/png;base64,eA==\"); }");
}

#[tokio::test]
async fn reports_nested_resource_failures_at_the_singly_joined_url() {
    let loader = MockLoader::new()
        .with_text("site/css/a.css", "@import url(\"parts/b.css\");")
        .with_text("site/css/parts/b.css", "p { background: url(\"../img/p.png\"); }");
    let options = InlineOptions::new().with_base_url("site/index.html");

    let result = inline_stylesheet("@import url(\"css/a.css\");", &loader, &options).await;

    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].url, "site/css/img/p.png");
    assert_eq!(result.failures[0].msg, "Unable to load background-image site/css/img/p.png");
}

#[tokio::test]
async fn collects_failures_of_both_passes_imports_first() {
    let css = "span { background-image: url(\"missing.png\"); }\n@import url(\"missing.css\");";
    let loader = MockLoader::new();

    let result = inline_stylesheet(css, &loader, &InlineOptions::new()).await;

    assert!(!result.has_changes);
    let kinds: Vec<_> = result.failures.iter().map(|f| f.resource_type).collect();
    assert_eq!(kinds, vec![ResourceType::Stylesheet, ResourceType::BackgroundImage]);
    assert_eq!(result.failures_of(ResourceType::BackgroundImage).count(), 1);
    assert_eq!(result.css, "span { background-image: url(\"missing.png\"); }");
}

#[tokio::test]
async fn leaves_self_contained_css_alone() {
    let css = "p { color: red; }\n@media print { p { color: black; } }";
    let loader = MockLoader::new();

    let result = inline_stylesheet(css, &loader, &InlineOptions::new()).await;

    assert!(!result.has_changes);
    assert!(result.failures.is_empty());
    assert_eq!(result.css, css);
    assert!(loader.calls().is_empty());
}

#[tokio::test]
async fn each_call_starts_with_a_fresh_visited_set() {
    let css = "@import url(\"shared.css\");";
    let loader = MockLoader::new().with_text("shared.css", "p { color: red; }");

    let first = inline_stylesheet(css, &loader, &InlineOptions::new()).await;
    let second = inline_stylesheet(css, &loader, &InlineOptions::new()).await;

    assert_eq!(first.css, "p { color: red; }");
    assert_eq!(second.css, "p { color: red; }");
    assert_eq!(loader.call_count(CallKind::Text), 2);
}

#[tokio::test]
async fn serialises_result_as_camel_case_json() {
    let loader = MockLoader::new();
    let result = inline_stylesheet("@import url(\"gone.css\");", &loader, &InlineOptions::new()).await;

    let json = serde_json::to_value(&result).expect("serialisable");

    assert_eq!(json["hasChanges"], serde_json::json!(false));
    assert_eq!(json["failures"][0]["resourceType"], serde_json::json!("stylesheet"));
    assert_eq!(json["failures"][0]["msg"], serde_json::json!("Unable to load stylesheet gone.css"));
}
