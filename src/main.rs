// CSS inliner CLI
//
// Reads a stylesheet from a URL or local path, resolves its @imports and embeds
// background images and fonts as data URIs.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use kodegen_tools_inline_css::inline_css::{HttpLoader, InlineConfig, ResourceLoader, inline_stylesheet};
use kodegen_tools_inline_css::utils::input_to_url;
use kodegen_tools_inline_css::{CachePolicy, InlineOptions};

#[derive(Parser)]
#[command(name = "kodegen-inline-css")]
#[command(version, about = "Inline @imports, images and fonts into a single stylesheet", long_about = None)]
#[command(after_help = "EXAMPLES:
    kodegen-inline-css site.css -o bundle.css
    kodegen-inline-css https://example.com/css/main.css --no-cache")]
struct Cli {
    /// Stylesheet URL or local path
    #[arg(value_name = "INPUT")]
    input: String,

    /// Base URL for relative references (defaults to the input's location)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Bypass HTTP caches
    #[arg(long)]
    no_cache: bool,

    /// Write the inlined stylesheet here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Exit with a failure status if any resource could not be loaded
    #[arg(long)]
    fail_on_error: bool,

    /// Emit `{css, hasChanges, failures}` as JSON instead of plain CSS
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let input_url = input_to_url(&cli.input)?;
    let cache = if cli.no_cache {
        CachePolicy::None
    } else {
        CachePolicy::Default
    };
    let options = InlineOptions::new()
        .with_base_url(cli.base_url.clone().unwrap_or_else(|| input_url.clone()))
        .with_cache(cache);

    let loader = HttpLoader::new(InlineConfig::default());
    let css = loader
        .fetch_text(&input_url, &options)
        .await
        .with_context(|| format!("Failed to load {}", cli.input))?;

    let result = inline_stylesheet(&css, &loader, &options).await;
    for failure in &result.failures {
        log::warn!("{failure}");
    }

    let rendered = if cli.json {
        serde_json::to_string_pretty(&result).context("Failed to serialise result")?
    } else {
        result.css.clone()
    };

    match &cli.output {
        Some(path) => tokio::fs::write(path, &rendered)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{rendered}"),
    }

    if cli.fail_on_error && result.has_failures() {
        log::error!("{} resource(s) could not be inlined", result.failures.len());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
