//! Generate command - the whole pipeline for one run
//!
//! Fetch the index page, extract anchors from the content container,
//! normalize and deduplicate, classify each URL, then write the sitemap
//! (plus the optional preview and search-engine ping). Strictly sequential;
//! the browser, when one is needed, is shared across all navigations and
//! released exactly once at run end.

use crate::classify::{changefreq, priority, resolve_lastmod, LastmodContext};
use crate::config::{Config, FetchStrategy, LastmodStrategy};
use crate::emit;
use crate::error::Result;
use crate::extract::{discover_image, extract_links};
use crate::fetch::{HeadlessRenderer, HttpFetcher, RendererConfig};
use crate::models::{ImageRef, SitemapRecord};
use crate::normalize::normalize_all;
use crate::ping::ping_search_engine;
use chrono::Utc;
use std::path::Path;
use tracing::{info, warn};
use url::Url;

/// Generation statistics
#[derive(Debug, Clone, Default)]
pub struct GenerateStats {
    /// Anchors harvested from the container, before dedup
    pub links_found: usize,
    /// Records in the written sitemap (one per unique normalized URL)
    pub urls_written: usize,
    pub preview_written: bool,
}

/// Execute one sitemap generation run.
pub async fn cmd_generate(config: &Config) -> Result<GenerateStats> {
    config.validate()?;

    let needs_browser = config.fetch.strategy == FetchStrategy::Browser
        || config.lastmod.strategy == LastmodStrategy::PageScrape;
    let renderer =
        needs_browser.then(|| HeadlessRenderer::new(RendererConfig::from_fetch(&config.fetch)));

    let result = run_pipeline(config, renderer.as_ref()).await;

    // Release the browser on every exit path
    if let Some(renderer) = &renderer {
        if let Err(e) = renderer.close().await {
            warn!("Browser teardown failed: {}", e);
        }
    }

    result
}

async fn run_pipeline(
    config: &Config,
    renderer: Option<&HeadlessRenderer>,
) -> Result<GenerateStats> {
    let base = Url::parse(&config.base_url)?;
    let run_timestamp = Utc::now();
    let fetcher = HttpFetcher::new(&config.fetch)?;

    let index_url = config.index_url();
    info!("Fetching link index page: {}", index_url);

    let html = match (config.fetch.strategy, renderer) {
        (FetchStrategy::Browser, Some(renderer)) => {
            renderer
                .render(&index_url, Some(&config.container_selector))
                .await?
        }
        _ => fetcher.fetch(&index_url).await?,
    };

    let raw = extract_links(&html, &config.container_selector)?;
    let links_found = raw.len();
    let entries = normalize_all(raw, &base);
    info!("Found {} links, {} unique URLs", links_found, entries.len());

    let lastmod_ctx = LastmodContext {
        config: &config.lastmod,
        run_timestamp,
        renderer,
    };

    let mut records = Vec::with_capacity(entries.len());
    for entry in &entries {
        let lastmod = resolve_lastmod(&entry.url, &lastmod_ctx).await;
        let image = if config.discover_images {
            fetch_image(&entry.url, config, &fetcher, renderer).await
        } else {
            None
        };

        records.push(SitemapRecord {
            loc: entry.url.clone(),
            lastmod,
            priority: priority(&entry.url, &config.base_url),
            changefreq: changefreq(&entry.url, &config.base_url),
            image,
        });
    }

    emit::write_sitemap(&records, Path::new(&config.output_path))?;

    let mut stats = GenerateStats {
        links_found,
        urls_written: records.len(),
        preview_written: false,
    };

    if let Some(preview_path) = &config.preview_path {
        emit::write_preview(&entries, Path::new(preview_path))?;
        stats.preview_written = true;
    }

    if config.ping.enabled {
        ping_search_engine(&fetcher, &config.ping).await;
    }

    Ok(stats)
}

/// Visit one page and pick a representative image. Best-effort: any failure
/// leaves the record without image metadata.
async fn fetch_image(
    url: &str,
    config: &Config,
    fetcher: &HttpFetcher,
    renderer: Option<&HeadlessRenderer>,
) -> Option<ImageRef> {
    let page = match (config.fetch.strategy, renderer) {
        (FetchStrategy::Browser, Some(renderer)) => renderer.render(url, None).await,
        _ => fetcher.fetch(url).await,
    };

    match page {
        Ok(html) => discover_image(&html, url),
        Err(e) => {
            warn!("Image discovery failed for {} (ignored): {}", url, e);
            None
        }
    }
}
