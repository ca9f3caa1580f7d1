//! Best-effort search-engine notification
//!
//! Fired once after a successful sitemap write. A failed ping is logged and
//! never fails the run.

use crate::config::PingConfig;
use crate::fetch::HttpFetcher;
use tracing::{info, warn};

/// Ping the configured submission endpoint with the public sitemap URL.
pub async fn ping_search_engine(fetcher: &HttpFetcher, config: &PingConfig) {
    let Some(sitemap_url) = &config.sitemap_url else {
        return;
    };

    let ping_url = format!("{}?sitemap={}", config.endpoint, sitemap_url);
    match fetcher.fetch(&ping_url).await {
        Ok(_) => info!("Pinged {} with sitemap {}", config.endpoint, sitemap_url),
        Err(e) => warn!("Sitemap ping failed (ignored): {}", e),
    }
}
