//! Page fetching
//!
//! Two strategies, selected by configuration: a plain HTTP GET for sites
//! that serve static markup, and a headless-browser render (see
//! [`renderer`]) for pages whose link index is produced by client-side
//! script execution.

pub mod renderer;

pub use renderer::{is_js_rendering_available, HeadlessRenderer, RendererConfig};

use crate::config::FetchConfig;
use crate::error::{Error, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Stateless HTTP fetcher returning the page body as text.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| Error::Fetch(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// GET a page; non-2xx status is a fatal fetch error.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        debug!("Fetching: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!("HTTP {}: {}", status, url)));
        }

        response
            .text()
            .await
            .map_err(|e| Error::Fetch(format!("Failed to read body of {}: {}", url, e)))
    }
}
