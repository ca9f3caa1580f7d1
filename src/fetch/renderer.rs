//! Headless browser rendering for JavaScript-generated pages
//!
//! Uses Chrome DevTools Protocol via chromiumoxide to render pages whose
//! content only exists after client-side script execution. The browser is
//! launched lazily, shared sequentially across all navigations in one run,
//! and released exactly once via [`HeadlessRenderer::close`].

use crate::config::FetchConfig;
use crate::error::{Error, Result};

/// Configuration for the headless browser renderer
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Time to wait for page load (milliseconds)
    pub page_load_timeout_ms: u64,
    /// Time to wait after load for dynamic content (milliseconds)
    pub render_wait_ms: u64,
    /// Enable sandbox (disable for Docker/CI environments)
    pub sandbox: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            page_load_timeout_ms: 30000,
            render_wait_ms: 2000,
            sandbox: true,
        }
    }
}

impl RendererConfig {
    /// Derive renderer settings from the fetch configuration.
    pub fn from_fetch(fetch: &FetchConfig) -> Self {
        Self {
            page_load_timeout_ms: fetch.page_load_timeout_ms,
            render_wait_ms: fetch.render_wait_ms,
            sandbox: !fetch.no_sandbox,
        }
    }
}

#[cfg(feature = "js-rendering")]
mod browser_impl {
    use super::*;
    use chromiumoxide::browser::{Browser, BrowserConfig};
    use futures::StreamExt;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;
    use tokio::time::timeout;
    use tracing::{debug, info, warn};

    /// Headless browser renderer
    pub struct HeadlessRenderer {
        config: RendererConfig,
        browser: Arc<Mutex<Option<Browser>>>,
        handler_handle: Arc<Mutex<Option<tokio::task::JoinHandle<()>>>>,
    }

    impl HeadlessRenderer {
        /// Create a new headless renderer (the browser launches lazily)
        pub fn new(config: RendererConfig) -> Self {
            Self {
                config,
                browser: Arc::new(Mutex::new(None)),
                handler_handle: Arc::new(Mutex::new(None)),
            }
        }

        /// Initialize the browser (lazy initialization)
        async fn ensure_browser(&self) -> Result<()> {
            let mut browser_guard = self.browser.lock().await;
            if browser_guard.is_some() {
                return Ok(());
            }

            info!("Launching headless Chrome browser...");

            let mut builder = BrowserConfig::builder();

            if !self.config.sandbox {
                builder = builder.no_sandbox();
            }

            // Common args for stability
            builder = builder
                .arg("--disable-gpu")
                .arg("--disable-dev-shm-usage")
                .arg("--no-first-run")
                .arg("--disable-extensions");

            let browser_config = builder
                .build()
                .map_err(|e| Error::Fetch(format!("Failed to build browser config: {}", e)))?;

            let (browser, mut handler) = Browser::launch(browser_config)
                .await
                .map_err(|e| Error::Fetch(format!("Failed to launch browser: {}", e)))?;

            // Spawn handler task
            let handle = tokio::spawn(async move {
                while let Some(result) = handler.next().await {
                    if result.is_err() {
                        break;
                    }
                }
            });

            *browser_guard = Some(browser);
            *self.handler_handle.lock().await = Some(handle);

            Ok(())
        }

        /// Navigate to a URL and wait for it to settle.
        async fn open_page(&self, url: &str) -> Result<chromiumoxide::Page> {
            self.ensure_browser().await?;

            let browser_guard = self.browser.lock().await;
            let browser = browser_guard
                .as_ref()
                .ok_or_else(|| Error::Fetch("Browser not initialized".to_string()))?;

            let page = browser
                .new_page(url)
                .await
                .map_err(|e| Error::Fetch(format!("Failed to open page {}: {}", url, e)))?;

            let load_timeout = Duration::from_millis(self.config.page_load_timeout_ms);
            timeout(load_timeout, page.wait_for_navigation())
                .await
                .map_err(|_| Error::Fetch(format!("Page load timeout: {}", url)))?
                .map_err(|e| Error::Fetch(format!("Navigation failed for {}: {}", url, e)))?;

            // Settle wait for client-side rendering
            if self.config.render_wait_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.render_wait_ms)).await;
            }

            Ok(page)
        }

        /// Render a page and return its HTML.
        ///
        /// When `wait_for` is given, the selector must appear after the
        /// settle wait; its absence is a fatal fetch error.
        pub async fn render(&self, url: &str, wait_for: Option<&str>) -> Result<String> {
            debug!("Rendering page with headless browser: {}", url);
            let page = self.open_page(url).await?;

            if let Some(selector) = wait_for {
                let selector_timeout = Duration::from_secs(10);
                match timeout(selector_timeout, page.find_element(selector)).await {
                    Ok(Ok(_)) => debug!("Found required selector: {}", selector),
                    Ok(Err(_)) | Err(_) => {
                        let _ = page.close().await;
                        return Err(Error::Fetch(format!(
                            "Required selector {:?} never appeared on {}",
                            selector, url
                        )));
                    }
                }
            }

            let html = page
                .content()
                .await
                .map_err(|e| Error::Fetch(format!("Failed to read content of {}: {}", url, e)));

            if let Err(e) = page.close().await {
                warn!("Failed to close page: {}", e);
            }

            html
        }

        /// Navigate to a URL and read one attribute from the first element
        /// matching `selector`. Returns `Ok(None)` when the element or
        /// attribute is absent.
        pub async fn read_attribute(
            &self,
            url: &str,
            selector: &str,
            attribute: &str,
        ) -> Result<Option<String>> {
            debug!("Reading {}[{}] from {}", selector, attribute, url);
            let page = self.open_page(url).await?;

            let value = match page.find_element(selector).await {
                Ok(element) => element
                    .attribute(attribute)
                    .await
                    .map_err(|e| Error::Fetch(format!("Attribute read failed on {}: {}", url, e)))?,
                Err(_) => None,
            };

            if let Err(e) = page.close().await {
                warn!("Failed to close page: {}", e);
            }

            Ok(value)
        }

        /// Close the browser. Must be called exactly once at run end.
        pub async fn close(&self) -> Result<()> {
            let mut browser_guard = self.browser.lock().await;
            if let Some(mut browser) = browser_guard.take() {
                browser
                    .close()
                    .await
                    .map_err(|e| Error::Fetch(format!("Failed to close browser: {}", e)))?;
            }

            let mut handle_guard = self.handler_handle.lock().await;
            if let Some(handle) = handle_guard.take() {
                handle.abort();
            }

            Ok(())
        }
    }
}

#[cfg(feature = "js-rendering")]
pub use browser_impl::HeadlessRenderer;

/// Stub renderer when js-rendering feature is disabled
#[cfg(not(feature = "js-rendering"))]
pub struct HeadlessRenderer {
    _config: RendererConfig,
}

#[cfg(not(feature = "js-rendering"))]
impl HeadlessRenderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { _config: config }
    }

    pub async fn render(&self, url: &str, _wait_for: Option<&str>) -> Result<String> {
        Err(Error::Fetch(format!(
            "JavaScript rendering not available for {}. \
             Compile with --features js-rendering to enable headless browser support.",
            url
        )))
    }

    pub async fn read_attribute(
        &self,
        url: &str,
        _selector: &str,
        _attribute: &str,
    ) -> Result<Option<String>> {
        Err(Error::Fetch(format!(
            "JavaScript rendering not available for {}. \
             Compile with --features js-rendering to enable headless browser support.",
            url
        )))
    }

    pub async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Check if JS rendering feature is available
pub fn is_js_rendering_available() -> bool {
    cfg!(feature = "js-rendering")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_config_default() {
        let config = RendererConfig::default();
        assert!(config.sandbox);
        assert_eq!(config.render_wait_ms, 2000);
    }

    #[test]
    fn test_renderer_config_from_fetch() {
        let mut fetch = FetchConfig::default();
        fetch.no_sandbox = true;
        fetch.render_wait_ms = 500;
        let config = RendererConfig::from_fetch(&fetch);
        assert!(!config.sandbox);
        assert_eq!(config.render_wait_ms, 500);
    }
}
