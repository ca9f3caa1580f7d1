//! Default values for configuration

/// Default base origin of the site being mapped
pub fn default_base_url() -> String {
    "https://www.trevorion.io".to_string()
}

/// Default CSS selector for the content container holding the link index
pub fn default_container_selector() -> String {
    "div#sites-canvas-main-content".to_string()
}

/// Default output path for the sitemap
pub fn default_output_path() -> String {
    "sitemap.xml".to_string()
}

/// Default user agent string
pub fn default_user_agent() -> String {
    format!("sitemapper/{}", env!("CARGO_PKG_VERSION"))
}

/// Default request timeout in seconds
pub fn default_timeout_secs() -> u64 {
    30
}

/// Default page load timeout for the headless browser (milliseconds)
pub fn default_page_load_timeout_ms() -> u64 {
    30000
}

/// Default settle wait after load for client-side rendering (milliseconds)
pub fn default_render_wait_ms() -> u64 {
    2000
}

/// Default data attribute read by the page-scrape lastmod strategy
pub fn default_lastmod_attribute() -> String {
    "data-last-updated".to_string()
}

/// Default selector carrying the page-scrape lastmod attribute
pub fn default_lastmod_selector() -> String {
    "[data-last-updated]".to_string()
}

/// Default search-engine ping endpoint
pub fn default_ping_endpoint() -> String {
    "https://www.google.com/ping".to_string()
}
