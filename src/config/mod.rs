//! Configuration management for sitemapper
//!
//! All tunables (base origin, index page URL, container selector, output
//! paths, fetch/lastmod strategies, rule toggles) live here and are passed
//! into each pipeline stage explicitly. Loading from a TOML file is optional;
//! every field has a default.

mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base origin of the site being mapped (no trailing slash)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// The link index page to crawl; defaults to `<base_url>/sitemap`
    #[serde(default)]
    pub index_url: Option<String>,

    /// CSS selector for the content container holding the link index
    #[serde(default = "default_container_selector")]
    pub container_selector: String,

    /// Output path for the sitemap XML
    #[serde(default = "default_output_path")]
    pub output_path: String,

    /// Optional secondary HTML preview output
    #[serde(default)]
    pub preview_path: Option<String>,

    /// Discover one representative image per URL (requires a per-page visit)
    #[serde(default)]
    pub discover_images: bool,

    /// Fetch configuration
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Lastmod inference configuration
    #[serde(default)]
    pub lastmod: LastmodConfig,

    /// Search-engine ping configuration
    #[serde(default)]
    pub ping: PingConfig,
}

/// How the index page (and enrichment pages) are fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStrategy {
    /// Plain HTTP GET returning static markup
    Http,
    /// Headless-browser render for client-side generated content
    Browser,
}

/// Fetch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Fetch strategy for the index page
    #[serde(default = "default_fetch_strategy")]
    pub strategy: FetchStrategy,

    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Browser page load timeout (milliseconds)
    #[serde(default = "default_page_load_timeout_ms")]
    pub page_load_timeout_ms: u64,

    /// Settle wait after load for client-side rendering (milliseconds)
    #[serde(default = "default_render_wait_ms")]
    pub render_wait_ms: u64,

    /// Disable the browser sandbox (Docker/CI environments)
    #[serde(default)]
    pub no_sandbox: bool,
}

fn default_fetch_strategy() -> FetchStrategy {
    FetchStrategy::Http
}

/// How lastmod is inferred per URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LastmodStrategy {
    /// Every record carries the run's fixed timestamp
    RunTimestamp,
    /// Decode the numeric ID embedded in `/status/<id>` URLs
    Snowflake,
    /// Query git history for a local path matching the URL path
    GitHistory,
    /// Render the page and read a "last updated" data attribute
    PageScrape,
}

/// Lastmod inference configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastmodConfig {
    /// Exactly one strategy per run; any failure degrades to the run timestamp
    #[serde(default = "default_lastmod_strategy")]
    pub strategy: LastmodStrategy,

    /// Repository root for the git-history strategy
    #[serde(default)]
    pub repo_root: Option<PathBuf>,

    /// Selector carrying the page-scrape lastmod attribute
    #[serde(default = "default_lastmod_selector")]
    pub selector: String,

    /// Data attribute read by the page-scrape strategy
    #[serde(default = "default_lastmod_attribute")]
    pub attribute: String,
}

fn default_lastmod_strategy() -> LastmodStrategy {
    LastmodStrategy::RunTimestamp
}

/// Search-engine ping configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingConfig {
    /// Ping the submission endpoint after a successful write
    #[serde(default)]
    pub enabled: bool,

    /// Submission endpoint; the sitemap URL is passed as `?sitemap=`
    #[serde(default = "default_ping_endpoint")]
    pub endpoint: String,

    /// Public URL of the written sitemap, required when enabled
    #[serde(default)]
    pub sitemap_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            index_url: None,
            container_selector: default_container_selector(),
            output_path: default_output_path(),
            preview_path: None,
            discover_images: false,
            fetch: FetchConfig::default(),
            lastmod: LastmodConfig::default(),
            ping: PingConfig::default(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            strategy: default_fetch_strategy(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            page_load_timeout_ms: default_page_load_timeout_ms(),
            render_wait_ms: default_render_wait_ms(),
            no_sandbox: false,
        }
    }
}

impl Default for LastmodConfig {
    fn default() -> Self {
        Self {
            strategy: default_lastmod_strategy(),
            repo_root: None,
            selector: default_lastmod_selector(),
            attribute: default_lastmod_attribute(),
        }
    }
}

impl Default for PingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_ping_endpoint(),
            sitemap_url: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(config_path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", config_path);

        if !config_path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        let content = std::fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// The link index page to crawl
    pub fn index_url(&self) -> String {
        self.index_url
            .clone()
            .unwrap_or_else(|| format!("{}/sitemap", self.base_url.trim_end_matches('/')))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("base_url is not a valid URL: {}", e)))?;
        if base.host_str().is_none() {
            return Err(Error::Config("base_url must have a host".to_string()));
        }

        if self.lastmod.strategy == LastmodStrategy::GitHistory && self.lastmod.repo_root.is_none()
        {
            return Err(Error::Config(
                "lastmod.repo_root is required for the git-history strategy".to_string(),
            ));
        }

        if self.ping.enabled && self.ping.sitemap_url.is_none() {
            return Err(Error::Config(
                "ping.sitemap_url is required when ping is enabled".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.index_url(), "https://www.trevorion.io/sitemap");
    }

    #[test]
    fn test_index_url_override() {
        let mut config = Config::default();
        config.index_url = Some("https://www.trevorion.io/links".to_string());
        assert_eq!(config.index_url(), "https://www.trevorion.io/links");
    }

    #[test]
    fn test_git_history_requires_repo_root() {
        let mut config = Config::default();
        config.lastmod.strategy = LastmodStrategy::GitHistory;
        assert!(config.validate().is_err());

        config.lastmod.repo_root = Some(PathBuf::from("."));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ping_requires_sitemap_url() {
        let mut config = Config::default();
        config.ping.enabled = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml = r#"
            base_url = "https://example.com"

            [fetch]
            strategy = "browser"

            [lastmod]
            strategy = "snowflake"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.base_url, "https://example.com");
        assert_eq!(config.fetch.strategy, FetchStrategy::Browser);
        assert_eq!(config.lastmod.strategy, LastmodStrategy::Snowflake);
        assert_eq!(config.output_path, "sitemap.xml");
    }
}
