//! Last-modified inference
//!
//! Exactly one strategy is configured per run. Every strategy is best-effort:
//! any failure degrades to the run's fixed timestamp for that one record and
//! never aborts the run.

use crate::config::{LastmodConfig, LastmodStrategy};
use crate::fetch::HeadlessRenderer;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::path::Path;
use tracing::{debug, warn};
use url::Url;

/// Milliseconds between the Unix epoch and the snowflake epoch
/// (2010-11-04T01:42:54.657Z).
const SNOWFLAKE_EPOCH_MS: i64 = 1_288_834_974_657;

/// Shared inputs for per-record lastmod resolution.
pub struct LastmodContext<'a> {
    pub config: &'a LastmodConfig,
    /// Captured once at pipeline start; every fallback uses the same value.
    pub run_timestamp: DateTime<Utc>,
    /// Browser handle for the page-scrape strategy, when one is open.
    pub renderer: Option<&'a HeadlessRenderer>,
}

/// Resolve the lastmod timestamp for one URL.
pub async fn resolve_lastmod(url: &str, ctx: &LastmodContext<'_>) -> DateTime<Utc> {
    let inferred = match ctx.config.strategy {
        LastmodStrategy::RunTimestamp => Some(ctx.run_timestamp),
        LastmodStrategy::Snowflake => decode_snowflake(url),
        LastmodStrategy::GitHistory => match &ctx.config.repo_root {
            Some(root) => git_lastmod(root, url).await,
            None => None,
        },
        LastmodStrategy::PageScrape => {
            scrape_lastmod(url, ctx.renderer, &ctx.config.selector, &ctx.config.attribute).await
        }
    };

    match inferred {
        Some(ts) => ts,
        None => {
            debug!("No lastmod inferred for {}, using run timestamp", url);
            ctx.run_timestamp
        }
    }
}

/// Decode the creation time embedded in a `/status/<id>` snowflake ID.
///
/// The upper bits carry milliseconds since the platform epoch:
/// `timestamp_ms = (id >> 22) + SNOWFLAKE_EPOCH_MS`.
pub fn decode_snowflake(url: &str) -> Option<DateTime<Utc>> {
    let parsed = Url::parse(url).ok()?;
    let id: u64 = parsed
        .path_segments()?
        .skip_while(|s| *s != "status")
        .nth(1)?
        .parse()
        .ok()?;

    let ms = (id >> 22) as i64 + SNOWFLAKE_EPOCH_MS;
    Utc.timestamp_millis_opt(ms).single()
}

/// Last commit time of the local file matching the URL's path component.
pub async fn git_lastmod(repo_root: &Path, url: &str) -> Option<DateTime<Utc>> {
    let parsed = Url::parse(url).ok()?;
    let rel_path = parsed.path().trim_start_matches('/').to_string();
    if rel_path.is_empty() {
        return None;
    }

    let output = tokio::process::Command::new("git")
        .args(["log", "-1", "--format=%cI", "--"])
        .arg(&rel_path)
        .current_dir(repo_root)
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        debug!("git log failed for {}", rel_path);
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let line = stdout.trim();
    if line.is_empty() {
        return None;
    }

    DateTime::parse_from_rfc3339(line)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Render the page and read its "last updated" data attribute.
async fn scrape_lastmod(
    url: &str,
    renderer: Option<&HeadlessRenderer>,
    selector: &str,
    attribute: &str,
) -> Option<DateTime<Utc>> {
    let renderer = renderer?;
    match renderer.read_attribute(url, selector, attribute).await {
        Ok(Some(value)) => parse_timestamp(&value),
        Ok(None) => None,
        Err(e) => {
            warn!("Lastmod scrape failed for {}: {}", url, e);
            None
        }
    }
}

/// Parse a scraped timestamp: full RFC 3339 first, then a bare date
/// (midnight UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| Utc.from_utc_datetime(&ndt))
}
