//! Value types flowing through the sitemap pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A link discovered inside the content container.
///
/// `url` is absolute and normalized by the time the entry reaches the
/// classifier; `title` is the anchor's visible text and may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    pub url: String,
    pub title: String,
}

/// The seven change frequencies defined by the sitemap protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFreq::Always => "always",
            ChangeFreq::Hourly => "hourly",
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
            ChangeFreq::Yearly => "yearly",
            ChangeFreq::Never => "never",
        }
    }
}

/// One representative image attached to a sitemap record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub loc: String,
    pub title: String,
}

/// A fully classified entry, ready for serialization.
#[derive(Debug, Clone)]
pub struct SitemapRecord {
    pub loc: String,
    pub lastmod: DateTime<Utc>,
    pub priority: &'static str,
    pub changefreq: ChangeFreq,
    pub image: Option<ImageRef>,
}

impl SitemapRecord {
    /// ISO-8601 UTC timestamp with a trailing `Z`, second precision.
    pub fn lastmod_str(&self) -> String {
        self.lastmod.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_changefreq_as_str() {
        assert_eq!(ChangeFreq::Daily.as_str(), "daily");
        assert_eq!(ChangeFreq::Never.as_str(), "never");
    }

    #[test]
    fn test_lastmod_formats_with_z_suffix() {
        let record = SitemapRecord {
            loc: "https://example.com/page".to_string(),
            lastmod: Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap(),
            priority: "0.5",
            changefreq: ChangeFreq::Yearly,
            image: None,
        };
        assert_eq!(record.lastmod_str(), "2025-03-14T09:26:53Z");
    }
}
