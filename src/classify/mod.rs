//! Priority and change-frequency classification
//!
//! Both classifiers are total functions over the normalized URL: an ordered
//! rule table is walked top to bottom and the first match wins. The tables
//! are not mutually exclusive (a URL can contain both `/news` and a year
//! segment), so precedence is part of the contract.
//!
//! The year pattern maps to monthly, never daily: year-stamped archive pages
//! settle once their year closes.

pub mod lastmod;

pub use lastmod::{resolve_lastmod, LastmodContext};

use crate::models::ChangeFreq;
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// Path segment that looks like a year (`/1998`, `/2025/03`, ...).
fn year_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/(19|20)\d{2}(/|$)").unwrap())
}

/// Lowercased path of a URL, or the whole input when it does not parse.
fn url_path(url: &str) -> String {
    Url::parse(url)
        .map(|u| u.path().to_lowercase())
        .unwrap_or_else(|_| url.to_lowercase())
}

/// True when the URL is the base origin itself (any trailing slash ignored).
fn is_base(url: &str, base_url: &str) -> bool {
    url.trim_end_matches('/') == base_url.trim_end_matches('/')
}

/// Priority bucket for a normalized URL.
///
/// Returns one of `1.0`, `0.8`, `0.6`, `0.5`; never fails.
pub fn priority(url: &str, base_url: &str) -> &'static str {
    let path = url_path(url);

    if is_base(url, base_url) || path.ends_with("/home") {
        "1.0"
    } else if path.contains("/dailies") {
        "1.0"
    } else if path.contains("status") || path.contains("/articles") || path.contains("/news") {
        "0.8"
    } else if year_pattern().is_match(&path) {
        "0.6"
    } else {
        "0.5"
    }
}

/// Change-frequency bucket for a normalized URL.
///
/// Total: every input lands in one of daily, weekly, monthly, yearly.
pub fn changefreq(url: &str, base_url: &str) -> ChangeFreq {
    let path = url_path(url);

    if is_base(url, base_url) || path.ends_with("/home") {
        ChangeFreq::Daily
    } else if path.contains("/dailies") || path.contains("sitemap") {
        ChangeFreq::Daily
    } else if path.contains("/news")
        || path.contains("/articles")
        || path.contains("status")
        || path.contains("/comics")
    {
        ChangeFreq::Weekly
    } else if path.contains("/puzzles") || year_pattern().is_match(&path) {
        ChangeFreq::Monthly
    } else {
        ChangeFreq::Yearly
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.trevorion.io";

    #[test]
    fn test_priority_rule_table() {
        assert_eq!(priority("https://www.trevorion.io", BASE), "1.0");
        assert_eq!(priority("https://www.trevorion.io/home", BASE), "1.0");
        assert_eq!(priority("https://www.trevorion.io/dailies/42", BASE), "1.0");
        assert_eq!(priority("https://example.com/news/1", BASE), "0.8");
        assert_eq!(priority("https://example.com/articles/x", BASE), "0.8");
        assert_eq!(
            priority("https://twitter.com/foo/status/12345", BASE),
            "0.8"
        );
        assert_eq!(priority("https://example.com/2025/03", BASE), "0.6");
        assert_eq!(priority("https://example.com/about", BASE), "0.5");
    }

    #[test]
    fn test_priority_precedence_dailies_beats_year() {
        // Both rules match; the earlier row wins.
        assert_eq!(
            priority("https://www.trevorion.io/dailies/2025/01", BASE),
            "1.0"
        );
    }

    #[test]
    fn test_changefreq_rule_table() {
        assert_eq!(changefreq("https://www.trevorion.io", BASE), ChangeFreq::Daily);
        assert_eq!(
            changefreq("https://www.trevorion.io/dailies/42", BASE),
            ChangeFreq::Daily
        );
        assert_eq!(
            changefreq("https://example.com/news/1", BASE),
            ChangeFreq::Weekly
        );
        assert_eq!(
            changefreq("https://example.com/comics/7", BASE),
            ChangeFreq::Weekly
        );
        assert_eq!(
            changefreq("https://example.com/puzzles/9", BASE),
            ChangeFreq::Monthly
        );
        assert_eq!(
            changefreq("https://example.com/about", BASE),
            ChangeFreq::Yearly
        );
    }

    #[test]
    fn test_changefreq_year_pattern_is_monthly() {
        assert_eq!(
            changefreq("https://example.com/2025/03/14", BASE),
            ChangeFreq::Monthly
        );
        assert_eq!(
            changefreq("https://example.com/1999", BASE),
            ChangeFreq::Monthly
        );
    }

    #[test]
    fn test_changefreq_news_with_year_is_weekly() {
        // news row precedes the year row
        assert_eq!(
            changefreq("https://example.com/news/2025/01", BASE),
            ChangeFreq::Weekly
        );
    }

    #[test]
    fn test_totality_on_garbage_input() {
        // Unparsable strings still classify via the raw text.
        assert_eq!(priority("not a url at all", BASE), "0.5");
        assert_eq!(changefreq("not a url at all", BASE), ChangeFreq::Yearly);
    }

    #[test]
    fn test_output_sets_are_closed() {
        let urls = [
            "https://www.trevorion.io",
            "https://www.trevorion.io/dailies/1",
            "https://a.com/news/1",
            "https://a.com/2024",
            "https://a.com/misc",
            "",
        ];
        for url in urls {
            assert!(matches!(priority(url, BASE), "1.0" | "0.8" | "0.6" | "0.5"));
            assert!(matches!(
                changefreq(url, BASE),
                ChangeFreq::Daily | ChangeFreq::Weekly | ChangeFreq::Monthly | ChangeFreq::Yearly
            ));
        }
    }
}
