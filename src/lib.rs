//! sitemapper - generate a sitemap.xml from the rendered link index page of
//! a website
//!
//! The pipeline is a single pass: fetch the index page (HTTP or headless
//! render), extract anchors from the configured content container, normalize
//! and deduplicate the URLs, classify each into priority/changefreq buckets,
//! infer a per-URL lastmod, and serialize the result as sitemap-protocol XML.

pub mod classify;
pub mod commands;
pub mod config;
pub mod emit;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod models;
pub mod normalize;
pub mod ping;
