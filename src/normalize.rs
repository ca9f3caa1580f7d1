//! URL normalization and deduplication
//!
//! Every href harvested from the index page passes through [`normalize`]
//! before it is considered final: redirect wrappers are unwrapped, relative
//! references are resolved against the base origin, fragments are dropped and
//! one trailing slash is trimmed. Deduplication is first-occurrence-wins over
//! the normalized form.

use crate::error::Result;
use crate::models::LinkEntry;
use std::collections::HashSet;
use tracing::{debug, warn};
use url::Url;

/// Normalize a raw href into its canonical absolute form.
///
/// Idempotent: feeding the output back in returns it unchanged.
pub fn normalize(href: &str, base: &Url) -> Result<String> {
    let resolved = base.join(href.trim())?;
    let mut resolved = unwrap_redirect(resolved);

    resolved.set_fragment(None);

    let mut out = resolved.to_string();
    if out.ends_with('/') {
        out.pop();
    }
    Ok(out)
}

/// Unwrap a known redirect-wrapper URL, substituting the embedded destination.
///
/// Google's link interstitial carries the true target percent-encoded in the
/// `q` query parameter (`https://www.google.com/url?q=<dest>&sa=D`).
fn unwrap_redirect(url: Url) -> Url {
    let is_wrapper = url
        .host_str()
        .map(|h| h == "www.google.com" || h == "google.com")
        .unwrap_or(false)
        && url.path() == "/url";

    if !is_wrapper {
        return url;
    }

    // query_pairs percent-decodes the destination for us
    match url
        .query_pairs()
        .find(|(k, _)| k == "q")
        .and_then(|(_, v)| Url::parse(&v).ok())
    {
        Some(dest) => dest,
        None => url,
    }
}

/// Drop entries whose normalized URL has already been seen.
///
/// The first occurrence wins; a later entry's title is discarded, not merged.
pub fn dedup(entries: Vec<LinkEntry>) -> Vec<LinkEntry> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(entries.len());

    for entry in entries {
        if seen.insert(entry.url.clone()) {
            out.push(entry);
        } else {
            debug!("Dropping duplicate URL: {}", entry.url);
        }
    }

    out
}

/// Normalize and deduplicate a raw `(href, title)` stream in one pass.
///
/// Hrefs that fail to resolve are skipped with a warning rather than
/// aborting the run.
pub fn normalize_all(raw: Vec<(String, String)>, base: &Url) -> Vec<LinkEntry> {
    let mut entries = Vec::with_capacity(raw.len());

    for (href, title) in raw {
        match normalize(&href, base) {
            Ok(url) => entries.push(LinkEntry { url, title }),
            Err(e) => warn!("Skipping unresolvable href {:?}: {}", href, e),
        }
    }

    dedup(entries)
}
