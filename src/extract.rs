//! Link extraction from the rendered index page

use crate::error::{Error, Result};
use crate::models::ImageRef;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

/// Locate the content container and collect every anchor's `(href, text)`.
///
/// Pairs are returned in document order. Anchors with a missing or empty
/// `href` are skipped; an absent container is fatal since there is nothing to
/// build a sitemap from.
pub fn extract_links(html: &str, container_selector: &str) -> Result<Vec<(String, String)>> {
    let document = Html::parse_document(html);

    let container_sel = Selector::parse(container_selector)
        .map_err(|e| Error::Config(format!("Invalid container selector: {}", e)))?;
    let anchor_sel = Selector::parse("a")
        .map_err(|e| Error::Config(format!("Invalid anchor selector: {}", e)))?;

    let container = document
        .select(&container_sel)
        .next()
        .ok_or_else(|| Error::ContainerNotFound(container_selector.to_string()))?;

    let mut links = Vec::new();
    for anchor in container.select(&anchor_sel) {
        let href = match anchor.value().attr("href") {
            Some(h) if !h.trim().is_empty() => h.trim().to_string(),
            _ => continue,
        };
        let text = anchor.text().collect::<String>().trim().to_string();
        links.push((href, text));
    }

    debug!("Extracted {} anchors from container", links.len());
    Ok(links)
}

/// Find one representative image on a page: the `og:image` meta tag first,
/// then the first `img` element. Returns `None` when the page has neither.
pub fn discover_image(html: &str, page_url: &str) -> Option<ImageRef> {
    let document = Html::parse_document(html);
    let base = Url::parse(page_url).ok()?;

    let title = Selector::parse("title")
        .ok()
        .and_then(|sel| {
            document
                .select(&sel)
                .next()
                .map(|t| t.text().collect::<String>().trim().to_string())
        })
        .unwrap_or_default();

    if let Ok(sel) = Selector::parse(r#"meta[property="og:image"]"#) {
        if let Some(content) = document
            .select(&sel)
            .next()
            .and_then(|m| m.value().attr("content"))
        {
            if let Ok(loc) = base.join(content.trim()) {
                return Some(ImageRef {
                    loc: loc.to_string(),
                    title,
                });
            }
        }
    }

    let img_sel = Selector::parse("img[src]").ok()?;
    let img = document.select(&img_sel).next()?;
    let src = img.value().attr("src")?.trim();
    if src.is_empty() {
        return None;
    }
    let loc = base.join(src).ok()?.to_string();

    // An alt text beats the page title as a caption
    let title = match img.value().attr("alt").map(str::trim) {
        Some(alt) if !alt.is_empty() => alt.to_string(),
        _ => title,
    };

    Some(ImageRef { loc, title })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <div id="nav"><a href="/ignored">Nav</a></div>
        <div id="sites-canvas-main-content">
            <a href="/dailies/42">Daily 42</a>
            <a href="">Empty</a>
            <a>No href</a>
            <a href="https://example.com/news/1">News</a>
        </div>
        </body></html>
    "#;

    #[test]
    fn test_extracts_anchors_in_document_order() {
        let links = extract_links(PAGE, "div#sites-canvas-main-content").unwrap();
        assert_eq!(
            links,
            vec![
                ("/dailies/42".to_string(), "Daily 42".to_string()),
                ("https://example.com/news/1".to_string(), "News".to_string()),
            ]
        );
    }

    #[test]
    fn test_anchors_outside_container_are_ignored() {
        let links = extract_links(PAGE, "div#sites-canvas-main-content").unwrap();
        assert!(links.iter().all(|(href, _)| href != "/ignored"));
    }

    #[test]
    fn test_missing_container_is_fatal() {
        let err = extract_links(PAGE, "div#does-not-exist").unwrap_err();
        assert!(matches!(err, Error::ContainerNotFound(_)));
    }

    #[test]
    fn test_anchor_with_whitespace_href_is_skipped() {
        let html = r#"<div id="c"><a href="   ">Blank</a><a href="/x">X</a></div>"#;
        let links = extract_links(html, "div#c").unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].0, "/x");
    }

    #[test]
    fn test_discover_image_prefers_og_image() {
        let html = r#"
            <html><head>
            <title>Daily 42</title>
            <meta property="og:image" content="/img/banner.png">
            </head><body><img src="/img/inline.png" alt="Inline"></body></html>
        "#;
        let image = discover_image(html, "https://www.trevorion.io/dailies/42").unwrap();
        assert_eq!(image.loc, "https://www.trevorion.io/img/banner.png");
        assert_eq!(image.title, "Daily 42");
    }

    #[test]
    fn test_discover_image_falls_back_to_first_img() {
        let html = r#"<html><body><img src="cover.jpg" alt="Cover art"></body></html>"#;
        let image = discover_image(html, "https://example.com/comics/7").unwrap();
        assert_eq!(image.loc, "https://example.com/comics/cover.jpg");
        assert_eq!(image.title, "Cover art");
    }

    #[test]
    fn test_discover_image_none_without_images() {
        let html = "<html><body><p>Text only</p></body></html>";
        assert!(discover_image(html, "https://example.com/x").is_none());
    }
}
