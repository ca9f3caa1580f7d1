//! Output serialization
//!
//! The sitemap XML tree is fully built in memory before the output file is
//! created, so a fatal error anywhere earlier in the pipeline never leaves a
//! partial file behind.

use crate::error::{Error, Result};
use crate::models::{LinkEntry, SitemapRecord};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::path::Path;
use tracing::info;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const IMAGE_NS: &str = "http://www.google.com/schemas/sitemap-image/1.1";

/// Serialize records into a sitemap-protocol XML document.
pub fn build_sitemap_xml(records: &[SitemapRecord]) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", SITEMAP_NS));
    // The image extension namespace is declared only when used
    if records.iter().any(|r| r.image.is_some()) {
        urlset.push_attribute(("xmlns:image", IMAGE_NS));
    }
    writer.write_event(Event::Start(urlset))?;

    for record in records {
        writer.write_event(Event::Start(BytesStart::new("url")))?;

        write_text_element(&mut writer, "loc", &record.loc)?;
        write_text_element(&mut writer, "lastmod", &record.lastmod_str())?;
        write_text_element(&mut writer, "changefreq", record.changefreq.as_str())?;
        write_text_element(&mut writer, "priority", record.priority)?;

        if let Some(image) = &record.image {
            writer.write_event(Event::Start(BytesStart::new("image:image")))?;
            write_text_element(&mut writer, "image:loc", &image.loc)?;
            write_text_element(&mut writer, "image:title", &image.title)?;
            writer.write_event(Event::End(BytesEnd::new("image:image")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("urlset")))?;

    Ok(writer.into_inner())
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Write the sitemap document to its output path.
pub fn write_sitemap(records: &[SitemapRecord], path: &Path) -> Result<()> {
    let xml = build_sitemap_xml(records)?;
    std::fs::write(path, xml)
        .map_err(|e| Error::Write(format!("{}: {}", path.display(), e)))?;
    info!("Wrote {} URLs to {}", records.len(), path.display());
    Ok(())
}

/// Render the discovered links as a clickable HTML list.
pub fn build_preview_html(entries: &[LinkEntry]) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n<title>Discovered links</title>\n");
    html.push_str("</head>\n<body>\n<h1>Discovered links</h1>\n<ul>\n");

    for entry in entries {
        let label = if entry.title.is_empty() {
            &entry.url
        } else {
            &entry.title
        };
        html.push_str(&format!(
            "  <li><a href=\"{}\">{}</a></li>\n",
            escape_html(&entry.url),
            escape_html(label)
        ));
    }

    html.push_str("</ul>\n</body>\n</html>\n");
    html
}

/// Write the optional HTML preview file.
pub fn write_preview(entries: &[LinkEntry], path: &Path) -> Result<()> {
    std::fs::write(path, build_preview_html(entries))
        .map_err(|e| Error::Write(format!("{}: {}", path.display(), e)))?;
    info!("Wrote preview of {} links to {}", entries.len(), path.display());
    Ok(())
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChangeFreq, ImageRef};
    use chrono::{TimeZone, Utc};

    fn record(loc: &str) -> SitemapRecord {
        SitemapRecord {
            loc: loc.to_string(),
            lastmod: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
            priority: "0.5",
            changefreq: ChangeFreq::Yearly,
            image: None,
        }
    }

    #[test]
    fn test_sitemap_xml_structure() {
        let records = vec![record("https://example.com/a"), record("https://example.com/b")];
        let xml = String::from_utf8(build_sitemap_xml(&records).unwrap()).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">"));
        assert_eq!(xml.matches("<url>").count(), 2);
        assert!(xml.contains("<loc>https://example.com/a</loc>"));
        assert!(xml.contains("<lastmod>2025-06-01T12:00:00Z</lastmod>"));
        assert!(xml.contains("<changefreq>yearly</changefreq>"));
        assert!(xml.contains("<priority>0.5</priority>"));
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn test_image_namespace_declared_only_when_used() {
        let without = build_sitemap_xml(&[record("https://example.com/a")]).unwrap();
        assert!(!String::from_utf8(without).unwrap().contains("xmlns:image"));

        let mut with_image = record("https://example.com/a");
        with_image.image = Some(ImageRef {
            loc: "https://example.com/a.png".to_string(),
            title: "A picture".to_string(),
        });
        let xml = String::from_utf8(build_sitemap_xml(&[with_image]).unwrap()).unwrap();
        assert!(xml.contains("xmlns:image=\"http://www.google.com/schemas/sitemap-image/1.1\""));
        assert!(xml.contains("<image:loc>https://example.com/a.png</image:loc>"));
        assert!(xml.contains("<image:title>A picture</image:title>"));
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let xml = String::from_utf8(
            build_sitemap_xml(&[record("https://example.com/a?x=1&y=2")]).unwrap(),
        )
        .unwrap();
        assert!(xml.contains("<loc>https://example.com/a?x=1&amp;y=2</loc>"));
    }

    #[test]
    fn test_write_sitemap_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sitemap.xml");
        write_sitemap(&[record("https://example.com/a")], &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("</urlset>"));
    }

    #[test]
    fn test_preview_title_defaults_to_url() {
        let entries = vec![
            LinkEntry {
                url: "https://example.com/a".to_string(),
                title: "Page A".to_string(),
            },
            LinkEntry {
                url: "https://example.com/b".to_string(),
                title: String::new(),
            },
        ];
        let html = build_preview_html(&entries);
        assert!(html.contains(">Page A</a>"));
        assert!(html.contains(">https://example.com/b</a>"));
        assert_eq!(html.matches("<li>").count(), 2);
    }
}
