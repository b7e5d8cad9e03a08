//! Aggregated RSS 2.0 feed rendering.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::app::Result;
use crate::config::SiteConfig;
use crate::domain::FeedItem;
use crate::render::escape_xml;

const RFC822: &str = "%a, %d %b %Y %H:%M:%S %z";

/// Descriptions longer than this also get a `content:encoded` block, which
/// some readers prefer for full-text display.
const CONTENT_ENCODED_THRESHOLD: usize = 200;

pub struct FeedRenderer<'a> {
    site: &'a SiteConfig,
    base_url: &'a str,
}

impl<'a> FeedRenderer<'a> {
    pub fn new(site: &'a SiteConfig, base_url: &'a str) -> Self {
        Self { site, base_url }
    }

    pub fn write(&self, path: &Path, items: &[FeedItem], now: DateTime<Utc>) -> Result<()> {
        let xml = self.render(items, now);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, xml)?;
        info!("wrote {} ({} items)", path.display(), items.len());
        Ok(())
    }

    pub fn render(&self, items: &[FeedItem], now: DateTime<Utc>) -> String {
        let mut xml = String::with_capacity(64 * 1024 + items.len() * 1024);
        self.channel_header(&mut xml, now);
        for item in items {
            self.item(&mut xml, item);
        }
        xml.push_str("  </channel>\n</rss>\n");
        xml
    }

    fn channel_header(&self, xml: &mut String, now: DateTime<Utc>) {
        let base = self.base_url;
        let build_date = now.format(RFC822);

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str(
            "<rss version=\"2.0\" \
             xmlns:content=\"http://purl.org/rss/1.0/modules/content/\" \
             xmlns:atom=\"http://www.w3.org/2005/Atom\" \
             xmlns:dc=\"http://purl.org/dc/elements/1.1/\" \
             xmlns:sy=\"http://purl.org/rss/1.0/modules/syndication/\">\n",
        );
        let _ = write!(
            xml,
            "  <channel>\n    \
             <title>{title}</title>\n    \
             <link>{base}</link>\n    \
             <description>{description}</description>\n    \
             <language>{language}</language>\n    \
             <lastBuildDate>{build_date}</lastBuildDate>\n    \
             <pubDate>{build_date}</pubDate>\n    \
             <generator>izvor {version}</generator>\n    \
             <webMaster>{webmaster}</webMaster>\n    \
             <managingEditor>{webmaster}</managingEditor>\n    \
             <atom:link href=\"{base}/feed.xml\" rel=\"self\" type=\"application/rss+xml\"/>\n",
            title = escape_xml(&self.site.title),
            description = escape_xml(&self.site.description),
            language = escape_xml(&self.site.language),
            webmaster = escape_xml(&self.site.webmaster),
            version = env!("CARGO_PKG_VERSION"),
        );
        let _ = write!(
            xml,
            "    <image>\n      \
             <url>{base}{logo}</url>\n      \
             <title>{title}</title>\n      \
             <link>{base}</link>\n      \
             <width>144</width>\n      \
             <height>144</height>\n    \
             </image>\n",
            logo = escape_xml(&self.site.logo_path),
            title = escape_xml(&self.site.title),
        );
        xml.push_str(
            "    <category>Press Releases</category>\n    \
             <category>Romania</category>\n    \
             <category>News</category>\n    \
             <category>Media</category>\n    \
             <category>RSS Feed</category>\n    \
             <ttl>60</ttl>\n    \
             <sy:updatePeriod>hourly</sy:updatePeriod>\n    \
             <sy:updateFrequency>1</sy:updateFrequency>\n",
        );
        let _ = write!(
            xml,
            "    <copyright>Copyright {year} Release Press Releases in Romania. \
             Content belongs to respective publishers.</copyright>\n    \
             <docs>https://www.rssboard.org/rss-specification</docs>\n",
            year = now.format("%Y"),
        );
    }

    fn item(&self, xml: &mut String, item: &FeedItem) {
        let base = self.base_url;
        let title = escape_xml(&item.title);
        let link = escape_xml(&item.link);
        let description = escape_xml(&item.description);
        let author = escape_xml(item.display_author());
        let category = escape_xml(&item.category);
        let site_name = escape_xml(&item.publisher_name);
        let slug = escape_xml(&item.publisher_slug);

        // Attribution prefix so aggregated entries keep their provenance in
        // readers that only show the description.
        let enhanced = if !item.publisher_name.is_empty() && item.publisher_name != "Unknown" {
            format!("From {}: {}", item.publisher_name, item.description)
        } else {
            item.description.clone()
        };

        let guid = if !item.link.is_empty() {
            link.clone()
        } else {
            format!("{base}/publisher/{slug}/").into()
        };

        let _ = write!(
            xml,
            "    <item>\n      \
             <title>{title}</title>\n      \
             <link>{link}</link>\n      \
             <description><![CDATA[{enhanced}]]></description>\n      \
             <pubDate>{pub_date}</pubDate>\n      \
             <author>{author} ({base}/publisher/{slug}/)</author>\n      \
             <dc:creator>{author}</dc:creator>\n      \
             <dc:date>{iso_date}</dc:date>\n      \
             <category domain=\"{base}/category/\">{category}</category>\n      \
             <guid isPermaLink=\"true\">{guid}</guid>\n      \
             <source url=\"{base}/publisher/{slug}/\">{site_name}</source>\n",
            pub_date = item.published.format(RFC822),
            iso_date = item.published.to_rfc3339(),
        );

        if description.len() > CONTENT_ENCODED_THRESHOLD {
            let _ = write!(
                xml,
                "      <content:encoded><![CDATA[{enhanced}]]></content:encoded>\n"
            );
        }
        if !item.link.is_empty() {
            let _ = write!(xml, "      <comments>{link}#comments</comments>\n");
        }

        xml.push_str("    </item>\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn site() -> SiteConfig {
        SiteConfig::default()
    }

    fn item(title: &str, link: &str, description: &str) -> FeedItem {
        FeedItem {
            title: title.to_string(),
            link: link.to_string(),
            description: description.to_string(),
            published: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
            author: String::new(),
            feed_title: "Feed".to_string(),
            feed_link: "https://acme.ro".to_string(),
            publisher_slug: "acme".to_string(),
            publisher_name: "Acme".to_string(),
            publisher_url: "https://acme.ro".to_string(),
            category: "Health".to_string(),
        }
    }

    #[test]
    fn test_channel_metadata_present() {
        let site = site();
        let renderer = FeedRenderer::new(&site, "https://example.github.io");
        let now = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
        let xml = renderer.render(&[], now);

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<rss version=\"2.0\""));
        assert!(xml.contains("xmlns:content="));
        assert!(xml.contains("<ttl>60</ttl>"));
        assert!(xml.contains("<sy:updatePeriod>hourly</sy:updatePeriod>"));
        assert!(xml.contains("<lastBuildDate>Sat, 02 Mar 2024 00:00:00 +0000</lastBuildDate>"));
        assert!(xml.contains("Copyright 2024"));
        assert!(xml.contains(
            "<atom:link href=\"https://example.github.io/feed.xml\" rel=\"self\""
        ));
        assert!(xml.ends_with("</channel>\n</rss>\n"));
    }

    #[test]
    fn test_item_fields_rendered() {
        let site = site();
        let renderer = FeedRenderer::new(&site, "https://example.github.io");
        let xml = renderer.render(
            &[item("Lansare", "https://acme.ro/a", "descriere")],
            Utc::now(),
        );

        assert!(xml.contains("<title>Lansare</title>"));
        assert!(xml.contains("<description><![CDATA[From Acme: descriere]]></description>"));
        assert!(xml.contains("<guid isPermaLink=\"true\">https://acme.ro/a</guid>"));
        assert!(xml.contains("<pubDate>Fri, 01 Mar 2024 10:00:00 +0000</pubDate>"));
        assert!(xml.contains("<dc:creator>Acme</dc:creator>"));
        assert!(xml.contains(
            "<source url=\"https://example.github.io/publisher/acme/\">Acme</source>"
        ));
        assert!(xml.contains("<comments>https://acme.ro/a#comments</comments>"));
    }

    #[test]
    fn test_empty_link_gets_publisher_guid_and_no_comments() {
        let site = site();
        let renderer = FeedRenderer::new(&site, "https://example.github.io");
        let xml = renderer.render(&[item("T", "", "d")], Utc::now());

        assert!(xml.contains(
            "<guid isPermaLink=\"true\">https://example.github.io/publisher/acme/</guid>"
        ));
        assert!(!xml.contains("<comments>"));
    }

    #[test]
    fn test_content_encoded_only_for_long_descriptions() {
        let site = site();
        let renderer = FeedRenderer::new(&site, "https://example.github.io");

        let short = renderer.render(&[item("T", "https://a.ro/x", "scurt")], Utc::now());
        assert!(!short.contains("<content:encoded>"));

        let long_text = "a".repeat(250);
        let long = renderer.render(&[item("T", "https://a.ro/x", &long_text)], Utc::now());
        assert!(long.contains("<content:encoded><![CDATA[From Acme: "));
    }

    #[test]
    fn test_titles_escaped() {
        let site = site();
        let renderer = FeedRenderer::new(&site, "https://example.github.io");
        let xml = renderer.render(
            &[item("Cercetare & <Dezvoltare>", "https://a.ro/x", "d")],
            Utc::now(),
        );
        assert!(xml.contains("<title>Cercetare &amp; &lt;Dezvoltare&gt;</title>"));
    }

    #[test]
    fn test_write_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("feed.xml");
        let site = site();
        let renderer = FeedRenderer::new(&site, "https://example.github.io");
        renderer.write(&path, &[], Utc::now()).unwrap();
        assert!(path.exists());
    }
}
