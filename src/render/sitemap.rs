//! Sitemap and robots.txt generation.
//!
//! The sitemap lists the static entry pages, both language variants of every
//! category page, and both variants of every publisher page, all stamped
//! with the generation date.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use tracing::info;

use crate::app::Result;
use crate::registry::Registry;
use crate::render::{category_slug_en, category_slug_ro, escape_xml};

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

pub struct Sitemap {
    urls: Vec<UrlEntry>,
}

struct UrlEntry {
    loc: String,
    lastmod: String,
}

impl Sitemap {
    pub fn build(registry: &Registry, base_url: &str, today: NaiveDate) -> Self {
        let base = base_url.trim_end_matches('/');
        let lastmod = today.format("%Y-%m-%d").to_string();

        let mut locs = vec![
            format!("{base}/"),
            format!("{base}/publishers/"),
            format!("{base}/en/"),
            format!("{base}/en/publishers/"),
        ];

        for category in registry.categories() {
            locs.push(format!("{base}/categorie/{}/", category_slug_ro(category)));
            locs.push(format!("{base}/en/category/{}/", category_slug_en(category)));
        }

        for site in &registry.sites {
            locs.push(format!("{base}/publisher/{}/", site.slug));
            locs.push(format!("{base}/en/publisher/{}/", site.slug));
        }

        let urls = locs
            .into_iter()
            .map(|loc| UrlEntry {
                loc,
                lastmod: lastmod.clone(),
            })
            .collect();

        Self { urls }
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    fn into_xml(self) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<urlset xmlns=\"");
        xml.push_str(SITEMAP_NS);
        xml.push_str("\">\n");

        for entry in self.urls {
            xml.push_str("  <url>\n    <loc>");
            xml.push_str(&escape_xml(&entry.loc));
            xml.push_str("</loc>\n    <lastmod>");
            xml.push_str(&entry.lastmod);
            xml.push_str("</lastmod>\n  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }

    pub fn write(self, path: &Path) -> Result<()> {
        let count = self.len();
        let xml = self.into_xml();
        fs::write(path, xml)?;
        info!("wrote {} ({} urls)", path.display(), count);
        Ok(())
    }
}

/// Two fixed directives plus the sitemap reference.
pub fn write_robots(path: &Path, base_url: &str) -> Result<()> {
    let base = base_url.trim_end_matches('/');
    let robots = format!("User-agent: *\nAllow: /\nSitemap: {base}/sitemap.xml\n");
    fs::write(path, robots)?;
    info!("wrote {}", path.display());
    Ok(())
}
