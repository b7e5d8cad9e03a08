//! Per-publisher HTML page rendering.
//!
//! Each publisher gets one static page under `publisher/<slug>/index.html`.
//! The page carries the SEO surface (canonical, Open Graph, JSON-LD,
//! breadcrumbs) and `data-` attributes the front-end widgets read to load
//! the cached feed snapshot.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use rand::seq::SliceRandom;
use serde_json::json;
use tracing::info;

use crate::app::Result;
use crate::config::SiteConfig;
use crate::domain::Publisher;
use crate::registry::Registry;
use crate::render::category_slug_en;

const RELATED_LIMIT: usize = 6;

pub struct PageRenderer<'a> {
    site: &'a SiteConfig,
    base_url: &'a str,
}

impl<'a> PageRenderer<'a> {
    pub fn new(site: &'a SiteConfig, base_url: &'a str) -> Self {
        Self { site, base_url }
    }

    /// Render every publisher page under `<root>/publisher/<slug>/`.
    pub fn write_all(&self, registry: &Registry, root: &Path) -> Result<usize> {
        let mut generated = 0;
        for publisher in &registry.sites {
            let related = related_publishers(registry, publisher);
            let html = self.render_page(publisher, &related);

            let dir = root.join("publisher").join(&publisher.slug);
            fs::create_dir_all(&dir)?;
            fs::write(dir.join("index.html"), html)?;
            generated += 1;
        }
        info!("generated {} publisher pages", generated);
        Ok(generated)
    }

    pub fn render_page(&self, p: &Publisher, related: &[&Publisher]) -> String {
        let base = self.base_url;
        let name = esc(&p.name);
        let category = esc(&p.category);
        let category_slug = category_slug_en(&p.category);
        let url_display = p
            .url
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');

        let title = format!(
            "{} — Release Press Releases | {} | {}",
            p.name, p.category, self.site.name
        );
        let meta_description = p
            .description_short()
            .or_else(|| p.description_small())
            .map(str::to_string)
            .unwrap_or_else(|| {
                format!(
                    "{} - press releases from {} category.",
                    p.name,
                    p.category.to_lowercase()
                )
            });
        let long_description = p.description_any().map(str::to_string).unwrap_or_else(|| {
            format!(
                "{} provides press releases and news from the {} category. Access the \
                 latest press releases, news updates, and media content through our RSS \
                 feed integration and online platform.",
                p.name,
                p.category.to_lowercase()
            )
        });
        let keywords = p
            .keywords
            .iter()
            .take(10)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");

        let json_ld = self.json_ld(p, &title, &meta_description, &keywords);
        let pills = self.keyword_pills(p);
        let related_html = self.related_section(p, related, &category_slug);
        let mastodon = p.mastodon.as_deref().unwrap_or("");
        let mastodon_rss = p.mastodon_rss.as_deref().unwrap_or("");

        let mut html = String::with_capacity(16 * 1024);
        let _ = write!(
            html,
            r##"<!doctype html>
<html lang="en" dir="ltr">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title_esc}</title>
  <meta name="description" content="{meta_desc_attr}">
  <meta name="keywords" content="{keywords_attr}">
  <link rel="canonical" href="{base}/publisher/{slug}/">
  <meta name="robots" content="index,follow,max-snippet:-1,max-image-preview:large,max-video-preview:-1">
  <meta property="og:type" content="website">
  <meta property="og:title" content="{name_attr} — Release Press Releases">
  <meta property="og:description" content="{meta_desc_attr}">
  <meta property="og:url" content="{base}/publisher/{slug}/">
  <meta property="og:locale" content="en_US">
  <meta name="twitter:card" content="summary_large_image">
  <meta name="theme-color" content="#6d5efc">
  <link rel="stylesheet" href="/assets/styles.css">
  <script type="application/ld+json">{json_ld}</script>
</head>

<body class="publisher" data-slug="{slug}" data-site-url="{url_attr}" data-rss="{rss_attr}" data-mastodon="{mastodon_attr}" data-mastodon-rss="{mastodon_rss_attr}">
<div class="nav">
  <div class="nav-inner">
    <a class="brand" href="/" aria-label="{site_name_attr} homepage">
      <img src="/assets/images/logo.svg" alt="{site_name_attr}" width="36" height="36" class="brand-logo" loading="eager">
      <span>{site_name}</span>
    </a>
    <div class="nav-links">
      <a href="/publishers/">Publishers</a>
      <a href="/category/">Categories</a>
      <a href="/feed.xml">RSS Feed</a>
      <a href="/sitemap.xml">Sitemap</a>
    </div>
  </div>
</div>

<div class="container">
  <div class="breadcrumb">
    <a href="/">Home</a> <span>›</span> <a href="/publishers/">Publishers</a> <span>›</span> <a href="/category/{category_slug}/">{category}</a> <span>›</span> <span>{name}</span>
  </div>

  <div class="hero">
    <h1 class="h-title">{name}</h1>
    <p class="h-sub">{long_desc}</p>
    <div class="pills">
      <span class="pill"><i></i>{category}</span>
      {pills}
    </div>
  </div>

  <section class="card">
    <div class="card-head">
      <h2>About {name}</h2>
      <small><a href="/category/{category_slug}/">View category {category}</a></small>
    </div>
    <div class="card-body">
      <p>{long_desc}</p>
      <p class="meta-links">
        <strong>Website:</strong> <a href="{url_attr}" target="_blank" rel="noopener">{url_display}</a> |
        <strong>Category:</strong> <a href="/category/{category_slug}/">{category}</a> |
        <strong>RSS Feed:</strong> <a href="{rss_attr}" target="_blank" rel="nofollow noopener">Subscribe</a>
      </p>
      <p class="muted">
        Explore more publishers in the <a href="/category/{category_slug}/">{category} category</a>,
        browse our <a href="/publishers/">complete publisher directory</a>, or return to the
        <a href="/">homepage</a> to discover more press release sources from Romania.
      </p>
    </div>
  </section>
{related_html}
  <p class="page-sub">
    <a id="siteLink" href="{url_attr}" target="_blank" rel="noopener">{url_display}</a>
    <span class="sep">·</span>
    <span id="updatedAt">Last update: pending</span>
  </p>

  <div id="status"></div>

  <div class="columns">
    <section class="card">
      <div class="card-head">
        <h2>Recent Press Releases (RSS)</h2>
        <small><a id="rssLink" href="{rss_attr}" target="_blank" rel="nofollow noopener">{rss}</a></small>
      </div>
      <div class="card-body">
        <div class="notice">
          For complete details about press releases, open the article directly on the site.
        </div>
        <div id="siteFeed">
          <div class="notice">Loading press releases…</div>
        </div>
      </div>
    </section>

    <section class="card" id="mastodonBlock" style="display:none">
      <div class="card-head">
        <h2>Mastodon</h2>
        <small>
          <a id="mastodonLink" href="{mastodon_attr}" target="_blank" rel="nofollow noopener">{mastodon_display}</a>
          <span class="sep">·</span>
          <a id="mastodonRss" href="{mastodon_rss_attr}" target="_blank" rel="nofollow noopener">RSS</a>
        </small>
      </div>
      <div class="card-body">
        <div id="mastodonFeed">
          <div class="notice">Loading Mastodon posts…</div>
        </div>
      </div>
    </section>
  </div>
</div>

<script src="/assets/utils.js"></script>
<script src="/assets/publisher.js"></script>
<script src="/assets/engagement-tracker.js"></script>
</body>
</html>
"##,
            title_esc = esc(&title),
            name_attr = attr(&p.name),
            meta_desc_attr = attr(&meta_description),
            keywords_attr = attr(&keywords),
            slug = p.slug,
            url_attr = attr(&p.url),
            rss_attr = attr(&p.rss),
            rss = esc(&p.rss),
            mastodon_attr = attr(mastodon),
            mastodon_rss_attr = attr(mastodon_rss),
            mastodon_display = esc(
                mastodon
                    .trim_start_matches("https://")
                    .trim_start_matches("http://")
            ),
            site_name = esc(&self.site.name),
            site_name_attr = attr(&self.site.name),
            long_desc = esc(&long_description),
            url_display = esc(url_display),
        );
        html
    }

    fn json_ld(&self, p: &Publisher, title: &str, description: &str, keywords: &str) -> String {
        let base = self.base_url;
        let page_url = format!("{base}/publisher/{}/", p.slug);
        json!({
            "@context": "https://schema.org",
            "@type": "WebPage",
            "name": title,
            "url": &page_url,
            "description": description,
            "inLanguage": "en",
            "isPartOf": {
                "@type": "WebSite",
                "name": &self.site.name,
                "url": base
            },
            "about": {
                "@type": "Organization",
                "name": &p.name,
                "url": &p.url
            },
            "keywords": keywords,
            "breadcrumb": {
                "@type": "BreadcrumbList",
                "itemListElement": [
                    {"@type": "ListItem", "position": 1, "name": "Home", "item": format!("{base}/")},
                    {"@type": "ListItem", "position": 2, "name": "Publishers", "item": format!("{base}/publishers/")},
                    {"@type": "ListItem", "position": 3, "name": &p.name, "item": &page_url}
                ]
            }
        })
        .to_string()
    }

    fn keyword_pills(&self, p: &Publisher) -> String {
        p.keywords
            .iter()
            .take(4)
            .map(|kw| format!(r#"<span class="pill green"><i></i>{}</span>"#, esc(kw)))
            .collect::<Vec<_>>()
            .join("\n      ")
    }

    fn related_section(
        &self,
        p: &Publisher,
        related: &[&Publisher],
        category_slug: &str,
    ) -> String {
        if related.is_empty() {
            return String::new();
        }

        let cards: String = related
            .iter()
            .map(|rel| {
                let desc = rel.description_short().or_else(|| rel.description_small());
                let teaser = match desc {
                    Some(d) if d.chars().count() > 120 => {
                        format!("{}...", d.chars().take(120).collect::<String>())
                    }
                    Some(d) => d.to_string(),
                    None => String::new(),
                };
                format!(
                    r#"        <a class="site" href="/publisher/{slug}/">
          <p class="site-name">{name}</p>
          <p class="site-desc">{teaser}</p>
        </a>
"#,
                    slug = rel.slug,
                    name = esc(&rel.name),
                    teaser = esc(&teaser),
                )
            })
            .collect();

        format!(
            r#"  <section class="card related">
    <div class="card-head">
      <h2>Other Press Release Publishers from {category}</h2>
      <small><a href="/category/{category_slug}/">View all publishers in this category →</a></small>
    </div>
    <div class="card-body">
      <div class="related-grid">
{cards}      </div>
      <div class="related-actions">
        <a href="/category/{category_slug}/" class="btn">View all {category} publishers</a>
        <a href="/publishers/" class="btn">Browse all publishers</a>
      </div>
    </div>
  </section>
"#,
            category = esc(&p.category),
        )
    }
}

/// Up to six same-category publishers, randomly sampled.
fn related_publishers<'r>(registry: &'r Registry, current: &Publisher) -> Vec<&'r Publisher> {
    let mut related = registry.others_in_category(&current.category, &current.slug);
    related.shuffle(&mut rand::rng());
    related.truncate(RELATED_LIMIT);
    related
}

fn esc(s: &str) -> String {
    html_escape::encode_text(s).into_owned()
}

fn attr(s: &str) -> String {
    html_escape::encode_double_quoted_attribute(s).into_owned()
}
