//! Cached per-publisher feed snapshots.
//!
//! For every publisher the updater probes an ordered list of candidate feed
//! URLs (the configured one, then common WordPress-style fallbacks) until
//! one yields entries, normalizes those entries, optionally appends a
//! Mastodon pass, and overwrites `data/feeds/<slug>.json` wholesale. No
//! diffing against the previous snapshot: the next scheduled run is the
//! recovery mechanism.

use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use feed_rs::parser;
use tracing::{debug, info, warn};

use crate::app::Result;
use crate::config::SnapshotConfig;
use crate::domain::{
    Publisher, Snapshot, SnapshotItem, SnapshotMastodon, SnapshotSite, SnapshotStatus,
};
use crate::fetcher::Fetcher;
use crate::registry::Registry;
use crate::text::{cap_chars, clean_html};

pub struct SnapshotUpdater<'a> {
    config: &'a SnapshotConfig,
    fetcher: &'a (dyn Fetcher + Send + Sync),
}

impl<'a> SnapshotUpdater<'a> {
    pub fn new(config: &'a SnapshotConfig, fetcher: &'a (dyn Fetcher + Send + Sync)) -> Self {
        Self { config, fetcher }
    }

    /// Refresh every publisher snapshot under `out_dir`. Returns the number
    /// of files written; per-publisher failures only empty that snapshot.
    pub async fn run(&self, registry: &Registry, out_dir: &Path) -> Result<usize> {
        fs::create_dir_all(out_dir)?;
        let updated_at = Utc::now().to_rfc3339();

        let mut written = 0;
        for publisher in &registry.sites {
            let snapshot = self.build_snapshot(publisher, &updated_at).await;
            let path = out_dir.join(format!("{}.json", publisher.slug));
            fs::write(&path, serde_json::to_string_pretty(&snapshot)?)?;
            written += 1;

            if self.config.request_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.request_delay_ms)).await;
            }
        }

        info!("updated {} snapshots at {}", written, updated_at);
        Ok(written)
    }

    async fn build_snapshot(&self, publisher: &Publisher, updated_at: &str) -> Snapshot {
        let (items, winning_rss) = self.site_items(publisher).await;

        let social = if publisher.has_mastodon() {
            let rss = publisher.mastodon_rss.as_deref().unwrap_or_default();
            self.feed_items(rss, "Mastodon").await
        } else {
            Vec::new()
        };

        if items.is_empty() && social.is_empty() {
            warn!(publisher = %publisher.slug, "snapshot is empty");
        }

        let status = SnapshotStatus::for_contents(&items, &social);
        Snapshot {
            slug: publisher.slug.clone(),
            site: SnapshotSite {
                name: publisher.name.clone(),
                url: publisher.url.clone(),
                category: publisher.category.clone(),
                rss: winning_rss,
            },
            mastodon: publisher.has_mastodon().then(|| SnapshotMastodon {
                url: publisher.mastodon.clone().unwrap_or_default(),
                rss: publisher.mastodon_rss.clone().unwrap_or_default(),
            }),
            updated_at: updated_at.to_string(),
            status,
            items,
            social,
        }
    }

    /// Try each candidate URL in order; the first that parses to at least
    /// one entry wins and is recorded in the snapshot.
    async fn site_items(&self, publisher: &Publisher) -> (Vec<SnapshotItem>, String) {
        for candidate in candidate_urls(&publisher.url, &publisher.rss) {
            let items = self.feed_items(&candidate, &publisher.url).await;
            if !items.is_empty() {
                return (items, candidate);
            }
        }
        (Vec::new(), publisher.rss.clone())
    }

    /// Fail-soft fetch+parse of one feed URL into snapshot items.
    async fn feed_items(&self, url: &str, source: &str) -> Vec<SnapshotItem> {
        if url.is_empty() {
            return Vec::new();
        }

        let body = match self.fetcher.fetch(url).await {
            Ok(body) => body,
            Err(e) => {
                debug!(url, "snapshot fetch failed: {e}");
                return Vec::new();
            }
        };

        match parser::parse(body.as_slice()) {
            Ok(feed) => feed
                .entries
                .into_iter()
                .take(self.config.max_items)
                .map(|entry| self.entry_to_item(entry, source))
                .collect(),
            Err(e) => {
                debug!(url, "snapshot parse failed: {e}");
                Vec::new()
            }
        }
    }

    fn entry_to_item(&self, entry: feed_rs::model::Entry, source: &str) -> SnapshotItem {
        let title = clean_html(entry.title.as_ref().map(|t| t.content.as_str()).unwrap_or(""));
        let title = if title.is_empty() {
            "Update".to_string()
        } else {
            cap_chars(&title, self.config.max_title_len).into_owned()
        };

        let link = entry
            .links
            .first()
            .map(|l| l.href.clone())
            .unwrap_or_default();

        let summary = entry
            .summary
            .map(|s| s.content)
            .or(entry.content.and_then(|c| c.body))
            .map(|s| cap_chars(&clean_html(&s), self.config.max_summary_len).into_owned())
            .unwrap_or_default();

        let published = entry
            .published
            .or(entry.updated)
            .map(|dt: DateTime<Utc>| dt.to_rfc3339());
        let published_human = published
            .as_deref()
            .map(|p| p.chars().take(16).collect::<String>().trim().to_string())
            .unwrap_or_default();

        SnapshotItem {
            title,
            link,
            summary,
            published,
            published_human,
            source: source.to_string(),
        }
    }
}

/// Configured feed first, then the usual WordPress guesses.
fn candidate_urls(site_url: &str, primary: &str) -> Vec<String> {
    let base = site_url.trim_end_matches('/');
    let mut candidates = Vec::with_capacity(4);
    if !primary.is_empty() {
        candidates.push(primary.to_string());
    }
    candidates.push(format!("{base}/?feed=rss2"));
    candidates.push(format!("{base}/feed/rss/"));
    candidates.push(format!("{base}/feed/atom/"));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::IzvorError;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct StaticFetcher {
        bodies: HashMap<String, Vec<u8>>,
    }

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            self.bodies
                .get(url)
                .cloned()
                .ok_or_else(|| IzvorError::FeedParse(format!("unknown url {url}")))
        }
    }

    const RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>T</title>
<item>
  <title>&lt;b&gt;Anunț&lt;/b&gt; important</title>
  <link>https://acme.ro/anunt</link>
  <description>&lt;p&gt;Detalii despre anunț&lt;/p&gt;</description>
  <pubDate>Mon, 02 Jan 2006 15:04:05 +0000</pubDate>
</item>
</channel></rss>"#;

    fn registry_one(rss: &str) -> Registry {
        serde_json::from_str(&format!(
            r#"{{"sites": [{{"slug": "acme", "name": "Acme", "url": "https://acme.ro/",
                "rss": "{rss}", "category": "Business"}}]}}"#
        ))
        .unwrap()
    }

    fn config() -> SnapshotConfig {
        SnapshotConfig {
            request_delay_ms: 0,
            ..SnapshotConfig::default()
        }
    }

    #[test]
    fn test_candidate_urls_order() {
        let candidates = candidate_urls("https://acme.ro/", "https://acme.ro/feed/");
        assert_eq!(
            candidates,
            vec![
                "https://acme.ro/feed/",
                "https://acme.ro/?feed=rss2",
                "https://acme.ro/feed/rss/",
                "https://acme.ro/feed/atom/",
            ]
        );
    }

    #[test]
    fn test_candidate_urls_without_primary() {
        let candidates = candidate_urls("https://acme.ro", "");
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0], "https://acme.ro/?feed=rss2");
    }

    #[tokio::test]
    async fn test_snapshot_ok_with_entries() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_one("https://acme.ro/feed/");
        let fetcher = StaticFetcher {
            bodies: HashMap::from([("https://acme.ro/feed/".to_string(), RSS.as_bytes().to_vec())]),
        };
        let cfg = config();
        let updater = SnapshotUpdater::new(&cfg, &fetcher);
        let written = updater.run(&registry, dir.path()).await.unwrap();
        assert_eq!(written, 1);

        let content = fs::read_to_string(dir.path().join("acme.json")).unwrap();
        let snapshot: Snapshot = serde_json::from_str(&content).unwrap();
        assert_eq!(snapshot.status, SnapshotStatus::Ok);
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].title, "Anunț important");
        assert_eq!(snapshot.items[0].summary, "Detalii despre anunț");
        assert_eq!(
            snapshot.items[0].published.as_deref(),
            Some("2006-01-02T15:04:05+00:00")
        );
        assert_eq!(snapshot.items[0].published_human, "2006-01-02T15:04");
        assert_eq!(snapshot.items[0].source, "https://acme.ro/");
        assert!(snapshot.mastodon.is_none());
    }

    #[tokio::test]
    async fn test_fallback_candidate_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_one("https://acme.ro/broken-feed/");
        // Primary URL unknown; second candidate serves the feed.
        let fetcher = StaticFetcher {
            bodies: HashMap::from([(
                "https://acme.ro/?feed=rss2".to_string(),
                RSS.as_bytes().to_vec(),
            )]),
        };
        let cfg = config();
        let updater = SnapshotUpdater::new(&cfg, &fetcher);
        updater.run(&registry, dir.path()).await.unwrap();

        let content = fs::read_to_string(dir.path().join("acme.json")).unwrap();
        let snapshot: Snapshot = serde_json::from_str(&content).unwrap();
        assert_eq!(snapshot.site.rss, "https://acme.ro/?feed=rss2");
        assert_eq!(snapshot.status, SnapshotStatus::Ok);
    }

    #[tokio::test]
    async fn test_unreachable_publisher_writes_empty_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_one("https://acme.ro/feed/");
        let fetcher = StaticFetcher {
            bodies: HashMap::new(),
        };
        let cfg = config();
        let updater = SnapshotUpdater::new(&cfg, &fetcher);
        updater.run(&registry, dir.path()).await.unwrap();

        let content = fs::read_to_string(dir.path().join("acme.json")).unwrap();
        let snapshot: Snapshot = serde_json::from_str(&content).unwrap();
        assert_eq!(snapshot.status, SnapshotStatus::Empty);
        assert!(snapshot.items.is_empty());
        assert!(snapshot.social.is_empty());
        // The configured URL is kept when nothing worked.
        assert_eq!(snapshot.site.rss, "https://acme.ro/feed/");
    }

    #[tokio::test]
    async fn test_mastodon_feed_goes_to_social() {
        let dir = tempfile::tempdir().unwrap();
        let registry: Registry = serde_json::from_str(
            r#"{"sites": [{"slug": "acme", "name": "Acme", "url": "https://acme.ro/",
                "rss": "https://acme.ro/feed/", "category": "Business",
                "mastodon": "https://social.example/@acme",
                "mastodon_rss": "https://social.example/@acme.rss"}]}"#,
        )
        .unwrap();
        let fetcher = StaticFetcher {
            bodies: HashMap::from([(
                "https://social.example/@acme.rss".to_string(),
                RSS.as_bytes().to_vec(),
            )]),
        };
        let cfg = config();
        let updater = SnapshotUpdater::new(&cfg, &fetcher);
        updater.run(&registry, dir.path()).await.unwrap();

        let content = fs::read_to_string(dir.path().join("acme.json")).unwrap();
        let snapshot: Snapshot = serde_json::from_str(&content).unwrap();
        // Site feed unreachable, Mastodon present: still "ok".
        assert_eq!(snapshot.status, SnapshotStatus::Ok);
        assert!(snapshot.items.is_empty());
        assert_eq!(snapshot.social.len(), 1);
        assert_eq!(snapshot.social[0].source, "Mastodon");
        assert!(snapshot.mastodon.is_some());
    }

    #[tokio::test]
    async fn test_title_capped_and_defaulted() {
        let long_title = "t".repeat(400);
        let xml = format!(
            r#"<rss version="2.0"><channel><title>T</title>
<item><title>{long_title}</title><link>https://a.ro/1</link></item>
<item><link>https://a.ro/2</link></item>
</channel></rss>"#
        );
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_one("https://acme.ro/feed/");
        let fetcher = StaticFetcher {
            bodies: HashMap::from([("https://acme.ro/feed/".to_string(), xml.into_bytes())]),
        };
        let cfg = config();
        let updater = SnapshotUpdater::new(&cfg, &fetcher);
        updater.run(&registry, dir.path()).await.unwrap();

        let content = fs::read_to_string(dir.path().join("acme.json")).unwrap();
        let snapshot: Snapshot = serde_json::from_str(&content).unwrap();
        assert_eq!(snapshot.items[0].title.chars().count(), 180);
        assert_eq!(snapshot.items[1].title, "Update");
    }
}
