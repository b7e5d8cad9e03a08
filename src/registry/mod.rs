//! Site registry access.
//!
//! The registry (`data/sites.json`) is the single source of truth for which
//! publishers exist. A read or parse failure here is the one fatal error in
//! the whole pipeline; everything downstream degrades per publisher instead.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::app::{IzvorError, Result};
use crate::domain::Publisher;

#[derive(Debug, Clone, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub sites: Vec<Publisher>,
}

impl Registry {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            IzvorError::Registry(format!("failed to read {}: {}", path.display(), e))
        })?;
        let registry: Registry = serde_json::from_str(&content).map_err(|e| {
            IzvorError::Registry(format!("failed to parse {}: {}", path.display(), e))
        })?;
        Ok(registry)
    }

    /// Publishers that have a configured feed URL.
    pub fn sites_with_rss(&self) -> Vec<&Publisher> {
        self.sites.iter().filter(|s| s.has_rss()).collect()
    }

    /// Unique categories, in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for site in &self.sites {
            if !seen.contains(&site.category.as_str()) {
                seen.push(site.category.as_str());
            }
        }
        seen
    }

    /// Publishers in the given category other than `slug`.
    pub fn others_in_category<'a>(&'a self, category: &str, slug: &str) -> Vec<&'a Publisher> {
        self.sites
            .iter()
            .filter(|s| s.category == category && s.slug != slug)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "base_url": "https://example.github.io",
        "sites": [
            {"slug": "a", "name": "A", "url": "https://a.ro", "rss": "https://a.ro/feed/", "category": "Health"},
            {"slug": "b", "name": "B", "url": "https://b.ro", "category": "Health"},
            {"slug": "c", "name": "C", "url": "https://c.ro", "rss": "https://c.ro/feed/", "category": "Business"}
        ]
    }"#;

    fn write_registry(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sites.json");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_sample() {
        let (_dir, path) = write_registry(SAMPLE);
        let registry = Registry::load(&path).unwrap();
        assert_eq!(registry.sites.len(), 3);
        assert_eq!(registry.base_url.as_deref(), Some("https://example.github.io"));
    }

    #[test]
    fn test_sites_with_rss_skips_missing() {
        let (_dir, path) = write_registry(SAMPLE);
        let registry = Registry::load(&path).unwrap();
        let with_rss: Vec<_> = registry.sites_with_rss().iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(with_rss, vec!["a", "c"]);
    }

    #[test]
    fn test_categories_first_seen_order() {
        let (_dir, path) = write_registry(SAMPLE);
        let registry = Registry::load(&path).unwrap();
        assert_eq!(registry.categories(), vec!["Health", "Business"]);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = Registry::load(&dir.path().join("nope.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        let (_dir, path) = write_registry("{not json");
        assert!(Registry::load(&path).is_err());
    }

    #[test]
    fn test_others_in_category() {
        let (_dir, path) = write_registry(SAMPLE);
        let registry = Registry::load(&path).unwrap();
        let related = registry.others_in_category("Health", "a");
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].slug, "b");
    }
}
