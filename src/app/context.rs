use std::path::{Path, PathBuf};

use crate::app::{IzvorError, Result};
use crate::config::Config;
use crate::registry::Registry;

/// Everything a command needs: the site root, the configuration, and the
/// loaded registry. Built once per invocation.
pub struct AppContext {
    pub root: PathBuf,
    pub config: Config,
    pub registry: Registry,
}

impl AppContext {
    pub fn new(root: PathBuf) -> Result<Self> {
        let config =
            Config::load(&root).map_err(|e| IzvorError::Config(e.to_string()))?;
        let registry = Registry::load(&root.join("data").join("sites.json"))?;

        Ok(Self {
            root,
            config,
            registry,
        })
    }

    pub fn feed_path(&self) -> PathBuf {
        self.root.join("feed.xml")
    }

    pub fn sitemap_path(&self) -> PathBuf {
        self.root.join("sitemap.xml")
    }

    pub fn robots_path(&self) -> PathBuf {
        self.root.join("robots.txt")
    }

    pub fn publisher_page_path(&self, slug: &str) -> PathBuf {
        self.root.join("publisher").join(slug).join("index.html")
    }

    pub fn snapshots_dir(&self) -> PathBuf {
        self.root.join("data").join("feeds")
    }

    pub fn snapshot_path(&self, slug: &str) -> PathBuf {
        self.snapshots_dir().join(format!("{slug}.json"))
    }

    /// Base URL without trailing slash; the registry may override the
    /// configured one.
    pub fn base_url(&self) -> &str {
        self.registry
            .base_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(&self.config.site.base_url)
            .trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn site_root() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("data")).unwrap();
        fs::write(
            dir.path().join("data").join("sites.json"),
            r#"{"sites": [{"slug": "a", "name": "A", "url": "https://a.ro"}]}"#,
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_context_loads_registry() {
        let dir = site_root();
        let ctx = AppContext::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(ctx.registry.sites.len(), 1);
        assert!(ctx.feed_path().ends_with("feed.xml"));
        assert!(ctx.snapshot_path("a").ends_with("data/feeds/a.json"));
    }

    #[test]
    fn test_missing_registry_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppContext::new(dir.path().to_path_buf()).is_err());
    }

    #[test]
    fn test_registry_base_url_wins() {
        let dir = site_root();
        fs::write(
            dir.path().join("data").join("sites.json"),
            r#"{"base_url": "https://override.example/", "sites": []}"#,
        )
        .unwrap();
        let ctx = AppContext::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(ctx.base_url(), "https://override.example");
    }
}
