//! Configuration for the site builder.
//!
//! Read from `izvor.toml` at the site root. The file is optional: every
//! tunable has a compiled default matching the production site, and a partial
//! file overrides only the keys it names.

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub fetch: FetchConfig,
    pub aggregate: AggregateConfig,
    pub snapshot: SnapshotConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            fetch: FetchConfig::default(),
            aggregate: AggregateConfig::default(),
            snapshot: SnapshotConfig::default(),
        }
    }
}

/// Site identity used across all generated artifacts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Canonical base URL, no trailing slash.
    pub base_url: String,
    /// Site brand, used on pages and in structured data.
    pub name: String,
    pub title: String,
    pub description: String,
    pub language: String,
    pub webmaster: String,
    /// Path of the channel image, relative to the base URL.
    pub logo_path: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://release-press-releases-romania.github.io".to_string(),
            name: "Release Press Releases in Romania".to_string(),
            title: "Release Press Releases in Romania - Aggregated Feed".to_string(),
            description: "Aggregated RSS feed of press releases from over 100 Romanian \
                          publishers. Covering PR & Marketing, Health, News & Society, \
                          Technology, Business, Construction, Tourism, and more. Curated \
                          selection of quality press releases from trusted Romanian sources."
                .to_string(),
            language: "en".to_string(),
            webmaster: "noreply@release-press-releases-romania.github.io (Release Press Releases)"
                .to_string(),
            logo_path: "/assets/images/logo.svg".to_string(),
        }
    }
}

/// HTTP client behavior for the aggregation run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Permit a single retry with certificate verification disabled when a
    /// fetch fails on a TLS certificate error. Off by default; the retry is
    /// logged before it happens.
    pub allow_invalid_certs: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: "Mozilla/5.0 (compatible; IzvorBot/1.0; \
                         +https://release-press-releases-romania.github.io/feed.xml)"
                .to_string(),
            allow_invalid_certs: false,
        }
    }
}

/// Caps and pacing for the aggregated feed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AggregateConfig {
    pub max_items_per_feed: usize,
    pub max_total_items: usize,
    pub max_description_len: usize,
    /// Politeness delay between publisher fetches, success or not.
    pub request_delay_ms: u64,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            max_items_per_feed: 3,
            max_total_items: 150,
            max_description_len: 400,
            request_delay_ms: 500,
        }
    }
}

/// Caps and pacing for the per-publisher snapshot run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub request_delay_ms: u64,
    pub max_items: usize,
    pub max_title_len: usize,
    pub max_summary_len: usize,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            user_agent: "IzvorBot/1.0 (+https://release-press-releases-romania.github.io/)"
                .to_string(),
            request_delay_ms: 150,
            max_items: 12,
            max_title_len: 180,
            max_summary_len: 800,
        }
    }
}

impl Config {
    /// Load configuration from `izvor.toml` under the given site root.
    ///
    /// A missing file yields the defaults; an invalid file is an error.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let config_path = root.join("izvor.toml");

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.display().to_string(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path.display().to_string(),
            source: e,
        })?;

        Ok(config)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}
