use serde::{Deserialize, Serialize};

/// Cached JSON snapshot of a publisher's recent items.
///
/// Written to `data/feeds/<slug>.json`, overwriting any prior file. Consumed
/// by the front-end widgets, so the field names are part of the site's
/// published schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub slug: String,
    pub site: SnapshotSite,
    pub mastodon: Option<SnapshotMastodon>,
    pub updated_at: String,
    pub status: SnapshotStatus,
    pub items: Vec<SnapshotItem>,
    pub social: Vec<SnapshotItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotSite {
    pub name: String,
    pub url: String,
    pub category: String,
    /// The feed URL that actually yielded entries this run (may be one of
    /// the guessed fallbacks rather than the configured one).
    pub rss: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMastodon {
    pub url: String,
    pub rss: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotStatus {
    Ok,
    Empty,
}

impl SnapshotStatus {
    /// `Ok` iff anything at all was collected.
    pub fn for_contents(items: &[SnapshotItem], social: &[SnapshotItem]) -> Self {
        if items.is_empty() && social.is_empty() {
            Self::Empty
        } else {
            Self::Ok
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotItem {
    pub title: String,
    pub link: String,
    pub summary: String,
    pub published: Option<String>,
    pub published_human: String,
    pub source: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> SnapshotItem {
        SnapshotItem {
            title: "Update".into(),
            link: "https://example.ro/a".into(),
            summary: String::new(),
            published: None,
            published_human: String::new(),
            source: "https://example.ro".into(),
        }
    }

    #[test]
    fn test_status_empty() {
        assert_eq!(SnapshotStatus::for_contents(&[], &[]), SnapshotStatus::Empty);
    }

    #[test]
    fn test_status_ok_with_items_or_social() {
        assert_eq!(
            SnapshotStatus::for_contents(&[item()], &[]),
            SnapshotStatus::Ok
        );
        assert_eq!(
            SnapshotStatus::for_contents(&[], &[item()]),
            SnapshotStatus::Ok
        );
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SnapshotStatus::Ok).unwrap(),
            "\"ok\""
        );
        assert_eq!(
            serde_json::to_string(&SnapshotStatus::Empty).unwrap(),
            "\"empty\""
        );
    }
}
