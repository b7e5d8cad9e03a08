use chrono::{DateTime, Utc};

use crate::domain::Publisher;

/// One entry extracted from a publisher feed, before publisher attribution.
#[derive(Debug, Clone)]
pub struct ParsedItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub published: DateTime<Utc>,
    pub author: String,
    pub feed_title: String,
    pub feed_link: String,
}

/// A feed entry attributed to the publisher it came from.
///
/// Produced transiently per run; only the rendered XML persists.
#[derive(Debug, Clone)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub published: DateTime<Utc>,
    pub author: String,
    pub feed_title: String,
    pub feed_link: String,
    pub publisher_slug: String,
    pub publisher_name: String,
    pub publisher_url: String,
    pub category: String,
}

impl FeedItem {
    pub fn from_parsed(parsed: ParsedItem, publisher: &Publisher) -> Self {
        Self {
            title: parsed.title,
            link: parsed.link,
            description: parsed.description,
            published: parsed.published,
            author: parsed.author,
            feed_title: parsed.feed_title,
            feed_link: parsed.feed_link,
            publisher_slug: publisher.slug.clone(),
            publisher_name: publisher.name.clone(),
            publisher_url: publisher.url.clone(),
            category: publisher.category.clone(),
        }
    }

    /// Author credit for rendering: entry author, else publisher name.
    pub fn display_author(&self) -> &str {
        if !self.author.is_empty() {
            &self.author
        } else if !self.publisher_name.is_empty() {
            &self.publisher_name
        } else {
            "Unknown"
        }
    }
}
