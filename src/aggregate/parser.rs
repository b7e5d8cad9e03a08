//! Feed parsing for the aggregation run.
//!
//! The aggregator keeps its own serde view of RSS 2.0 and Atom instead of a
//! full feed model: the date normalizer needs the raw `pubDate`/`updated`
//! strings exactly as the publisher wrote them, and nothing downstream needs
//! more than title/link/description/author.

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;

use crate::aggregate::dates::parse_feed_date;
use crate::app::{IzvorError, Result};
use crate::domain::ParsedItem;
use crate::text::{clean_html, truncate_chars};

#[derive(Debug, Deserialize)]
struct Text {
    #[serde(rename = "$text")]
    value: Option<String>,
}

impl Text {
    fn raw(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Deserialize)]
struct RssDocument {
    channel: Option<RssChannel>,
}

#[derive(Debug, Deserialize)]
struct RssChannel {
    title: Option<Text>,
    #[serde(rename = "link", default)]
    links: Vec<Text>,
    #[serde(rename = "item", default)]
    items: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    title: Option<Text>,
    #[serde(rename = "link", default)]
    links: Vec<Text>,
    description: Option<Text>,
    #[serde(rename = "pubDate")]
    pub_date: Option<Text>,
    author: Option<Text>,
    // quick-xml's serde deserializer keys elements by their local name, so
    // the conventional `content:encoded` is matched as `encoded`.
    #[serde(rename = "encoded")]
    content_encoded: Option<Text>,
}

#[derive(Debug, Deserialize)]
struct AtomFeed {
    title: Option<Text>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@rel")]
    rel: Option<String>,
    #[serde(rename = "@href")]
    href: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<Text>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    summary: Option<Text>,
    content: Option<Text>,
    updated: Option<Text>,
    author: Option<AtomAuthor>,
}

#[derive(Debug, Deserialize)]
struct AtomAuthor {
    name: Option<Text>,
}

enum FeedShape {
    Rss,
    Atom,
}

/// Parse raw feed bytes into at most `max_items` normalized items.
///
/// Every returned item has a non-empty title and link; entries missing a
/// link are dropped individually. Malformed XML is an error for the caller
/// to reduce to zero items.
pub fn parse_items(
    body: &[u8],
    url: &str,
    max_items: usize,
    max_description_len: usize,
) -> Result<Vec<ParsedItem>> {
    let xml = String::from_utf8_lossy(body);

    match detect_shape(&xml) {
        Some(FeedShape::Rss) => parse_rss(&xml, url, max_items, max_description_len),
        Some(FeedShape::Atom) => parse_atom(&xml, url, max_items, max_description_len),
        None => Err(IzvorError::FeedParse(format!(
            "unsupported or missing root element in feed from {url}"
        ))),
    }
}

fn detect_shape(xml: &str) -> Option<FeedShape> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                return match e.local_name().as_ref() {
                    b"rss" => Some(FeedShape::Rss),
                    b"feed" => Some(FeedShape::Atom),
                    _ => None,
                };
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}

fn parse_rss(
    xml: &str,
    url: &str,
    max_items: usize,
    max_description_len: usize,
) -> Result<Vec<ParsedItem>> {
    let document: RssDocument = quick_xml::de::from_str(xml)
        .map_err(|e| IzvorError::FeedParse(format!("{url}: {e}")))?;

    let Some(channel) = document.channel else {
        return Ok(Vec::new());
    };

    let feed_title = match &channel.title {
        Some(t) => t.raw().to_string(),
        None => "Unknown Feed".to_string(),
    };
    let feed_link = channel
        .links
        .first()
        .map(|l| l.raw().trim().to_string())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| url.to_string());

    let items = channel
        .items
        .iter()
        .take(max_items)
        .filter_map(|item| {
            let title = match &item.title {
                Some(t) => clean_html(t.raw()),
                None => "Untitled".to_string(),
            };
            let link = item
                .links
                .first()
                .map(|l| l.raw().trim().to_string())
                .unwrap_or_default();

            // A richer content:encoded body wins over the plain description.
            let description_raw = match &item.content_encoded {
                Some(c) if !c.raw().is_empty() => c.raw(),
                _ => item.description.as_ref().map(Text::raw).unwrap_or(""),
            };
            let description =
                truncate_chars(&clean_html(description_raw), max_description_len).into_owned();

            let published =
                parse_feed_date(item.pub_date.as_ref().map(Text::raw).unwrap_or(""));
            let author = clean_html(item.author.as_ref().map(Text::raw).unwrap_or(""));

            if title.is_empty() || link.is_empty() {
                return None;
            }

            Some(ParsedItem {
                title,
                link,
                description,
                published,
                author,
                feed_title: feed_title.clone(),
                feed_link: feed_link.clone(),
            })
        })
        .collect();

    Ok(items)
}

fn parse_atom(
    xml: &str,
    url: &str,
    max_items: usize,
    max_description_len: usize,
) -> Result<Vec<ParsedItem>> {
    let feed: AtomFeed = quick_xml::de::from_str(xml)
        .map_err(|e| IzvorError::FeedParse(format!("{url}: {e}")))?;

    let feed_title = match &feed.title {
        Some(t) => t.raw().to_string(),
        None => "Unknown Feed".to_string(),
    };
    // Only an explicit rel="alternate" counts; otherwise fall back to the
    // fetch URL.
    let feed_link = feed
        .links
        .iter()
        .find(|l| l.rel.as_deref() == Some("alternate"))
        .and_then(|l| l.href.clone())
        .unwrap_or_else(|| url.to_string());

    let items = feed
        .entries
        .iter()
        .take(max_items)
        .filter_map(|entry| {
            let title = match &entry.title {
                Some(t) => clean_html(t.raw()),
                None => "Untitled".to_string(),
            };
            let link = entry
                .links
                .first()
                .and_then(|l| l.href.as_deref())
                .unwrap_or("")
                .trim()
                .to_string();

            let summary = clean_html(entry.summary.as_ref().map(Text::raw).unwrap_or(""));
            // content is preferred over summary when both carry text.
            let content = match &entry.content {
                Some(c) if !c.raw().is_empty() => clean_html(c.raw()),
                _ => summary.clone(),
            };
            let description_full = if !content.is_empty() { content } else { summary };
            let description =
                truncate_chars(&description_full, max_description_len).into_owned();

            let published =
                parse_feed_date(entry.updated.as_ref().map(Text::raw).unwrap_or(""));
            let author = entry
                .author
                .as_ref()
                .and_then(|a| a.name.as_ref())
                .map(|n| clean_html(n.raw()))
                .unwrap_or_default();

            if title.is_empty() || link.is_empty() {
                return None;
            }

            Some(ParsedItem {
                title,
                link,
                description,
                published,
                author,
                feed_title: feed_title.clone(),
                feed_link: feed_link.clone(),
            })
        })
        .collect();

    Ok(items)
}
