//! Aggregation of publisher feeds into one item list.
//!
//! Publishers are grouped by category and visited round-robin, one publisher
//! per category per turn, so no single category front-loads the output.
//! Categories with fewer publishers simply exhaust early and drop out of the
//! rotation; diversity is best-effort, not a fairness guarantee.

pub mod dates;
pub mod parser;

use std::collections::VecDeque;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::AggregateConfig;
use crate::domain::{FeedItem, Publisher};
use crate::fetcher::Fetcher;
use crate::registry::Registry;

pub struct Aggregator<'a> {
    config: &'a AggregateConfig,
    fetcher: &'a (dyn Fetcher + Send + Sync),
}

impl<'a> Aggregator<'a> {
    pub fn new(config: &'a AggregateConfig, fetcher: &'a (dyn Fetcher + Send + Sync)) -> Self {
        Self { config, fetcher }
    }

    /// Fetch and merge all publisher feeds, newest first, capped globally.
    ///
    /// One publisher is unreachable, malformed, or empty? That publisher
    /// contributes zero items and the run continues.
    pub async fn collect(&self, registry: &Registry) -> Vec<FeedItem> {
        let sites = registry.sites_with_rss();
        let total_sites = sites.len();
        info!("aggregating {} publishers with feeds", total_sites);

        let mut queues = group_by_category(&sites);
        let mut items: Vec<FeedItem> = Vec::new();
        let mut processed = 0usize;
        let mut turn = 0usize;

        while items.len() < self.config.max_total_items && processed < total_sites {
            if queues.is_empty() {
                break;
            }
            let index = turn % queues.len();
            turn += 1;

            let Some(site) = queues[index].1.pop_front() else {
                if queues.iter().all(|(_, q)| q.is_empty()) {
                    break;
                }
                continue;
            };

            processed += 1;
            info!(
                "[{}/{}] {} ({})",
                processed, total_sites, site.name, site.category
            );

            let fetched = self.fetch_publisher_items(site).await;
            if fetched.is_empty() {
                warn!(publisher = %site.slug, "no items collected");
            }
            items.extend(fetched);

            // Politeness toward remote hosts, success or not.
            if self.config.request_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.request_delay_ms)).await;
            }
        }

        items.sort_by(|a, b| b.published.cmp(&a.published));
        items.truncate(self.config.max_total_items);
        items
    }

    /// Fail-soft fetch+parse for one publisher: any failure reduces to an
    /// empty list with a diagnostic line.
    async fn fetch_publisher_items(&self, publisher: &Publisher) -> Vec<FeedItem> {
        let body = match self.fetcher.fetch(&publisher.rss).await {
            Ok(body) => body,
            Err(e) => {
                warn!(publisher = %publisher.slug, url = %publisher.rss, "fetch failed: {e}");
                return Vec::new();
            }
        };

        match parser::parse_items(
            &body,
            &publisher.rss,
            self.config.max_items_per_feed,
            self.config.max_description_len,
        ) {
            Ok(parsed) => parsed
                .into_iter()
                .map(|p| FeedItem::from_parsed(p, publisher))
                .collect(),
            Err(e) => {
                warn!(publisher = %publisher.slug, "parse failed: {e}");
                Vec::new()
            }
        }
    }
}

/// Per-category queues in first-seen category order.
fn group_by_category<'p>(
    sites: &[&'p Publisher],
) -> Vec<(String, VecDeque<&'p Publisher>)> {
    let mut queues: Vec<(String, VecDeque<&'p Publisher>)> = Vec::new();
    for site in sites {
        match queues.iter_mut().find(|(cat, _)| *cat == site.category) {
            Some((_, queue)) => queue.push_back(site),
            None => queues.push((site.category.clone(), VecDeque::from([*site]))),
        }
    }
    queues
}
