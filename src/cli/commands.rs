use chrono::Utc;

use crate::aggregate::Aggregator;
use crate::app::{AppContext, Result};
use crate::fetcher::{FetchOptions, HttpFetcher};
use crate::render::feed::FeedRenderer;
use crate::render::pages::PageRenderer;
use crate::render::sitemap::{self, Sitemap};
use crate::snapshots::SnapshotUpdater;

pub async fn generate_feed(ctx: &AppContext) -> Result<()> {
    let sites_with_rss = ctx.registry.sites_with_rss().len();
    println!("Aggregating {} publisher feeds...", sites_with_rss);

    let fetcher = HttpFetcher::new(FetchOptions::from(&ctx.config.fetch));
    let aggregator = Aggregator::new(&ctx.config.aggregate, &fetcher);
    let items = aggregator.collect(&ctx.registry).await;

    let publishers: std::collections::HashSet<&str> =
        items.iter().map(|i| i.publisher_slug.as_str()).collect();

    let renderer = FeedRenderer::new(&ctx.config.site, ctx.base_url());
    renderer.write(&ctx.feed_path(), &items, Utc::now())?;

    println!(
        "Generated {} with {} items from {} publishers",
        ctx.feed_path().display(),
        items.len(),
        publishers.len()
    );
    Ok(())
}

pub fn generate_sitemap(ctx: &AppContext) -> Result<()> {
    let sitemap = Sitemap::build(&ctx.registry, ctx.base_url(), Utc::now().date_naive());
    let count = sitemap.len();
    sitemap.write(&ctx.sitemap_path())?;
    sitemap::write_robots(&ctx.robots_path(), ctx.base_url())?;

    println!("Generated sitemap.xml with {} URLs", count);
    Ok(())
}

pub fn render_pages(ctx: &AppContext) -> Result<()> {
    let renderer = PageRenderer::new(&ctx.config.site, ctx.base_url());
    let generated = renderer.write_all(&ctx.registry, &ctx.root)?;

    println!("Generated {} publisher pages", generated);
    Ok(())
}

pub async fn update_snapshots(ctx: &AppContext) -> Result<()> {
    let options = FetchOptions {
        timeout_secs: ctx.config.snapshot.timeout_secs,
        user_agent: ctx.config.snapshot.user_agent.clone(),
        allow_invalid_certs: ctx.config.fetch.allow_invalid_certs,
    };
    let fetcher = HttpFetcher::new(options);
    let updater = SnapshotUpdater::new(&ctx.config.snapshot, &fetcher);
    let written = updater.run(&ctx.registry, &ctx.snapshots_dir()).await?;

    println!("Updated {} feed snapshots", written);
    Ok(())
}

pub async fn run_all(ctx: &AppContext) -> Result<()> {
    generate_feed(ctx).await?;
    generate_sitemap(ctx)?;
    render_pages(ctx)?;
    update_snapshots(ctx).await?;
    Ok(())
}
