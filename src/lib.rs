//! # izvor
//!
//! Static site builder for an aggregated Romanian press-release directory.
//!
//! ## Architecture
//!
//! Every generator is a linear pipeline over the same site registry:
//!
//! ```text
//! Registry → Fetcher → Parser/Normalizer → Renderer → files on disk
//! ```
//!
//! The binary exposes one subcommand per generated artifact:
//!
//! ```bash
//! # Aggregate publisher feeds into feed.xml
//! izvor feed
//!
//! # Generate sitemap.xml and robots.txt
//! izvor sitemap
//!
//! # Render per-publisher HTML pages
//! izvor pages
//!
//! # Refresh cached per-publisher JSON snapshots
//! izvor snapshots
//! ```
//!
//! Runs are strictly sequential: one publisher fetch completes (or times
//! out) before the next begins, with a politeness delay in between. One
//! unreachable publisher never aborts a run; only a missing registry does.

/// Application context and error handling.
///
/// [`AppContext`](app::AppContext) wires the site root, the configuration,
/// and the loaded registry together for the command drivers.
pub mod app;

/// Command-line interface using clap.
pub mod cli;

/// Configuration loaded from `izvor.toml`, with compiled defaults.
pub mod config;

/// Core domain models: [`Publisher`](domain::Publisher),
/// [`FeedItem`](domain::FeedItem), [`Snapshot`](domain::Snapshot).
pub mod domain;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): async trait for feed retrieval
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Site registry access (`data/sites.json`).
pub mod registry;

/// Feed aggregation: category round-robin scheduling, RSS/Atom parsing with
/// first-match date normalization.
pub mod aggregate;

/// Artifact rendering: the aggregated RSS feed, sitemap/robots, and the
/// per-publisher HTML pages.
pub mod render;

/// Cached per-publisher feed snapshots (`data/feeds/<slug>.json`).
pub mod snapshots;

/// Shared HTML-to-text cleanup.
pub mod text;
