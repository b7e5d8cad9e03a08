pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "izvor")]
#[command(about = "Static site builder for the Romanian press-release directory", long_about = None)]
pub struct Cli {
    /// Site root directory (holds data/sites.json and the generated output)
    #[arg(short, long, default_value = ".", global = true)]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate publisher feeds into feed.xml
    Feed,
    /// Generate sitemap.xml and robots.txt
    Sitemap,
    /// Render per-publisher HTML pages
    Pages,
    /// Refresh cached per-publisher feed snapshots
    Snapshots,
    /// Run every generator in sequence
    All,
}
