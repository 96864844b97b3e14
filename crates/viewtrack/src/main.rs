//! viewtrack
//!
//! Tracks view-count history for YouTube videos: registers videos, polls the
//! YouTube Data API on a throttled schedule, and reports how views changed
//! between runs.

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::Config;
use tracing_subscriber::EnvFilter;

mod commands;

/// YouTube view-count history tracker
#[derive(Parser)]
#[command(name = "viewtrack")]
#[command(about = "Tracks view-count history for YouTube videos")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start tracking a video
    Add {
        /// Video ID or URL of the video to include
        #[arg(long)]
        video: String,
    },

    /// Show a tracked video's current stats
    View {
        /// Video ID or URL of the video to view
        #[arg(long)]
        video: String,

        /// Also print the stored observation log
        #[arg(long)]
        stats: bool,
    },

    /// Refresh all tracked videos and report the deltas
    Update,

    /// List store tables visible to the configured credentials
    Tables,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::load()?;

    match cli.command {
        Commands::Add { video } => commands::add::run(&config, &video).await?,
        Commands::View { video, stats } => commands::view::run(&config, &video, stats).await?,
        Commands::Update => commands::update::run(&config).await?,
        Commands::Tables => commands::tables::run(&config).await?,
    }

    Ok(())
}
