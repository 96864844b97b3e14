//! Update command - refreshes every tracked video and reports the deltas.

use core::time::Duration;
use std::sync::Arc;

use anyhow::Result;
use config::Config;
use video_tracker::{BatchLimits, BatchRefresher};

use super::{build_engine, format_timestamp};

/// Runs the update command.
///
/// # Errors
///
/// Returns an error if the tracked videos cannot be listed. Individual
/// refresh failures are logged by the coordinator and skipped.
pub async fn run(config: &Config) -> Result<()> {
    let engine = Arc::new(build_engine(config)?);
    let limits = BatchLimits {
        max_concurrent: config.max_concurrent_refreshes,
        task_timeout: Duration::from_secs(config.refresh_timeout_secs),
    };

    let rows = BatchRefresher::new(engine, limits).refresh_all().await?;

    if rows.is_empty() {
        println!("No videos tracked yet. Run \"viewtrack add --video=<id|url>\" first.");
        return Ok(());
    }

    println!(
        "{:<40} {:<24} {:>12} {:>8}  {}",
        "Title", "Channel", "Views", "Added", "Last Run"
    );
    println!("{}", "-".repeat(108));

    for row in &rows {
        let last_run = row.last_run.map_or_else(|| "-".to_owned(), format_timestamp);

        println!(
            "{:<40} {:<24} {:>12} {:>8}  {}",
            clip(&row.title, 40),
            clip(&row.channel_title, 24),
            row.current_views,
            row.added,
            last_run
        );
    }

    Ok(())
}

/// Clips a cell to its column width.
fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_owned();
    }

    let mut clipped: String = text.chars().take(width - 1).collect();
    clipped.push('…');
    clipped
}
