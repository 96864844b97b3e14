//! View command - shows one video's stats and the latest delta.

use anyhow::Result;
use config::Config;
use video_tracker::{VideoRecord, view_delta};

use super::{build_engine, format_timestamp, normalize_video_id};

/// Runs the view command.
///
/// # Errors
///
/// Returns an error if the refresh fails.
pub async fn run(config: &Config, video: &str, stats: bool) -> Result<()> {
    let id = normalize_video_id(video);
    let engine = build_engine(config)?;

    if engine.repository().find(id).await?.is_none() {
        println!("Video not yet included. Run \"viewtrack add --video={id}\" first.");
        return Ok(());
    }

    let record = engine.refresh(id).await?;
    render_details(&record);

    if stats {
        render_observations(&record);
    }

    Ok(())
}

/// Prints the basic details and the comparison against the previous run.
fn render_details(record: &VideoRecord) {
    let delta = view_delta(&record.view_logs);

    println!("{} / {}", record.title, record.channel.title);
    println!("{:<10} {:>12}", "Current:", delta.current);

    let previous = record
        .view_logs
        .len()
        .checked_sub(2)
        .and_then(|index| record.view_logs.get(index));

    if let Some(previous) = previous {
        println!("{:<10} {:>12}", "Previous:", previous.views);
        println!("{:<10} {:>12}", "Added:", delta.added);
        println!(
            "{:<10} {:>12}",
            "Last run:",
            format_timestamp(previous.timestamp)
        );
    }
}

/// Prints the stored observation log.
fn render_observations(record: &VideoRecord) {
    println!();
    println!("{:<21} {:>12}", "Observed at", "Views");

    for observation in &record.view_logs {
        println!(
            "{:<21} {:>12}",
            format_timestamp(observation.timestamp),
            observation.views
        );
    }
}
