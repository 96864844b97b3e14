//! Add command - starts tracking a video.

use anyhow::Result;
use config::Config;

use super::{build_engine, normalize_video_id};

/// Runs the add command.
///
/// # Errors
///
/// Returns an error if the store or the provider fails.
pub async fn run(config: &Config, video: &str) -> Result<()> {
    let id = normalize_video_id(video);
    let engine = build_engine(config)?;

    if let Some(record) = engine.repository().find(id).await? {
        println!("Video \"{}\" was already added.", record.title);
        println!("Run \"viewtrack view --video={id}\" to check its details.");
        return Ok(());
    }

    println!("Fetching video details for {id}...");
    let record = engine.refresh(id).await?;

    println!("Now tracking \"{}\".", record.title);
    println!("Run \"viewtrack view --video={id}\" to check its details.");

    Ok(())
}
