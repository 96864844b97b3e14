//! CLI command implementations.

pub mod add;
pub mod tables;
pub mod update;
pub mod view;

use core::time::Duration;
use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, TimeZone};
use config::Config;
use docstore::{DocStore, Table};
use video_tracker::{
    Clock, RefreshEngine, RefreshPolicy, SystemClock, VIDEOS_TABLE, VideoRecord, VideoRepository,
    YoutubeClient,
};

/// Extracts the video identifier from a bare ID or a watch URL.
///
/// URL inputs carry the identifier in the `v=` query parameter; everything
/// after `v=` is taken as the identifier. Inputs without a `?` pass through
/// unchanged.
pub(crate) fn normalize_video_id(input: &str) -> &str {
    if !input.contains('?') {
        return input;
    }

    input.split_once("v=").map_or(input, |(_, id)| id)
}

/// Renders an epoch timestamp in local time.
pub(crate) fn format_timestamp(timestamp: i64) -> String {
    Local.timestamp_opt(timestamp, 0).single().map_or_else(
        || timestamp.to_string(),
        |time| time.format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}

/// Wires the refresh engine from configuration.
pub(crate) fn build_engine(
    config: &Config,
) -> Result<RefreshEngine<Table<VideoRecord>, YoutubeClient>> {
    let store = DocStore::new(&config.docstore_endpoint, &config.docstore_access_token)?;
    let table = store.table::<VideoRecord>(VIDEOS_TABLE);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let repository = VideoRepository::new(table, Arc::clone(&clock));

    let provider = YoutubeClient::new(&config.youtube_api_key)?;
    let policy = RefreshPolicy::new(Duration::from_secs(config.staleness_secs));

    Ok(RefreshEngine::new(repository, provider, policy, clock))
}

#[cfg(test)]
mod tests {
    use super::normalize_video_id;

    #[test]
    fn url_and_bare_id_normalize_to_the_same_identifier() {
        assert_eq!(normalize_video_id("https://x/watch?v=abc123"), "abc123");
        assert_eq!(normalize_video_id("abc123"), "abc123");
    }

    #[test]
    fn input_without_a_v_parameter_passes_through() {
        assert_eq!(
            normalize_video_id("https://x/watch?list=pl42"),
            "https://x/watch?list=pl42"
        );
    }
}
