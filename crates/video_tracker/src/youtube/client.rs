//! HTTP client for the YouTube Data API.

use core::time::Duration;

use async_trait::async_trait;
use tracing::info;

use super::models::VideoListResponse;
use super::{MetadataProvider, ProviderError, VideoMetadata};

/// Base URL for the YouTube Data API.
const API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Facets requested with every video lookup.
const VIDEO_PARTS: &str = "snippet,contentDetails,statistics";

/// Request timeout for provider calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the YouTube Data API, authorized by a static API key.
pub struct YoutubeClient {
    client: reqwest::Client,
    api_key: String,
}

impl YoutubeClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl MetadataProvider for YoutubeClient {
    async fn get_details(&self, id: &str) -> Result<VideoMetadata, ProviderError> {
        info!(video = %id, "fetching video details");

        let response = self
            .client
            .get(format!("{API_BASE_URL}/videos"))
            .query(&[("part", VIDEO_PARTS), ("id", id), ("key", &self.api_key)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let body = response.text().await?;
        let listing: VideoListResponse = serde_json::from_str(&body)
            .map_err(|error| ProviderError::Malformed(error.to_string()))?;

        let Some(item) = listing.items.into_iter().next() else {
            return Err(ProviderError::NotFound(id.to_owned()));
        };

        let views = item.statistics.view_count.parse().map_err(|_| {
            ProviderError::Malformed(format!(
                "viewCount is not a number: {}",
                item.statistics.view_count
            ))
        })?;

        Ok(VideoMetadata {
            id: item.id,
            title: item.snippet.title,
            channel_id: item.snippet.channel_id,
            channel_title: item.snippet.channel_title,
            views,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_listing_parses_string_view_counts() {
        let body = r#"{
            "items": [{
                "id": "abc123",
                "snippet": {
                    "title": "A video",
                    "channelId": "chan1",
                    "channelTitle": "A channel"
                },
                "contentDetails": { "duration": "PT3M" },
                "statistics": { "viewCount": "1024", "likeCount": "7" }
            }]
        }"#;

        let listing: VideoListResponse = serde_json::from_str(body).unwrap();
        let item = &listing.items[0];

        assert_eq!(item.id, "abc123");
        assert_eq!(item.snippet.channel_title, "A channel");
        assert_eq!(item.statistics.view_count, "1024");
    }

    #[test]
    fn empty_listing_parses_without_items() {
        let listing: VideoListResponse = serde_json::from_str("{}").unwrap();

        assert!(listing.items.is_empty());
    }
}
