//! Response types for the YouTube Data API `videos` endpoint.

use serde::Deserialize;

/// Response from GET /youtube/v3/videos.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoListResponse {
    /// Matching videos; empty when the identifier is unknown
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

/// One video resource.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoItem {
    /// Video identifier
    pub id: String,

    /// Title and channel facet
    pub snippet: Snippet,

    /// Statistics facet
    pub statistics: Statistics,
}

/// Snippet facet of a video resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    /// Video title
    pub title: String,

    /// Identifier of the owning channel
    pub channel_id: String,

    /// Display title of the owning channel
    pub channel_title: String,
}

/// Statistics facet of a video resource.
///
/// The API reports counts as decimal strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Current view count
    pub view_count: String,
}
