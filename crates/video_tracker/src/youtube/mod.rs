//! YouTube Data API client.

mod client;
mod models;

pub use client::YoutubeClient;
pub use models::{Snippet, Statistics, VideoItem, VideoListResponse};

use async_trait::async_trait;
use thiserror::Error;

/// Current metadata for one video, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMetadata {
    /// Provider-assigned video identifier
    pub id: String,

    /// Current video title
    pub title: String,

    /// Identifier of the owning channel
    pub channel_id: String,

    /// Display title of the owning channel
    pub channel_title: String,

    /// Current view count
    pub views: u64,
}

/// Errors returned by the metadata provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider knows no video under this identifier.
    #[error("video {0} not found on the provider")]
    NotFound(String),

    /// The provider could not be reached.
    #[error("metadata provider unavailable: {0}")]
    Unavailable(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("metadata provider returned {status}: {body}")]
    Status {
        /// HTTP status of the response
        status: reqwest::StatusCode,
        /// Response body, for diagnostics
        body: String,
    },

    /// The provider's response did not match the expected shape.
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

/// Source of current video metadata.
///
/// Implemented by [`YoutubeClient`]; tests substitute a stub.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetches the current metadata for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotFound`] when the provider has no video
    /// under this identifier, and a transport or decoding error otherwise.
    async fn get_details(&self, id: &str) -> Result<VideoMetadata, ProviderError>;
}
