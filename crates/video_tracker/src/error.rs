//! Error type for tracking operations.

use thiserror::Error;

use crate::youtube::ProviderError;

/// Errors returned by the tracking engine.
#[derive(Debug, Error)]
pub enum TrackError {
    /// The video is not in the store when it was expected to be.
    #[error("video {0} is not tracked")]
    VideoNotFound(String),

    /// The document store failed.
    #[error(transparent)]
    Store(#[from] docstore::StoreError),

    /// The metadata provider failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
