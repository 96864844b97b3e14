//! Configuration loading from environment variables.

use std::str::FromStr;

use anyhow::{Context, Result};

/// Default minimum interval between remote fetches for the same video.
const DEFAULT_STALENESS_SECS: u64 = 3600;

/// Default number of refresh tasks allowed to run at once.
const DEFAULT_MAX_CONCURRENT_REFRESHES: usize = 8;

/// Default per-task deadline during a batch refresh.
const DEFAULT_REFRESH_TIMEOUT_SECS: u64 = 30;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the document store API
    pub docstore_endpoint: String,

    /// Bearer token for the document store
    pub docstore_access_token: String,

    /// YouTube Data API key
    pub youtube_api_key: String,

    /// Minimum age in seconds before a record is refreshed again
    pub staleness_secs: u64,

    /// Concurrency limit for batch refreshes
    pub max_concurrent_refreshes: usize,

    /// Per-task timeout in seconds during a batch refresh
    pub refresh_timeout_secs: u64,
}

impl Config {
    /// Loads configuration from a `.env` file (if present) and the
    /// environment.
    ///
    /// Required environment variables:
    /// - `DOCSTORE_ENDPOINT`: base URL of the document store API
    /// - `DOCSTORE_ACCESS_TOKEN`: bearer token for the document store
    /// - `YOUTUBE_API_KEY`: API key for the YouTube Data API
    ///
    /// Optional environment variables:
    /// - `STALENESS_SECS`: refresh throttle in seconds (default: 3600)
    /// - `MAX_CONCURRENT_REFRESHES`: batch concurrency limit (default: 8)
    /// - `REFRESH_TIMEOUT_SECS`: per-task timeout in seconds (default: 30)
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or an optional
    /// one does not parse.
    pub fn load() -> Result<Self> {
        // Load .env file
        dotenvy::dotenv().ok();

        let docstore_endpoint = std::env::var("DOCSTORE_ENDPOINT")
            .context("DOCSTORE_ENDPOINT environment variable not set")?;

        let docstore_access_token = std::env::var("DOCSTORE_ACCESS_TOKEN")
            .context("DOCSTORE_ACCESS_TOKEN environment variable not set")?;

        let youtube_api_key = std::env::var("YOUTUBE_API_KEY")
            .context("YOUTUBE_API_KEY environment variable not set")?;

        Ok(Self {
            docstore_endpoint,
            docstore_access_token,
            youtube_api_key,
            staleness_secs: env_or("STALENESS_SECS", DEFAULT_STALENESS_SECS)?,
            max_concurrent_refreshes: env_or(
                "MAX_CONCURRENT_REFRESHES",
                DEFAULT_MAX_CONCURRENT_REFRESHES,
            )?,
            refresh_timeout_secs: env_or("REFRESH_TIMEOUT_SECS", DEFAULT_REFRESH_TIMEOUT_SECS)?,
        })
    }
}

/// Reads an optional environment variable, falling back to a default when
/// unset.
fn env_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{name} is not a valid value: {raw}")),
        Err(_) => Ok(default),
    }
}
