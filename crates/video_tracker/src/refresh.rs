//! Staleness policy and single-record refresh.

use core::time::Duration;
use std::sync::Arc;

use tracing::debug;

use crate::clock::Clock;
use crate::error::TrackError;
use crate::model::{ChannelInfo, SaveVideo, VideoRecord};
use crate::repository::VideoRepository;
use crate::store::RecordStore;
use crate::youtube::MetadataProvider;

/// When a record is refreshed again.
///
/// A record younger than `staleness` is returned as-is; anything older (or
/// unknown) triggers a provider fetch.
#[derive(Debug, Clone, Copy)]
pub struct RefreshPolicy {
    staleness: Duration,
}

impl RefreshPolicy {
    /// Creates a policy with the given staleness threshold.
    #[must_use]
    pub fn new(staleness: Duration) -> Self {
        Self { staleness }
    }

    fn is_fresh(&self, age_secs: i64) -> bool {
        age_secs <= self.staleness.as_secs() as i64
    }
}

/// Drives the fetch-check-persist cycle for one record.
pub struct RefreshEngine<S, P> {
    repository: VideoRepository<S>,
    provider: P,
    policy: RefreshPolicy,
    clock: Arc<dyn Clock>,
}

impl<S, P> RefreshEngine<S, P>
where
    S: RecordStore,
    P: MetadataProvider,
{
    /// Creates an engine over the given repository and provider.
    pub fn new(
        repository: VideoRepository<S>,
        provider: P,
        policy: RefreshPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            provider,
            policy,
            clock,
        }
    }

    /// The repository this engine persists through.
    pub fn repository(&self) -> &VideoRepository<S> {
        &self.repository
    }

    /// Refreshes one record.
    ///
    /// A record still within the staleness threshold is returned unchanged
    /// without touching the provider. Otherwise the current stats are
    /// fetched, appended, and the post-write record is read back.
    ///
    /// # Errors
    ///
    /// Propagates fetch and store errors unresolved; no local retry.
    pub async fn refresh(&self, id: &str) -> Result<VideoRecord, TrackError> {
        if let Some(record) = self.repository.find(id).await? {
            let age = self.clock.now_unix() - record.last_activity_at;
            if self.policy.is_fresh(age) {
                debug!(video = %id, age, "record is fresh, skipping fetch");
                return Ok(record);
            }
        }

        let metadata = self.provider.get_details(id).await?;

        self.repository
            .save(SaveVideo {
                id: metadata.id,
                title: metadata.title,
                channel: ChannelInfo {
                    id: metadata.channel_id,
                    title: metadata.channel_title,
                },
                views: metadata.views,
            })
            .await?;

        // Return the post-write state, not the local picture of it.
        self.repository
            .find(id)
            .await?
            .ok_or_else(|| TrackError::VideoNotFound(id.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ManualClock, MemoryStore, StubProvider, engine_with};

    #[tokio::test]
    async fn cold_start_creates_a_record_with_one_observation() {
        let clock = Arc::new(ManualClock::new(50_000));
        let provider = StubProvider::default().with_video("abc123", 100);
        let engine = engine_with(MemoryStore::default(), provider, 3_600, &clock);

        let record = engine.refresh("abc123").await.unwrap();

        assert_eq!(record.view_logs.len(), 1);
        assert_eq!(record.view_logs[0].views, 100);
        assert_eq!(record.created, record.last_activity_at);
    }

    #[tokio::test]
    async fn refresh_within_threshold_skips_the_provider() {
        let clock = Arc::new(ManualClock::new(50_000));
        let provider = StubProvider::default().with_video("abc123", 100);
        let engine = engine_with(MemoryStore::default(), provider, 3_600, &clock);

        let first = engine.refresh("abc123").await.unwrap();

        clock.advance(3_600);
        let second = engine.refresh("abc123").await.unwrap();

        assert_eq!(first.last_activity_at, second.last_activity_at);
        assert_eq!(second.view_logs.len(), 1);
        assert_eq!(engine.provider.calls(), 1);
    }

    #[tokio::test]
    async fn stale_record_is_fetched_and_appended() {
        let clock = Arc::new(ManualClock::new(50_000));
        let provider = StubProvider::default().with_video("abc123", 100);
        let engine = engine_with(MemoryStore::default(), provider, 3_600, &clock);

        engine.refresh("abc123").await.unwrap();

        engine.provider.set_views("abc123", 150);
        clock.advance(3_601);
        let record = engine.refresh("abc123").await.unwrap();

        assert_eq!(record.view_logs.len(), 2);
        assert_eq!(record.view_logs[1].views, 150);
        assert_eq!(record.last_activity_at, 53_601);
        assert_eq!(engine.provider.calls(), 2);
    }

    #[tokio::test]
    async fn provider_errors_propagate_unresolved() {
        let clock = Arc::new(ManualClock::new(50_000));
        let engine = engine_with(MemoryStore::default(), StubProvider::default(), 3_600, &clock);

        let result = engine.refresh("missing").await;

        assert!(matches!(
            result,
            Err(TrackError::Provider(
                crate::youtube::ProviderError::NotFound(_)
            ))
        ));
        assert!(engine.repository.find("missing").await.unwrap().is_none());
    }
}
