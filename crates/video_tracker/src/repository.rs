//! Domain-level operations on stored video records.

use std::sync::Arc;

use tracing::debug;

use crate::clock::Clock;
use crate::error::TrackError;
use crate::model::{Observation, SaveVideo, VideoRecord, VideoRecordPatch};
use crate::store::RecordStore;

/// Name of the videos table in the document store.
pub const VIDEOS_TABLE: &str = "ViewTrack_Videos";

/// Repository for video records.
///
/// Owns the append-only invariant of the observation log: every save appends
/// exactly one observation, existing observations are never altered.
pub struct VideoRepository<S> {
    store: S,
    clock: Arc<dyn Clock>,
}

impl<S: RecordStore> VideoRepository<S> {
    /// Creates a repository over the given store.
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Returns the record for `id`, or `None` when the video is not tracked.
    ///
    /// # Errors
    ///
    /// Returns an error if the store operation fails.
    pub async fn find(&self, id: &str) -> Result<Option<VideoRecord>, TrackError> {
        Ok(self.store.find(id).await?)
    }

    /// Records one fetched measurement.
    ///
    /// Unknown videos are inserted with a single-element observation log.
    /// Known videos get the new observation appended to a copy of their log
    /// through a partial update carrying only the log and the activity
    /// timestamp. The two branches are mutually exclusive: an insert never
    /// falls through into the append path.
    ///
    /// # Errors
    ///
    /// Returns an error if the store operation fails.
    pub async fn save(&self, sample: SaveVideo) -> Result<(), TrackError> {
        let existing = self.store.find(&sample.id).await?;

        let now = self.clock.now_unix();
        let observation = Observation {
            views: sample.views,
            timestamp: now,
        };

        let Some(existing) = existing else {
            debug!(video = %sample.id, "inserting new record");

            self.store
                .insert(&VideoRecord {
                    id: sample.id,
                    title: sample.title,
                    channel: sample.channel,
                    last_activity_at: now,
                    view_logs: vec![observation],
                    created: now,
                    modified: now,
                })
                .await?;

            return Ok(());
        };

        debug!(video = %sample.id, observations = existing.view_logs.len() + 1, "appending observation");

        let mut view_logs = existing.view_logs;
        view_logs.push(observation);

        let patch = VideoRecordPatch {
            last_activity_at: Some(now),
            view_logs: Some(view_logs),
            ..Default::default()
        };

        self.store.apply_patch(&sample.id, &patch).await?;

        Ok(())
    }

    /// Returns all tracked videos. Full collection scan.
    ///
    /// # Errors
    ///
    /// Returns an error if the store operation fails.
    pub async fn list_all(&self) -> Result<Vec<VideoRecord>, TrackError> {
        Ok(self.store.scan().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChannelInfo;
    use crate::testing::{ManualClock, MemoryStore, sample};

    fn repository(clock: Arc<ManualClock>) -> VideoRepository<MemoryStore> {
        VideoRepository::new(MemoryStore::default(), clock)
    }

    #[tokio::test]
    async fn save_on_unknown_video_inserts_a_single_observation() {
        let clock = Arc::new(ManualClock::new(1_000));
        let repo = repository(Arc::clone(&clock));

        repo.save(sample("abc123", 100)).await.unwrap();

        let record = repo.find("abc123").await.unwrap().unwrap();
        assert_eq!(record.view_logs.len(), 1);
        assert_eq!(record.view_logs[0].views, 100);
        assert_eq!(record.created, 1_000);
        assert_eq!(record.last_activity_at, 1_000);
    }

    #[tokio::test]
    async fn saves_append_in_call_order_without_altering_history() {
        let clock = Arc::new(ManualClock::new(1_000));
        let repo = repository(Arc::clone(&clock));

        for (step, views) in [100, 150, 150, 170].into_iter().enumerate() {
            clock.set(1_000 + step as i64 * 10);
            repo.save(sample("abc123", views)).await.unwrap();
        }

        let record = repo.find("abc123").await.unwrap().unwrap();

        // One observation per save, in call order.
        assert_eq!(record.view_logs.len(), 4);
        assert_eq!(
            record.view_logs.iter().map(|o| o.views).collect::<Vec<_>>(),
            vec![100, 150, 150, 170]
        );
        assert_eq!(
            record
                .view_logs
                .iter()
                .map(|o| o.timestamp)
                .collect::<Vec<_>>(),
            vec![1_000, 1_010, 1_020, 1_030]
        );

        // The earliest observation is untouched and `created` never moved.
        assert_eq!(record.view_logs[0].views, 100);
        assert_eq!(record.created, 1_000);
        assert_eq!(record.last_activity_at, 1_030);
    }

    #[tokio::test]
    async fn append_patch_leaves_title_and_channel_untouched() {
        let clock = Arc::new(ManualClock::new(1_000));
        let repo = repository(Arc::clone(&clock));

        repo.save(SaveVideo {
            id: "abc123".to_owned(),
            title: "Original title".to_owned(),
            channel: ChannelInfo {
                id: "chan1".to_owned(),
                title: "Original channel".to_owned(),
            },
            views: 100,
        })
        .await
        .unwrap();

        clock.set(5_000);
        repo.save(SaveVideo {
            id: "abc123".to_owned(),
            title: "Renamed title".to_owned(),
            channel: ChannelInfo {
                id: "chan1".to_owned(),
                title: "Renamed channel".to_owned(),
            },
            views: 150,
        })
        .await
        .unwrap();

        // The append path patches only ViewLogs and LastActivityAt.
        let record = repo.find("abc123").await.unwrap().unwrap();
        assert_eq!(record.title, "Original title");
        assert_eq!(record.channel.title, "Original channel");
        assert_eq!(record.view_logs.len(), 2);
        assert_eq!(record.last_activity_at, 5_000);
    }

    #[tokio::test]
    async fn list_all_returns_every_record() {
        let clock = Arc::new(ManualClock::new(1_000));
        let repo = repository(Arc::clone(&clock));

        repo.save(sample("one", 10)).await.unwrap();
        repo.save(sample("two", 20)).await.unwrap();

        let mut ids: Vec<_> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|record| record.id)
            .collect();
        ids.sort();

        assert_eq!(ids, vec!["one", "two"]);
    }
}
