//! In-memory fakes shared by the unit tests.

use core::time::Duration;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use docstore::StoreError;
use reqwest::StatusCode;

use crate::clock::Clock;
use crate::model::{ChannelInfo, SaveVideo, VideoRecord, VideoRecordPatch};
use crate::refresh::{RefreshEngine, RefreshPolicy};
use crate::repository::VideoRepository;
use crate::store::RecordStore;
use crate::youtube::{MetadataProvider, ProviderError, VideoMetadata};

/// In-memory stand-in for the videos table.
///
/// Mirrors the store's merge semantics: a patch writes exactly the fields
/// it carries and nothing else.
#[derive(Default)]
pub(crate) struct MemoryStore {
    records: Mutex<HashMap<String, VideoRecord>>,
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find(&self, id: &str) -> Result<Option<VideoRecord>, StoreError> {
        Ok(self.records.lock().unwrap().get(id).cloned())
    }

    async fn insert(&self, record: &VideoRecord) -> Result<(), StoreError> {
        self.records
            .lock()
            .unwrap()
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn apply_patch(&self, id: &str, patch: &VideoRecordPatch) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        let Some(record) = records.get_mut(id) else {
            return Err(StoreError::Status {
                status: StatusCode::NOT_FOUND,
                body: format!("no record {id}"),
            });
        };

        if let Some(title) = &patch.title {
            record.title = title.clone();
        }
        if let Some(channel) = &patch.channel {
            record.channel = channel.clone();
        }
        if let Some(last_activity_at) = patch.last_activity_at {
            record.last_activity_at = last_activity_at;
        }
        if let Some(view_logs) = &patch.view_logs {
            record.view_logs = view_logs.clone();
        }

        Ok(())
    }

    async fn scan(&self) -> Result<Vec<VideoRecord>, StoreError> {
        Ok(self.records.lock().unwrap().values().cloned().collect())
    }
}

/// Synthetic time, settable from the test body.
pub(crate) struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub(crate) fn new(start: i64) -> Self {
        Self {
            now: AtomicI64::new(start),
        }
    }

    pub(crate) fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub(crate) fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_unix(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Scripted metadata provider.
#[derive(Default)]
pub(crate) struct StubProvider {
    videos: Mutex<HashMap<String, VideoMetadata>>,
    calls: AtomicUsize,
}

impl StubProvider {
    pub(crate) fn with_video(self, id: &str, views: u64) -> Self {
        self.videos.lock().unwrap().insert(
            id.to_owned(),
            VideoMetadata {
                id: id.to_owned(),
                title: format!("Video {id}"),
                channel_id: "chan1".to_owned(),
                channel_title: format!("Channel {id}"),
                views,
            },
        );
        self
    }

    pub(crate) fn set_views(&self, id: &str, views: u64) {
        if let Some(video) = self.videos.lock().unwrap().get_mut(id) {
            video.views = views;
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataProvider for StubProvider {
    async fn get_details(&self, id: &str) -> Result<VideoMetadata, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        self.videos
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(id.to_owned()))
    }
}

/// A fetched-measurement input with deterministic metadata for `id`.
pub(crate) fn sample(id: &str, views: u64) -> SaveVideo {
    SaveVideo {
        id: id.to_owned(),
        title: format!("Video {id}"),
        channel: ChannelInfo {
            id: "chan1".to_owned(),
            title: format!("Channel {id}"),
        },
        views,
    }
}

/// Wires a refresh engine over the in-memory fakes.
pub(crate) fn engine_with(
    store: MemoryStore,
    provider: StubProvider,
    staleness_secs: u64,
    clock: &Arc<ManualClock>,
) -> RefreshEngine<MemoryStore, StubProvider> {
    let clock: Arc<dyn Clock> = clock.clone();
    let repository = VideoRepository::new(store, Arc::clone(&clock));
    let policy = RefreshPolicy::new(Duration::from_secs(staleness_secs));

    RefreshEngine::new(repository, provider, policy, clock)
}
