//! Concurrent refresh of every tracked video.

use core::time::Duration;
use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio::time::timeout;
use tracing::warn;

use crate::error::TrackError;
use crate::model::{VideoRecord, view_delta};
use crate::refresh::RefreshEngine;
use crate::store::RecordStore;
use crate::youtube::MetadataProvider;

/// Resource bounds for a batch refresh.
#[derive(Debug, Clone, Copy)]
pub struct BatchLimits {
    /// How many refresh tasks may run at once
    pub max_concurrent: usize,

    /// Deadline per refresh task
    pub task_timeout: Duration,
}

/// One row of the batch report, annotated with the view delta.
#[derive(Debug, Clone)]
pub struct RefreshRow {
    /// Video title
    pub title: String,

    /// Channel display title
    pub channel_title: String,

    /// View count of the newest observation
    pub current_views: u64,

    /// Views gained since the previous observation
    pub added: i64,

    /// Timestamp of the previous observation, if one exists
    pub last_run: Option<i64>,
}

impl RefreshRow {
    fn for_record(record: &VideoRecord) -> Self {
        let delta = view_delta(&record.view_logs);

        Self {
            title: record.title.clone(),
            channel_title: record.channel.title.clone(),
            current_views: delta.current,
            added: delta.added,
            last_run: delta.last_run,
        }
    }
}

/// Refreshes all tracked videos concurrently and reports the deltas.
pub struct BatchRefresher<S, P> {
    engine: Arc<RefreshEngine<S, P>>,
    limits: BatchLimits,
}

impl<S, P> BatchRefresher<S, P>
where
    S: RecordStore + 'static,
    P: MetadataProvider + 'static,
{
    /// Creates a coordinator over the given engine.
    pub fn new(engine: Arc<RefreshEngine<S, P>>, limits: BatchLimits) -> Self {
        Self { engine, limits }
    }

    /// Refreshes every tracked video and returns one row per refresh that
    /// completed, in completion order.
    ///
    /// One task is spawned per record; execution is bounded by the
    /// concurrency limit and each task runs against its own deadline. A
    /// failed or timed-out task is logged and contributes no row; the batch
    /// itself only fails when the initial listing does.
    ///
    /// # Errors
    ///
    /// Returns an error if the tracked videos cannot be listed.
    pub async fn refresh_all(&self) -> Result<Vec<RefreshRow>, TrackError> {
        let records = self.engine.repository().list_all().await?;

        let semaphore = Arc::new(Semaphore::new(self.limits.max_concurrent.max(1)));
        let (sender, mut receiver) = mpsc::channel(records.len().max(1));
        let task_timeout = self.limits.task_timeout;

        for record in records {
            let engine = Arc::clone(&self.engine);
            let semaphore = Arc::clone(&semaphore);
            let sender = sender.clone();

            tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };

                match timeout(task_timeout, engine.refresh(&record.id)).await {
                    Ok(Ok(updated)) => {
                        let _ = sender.send(RefreshRow::for_record(&updated)).await;
                    }
                    Ok(Err(error)) => {
                        warn!(video = %record.id, %error, "refresh failed, skipping");
                    }
                    Err(_) => {
                        warn!(video = %record.id, timeout = ?task_timeout, "refresh timed out, skipping");
                    }
                }
            });
        }

        // Every task holds a sender clone; once the last one is dropped the
        // receive loop ends, so the batch concludes exactly when all tasks
        // have finished.
        drop(sender);

        let mut rows = Vec::new();
        while let Some(row) = receiver.recv().await {
            rows.push(row);
        }

        Ok(rows)
    }
}
