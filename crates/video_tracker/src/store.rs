//! Storage seam between the repository and the document store.

use async_trait::async_trait;
use docstore::{StoreError, Table};

use crate::model::{VideoRecord, VideoRecordPatch};

/// Key attribute of the videos table.
const KEY_NAME: &str = "Id";

/// Persistence operations the repository needs from the videos table.
///
/// Implementations must treat the observation log as append-only: a patch
/// carrying `view_logs` replaces the stored sequence with the caller's
/// extended copy and must never reorder or truncate it otherwise.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns the record stored under `id`, or `None` when absent.
    async fn find(&self, id: &str) -> Result<Option<VideoRecord>, StoreError>;

    /// Inserts or fully overwrites a record at its key.
    async fn insert(&self, record: &VideoRecord) -> Result<(), StoreError>;

    /// Applies a partial update to the record stored under `id`.
    async fn apply_patch(&self, id: &str, patch: &VideoRecordPatch) -> Result<(), StoreError>;

    /// Returns every record in the table.
    async fn scan(&self) -> Result<Vec<VideoRecord>, StoreError>;
}

#[async_trait]
impl RecordStore for Table<VideoRecord> {
    async fn find(&self, id: &str) -> Result<Option<VideoRecord>, StoreError> {
        self.find_by_id(KEY_NAME, id).await
    }

    async fn insert(&self, record: &VideoRecord) -> Result<(), StoreError> {
        self.put_item(record).await
    }

    async fn apply_patch(&self, id: &str, patch: &VideoRecordPatch) -> Result<(), StoreError> {
        self.update_item(KEY_NAME, id, patch).await
    }

    async fn scan(&self) -> Result<Vec<VideoRecord>, StoreError> {
        Table::scan(self).await
    }
}
