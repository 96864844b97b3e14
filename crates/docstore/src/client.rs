//! HTTP client for the document store API.

use core::marker::PhantomData;
use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::StoreError;

/// Request timeout for store calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Attribute stamped on every partial update.
const MODIFIED_FIELD: &str = "Modified";

/// Connection to the document store.
///
/// Holds the shared HTTP client, the store endpoint and the access token.
/// Cheap to clone; safe to share across concurrent tasks.
#[derive(Clone)]
pub struct DocStore {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
}

impl DocStore {
    /// Creates a new store connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(
        endpoint: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let mut endpoint = endpoint.into();
        while endpoint.ends_with('/') {
            endpoint.pop();
        }

        Ok(Self {
            client,
            endpoint,
            access_token: access_token.into(),
        })
    }

    /// Returns a typed handle for one table of the store.
    #[must_use]
    pub fn table<T>(&self, name: impl Into<String>) -> Table<T> {
        Table {
            store: self.clone(),
            name: name.into(),
            _record: PhantomData,
        }
    }

    /// Lists all tables visible to the current credentials, following
    /// pagination cursors until the listing is exhausted.
    ///
    /// Diagnostics only; not on the refresh path.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    pub async fn list_tables(&self) -> Result<Vec<String>, StoreError> {
        #[derive(serde::Deserialize)]
        struct TablePage {
            tables: Vec<String>,
            next_cursor: Option<String>,
        }

        let mut tables = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(format!("{}/v1/tables", self.endpoint))
                .bearer_auth(&self.access_token);

            if let Some(cursor) = &cursor {
                request = request.query(&[("cursor", cursor)]);
            }

            let body = check_status(request.send().await?).await?;
            let page: TablePage = serde_json::from_str(&body)?;

            tables.extend(page.tables);

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(tables)
    }
}

/// Typed handle for one table of the document store.
pub struct Table<T> {
    store: DocStore,
    name: String,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Table<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            name: self.name.clone(),
            _record: PhantomData,
        }
    }
}

impl<T> Table<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Fetches the record whose `key` attribute equals `value`.
    ///
    /// Absence is not an error: a 404 from the store yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` or `value` is empty, the store cannot be
    /// reached, or the stored document does not parse.
    pub async fn find_by_id(&self, key: &str, value: &str) -> Result<Option<T>, StoreError> {
        require_argument("key name", key)?;
        require_argument("key value", value)?;

        let response = self
            .store
            .client
            .get(self.item_url())
            .bearer_auth(&self.store.access_token)
            .query(&[("key", key), ("value", value)])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = check_status(response).await?;
        let record = serde_json::from_str(&body)?;

        Ok(Some(record))
    }

    /// Inserts the record, fully overwriting any record stored at its key.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized or the store
    /// rejects the write.
    pub async fn put_item(&self, record: &T) -> Result<(), StoreError> {
        let document = serde_json::to_value(record)?;

        debug!(table = %self.name, "putting item");

        let response = self
            .store
            .client
            .put(self.item_url())
            .bearer_auth(&self.store.access_token)
            .json(&document)
            .send()
            .await?;

        check_status(response).await?;

        Ok(())
    }

    /// Applies a partial update to the record whose `key` attribute equals
    /// `value`.
    ///
    /// Only the fields present in the serialized `patch` are written, plus a
    /// `Modified` timestamp stamped on every update. Fields absent from the
    /// patch are left untouched server-side.
    ///
    /// # Errors
    ///
    /// Returns an error if the patch does not serialize to an object, or the
    /// store rejects the write.
    pub async fn update_item<P>(&self, key: &str, value: &str, patch: &P) -> Result<(), StoreError>
    where
        P: Serialize,
    {
        require_argument("key name", key)?;
        require_argument("key value", value)?;

        let fields = patch_fields(patch, unix_now())?;

        debug!(table = %self.name, fields = fields.len(), "updating item");

        let response = self
            .store
            .client
            .patch(self.item_url())
            .bearer_auth(&self.store.access_token)
            .query(&[("key", key), ("value", value)])
            .json(&fields)
            .send()
            .await?;

        check_status(response).await?;

        Ok(())
    }

    /// Returns every record in the table, following pagination cursors
    /// until the scan is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails or a stored document does
    /// not parse.
    pub async fn scan(&self) -> Result<Vec<T>, StoreError> {
        #[derive(serde::Deserialize)]
        struct ScanPage {
            items: Vec<Value>,
            next_cursor: Option<String>,
        }

        let mut records = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut request = self
                .store
                .client
                .get(format!("{}/v1/tables/{}/items", self.store.endpoint, self.name))
                .bearer_auth(&self.store.access_token);

            if let Some(cursor) = &cursor {
                request = request.query(&[("cursor", cursor)]);
            }

            let body = check_status(request.send().await?).await?;
            let page: ScanPage = serde_json::from_str(&body)?;

            for item in page.items {
                records.push(serde_json::from_value(item)?);
            }

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(records)
    }

    fn item_url(&self) -> String {
        format!("{}/v1/tables/{}/item", self.store.endpoint, self.name)
    }
}

/// Builds the field set a partial update will touch: everything present in
/// the serialized patch, plus the `Modified` stamp.
fn patch_fields<P: Serialize>(patch: &P, modified: i64) -> Result<Map<String, Value>, StoreError> {
    let Value::Object(mut fields) = serde_json::to_value(patch)? else {
        return Err(StoreError::Validation(
            "patch must serialize to an object".to_owned(),
        ));
    };

    fields.insert(MODIFIED_FIELD.to_owned(), Value::from(modified));

    Ok(fields)
}

fn require_argument(name: &str, value: &str) -> Result<(), StoreError> {
    if value.is_empty() {
        return Err(StoreError::Validation(format!("{name} is required")));
    }

    Ok(())
}

/// Consumes a response, returning its body on success and a status error
/// otherwise.
async fn check_status(response: reqwest::Response) -> Result<String, StoreError> {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if !status.is_success() {
        return Err(StoreError::Status { status, body });
    }

    Ok(body)
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct SamplePatch {
        #[serde(rename = "Title", skip_serializing_if = "Option::is_none")]
        title: Option<String>,

        #[serde(rename = "Views", skip_serializing_if = "Option::is_none")]
        views: Option<u64>,
    }

    #[test]
    fn patch_fields_keeps_only_present_fields() {
        let patch = SamplePatch {
            title: None,
            views: Some(0),
        };

        let fields = patch_fields(&patch, 1_700_000_000).unwrap();

        // Zero is a legal value; absence is expressed by `None`, not by the
        // field's default.
        assert_eq!(fields.get("Views"), Some(&Value::from(0)));
        assert!(!fields.contains_key("Title"));
    }

    #[test]
    fn patch_fields_always_stamps_modified() {
        let patch = SamplePatch {
            title: None,
            views: None,
        };

        let fields = patch_fields(&patch, 42).unwrap();

        assert_eq!(fields.get("Modified"), Some(&Value::from(42)));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn patch_fields_rejects_non_object_patches() {
        let result = patch_fields(&["not", "an", "object"], 0);

        assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    #[tokio::test]
    async fn find_by_id_requires_key_and_value() {
        let store = DocStore::new("http://localhost:0", "token").unwrap();
        let table = store.table::<Value>("Videos");

        let missing_key = table.find_by_id("", "abc").await;
        assert!(matches!(missing_key, Err(StoreError::Validation(_))));

        let missing_value = table.find_by_id("Id", "").await;
        assert!(matches!(missing_value, Err(StoreError::Validation(_))));
    }

    #[test]
    fn endpoint_trailing_slash_is_normalized() {
        let store = DocStore::new("http://store.example/", "token").unwrap();
        let table = store.table::<Value>("Videos");

        assert_eq!(table.item_url(), "http://store.example/v1/tables/Videos/item");
    }
}
