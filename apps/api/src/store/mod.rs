//! Document store adapter.
//!
//! Every durable entity is a schemaless JSON record inside a named collection,
//! addressed by an opaque string ID. The trait is the single seam between the
//! domain services and the backing store; `PgDocStore` is the production
//! implementation, `MemStore` the ephemeral one used throughout the tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::broadcast;

pub mod live;
pub mod memory;
pub mod postgres;

pub use live::{watch, ChangeEvent, ChangeHub, LiveEvent, LiveQuery};
pub use memory::MemStore;
pub use postgres::PgDocStore;

/// Collection names, by convention shared with the SPA client.
pub mod collections {
    pub const USERS: &str = "users";
    pub const PORTFOLIOS: &str = "portfolios";
    pub const DOCUMENTS: &str = "documents";
    pub const ACTIVITIES: &str = "activities";
    pub const SUGGESTIONS: &str = "suggestions";
    pub const ANALYTICS: &str = "analytics";
    pub const TEMPLATES: &str = "templates";
}

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("record {0} not found")]
    NotFound(String),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("invalid record data: {0}")]
    Decode(String),

    #[error("invalid query: {0}")]
    Query(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// A stored record. `created_at`/`updated_at` are server-stamped on write and
/// never live inside `data`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Record {
    pub id: String,
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record {
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(self.data.clone()).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// Query shape supported by every backend: equality filters on top-level
/// fields, one `createdAt >=` cutoff (for the analytics lookback window),
/// ordering and a limit.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub filters: Vec<(String, Value)>,
    pub created_after: Option<DateTime<Utc>>,
    pub order: Vec<OrderBy>,
    pub limit: Option<usize>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push((field.to_string(), value.into()));
        self
    }

    pub fn created_after(mut self, cutoff: DateTime<Utc>) -> Self {
        self.created_after = Some(cutoff);
        self
    }

    pub fn order_asc(mut self, field: &str) -> Self {
        self.order.push(OrderBy {
            field: field.to_string(),
            direction: Direction::Asc,
        });
        self
    }

    pub fn order_desc(mut self, field: &str) -> Self {
        self.order.push(OrderBy {
            field: field.to_string(),
            direction: Direction::Desc,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Uniform CRUD + query primitives over the document database.
///
/// All write methods stamp `updated_at` server-side. Failures come back as
/// `StoreError` values; nothing here panics on a missing record.
#[async_trait]
pub trait DocStore: Send + Sync {
    /// Fetches a record, `NotFound` when absent.
    async fn get(&self, collection: &str, id: &str) -> Result<Record, StoreError>;

    /// Upserts a record. With `merge`, top-level fields are shallow-merged
    /// into the existing data; otherwise the data is replaced.
    async fn set(
        &self,
        collection: &str,
        id: &str,
        data: Value,
        merge: bool,
    ) -> Result<(), StoreError>;

    /// Creates a record under a generated ID and returns the ID.
    async fn insert(&self, collection: &str, data: Value) -> Result<String, StoreError>;

    /// Shallow-merges `patch` into an existing record. Fails with `NotFound`
    /// when the record does not exist (no silent create).
    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), StoreError>;

    /// Deletes a record. Deleting an absent record is not an error.
    async fn remove(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Atomically adjusts a numeric field by `delta`, treating a missing field
    /// as 0 and clamping the result at 0 (every counter in this system is
    /// non-negative). `field` may be a dotted path, e.g. `stats.views`;
    /// intermediate objects must already exist.
    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> Result<(), StoreError>;

    /// Runs a filtered/ordered/limited query.
    async fn query(
        &self,
        collection: &str,
        options: QueryOptions,
    ) -> Result<Vec<Record>, StoreError>;

    /// Subscribes to the store-wide change feed. Used by [`watch`] to re-run
    /// live queries; one event is published per successful write.
    fn changes(&self) -> broadcast::Receiver<ChangeEvent>;
}

/// Rejects non-object record data before it reaches a backend.
pub(crate) fn require_object(data: &Value) -> Result<(), StoreError> {
    if data.is_object() {
        Ok(())
    } else {
        Err(StoreError::Query("record data must be a JSON object".into()))
    }
}

pub(crate) fn record_key(collection: &str, id: &str) -> String {
    format!("{collection}/{id}")
}
