pub mod activity;
pub mod analytics;
pub mod document;
pub mod portfolio;
pub mod suggestion;
pub mod template;
pub mod user;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::store::{Record, StoreError};

/// A decoded entity together with its record ID and server timestamps, the
/// shape handed back to API consumers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithId<T> {
    pub id: String,
    #[serde(flatten)]
    pub data: T,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn with_id<T: DeserializeOwned>(record: Record) -> Result<WithId<T>, StoreError> {
    let data = record.decode()?;
    Ok(WithId {
        id: record.id,
        data,
        created_at: record.created_at,
        updated_at: record.updated_at,
    })
}
