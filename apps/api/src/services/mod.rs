//! Domain services: orchestration over the document store.
//!
//! Every function returns `Result<_, ServiceError>`; no panics cross this
//! boundary. Side-effect fan-out (counters, activity log) happens here, not in
//! the store or the handlers.

use thiserror::Error;

use crate::store::StoreError;

pub mod activities;
pub mod analytics;
pub mod documents;
pub mod portfolios;
pub mod suggestions;
pub mod users;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Store(StoreError::Decode(err.to_string()))
    }
}

/// Rewrites a store-level `NotFound` into the domain message the caller
/// expects ("User profile not found", "Portfolio not found", ...).
pub(crate) fn map_not_found(err: StoreError, message: &str) -> ServiceError {
    match err {
        StoreError::NotFound(_) => ServiceError::NotFound(message.to_string()),
        other => ServiceError::Store(other),
    }
}
