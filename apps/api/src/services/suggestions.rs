//! Suggestion service.
//!
//! Suggestions are created `active` and move one way to `dismissed` or
//! `completed`; neither path leads back.

use std::sync::Arc;

use serde_json::json;

use crate::models::suggestion::{NewSuggestion, Suggestion, SuggestionStatus};
use crate::models::{with_id, WithId};
use crate::store::{collections::SUGGESTIONS, watch, DocStore, LiveQuery, QueryOptions};

use super::{map_not_found, ServiceError};

#[derive(Debug, Clone)]
pub struct SuggestionQuery {
    pub status: SuggestionStatus,
    pub limit: usize,
}

impl Default for SuggestionQuery {
    fn default() -> Self {
        Self {
            status: SuggestionStatus::Active,
            limit: 5,
        }
    }
}

pub async fn create_suggestion(
    store: &dyn DocStore,
    user_id: &str,
    input: NewSuggestion,
) -> Result<String, ServiceError> {
    let suggestion = Suggestion {
        user_id: user_id.to_string(),
        kind: input.kind,
        title: input.title,
        description: input.description,
        action: input.action,
        action_url: input.action_url,
        priority: input.priority.unwrap_or(1),
        status: SuggestionStatus::Active,
        metadata: input.metadata.unwrap_or_else(|| json!({})),
    };
    Ok(store
        .insert(SUGGESTIONS, serde_json::to_value(&suggestion)?)
        .await?)
}

/// Highest priority first, newest first within a priority.
pub async fn list_suggestions(
    store: &dyn DocStore,
    user_id: &str,
    query: SuggestionQuery,
) -> Result<Vec<WithId<Suggestion>>, ServiceError> {
    let records = store
        .query(SUGGESTIONS, suggestion_options(user_id, &query)?)
        .await?;
    records
        .into_iter()
        .map(|record| with_id(record).map_err(ServiceError::from))
        .collect()
}

pub fn watch_suggestions(
    store: Arc<dyn DocStore>,
    user_id: &str,
    query: SuggestionQuery,
) -> Result<LiveQuery, ServiceError> {
    let options = suggestion_options(user_id, &query)?;
    Ok(watch(store, SUGGESTIONS, options))
}

pub async fn dismiss_suggestion(
    store: &dyn DocStore,
    suggestion_id: &str,
) -> Result<(), ServiceError> {
    set_status(store, suggestion_id, SuggestionStatus::Dismissed).await
}

pub async fn complete_suggestion(
    store: &dyn DocStore,
    suggestion_id: &str,
) -> Result<(), ServiceError> {
    set_status(store, suggestion_id, SuggestionStatus::Completed).await
}

async fn set_status(
    store: &dyn DocStore,
    suggestion_id: &str,
    status: SuggestionStatus,
) -> Result<(), ServiceError> {
    store
        .update(
            SUGGESTIONS,
            suggestion_id,
            json!({ "status": status }),
        )
        .await
        .map_err(|e| map_not_found(e, "Suggestion not found"))
}

fn suggestion_options(
    user_id: &str,
    query: &SuggestionQuery,
) -> Result<QueryOptions, ServiceError> {
    Ok(QueryOptions::new()
        .filter("userId", user_id)
        .filter("status", serde_json::to_value(query.status)?)
        .order_desc("priority")
        .order_desc("createdAt")
        .limit(query.limit))
}
