use std::convert::Infallible;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::suggestion::{NewSuggestion, Suggestion, SuggestionStatus};
use crate::models::WithId;
use crate::services::suggestions;
use crate::state::AppState;

use super::activities::sse_event;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuggestionParams {
    pub status: Option<SuggestionStatus>,
    pub limit: Option<usize>,
}

impl SuggestionParams {
    fn into_query(self) -> suggestions::SuggestionQuery {
        let defaults = suggestions::SuggestionQuery::default();
        suggestions::SuggestionQuery {
            status: self.status.unwrap_or(defaults.status),
            limit: self.limit.unwrap_or(defaults.limit),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SuggestionCreated {
    pub id: String,
}

/// GET /api/v1/suggestions
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<SuggestionParams>,
) -> Result<Json<Vec<WithId<Suggestion>>>, AppError> {
    let entries =
        suggestions::list_suggestions(state.store.as_ref(), &user.id, params.into_query()).await?;
    Ok(Json(entries))
}

/// POST /api/v1/suggestions
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(suggestion): Json<NewSuggestion>,
) -> Result<Json<SuggestionCreated>, AppError> {
    let id = suggestions::create_suggestion(state.store.as_ref(), &user.id, suggestion).await?;
    Ok(Json(SuggestionCreated { id }))
}

/// POST /api/v1/suggestions/:suggestion_id/dismiss
pub async fn dismiss(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(suggestion_id): Path<String>,
) -> Result<StatusCode, AppError> {
    suggestions::dismiss_suggestion(state.store.as_ref(), &suggestion_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/suggestions/:suggestion_id/complete
pub async fn complete(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(suggestion_id): Path<String>,
) -> Result<StatusCode, AppError> {
    suggestions::complete_suggestion(state.store.as_ref(), &suggestion_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/suggestions/stream
pub async fn stream(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<SuggestionParams>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let live =
        suggestions::watch_suggestions(state.store.clone(), &user.id, params.into_query())?;
    let stream = live.map(|event| Ok(sse_event(event)));
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
