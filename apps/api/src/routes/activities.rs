use std::convert::Infallible;

use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::activity::{Activity, NewActivity};
use crate::models::WithId;
use crate::services::activities;
use crate::state::AppState;
use crate::store::LiveEvent;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityParams {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub limit: Option<usize>,
}

impl ActivityParams {
    fn into_query(self) -> activities::ActivityQuery {
        let defaults = activities::ActivityQuery::default();
        activities::ActivityQuery {
            kind: self.kind,
            limit: self.limit.unwrap_or(defaults.limit),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ActivityCreated {
    pub id: String,
}

/// GET /api/v1/activities
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ActivityParams>,
) -> Result<Json<Vec<WithId<Activity>>>, AppError> {
    let entries =
        activities::list_activities(state.store.as_ref(), &user.id, params.into_query()).await?;
    Ok(Json(entries))
}

/// POST /api/v1/activities
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(activity): Json<NewActivity>,
) -> Result<Json<ActivityCreated>, AppError> {
    let id = activities::log_activity(state.store.as_ref(), &user.id, activity).await?;
    Ok(Json(ActivityCreated { id }))
}

/// GET /api/v1/activities/stream
/// Server-sent events: a full snapshot after every change to the feed. The
/// subscription dies with the connection.
pub async fn stream(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ActivityParams>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let live = activities::watch_activities(state.store.clone(), &user.id, params.into_query());
    let stream = live.map(|event| Ok(sse_event(event)));
    Sse::new(stream).keep_alive(KeepAlive::default())
}

pub(crate) fn sse_event(event: LiveEvent) -> Event {
    match event {
        LiveEvent::Snapshot(records) => Event::default()
            .event("snapshot")
            .data(serde_json::to_string(&records).unwrap_or_else(|_| "[]".to_string())),
        LiveEvent::Error(err) => Event::default().event("error").data(err.to_string()),
    }
}
