use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::services::analytics;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TrendParams {
    /// Lookback window in days; the dashboard uses 7, the monthly view 30.
    pub period: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SnapshotCreated {
    pub id: String,
}

/// GET /api/v1/analytics/trends?period=
pub async fn trends(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<TrendParams>,
) -> Result<Json<analytics::AnalyticsReport>, AppError> {
    let period = params.period.unwrap_or(7).max(1);
    let report = analytics::get_trends(state.store.as_ref(), &user.id, period).await?;
    Ok(Json(report))
}

/// POST /api/v1/analytics/snapshot
/// Persists the current counters for trend history. Driven by an external
/// scheduler; nothing in this service calls it on a cadence.
pub async fn snapshot(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<SnapshotCreated>, AppError> {
    let id = analytics::save_snapshot(state.store.as_ref(), &user.id).await?;
    Ok(Json(SnapshotCreated { id }))
}
