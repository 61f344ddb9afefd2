use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::user::{UserProfile, UserUpdate};
use crate::services::users;
use crate::state::AppState;

/// POST /api/v1/profile
/// Creates the profile for the signed-in identity; idempotent.
pub async fn create_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<UserProfile>, AppError> {
    let profile =
        users::create_profile(state.store.as_ref(), &user.id, user.profile_seed()).await?;
    Ok(Json(profile))
}

/// GET /api/v1/profile
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<UserProfile>, AppError> {
    let profile = users::get_profile(state.store.as_ref(), &user.id).await?;
    Ok(Json(profile))
}

/// PATCH /api/v1/profile
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(update): Json<UserUpdate>,
) -> Result<Json<UserProfile>, AppError> {
    users::update_profile(state.store.as_ref(), &user.id, &update).await?;
    let profile = users::get_profile(state.store.as_ref(), &user.id).await?;
    Ok(Json(profile))
}

/// PATCH /api/v1/profile/preferences
pub async fn update_preferences(
    State(state): State<AppState>,
    user: AuthUser,
    Json(preferences): Json<Value>,
) -> Result<StatusCode, AppError> {
    users::update_preferences(state.store.as_ref(), &user.id, &preferences).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/profile/sync
/// Reconciles the stored profile with the identity provider's current data
/// and stamps the login time. Called by the SPA after every sign-in.
pub async fn sync_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<UserProfile>, AppError> {
    let profile =
        users::sync_auth_profile(state.store.as_ref(), &user.id, user.profile_seed()).await?;
    users::update_last_login(state.store.as_ref(), &user.id).await?;
    Ok(Json(profile))
}
