use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::warn;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::portfolio::{
    Portfolio, PortfolioInput, Project, ProjectInput, ProjectUpdate, PublicPortfolio,
};
use crate::services::{portfolios, users};
use crate::state::AppState;

/// GET /api/v1/portfolio
pub async fn get_portfolio(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Portfolio>, AppError> {
    let portfolio = portfolios::get_portfolio(state.store.as_ref(), &user.id).await?;
    Ok(Json(portfolio))
}

/// PUT /api/v1/portfolio
pub async fn save_portfolio(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<PortfolioInput>,
) -> Result<Json<Portfolio>, AppError> {
    let portfolio = portfolios::save_portfolio(state.store.as_ref(), &user.id, input).await?;
    Ok(Json(portfolio))
}

#[derive(Debug, serde::Serialize)]
pub struct PublishResponse {
    pub url: String,
}

/// POST /api/v1/portfolio/publish
/// Returns the public page URL on success.
pub async fn publish(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<PublishResponse>, AppError> {
    portfolios::publish(state.store.as_ref(), &user.id).await?;
    let profile = users::get_profile(state.store.as_ref(), &user.id).await?;
    Ok(Json(PublishResponse {
        url: portfolios::portfolio_url(&state.config.public_origin, &profile.username),
    }))
}

/// POST /api/v1/portfolio/unpublish
pub async fn unpublish(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<StatusCode, AppError> {
    portfolios::unpublish(state.store.as_ref(), &user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/portfolio
pub async fn delete_portfolio(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<StatusCode, AppError> {
    portfolios::delete_portfolio(state.store.as_ref(), &user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/portfolio/projects
pub async fn add_project(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<ProjectInput>,
) -> Result<Json<Project>, AppError> {
    let project = portfolios::add_project(state.store.as_ref(), &user.id, input).await?;
    Ok(Json(project))
}

/// PATCH /api/v1/portfolio/projects/:project_id
pub async fn update_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<String>,
    Json(update): Json<ProjectUpdate>,
) -> Result<StatusCode, AppError> {
    portfolios::update_project(state.store.as_ref(), &user.id, &project_id, update).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/portfolio/projects/:project_id
pub async fn delete_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<String>,
) -> Result<StatusCode, AppError> {
    portfolios::delete_project(state.store.as_ref(), &user.id, &project_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/portfolios/u/:username
/// Public page data: only published portfolios resolve. Each hit counts as a
/// view; a failed count must not break the page.
pub async fn public_portfolio(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<PublicPortfolio>, AppError> {
    let public = portfolios::get_portfolio_by_username(state.store.as_ref(), &username).await?;

    if let Err(err) = portfolios::increment_views(state.store.as_ref(), &public.id).await {
        warn!("failed to count view for portfolio {}: {err}", public.id);
    }

    Ok(Json(public))
}
