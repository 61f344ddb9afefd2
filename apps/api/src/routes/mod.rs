pub mod activities;
pub mod ai;
pub mod analytics;
pub mod documents;
pub mod health;
pub mod portfolio;
pub mod profile;
pub mod suggestions;
pub mod templates;

use axum::{
    extract::DefaultBodyLimit,
    http::header,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};

use crate::auth::auth_middleware;
use crate::clients::GeneratedFile;
use crate::state::AppState;

/// Upload cap for the multipart endpoints. Larger than the processing
/// service's 10 MiB limit so oversized files reach the local validation and
/// get its message instead of a blunt 413.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/portfolios/u/:username",
            get(portfolio::public_portfolio),
        )
        .route(
            "/api/v1/shared/:document_id",
            get(documents::shared_document),
        );

    let protected = Router::new()
        // Profile
        .route(
            "/api/v1/profile",
            get(profile::get_profile)
                .post(profile::create_profile)
                .patch(profile::update_profile),
        )
        .route(
            "/api/v1/profile/preferences",
            patch(profile::update_preferences),
        )
        .route("/api/v1/profile/sync", post(profile::sync_profile))
        // Portfolio
        .route(
            "/api/v1/portfolio",
            get(portfolio::get_portfolio)
                .put(portfolio::save_portfolio)
                .delete(portfolio::delete_portfolio),
        )
        .route("/api/v1/portfolio/publish", post(portfolio::publish))
        .route("/api/v1/portfolio/unpublish", post(portfolio::unpublish))
        .route("/api/v1/portfolio/projects", post(portfolio::add_project))
        .route(
            "/api/v1/portfolio/projects/:project_id",
            patch(portfolio::update_project).delete(portfolio::delete_project),
        )
        // Documents
        .route(
            "/api/v1/documents",
            post(documents::create).get(documents::list),
        )
        .route("/api/v1/documents/search", get(documents::search))
        .route("/api/v1/documents/batch-delete", post(documents::batch_delete))
        .route(
            "/api/v1/documents/:document_id",
            get(documents::get_one)
                .patch(documents::update)
                .delete(documents::delete),
        )
        .route(
            "/api/v1/documents/:document_id/duplicate",
            post(documents::duplicate),
        )
        .route(
            "/api/v1/documents/:document_id/share",
            post(documents::share),
        )
        // Activities
        .route(
            "/api/v1/activities",
            get(activities::list).post(activities::create),
        )
        .route("/api/v1/activities/stream", get(activities::stream))
        // Suggestions
        .route(
            "/api/v1/suggestions",
            get(suggestions::list).post(suggestions::create),
        )
        .route("/api/v1/suggestions/stream", get(suggestions::stream))
        .route(
            "/api/v1/suggestions/:suggestion_id/dismiss",
            post(suggestions::dismiss),
        )
        .route(
            "/api/v1/suggestions/:suggestion_id/complete",
            post(suggestions::complete),
        )
        // Analytics
        .route("/api/v1/analytics/trends", get(analytics::trends))
        .route("/api/v1/analytics/snapshot", post(analytics::snapshot))
        // Template generation
        .route("/api/v1/templates", get(templates::list))
        .route("/api/v1/templates/:template_id", get(templates::get_one))
        .route(
            "/api/v1/templates/:template_id/generate",
            post(templates::generate),
        )
        .route(
            "/api/v1/ai/enhance-description",
            post(templates::enhance_description),
        )
        .route("/api/v1/ai/skills-summary", post(templates::skills_summary))
        // Document processing
        .route("/api/v1/ai/enhance", post(ai::enhance))
        .route("/api/v1/ai/signature", post(ai::add_signature))
        .route("/api/v1/ai/preview", post(ai::preview))
        .route("/api/v1/ai/health", get(ai::health))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    public
        .merge(protected)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// Streams a generated artifact back as a download.
pub(crate) fn file_response(file: GeneratedFile) -> Response {
    let disposition = format!(
        "attachment; filename=\"{}\"",
        file.filename.replace('"', "")
    );
    (
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response()
}
