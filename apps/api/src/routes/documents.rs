use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::activity::NewActivity;
use crate::models::document::{
    Document, DocumentStatus, DocumentType, DocumentUpdate, NewDocument,
};
use crate::models::WithId;
use crate::services::{activities, documents};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentCreated {
    pub document_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListParams {
    #[serde(rename = "type")]
    pub doc_type: Option<DocumentType>,
    pub status: Option<DocumentStatus>,
    pub limit: Option<usize>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            doc_type: None,
            status: None,
            limit: None,
        }
    }
}

/// POST /api/v1/documents
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<NewDocument>,
) -> Result<Json<DocumentCreated>, AppError> {
    let title = input
        .title
        .clone()
        .unwrap_or_else(|| "Untitled Document".to_string());
    let document_id = documents::create_document(state.store.as_ref(), &user.id, input).await?;

    // Fan-out to the activity feed; failure here is log-only.
    let entry = NewActivity {
        kind: "document".to_string(),
        action: "created".to_string(),
        title,
        metadata: Some(json!({ "documentId": document_id })),
        ..NewActivity::default()
    };
    if let Err(err) = activities::log_activity(state.store.as_ref(), &user.id, entry).await {
        warn!("failed to log document creation: {err}");
    }

    Ok(Json(DocumentCreated { document_id }))
}

/// GET /api/v1/documents
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<WithId<Document>>>, AppError> {
    let query = documents::DocumentQuery {
        doc_type: params.doc_type,
        status: params.status,
        limit: params.limit.unwrap_or(50),
        ..documents::DocumentQuery::default()
    };
    let docs = documents::list_documents(state.store.as_ref(), &user.id, query).await?;
    Ok(Json(docs))
}

/// GET /api/v1/documents/:document_id
pub async fn get_one(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(document_id): Path<String>,
) -> Result<Json<WithId<Document>>, AppError> {
    let document = documents::get_document(state.store.as_ref(), &document_id).await?;
    Ok(Json(document))
}

/// PATCH /api/v1/documents/:document_id
pub async fn update(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(document_id): Path<String>,
    Json(update): Json<DocumentUpdate>,
) -> Result<StatusCode, AppError> {
    documents::update_document(state.store.as_ref(), &document_id, update).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/documents/:document_id
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(document_id): Path<String>,
) -> Result<StatusCode, AppError> {
    documents::delete_document(state.store.as_ref(), &document_id, &user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/documents/:document_id/duplicate
pub async fn duplicate(
    State(state): State<AppState>,
    user: AuthUser,
    Path(document_id): Path<String>,
) -> Result<Json<DocumentCreated>, AppError> {
    let document_id =
        documents::duplicate_document(state.store.as_ref(), &document_id, &user.id).await?;
    Ok(Json(DocumentCreated { document_id }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShareRequest {
    pub is_public: bool,
}

impl Default for ShareRequest {
    fn default() -> Self {
        Self { is_public: true }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareResponse {
    pub share_link: Option<String>,
}

/// POST /api/v1/documents/:document_id/share
pub async fn share(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(document_id): Path<String>,
    Json(request): Json<ShareRequest>,
) -> Result<Json<ShareResponse>, AppError> {
    let share_link = documents::share_document(
        state.store.as_ref(),
        &document_id,
        request.is_public,
        &state.config.public_origin,
    )
    .await?;
    Ok(Json(ShareResponse { share_link }))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
}

/// GET /api/v1/documents/search?q=
pub async fn search(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<WithId<Document>>>, AppError> {
    let docs = documents::search_documents(state.store.as_ref(), &user.id, &params.q).await?;
    Ok(Json(docs))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDeleteRequest {
    pub document_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchDeleteResponse {
    pub deleted: usize,
}

/// POST /api/v1/documents/batch-delete
/// Sequential, not transactional: the response reports only the final count.
pub async fn batch_delete(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<BatchDeleteRequest>,
) -> Result<Json<BatchDeleteResponse>, AppError> {
    let deleted =
        documents::batch_delete_documents(state.store.as_ref(), &request.document_ids, &user.id)
            .await?;
    Ok(Json(BatchDeleteResponse { deleted }))
}

/// GET /api/v1/shared/:document_id
/// Public access to a shared document; fails closed unless `sharing.isPublic`.
pub async fn shared_document(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<Json<WithId<Document>>, AppError> {
    let document = documents::get_shared_document(state.store.as_ref(), &document_id).await?;

    if let Err(err) = documents::increment_doc_views(state.store.as_ref(), &document_id).await {
        warn!("failed to count view for document {document_id}: {err}");
    }

    Ok(Json(document))
}
