//! Document-processing proxy: multipart uploads forwarded to the remote
//! service. Local validation errors come back as 400s before any upstream
//! call is made.

use axum::{
    extract::{Multipart, State},
    response::Response,
    Json,
};
use bytes::Bytes;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::warn;

use crate::auth::AuthUser;
use crate::clients::docproc::{
    DocumentPreview, EnhanceOptions, SignatureOptions, UploadFile,
};
use crate::errors::AppError;
use crate::models::activity::NewActivity;
use crate::services::activities;
use crate::state::AppState;

use super::file_response;
use super::templates::bump_ai_counter;

/// POST /api/v1/ai/enhance
pub async fn enhance(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let (file, mut fields) = read_multipart(multipart).await?;
    let options = EnhanceOptions {
        prompt: fields.remove("prompt"),
        doc_type: fields.remove("doc_type"),
    };

    let original_name = file.name.clone();
    let result = state.docproc.enhance(file, options).await?;

    bump_ai_counter(&state, &user.id).await;
    let entry = NewActivity {
        kind: "ai".to_string(),
        action: "enhanced".to_string(),
        title: original_name,
        metadata: Some(json!({ "filename": result.filename })),
        ..NewActivity::default()
    };
    if let Err(err) = activities::log_activity(state.store.as_ref(), &user.id, entry).await {
        warn!("failed to log enhancement activity: {err}");
    }

    Ok(file_response(result))
}

/// POST /api/v1/ai/signature
pub async fn add_signature(
    State(state): State<AppState>,
    _user: AuthUser,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let (file, mut fields) = read_multipart(multipart).await?;
    let options = SignatureOptions {
        signature: fields.remove("signature").unwrap_or_default(),
        position: fields.remove("position"),
        signer_name: fields.remove("signer_name"),
    };

    let result = state.docproc.add_signature(file, options).await?;
    Ok(file_response(result))
}

/// POST /api/v1/ai/preview
pub async fn preview(
    State(state): State<AppState>,
    _user: AuthUser,
    multipart: Multipart,
) -> Result<Json<DocumentPreview>, AppError> {
    let (file, _) = read_multipart(multipart).await?;
    let preview = state.docproc.preview(file).await?;
    Ok(Json(preview))
}

/// GET /api/v1/ai/health
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    Ok(Json(state.docproc.health().await?))
}

/// Collects the one file part and any text fields from a multipart body.
/// A missing file part becomes an empty `UploadFile`, which the client
/// rejects with "No file provided".
async fn read_multipart(
    mut multipart: Multipart,
) -> Result<(UploadFile, HashMap<String, String>), AppError> {
    let mut file = UploadFile {
        name: String::new(),
        bytes: Bytes::new(),
    };
    let mut fields = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(e.to_string()))?;
            file = UploadFile {
                name: filename,
                bytes,
            };
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::Validation(e.to_string()))?;
            fields.insert(name, text);
        }
    }

    Ok((file, fields))
}
