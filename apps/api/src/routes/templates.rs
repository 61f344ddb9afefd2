use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::auth::AuthUser;
use crate::clients::template_api::{
    ContractInput, CoverLetterInput, EnhanceTextInput, EnhancedText, InvoiceInput,
    PortfolioPdfInput, ProposalInput, ResumeInput, SkillsSummary, SkillsSummaryInput,
    TemplateClient, TemplateList,
};
use crate::errors::AppError;
use crate::models::template::TemplateInfo;
use crate::services::users::{self, StatField};
use crate::state::AppState;

use super::file_response;

/// GET /api/v1/templates
pub async fn list(State(state): State<AppState>) -> Json<TemplateList> {
    Json(state.templates.fetch_templates().await)
}

/// GET /api/v1/templates/:template_id
pub async fn get_one(
    Path(template_id): Path<String>,
) -> Result<Json<&'static TemplateInfo>, AppError> {
    TemplateClient::template_by_id(&template_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Template not found".to_string()))
}

/// POST /api/v1/templates/:template_id/generate
/// Dispatches to the matching generator and streams the artifact back.
pub async fn generate(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(template_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Response, AppError> {
    let file = match template_id.as_str() {
        "resume" => {
            state
                .templates
                .generate_resume(decode::<ResumeInput>(body)?)
                .await?
        }
        "cover-letter" => {
            state
                .templates
                .generate_cover_letter(decode::<CoverLetterInput>(body)?)
                .await?
        }
        "proposal" => {
            state
                .templates
                .generate_proposal(decode::<ProposalInput>(body)?)
                .await?
        }
        "invoice" => {
            state
                .templates
                .generate_invoice(decode::<InvoiceInput>(body)?)
                .await?
        }
        "contract" => {
            state
                .templates
                .generate_contract(decode::<ContractInput>(body)?)
                .await?
        }
        "portfolio-pdf" => {
            state
                .templates
                .generate_portfolio_pdf(decode::<PortfolioPdfInput>(body)?)
                .await?
        }
        _ => return Err(AppError::NotFound("Template not found".to_string())),
    };

    Ok(file_response(file))
}

/// POST /api/v1/ai/enhance-description
pub async fn enhance_description(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<EnhanceTextInput>,
) -> Result<Json<EnhancedText>, AppError> {
    let result = state.templates.enhance_description(input).await?;
    bump_ai_counter(&state, &user.id).await;
    Ok(Json(result))
}

/// POST /api/v1/ai/skills-summary
pub async fn skills_summary(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<SkillsSummaryInput>,
) -> Result<Json<SkillsSummary>, AppError> {
    let result = state.templates.skills_summary(input).await?;
    bump_ai_counter(&state, &user.id).await;
    Ok(Json(result))
}

pub(crate) async fn bump_ai_counter(state: &AppState, user_id: &str) {
    if let Err(err) =
        users::increment_stat(state.store.as_ref(), user_id, StatField::AiEnhancementsCount, 1)
            .await
    {
        warn!("failed to bump AI enhancement count for {user_id}: {err}");
    }
}

fn decode<T: DeserializeOwned>(body: Value) -> Result<T, AppError> {
    serde_json::from_value(body).map_err(|e| AppError::Validation(e.to_string()))
}
