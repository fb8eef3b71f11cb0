//! Axum route handlers for the Template API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::profile::models::Profile;
use crate::state::AppState;
use crate::templates::selector::select;
use crate::templates::TemplateDescriptor;

#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<TemplateDescriptor>,
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub profile: Profile,
}

#[derive(Debug, Serialize)]
pub struct SelectResponse {
    pub template: TemplateDescriptor,
    pub candidate_id: String,
    pub fallback_used: bool,
}

/// GET /api/v1/templates
pub async fn handle_list_templates(State(state): State<AppState>) -> Json<TemplateListResponse> {
    Json(TemplateListResponse {
        templates: state.registry.templates().to_vec(),
    })
}

/// GET /api/v1/templates/:id
pub async fn handle_get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TemplateDescriptor>, AppError> {
    state
        .registry
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Template {id} not found")))
}

/// POST /api/v1/templates/select
///
/// Runs template selection on an already-extracted profile. No LLM call.
pub async fn handle_select_template(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<SelectResponse>, AppError> {
    let selection = select(&request.profile, &state.registry)?;

    Ok(Json(SelectResponse {
        template: selection.template.clone(),
        candidate_id: selection.candidate_id.to_string(),
        fallback_used: selection.fallback_used,
    }))
}
