use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::profile::models::Profile;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub raw_text: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub profile: Profile,
}

/// POST /api/v1/profiles/extract
pub async fn handle_extract_profile(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    let profile = state.extractor.extract(&request.raw_text).await?;
    Ok(Json(ExtractResponse { profile }))
}
