//! Axum route handlers for the Portfolio API.

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::errors::AppError;
use crate::pipeline::builder::{build_portfolio, BuildRequest, BuildResponse};
use crate::pipeline::upload::read_upload;
use crate::state::AppState;

/// POST /api/v1/portfolios
///
/// Runs the full pipeline on pasted resume text.
pub async fn handle_build_portfolio(
    State(state): State<AppState>,
    Json(request): Json<BuildRequest>,
) -> Result<Json<BuildResponse>, AppError> {
    run(&state, request).await.map(Json)
}

/// POST /api/v1/portfolios/upload
///
/// Same as `handle_build_portfolio`, but the resume arrives as a multipart file.
pub async fn handle_upload_portfolio(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<BuildResponse>, AppError> {
    let request = read_upload(multipart).await?;
    run(&state, request).await.map(Json)
}

async fn run(state: &AppState, request: BuildRequest) -> Result<BuildResponse, AppError> {
    build_portfolio(
        state.extractor.as_ref(),
        &state.registry,
        &state.config.output_dir,
        state.publisher.as_deref(),
        request,
    )
    .await
}
