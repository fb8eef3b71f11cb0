pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::pipeline::handlers as pipeline;
use crate::profile::handlers as profile;
use crate::state::AppState;
use crate::templates::handlers as templates;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Template API
        .route("/api/v1/templates", get(templates::handle_list_templates))
        .route("/api/v1/templates/:id", get(templates::handle_get_template))
        .route(
            "/api/v1/templates/select",
            post(templates::handle_select_template),
        )
        // Profile API
        .route(
            "/api/v1/profiles/extract",
            post(profile::handle_extract_profile),
        )
        // Portfolio API
        .route("/api/v1/portfolios", post(pipeline::handle_build_portfolio))
        .route(
            "/api/v1/portfolios/upload",
            post(pipeline::handle_upload_portfolio),
        )
        .with_state(state)
}
