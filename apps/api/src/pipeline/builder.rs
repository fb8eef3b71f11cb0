//! Portfolio pipeline: orchestrates one resume-to-portfolio run.
//!
//! Flow: extract profile (prompt + LLM) → build schema → select template →
//!       render + write HTML → optionally publish to git → return response.
//!
//! Steps run strictly in sequence. Only publishing is allowed to fail softly.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::profile::extract::ProfileExtractor;
use crate::profile::models::Profile;
use crate::profile::schema::{build_schema, PortfolioSchema};
use crate::publish::{publish_or_report, PublishStatus, Publisher};
use crate::templates::render::{render_portfolio, slugify, write_portfolio};
use crate::templates::selector::select;
use crate::templates::{Registry, TemplateDescriptor};

#[derive(Debug, Clone, Deserialize)]
pub struct BuildRequest {
    pub raw_text: String,
    #[serde(default)]
    pub publish: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildResponse {
    pub run_id: Uuid,
    pub profile: Profile,
    pub schema: PortfolioSchema,
    pub template: TemplateDescriptor,
    pub candidate_id: String,
    pub fallback_used: bool,
    pub output_path: PathBuf,
    /// Absent when publishing was not requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_status: Option<PublishStatus>,
    pub generated_at: DateTime<Utc>,
}

/// Runs the full pipeline for one resume.
///
/// Steps:
/// 1. extractor.extract() → Profile (rejects empty raw_text)
/// 2. build_schema() → PortfolioSchema (rejects bad experience_years)
/// 3. select() → TemplateDescriptor (falls back to the first template)
/// 4. render_portfolio() + write_portfolio() → `<output_dir>/<slug>.html`
/// 5. publisher.publish() if requested → PublishStatus
pub async fn build_portfolio(
    extractor: &dyn ProfileExtractor,
    registry: &Registry,
    output_dir: &Path,
    publisher: Option<&dyn Publisher>,
    request: BuildRequest,
) -> Result<BuildResponse, AppError> {
    let run_id = Uuid::new_v4();
    let generated_at = Utc::now();

    if request.raw_text.trim().is_empty() {
        return Err(AppError::Validation("raw_text missing".to_string()));
    }

    // Step 1: Extract profile
    info!("[run {run_id}] Extracting profile ({} chars)", request.raw_text.len());
    let profile = extractor.extract(&request.raw_text).await?;

    // Step 2: Schema
    let schema = build_schema(&profile)?;
    info!("[run {run_id}] Profile: {}", schema.profile_summary);

    // Step 3: Template selection
    let selection = select(&profile, registry)?;
    info!(
        "[run {run_id}] Template: {} (candidate {}, fallback={})",
        selection.template.id, selection.candidate_id, selection.fallback_used
    );

    // Step 4: Render and write
    let html = render_portfolio(&schema, selection.template, generated_at);
    let output_path = write_portfolio(output_dir, &slugify(&schema.name), &html)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to write portfolio: {e}")))?;

    // Step 5: Publish
    let publish_status = match (request.publish, publisher) {
        (false, _) => None,
        (true, None) => {
            info!("[run {run_id}] Publishing requested but PUBLISH_MODE is disabled");
            Some(PublishStatus::Disabled)
        }
        (true, Some(publisher)) => {
            Some(publish_or_report(publisher, &output_path, &schema.name).await)
        }
    };

    info!("[run {run_id}] Portfolio complete: {}", output_path.display());

    Ok(BuildResponse {
        run_id,
        template: selection.template.clone(),
        candidate_id: selection.candidate_id.to_string(),
        fallback_used: selection.fallback_used,
        profile,
        schema,
        output_path,
        publish_status,
        generated_at,
    })
}
