//! Profile extraction: turns raw resume text into a structured `Profile`.
//!
//! `AppState` holds an `Arc<dyn ProfileExtractor>`; the default backend is
//! `LlmProfileExtractor`, which goes through `llm_client` like every other LLM call.

use async_trait::async_trait;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::prompts::NO_INVENTION_INSTRUCTION;
use crate::llm_client::LlmClient;
use crate::profile::models::Profile;
use crate::profile::prompts::{PROFILE_EXTRACT_PROMPT, PROFILE_EXTRACT_SYSTEM};

/// Builds the extraction prompt for a resume. Empty input is a validation error.
pub fn build_extraction_prompt(raw_text: &str) -> Result<String, AppError> {
    let raw_text = raw_text.trim();
    if raw_text.is_empty() {
        return Err(AppError::Validation("raw_text missing".to_string()));
    }

    Ok(PROFILE_EXTRACT_PROMPT
        .replace("{no_invention}", NO_INVENTION_INSTRUCTION.trim())
        .replace("{raw_text}", raw_text)
        .trim()
        .to_string())
}

#[async_trait]
pub trait ProfileExtractor: Send + Sync {
    async fn extract(&self, raw_text: &str) -> Result<Profile, AppError>;
}

pub struct LlmProfileExtractor(pub LlmClient);

#[async_trait]
impl ProfileExtractor for LlmProfileExtractor {
    async fn extract(&self, raw_text: &str) -> Result<Profile, AppError> {
        let prompt = build_extraction_prompt(raw_text)?;
        let profile: Profile = self
            .0
            .call_json(&prompt, PROFILE_EXTRACT_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Failed to extract profile: {e}")))?;

        info!(
            "Extracted profile for {} ({} skills)",
            profile.display_name(),
            profile.skills().len()
        );
        Ok(profile)
    }
}
