/// LLM Client: the single point of entry for all model API calls in the portfolio builder.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// All LLM interactions MUST go through this module.
///
/// Model: claude-sonnet-4-5 (fixed, not read from config)
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Could not extract JSON from LLM output")]
    NoJson,

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Why JSON could not be pulled out of model output.
#[derive(Debug)]
pub enum ExtractionFailure {
    /// Neither the whole text nor any fenced block looked like JSON.
    NotFound,
    /// JSON was found (fenced, or the whole text) but did not deserialize.
    Invalid(serde_json::Error),
}

/// Outcome of reading a typed JSON value out of free-form model output.
#[derive(Debug)]
pub enum JsonExtraction<T> {
    /// The whole (trimmed) text was valid JSON.
    Direct(T),
    /// The JSON was inside a ```json (or bare ```) fenced block.
    Fenced(T),
    Failed(ExtractionFailure),
}

impl<T> JsonExtraction<T> {
    pub fn into_result(self) -> Result<T, LlmError> {
        match self {
            JsonExtraction::Direct(value) | JsonExtraction::Fenced(value) => Ok(value),
            JsonExtraction::Failed(ExtractionFailure::NotFound) => Err(LlmError::NoJson),
            JsonExtraction::Failed(ExtractionFailure::Invalid(e)) => Err(LlmError::Parse(e)),
        }
    }
}

/// Reads `T` from model output: first the whole text, then the first fenced block.
pub fn extract_json<T: DeserializeOwned>(text: &str) -> JsonExtraction<T> {
    let trimmed = text.trim();
    let direct_error = match serde_json::from_str::<T>(trimmed) {
        Ok(value) => return JsonExtraction::Direct(value),
        Err(e) => e,
    };

    match find_fenced_block(trimmed) {
        Some(block) => match serde_json::from_str::<T>(block) {
            Ok(value) => JsonExtraction::Fenced(value),
            Err(e) => JsonExtraction::Failed(ExtractionFailure::Invalid(e)),
        },
        // Bare JSON that does not fit `T` reports the real parse error.
        None if trimmed.starts_with('{') || trimmed.starts_with('[') => {
            JsonExtraction::Failed(ExtractionFailure::Invalid(direct_error))
        }
        None => JsonExtraction::Failed(ExtractionFailure::NotFound),
    }
}

/// Returns the trimmed body of the first ```json block, falling back to the first bare ``` block.
fn find_fenced_block(text: &str) -> Option<&str> {
    fenced_body(text, "```json").or_else(|| fenced_body(text, "```"))
}

fn fenced_body<'a>(text: &'a str, opener: &str) -> Option<&'a str> {
    let start = text.find(opener)? + opener.len();
    let rest = &text[start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

/// The single LLM client used by all services.
/// Wraps the Anthropic Messages API with a structured output helper.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Makes one call to the Claude API, returning the full response object.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("LLM API returned {}", status);
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );

        Ok(llm_response)
    }

    /// Calls the LLM and deserializes the text response as JSON.
    /// The prompt must instruct the model to return valid JSON.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<T, LlmError> {
        let response = self.call(prompt, system).await?;

        let text = response.text().ok_or(LlmError::EmptyContent)?;

        match extract_json(text) {
            JsonExtraction::Fenced(value) => {
                debug!("LLM output parsed from fenced block");
                Ok(value)
            }
            other => other.into_result(),
        }
    }
}
