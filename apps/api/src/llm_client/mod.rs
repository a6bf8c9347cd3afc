/// LLM Client — the single point of entry for all Gemini API calls in ResumeSpark.
///
/// No other module may call the Gemini API directly. Handlers depend on the
/// `TextGenerator` trait; `LlmClient` is the production implementation.
///
/// Models are tried in the configured order: a model that keeps failing
/// (after retries) or answers with empty text hands over to the next one.
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod prompts;

const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const PING_PROMPT: &str = "Say 'API working'";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Model {model} returned empty content")]
    EmptyContent { model: String },

    #[error("All models failed ({}); last error: {last}", .tried.join(", "))]
    AllModelsFailed { tried: Vec<String>, last: Box<LlmError> },
}

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.8,
            top_k: 40,
            max_output_tokens: 2048,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: &'a GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'a str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
    error: Option<GeminiErrorBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

impl GeminiResponse {
    /// Concatenates the text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Free-text answer plus the model that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutput {
    pub text: String,
    pub model: String,
}

/// Seam between the HTTP layer and the model backend.
///
/// Carried in `AppState` as `Arc<dyn TextGenerator>`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<GenerationOutput, LlmError>;

    /// Cheap round-trip used by the startup connectivity check.
    async fn ping(&self) -> bool;

    fn models(&self) -> Vec<String>;
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_base: String,
    models: Vec<String>,
    generation_config: GenerationConfig,
    backoff: Duration,
}

impl LlmClient {
    pub fn new(api_key: String, api_base: String, models: Vec<String>) -> Result<Self> {
        if models.is_empty() {
            anyhow::bail!("At least one Gemini model must be configured");
        }
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key,
            api_base,
            models,
            generation_config: GenerationConfig::default(),
            backoff: Duration::from_secs(1),
        })
    }

    /// Overrides the base retry delay (doubles on each retry).
    #[cfg(test)]
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.api_base, model)
    }

    /// Calls a single model, retrying on 429, 5xx and transport errors with
    /// exponential backoff.
    async fn call_model(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
        let request_body = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: &self.generation_config,
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = self.backoff * (1 << (attempt - 1));
                warn!(
                    "Gemini call to {model} attempt {attempt} failed, retrying after {}ms...",
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(self.endpoint(model))
                .query(&[("key", self.api_key.as_str())])
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Gemini API returned {status} for {model}: {body}");
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<GeminiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: GeminiResponse = response.json().await?;

            if let Some(error) = parsed.error {
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message: error.message,
                });
            }

            if let Some(usage) = &parsed.usage_metadata {
                debug!(
                    "Gemini call to {model} succeeded: prompt_tokens={}, output_tokens={}",
                    usage.prompt_token_count, usage.candidates_token_count
                );
            }

            return match parsed.text() {
                Some(text) => Ok(text),
                None => {
                    let reason = parsed
                        .candidates
                        .first()
                        .and_then(|c| c.finish_reason.as_deref())
                        .unwrap_or("none");
                    warn!("Empty response from {model} (finish reason: {reason})");
                    Err(LlmError::EmptyContent {
                        model: model.to_string(),
                    })
                }
            };
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, prompt: &str) -> Result<GenerationOutput, LlmError> {
        let mut tried = Vec::with_capacity(self.models.len());
        let mut last_error: Option<LlmError> = None;

        for model in &self.models {
            tried.push(model.clone());
            match self.call_model(model, prompt).await {
                Ok(text) => {
                    info!("Response generated by {model}");
                    return Ok(GenerationOutput {
                        text,
                        model: model.clone(),
                    });
                }
                Err(e) => {
                    warn!("Model {model} failed: {e}");
                    last_error = Some(e);
                }
            }
        }

        let last = last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        });
        Err(LlmError::AllModelsFailed {
            tried,
            last: Box::new(last),
        })
    }

    async fn ping(&self) -> bool {
        let Some(model) = self.models.first() else {
            return false;
        };
        match self.call_model(model, PING_PROMPT).await {
            Ok(_) => true,
            Err(e) => {
                warn!("Gemini connectivity check failed: {e}");
                false
            }
        }
    }

    fn models(&self) -> Vec<String> {
        self.models.clone()
    }
}
