//! # Text generation (CLI <-> Gemini)
//!
//! Implements the core [`TextGenerator`] contract against the Gemini
//! `generateContent` endpoint, plus [`RetryingGenerator`], a wrapper that adds
//! bounded retries with exponential backoff to any generator.
//!
//! - [`GeminiClient`] takes its API key from the loaded CLI config (`GEMINI_API_KEY`).
//! - The core only ever sees `TextGenerator`; transport and retries stay here.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use reportgen_core::contract::TextGenerator;
use reportgen_core::error::GenerationError;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: f32,
    pub top_k: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        GenerationSettings {
            temperature: 0.7,
            max_output_tokens: 8000,
            top_p: 0.8,
            top_k: 40,
        }
    }
}

pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    settings: GenerationSettings,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::Http(e.to_string()))?;
        Ok(GeminiClient {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
            api_key: api_key.into(),
            settings: GenerationSettings::default(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": self.settings.temperature,
                "maxOutputTokens": self.settings.max_output_tokens,
                "topP": self.settings.top_p,
                "topK": self.settings.top_k,
            }
        })
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

/// Pulls the first candidate's first text part out of a `generateContent` response body.
pub fn extract_text(body: &str) -> Result<String, GenerationError> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| GenerationError::Malformed(e.to_string()))?;
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(GenerationError::NoCandidates)?;
    debug!(finish_reason = ?candidate.finish_reason, "Received candidate");

    let text = candidate
        .content
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .unwrap_or_default();
    let text = text.trim();
    if text.is_empty() {
        return Err(GenerationError::Empty);
    }
    Ok(text.to_string())
}

/// `error.message` of an API error body, if there is one.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = self.endpoint();
        info!(model = %self.model, prompt_len = prompt.len(), "Requesting generated text");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| GenerationError::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Http(e.to_string()))?;

        if !status.is_success() {
            let message = error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string()
            });
            error!(status = %status, message = %message, "Text generation API returned error");
            return Err(GenerationError::Status {
                status: status.as_u16(),
                message,
            });
        }

        extract_text(&body)
    }
}

/// Attempts and backoff for [`RetryingGenerator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    /// The wait after failed attempt `n` (1-based) is `base_delay * 2^n`.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

pub struct RetryingGenerator<G> {
    inner: G,
    policy: RetryPolicy,
}

impl<G: TextGenerator> RetryingGenerator<G> {
    pub fn new(inner: G, policy: RetryPolicy) -> Self {
        RetryingGenerator { inner, policy }
    }
}

#[async_trait]
impl<G: TextGenerator> TextGenerator for RetryingGenerator<G> {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let attempts = self.policy.attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.inner.generate(prompt).await {
                Ok(text) => return Ok(text),
                Err(e) if attempt >= attempts => {
                    error!(attempt, error = %e, "Text generation failed, giving up");
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.policy.delay_after(attempt);
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Text generation attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
