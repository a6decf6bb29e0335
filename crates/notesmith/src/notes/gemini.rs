//! Gemini `generateContent` REST client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{NotesService, build_notes_prompt};
use crate::core::config::NotesConfig;
use crate::types::preview;
use crate::{NotesmithError, Result};

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Notes service backed by Google's Gemini API.
pub struct GeminiNotesClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    prompt_prefix: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for GeminiNotesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiNotesClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl GeminiNotesClient {
    /// Build a client from configuration.
    ///
    /// A missing API key is not an error here; every request then fails with a
    /// `Service` error until one is configured.
    pub fn new(config: &NotesConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| NotesmithError::service_with_source("Failed to create HTTP client", e))?;

        let api_key = config.resolved_api_key();
        if api_key.is_none() {
            tracing::warn!(
                "No Gemini API key configured. Set {} or notes.api_key to enable notes generation",
                crate::core::config::API_KEY_ENV
            );
        }

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            prompt_prefix: config.prompt_prefix.clone(),
            api_key,
        })
    }

    fn request_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

fn request_body(prompt: &str) -> GenerateContentRequest<'_> {
    GenerateContentRequest {
        contents: vec![RequestContent {
            parts: vec![RequestPart { text: prompt }],
        }],
    }
}

/// Concatenate the text parts of the first candidate.
fn response_text(response: GenerateContentResponse) -> Result<String> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(NotesmithError::service(format!("Prompt was blocked: {}", reason)));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| NotesmithError::service("Response contained no candidates"))?;

    let text: String = candidate
        .content
        .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(NotesmithError::service(format!(
            "Response contained no text (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    Ok(text)
}

#[async_trait]
impl NotesService for GeminiNotesClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate_notes(&self, text: &str) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            NotesmithError::service(format!(
                "No API key configured. Set {} or notes.api_key",
                crate::core::config::API_KEY_ENV
            ))
        })?;

        tracing::info!("Generating notes for: {}...", preview(text, 50));
        let prompt = build_notes_prompt(&self.prompt_prefix, text);

        let response = self
            .client
            .post(self.request_url())
            .header("x-goog-api-key", api_key)
            .json(&request_body(&prompt))
            .send()
            .await
            .map_err(|e| NotesmithError::service_with_source(format!("Request to {} failed", self.model), e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotesmithError::service(format!(
                "Model {} returned status {}: {}",
                self.model,
                status,
                preview(body.trim(), 200)
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| NotesmithError::service_with_source("Failed to parse model response", e))?;

        let notes = response_text(parsed)?;
        tracing::info!("Generated notes: {}...", preview(&notes, 50));
        Ok(notes)
    }
}
