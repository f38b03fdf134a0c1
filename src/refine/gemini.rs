//! Gemini `generateContent` client.

use async_trait::async_trait;
use log::info;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use super::{GenerationRequest, RefineError, TextGenerator};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl GeminiClient {
    pub fn new(client: Client, api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Client with the timeouts used for report refinement.
    pub fn with_defaults(api_key: Option<String>, base_url: impl Into<String>) -> Result<Self, RefineError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::new(client, api_key, base_url))
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

/// Build the `generateContent` request body.
pub fn request_body(request: &GenerationRequest) -> Value {
    json!({
        "contents": [
            { "role": "user", "parts": [{ "text": request.prompt }] }
        ],
        "generationConfig": { "temperature": request.temperature }
    })
}

/// Concatenate the text parts of the first candidate; empty when there are none.
pub fn extract_text(body: &Value) -> String {
    body.get("candidates")
        .and_then(|candidates| candidates.get(0))
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(|parts| parts.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(|text| text.as_str()))
                .collect::<String>()
        })
        .unwrap_or_default()
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, RefineError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(RefineError::NotConfigured("GEMINI_API_KEY is not set"))?;

        info!("Sending refinement request to model {}", request.model);

        let response = self
            .client
            .post(self.endpoint(&request.model))
            .header("x-goog-api-key", api_key)
            .json(&request_body(&request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RefineError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        Ok(extract_text(&body))
    }
}
