use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::config::Config;

/// Fixed sampling temperature for every completion.
pub const TEMPERATURE: f32 = 0.7;

/// Text used when the service answers without any completion content.
pub const EMPTY_COMPLETION: &str = "[]";

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("missing completion API credential")]
    MissingCredential,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("status={status} body={body}")]
    Status { status: StatusCode, body: String },
    #[error("malformed completion envelope: {0}")]
    Envelope(#[from] serde_json::Error),
}

/// Anything that can turn a system + user instruction pair into completion text.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, CompletionError>;
}

pub struct OpenAiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_api_base.clone(),
            model: config.openai_model.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, CompletionError> {
        let api_key = self.api_key.as_deref().ok_or(CompletionError::MissingCredential)?;

        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system_prompt },
                ChatMessage { role: "user", content: user_prompt },
            ],
            temperature: TEMPERATURE,
        };

        info!("🔗 Requesting completion from {} (model {})", self.endpoint(), self.model);

        let response = self.client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        info!("📥 Completion response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("❌ OpenAI API error: {}", body);
            return Err(CompletionError::Status { status, body });
        }

        let response_text = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&response_text)?;
        Ok(parsed.into_content())
    }
}

// --- Wire types ---

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice { #[serde(default)] message: Option<ResponseMessage> }

#[derive(Debug, Deserialize)]
struct ResponseMessage { #[serde(default)] content: Option<String> }

impl ChatResponse {
    /// Content of the first choice; empty or missing content reads as an empty array.
    fn into_content(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| EMPTY_COMPLETION.to_string())
    }
}
