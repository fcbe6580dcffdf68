//! Client for the text-generation service that writes the questions.

use async_trait::async_trait;
use clap::ValueEnum;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

pub const DEFAULT_OPENAI_BASE: &str = "https://api.openai.com/v1";
const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Something that turns one free-text instruction into free-text output.
///
/// Implementations make exactly one request per call and never retry.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// LLM provider selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI or any server speaking its chat-completions API.
    #[default]
    #[value(name = "openai")]
    OpenAI,
    /// Anthropic (Claude models).
    Anthropic,
}

impl LlmProvider {
    /// Environment variable holding this provider's API key.
    pub fn api_key_var(self) -> &'static str {
        match self {
            Self::OpenAI => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Self::OpenAI => "gpt-4o-mini",
            Self::Anthropic => "claude-3-5-haiku-20241022",
        }
    }
}

/// Configuration for [`LlmClient`].
#[derive(Debug, Clone)]
pub struct LlmConfig {
    provider: LlmProvider,
    api_key: String,
    model: String,
    max_tokens: u32,
    api_base: String,
}

impl LlmConfig {
    #[instrument(skip(api_key), fields(provider = ?provider, model = %model))]
    pub fn new(provider: LlmProvider, api_key: String, model: String, max_tokens: u32) -> Self {
        debug!("Creating LLM config");
        Self {
            provider,
            api_key,
            model,
            max_tokens,
            api_base: DEFAULT_OPENAI_BASE.to_string(),
        }
    }

    /// Points OpenAI-style requests at another compatible server.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }
}

/// HTTP client for the configured provider.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: LlmConfig,
    http: reqwest::Client,
}

impl LlmClient {
    #[instrument(skip(config), fields(provider = ?config.provider()))]
    pub fn new(config: LlmConfig) -> Self {
        info!("Creating LLM client");
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    #[instrument(skip(self, prompt))]
    async fn complete_openai(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.config.api_base);
        let body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "messages": [{ "role": "user", "content": prompt }],
        });

        debug!(%url, "Sending request to OpenAI");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "OpenAI request failed");
                LlmError::new(format!("OpenAI request failed: {}", e))
            })?;

        let text = read_success_body(response, "OpenAI").await?;
        openai_content(&text)
    }

    #[instrument(skip(self, prompt))]
    async fn complete_anthropic(&self, prompt: &str) -> Result<String, LlmError> {
        let body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "messages": [{ "role": "user", "content": prompt }],
        });

        debug!("Sending request to Anthropic");
        let response = self
            .http
            .post(ANTHROPIC_MESSAGES_URL)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Anthropic request failed");
                LlmError::new(format!("Anthropic request failed: {}", e))
            })?;

        let text = read_success_body(response, "Anthropic").await?;
        anthropic_content(&text)
    }
}

#[async_trait]
impl CompletionService for LlmClient {
    #[instrument(skip(self, prompt), fields(provider = ?self.config.provider, model = %self.config.model))]
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let content = match self.config.provider {
            LlmProvider::OpenAI => self.complete_openai(prompt).await,
            LlmProvider::Anthropic => self.complete_anthropic(prompt).await,
        }?;
        info!(content_length = content.len(), "Generated completion");
        Ok(content)
    }
}

async fn read_success_body(response: reqwest::Response, provider: &str) -> Result<String, LlmError> {
    let status = response.status();
    let text = response.text().await.map_err(|e| {
        error!(error = ?e, provider, "Failed to read response body");
        LlmError::new(format!("Failed to read {} response: {}", provider, e))
    })?;

    if !status.is_success() {
        error!(%status, response = %text, provider, "Service returned an error");
        return Err(LlmError::new(format!("{} API error {}: {}", provider, status, text)));
    }
    Ok(text)
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicBlock>,
}

#[derive(Deserialize)]
struct AnthropicBlock {
    #[serde(default)]
    text: Option<String>,
}

fn openai_content(body: &str) -> Result<String, LlmError> {
    let parsed: OpenAiResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::new(format!("Failed to parse OpenAI response: {}", e)))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::new("No content in OpenAI response".to_string()))
}

fn anthropic_content(body: &str) -> Result<String, LlmError> {
    let parsed: AnthropicResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::new(format!("Failed to parse Anthropic response: {}", e)))?;
    parsed
        .content
        .into_iter()
        .find_map(|block| block.text)
        .ok_or_else(|| LlmError::new("No text content in Anthropic response".to_string()))
}

/// LLM client error.
#[derive(Debug, Clone, Display, Error)]
#[display("LLM error: {} at {}:{}", message, file, line)]
pub struct LlmError {
    pub message: String,
    pub line: u32,
    pub file: &'static str,
}

impl LlmError {
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        error!(error_message = %message, "LLM error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
