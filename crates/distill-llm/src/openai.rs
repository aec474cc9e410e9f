//! OpenAI-compatible chat completions provider (Groq, OpenAI).

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::debug;

use distill_core::config::{CompletionProvider, CompletionProviderConfig};
use distill_core::error::{DistillError, DistillResult, ErrorCode};
use distill_core::traits::{Completion, CompletionConfig, CompletionService, TokenUsage};

use crate::http;

/// Chat completions provider for any OpenAI-compatible endpoint.
pub struct OpenAICompatible {
    client: Client,
    config: CompletionConfig,
    endpoint: String,
    provider: CompletionProvider,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

impl OpenAICompatible {
    /// Create a provider. The API key must be present in the config.
    pub fn new(provider_config: CompletionProviderConfig) -> DistillResult<Self> {
        let provider = provider_config.provider;
        let base_url = http::normalize_base_url(provider_config.base_url())?;
        let config = provider_config.config;

        let api_key = config.api_key.as_ref().ok_or_else(|| DistillError::Authentication {
            message: format!(
                "{} API key not found. Set {} or provide api_key in config.",
                provider,
                provider.api_key_env()
            ),
            code: ErrorCode::AuthMissingCredentials,
            source: None,
        })?;

        let client = http::build_client(&[(
            "authorization",
            format!("Bearer {}", api_key.expose_secret()),
            true,
        )])?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url),
            config,
            provider,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request<'a>(&'a self, prompt: &'a str, max_tokens: u32) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens,
            temperature: self.config.temperature,
        }
    }

    fn parse_response(raw: serde_json::Value) -> DistillResult<Completion> {
        let response: ChatResponse = serde_json::from_value(raw.clone())
            .map_err(|e| DistillError::invalid_response(format!("Failed to parse response: {}", e)))?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| DistillError::invalid_response("Response contained no message content"))?;

        let mut completion = Completion::text(text).with_raw(raw);
        if let Some(u) = response.usage {
            completion = completion.with_usage(TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            });
        }
        Ok(completion)
    }
}

#[async_trait]
impl CompletionService for OpenAICompatible {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> DistillResult<Completion> {
        debug!(
            provider = %self.provider,
            model = %self.config.model,
            max_tokens,
            "Sending chat completion request"
        );
        let raw = http::post_json(&self.client, &self.endpoint, &self.request(prompt, max_tokens))
            .await?;
        Self::parse_response(raw)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
