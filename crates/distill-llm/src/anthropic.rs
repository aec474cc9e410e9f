//! Anthropic (Claude) messages provider.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::debug;

use distill_core::config::CompletionProviderConfig;
use distill_core::error::{DistillError, DistillResult, ErrorCode};
use distill_core::traits::{Completion, CompletionConfig, CompletionService, TokenUsage};

use crate::http;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic messages API provider.
pub struct AnthropicCompletion {
    client: Client,
    config: CompletionConfig,
    endpoint: String,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    messages: [AnthropicMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
    #[serde(default)]
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

impl AnthropicCompletion {
    /// Create a provider. The API key must be present in the config.
    pub fn new(provider_config: CompletionProviderConfig) -> DistillResult<Self> {
        let base_url = http::normalize_base_url(provider_config.base_url())?;
        let config = provider_config.config;

        let api_key = config.api_key.as_ref().ok_or_else(|| DistillError::Authentication {
            message: "Anthropic API key not found. Set ANTHROPIC_API_KEY or provide api_key in config."
                .to_string(),
            code: ErrorCode::AuthMissingCredentials,
            source: None,
        })?;

        let client = http::build_client(&[
            ("x-api-key", api_key.expose_secret().to_string(), true),
            ("anthropic-version", ANTHROPIC_VERSION.to_string(), false),
        ])?;

        Ok(Self {
            client,
            endpoint: format!("{}/messages", base_url),
            config,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request<'a>(&'a self, prompt: &'a str, max_tokens: u32) -> AnthropicRequest<'a> {
        AnthropicRequest {
            model: &self.config.model,
            max_tokens,
            temperature: self.config.temperature,
            messages: [AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        }
    }

    fn parse_response(raw: serde_json::Value) -> DistillResult<Completion> {
        let response: AnthropicResponse = serde_json::from_value(raw.clone())
            .map_err(|e| DistillError::invalid_response(format!("Failed to parse response: {}", e)))?;

        let text: String = response
            .content
            .iter()
            .filter(|c| c.content_type == "text")
            .filter_map(|c| c.text.as_deref())
            .collect();
        if text.is_empty() && response.content.iter().all(|c| c.content_type != "text") {
            return Err(DistillError::invalid_response(
                "Response contained no text content",
            ));
        }

        let mut completion = Completion::text(text).with_raw(raw);
        if let Some(u) = response.usage {
            completion = completion.with_usage(TokenUsage {
                prompt_tokens: u.input_tokens,
                completion_tokens: u.output_tokens,
                total_tokens: u.input_tokens + u.output_tokens,
            });
        }
        Ok(completion)
    }
}

#[async_trait]
impl CompletionService for AnthropicCompletion {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> DistillResult<Completion> {
        debug!(model = %self.config.model, max_tokens, "Sending Anthropic messages request");
        let raw = http::post_json(&self.client, &self.endpoint, &self.request(prompt, max_tokens))
            .await?;
        Self::parse_response(raw)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
