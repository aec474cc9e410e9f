//! Completion Service trait and related types.

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::DistillResult;

/// Token usage statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt.
    pub prompt_tokens: u32,
    /// Tokens in the completion.
    pub completion_tokens: u32,
    /// Total tokens.
    pub total_tokens: u32,
}

/// Response from a completion call.
#[derive(Debug, Clone, Default)]
pub struct Completion {
    /// Generated text, exactly as returned by the provider.
    pub text: String,
    /// Token usage statistics.
    pub usage: Option<TokenUsage>,
    /// Full provider response payload.
    pub raw: Option<serde_json::Value>,
}

impl Completion {
    /// Create a completion with text only.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Attach token usage.
    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Attach the raw provider payload.
    pub fn with_raw(mut self, raw: serde_json::Value) -> Self {
        self.raw = Some(raw);
        self
    }
}

/// Hosted LLM inference endpoint: prompt and token budget in, text out.
///
/// Implementations must not retry; every call is a single request.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Send one prompt with the given max-token budget.
    async fn complete(&self, prompt: &str, max_tokens: u32) -> DistillResult<Completion>;

    /// Get the model name.
    fn model_name(&self) -> &str;
}

/// Completion provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Model name/identifier.
    pub model: String,
    /// Sampling temperature. Provider default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// API key. Never serialized.
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,
    /// Base URL for API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: "llama-3.1-8b-instant".to_string(),
            temperature: None,
            api_key: None,
            base_url: None,
        }
    }
}

impl CompletionConfig {
    /// Create a config for the given model.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(api_key.into()));
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}
