//! Factory for creating completion providers.

use std::sync::Arc;

use distill_core::config::{CompletionProvider, CompletionProviderConfig};
use distill_core::error::DistillResult;
use distill_core::traits::CompletionService;

use crate::anthropic::AnthropicCompletion;
use crate::openai::OpenAICompatible;

/// Factory for creating completion providers.
pub struct CompletionFactory;

impl CompletionFactory {
    /// Create a provider from the given configuration.
    pub fn create(config: CompletionProviderConfig) -> DistillResult<Arc<dyn CompletionService>> {
        tracing::info!(
            provider = %config.provider,
            model = %config.config.model,
            base_url = config.base_url(),
            "Creating completion provider"
        );
        match config.provider {
            CompletionProvider::Groq | CompletionProvider::OpenAI => {
                Ok(Arc::new(OpenAICompatible::new(config)?))
            }
            CompletionProvider::Anthropic => Ok(Arc::new(AnthropicCompletion::new(config)?)),
        }
    }
}
