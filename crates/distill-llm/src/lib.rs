//! distill-llm - Completion Service providers for distill.
//!
//! # Supported Providers
//!
//! - **Groq** (default) - OpenAI-compatible chat completions, `llama-3.1-8b-instant`
//! - **OpenAI** - chat completions
//! - **Anthropic** - messages API
//!
//! Every call is a single request: no retries, no streaming. API keys come
//! from the configuration value, never from the process environment.
//!
//! # Example
//!
//! ```ignore
//! use distill_llm::CompletionFactory;
//!
//! let service = CompletionFactory::create(config.completion.clone())?;
//! let completion = service.complete("Summarize ...", 150).await?;
//! ```

mod anthropic;
mod factory;
mod http;
mod openai;

pub use anthropic::AnthropicCompletion;
pub use factory::CompletionFactory;
pub use openai::OpenAICompatible;

// Re-export core types for convenience
pub use distill_core::config::{CompletionProvider, CompletionProviderConfig};
pub use distill_core::traits::{Completion, CompletionConfig, CompletionService, TokenUsage};
