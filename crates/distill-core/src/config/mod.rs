//! Configuration system for distill.
//!
//! Configuration is an explicit value. It is loaded once (file, environment
//! or builder) and handed to the extraction pipeline and the completion
//! provider at construction time.

use distill_extractors::ExtractorConfig;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{DistillError, DistillResult};
use crate::presentation::MarkerPolicy;
use crate::tasks::Task;
use crate::traits::CompletionConfig;

/// Default upload size cap (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Completion provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompletionProvider {
    #[default]
    Groq,
    OpenAI,
    Anthropic,
}

impl CompletionProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionProvider::Groq => "groq",
            CompletionProvider::OpenAI => "openai",
            CompletionProvider::Anthropic => "anthropic",
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            CompletionProvider::Groq => "GROQ_API_KEY",
            CompletionProvider::OpenAI => "OPENAI_API_KEY",
            CompletionProvider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            CompletionProvider::Groq => "https://api.groq.com/openai/v1",
            CompletionProvider::OpenAI => "https://api.openai.com/v1",
            CompletionProvider::Anthropic => "https://api.anthropic.com/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            CompletionProvider::Groq => "llama-3.1-8b-instant",
            CompletionProvider::OpenAI => "gpt-4o-mini",
            CompletionProvider::Anthropic => "claude-3-5-haiku-latest",
        }
    }
}

impl fmt::Display for CompletionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompletionProvider {
    type Err = DistillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "groq" => Ok(CompletionProvider::Groq),
            "openai" => Ok(CompletionProvider::OpenAI),
            "anthropic" => Ok(CompletionProvider::Anthropic),
            other => Err(DistillError::UnsupportedProvider {
                provider: other.to_string(),
            }),
        }
    }
}

/// Provider configuration with type.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CompletionProviderConfig {
    /// Provider type.
    #[serde(default)]
    pub provider: CompletionProvider,
    /// Provider-specific configuration.
    #[serde(flatten)]
    pub config: CompletionConfig,
}

impl CompletionProviderConfig {
    /// Provider defaults for model and endpoint.
    pub fn for_provider(provider: CompletionProvider) -> Self {
        Self {
            provider,
            config: CompletionConfig::new(provider.default_model()),
        }
    }

    /// Configured base URL, or the provider default.
    pub fn base_url(&self) -> &str {
        self.config
            .base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }
}

/// Max-token budget per task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskBudgets {
    pub summarize: u32,
    pub one_sentence: u32,
    pub sentiment: u32,
    pub ats: u32,
    pub exam: u32,
}

impl Default for TaskBudgets {
    fn default() -> Self {
        Self {
            summarize: Task::Summarize.default_max_tokens(),
            one_sentence: Task::OneSentence.default_max_tokens(),
            sentiment: Task::Sentiment.default_max_tokens(),
            ats: Task::Ats.default_max_tokens(),
            exam: Task::Exam.default_max_tokens(),
        }
    }
}

impl TaskBudgets {
    pub fn for_task(&self, task: Task) -> u32 {
        match task {
            Task::Summarize => self.summarize,
            Task::OneSentence => self.one_sentence,
            Task::Sentiment => self.sentiment,
            Task::Ats => self.ats,
            Task::Exam => self.exam,
        }
    }

    pub fn set(&mut self, task: Task, max_tokens: u32) {
        match task {
            Task::Summarize => self.summarize = max_tokens,
            Task::OneSentence => self.one_sentence = max_tokens,
            Task::Sentiment => self.sentiment = max_tokens,
            Task::Ats => self.ats = max_tokens,
            Task::Exam => self.exam = max_tokens,
        }
    }
}

/// Main distill configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DistillConfig {
    /// Completion provider configuration.
    pub completion: CompletionProviderConfig,
    /// Extraction configuration (format toggles, OCR engine).
    pub extraction: ExtractorConfig,
    /// Max-token budget per task.
    pub budgets: TaskBudgets,
    /// Handling of missing section markers.
    pub marker_policy: MarkerPolicy,
    /// Largest accepted upload, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for DistillConfig {
    fn default() -> Self {
        Self {
            completion: CompletionProviderConfig::default(),
            extraction: ExtractorConfig::default(),
            budgets: TaskBudgets::default(),
            marker_policy: MarkerPolicy::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl DistillConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> DistillResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        let config: Self = match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| DistillError::Configuration(e.to_string()))?
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| DistillError::Configuration(e.to_string()))?,
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| DistillError::Configuration(e.to_string()))?,
            _ => {
                return Err(DistillError::Configuration(
                    "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
                ))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file and take the API key from the environment
    /// when the file does not carry one.
    pub fn from_file_with_env(path: impl AsRef<std::path::Path>) -> DistillResult<Self> {
        let mut config = Self::from_file(path)?;
        if config.completion.config.api_key.is_none() {
            config.completion.config.api_key =
                api_key_from(&|key: &str| std::env::var(key).ok(), config.completion.provider);
        }
        Ok(config)
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> DistillResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DistillResult<Self> {
        let mut config = Self::default();

        // Completion provider
        if let Some(provider) = lookup("DISTILL_PROVIDER") {
            config.completion = CompletionProviderConfig::for_provider(provider.parse()?);
        }
        if let Some(model) = lookup("DISTILL_MODEL") {
            config.completion.config.model = model;
        }
        if let Some(base_url) = lookup("DISTILL_BASE_URL") {
            config.completion.config.base_url = Some(base_url);
        }
        config.completion.config.api_key = api_key_from(&lookup, config.completion.provider);
        if let Some(temperature) = lookup("DISTILL_TEMPERATURE") {
            config.completion.config.temperature =
                Some(parse_var("DISTILL_TEMPERATURE", &temperature)?);
        }

        // Extraction
        if let Some(path) = lookup("DISTILL_TESSERACT_PATH") {
            config.extraction.ocr.engine_path = PathBuf::from(path);
        }
        if let Some(language) = lookup("DISTILL_OCR_LANGUAGE") {
            config.extraction.ocr.language = language;
        }
        if let Some(disabled) = lookup("DISTILL_DISABLE_FORMATS") {
            for format in disabled.split(',').map(str::trim).filter(|f| !f.is_empty()) {
                match format.to_lowercase().as_str() {
                    "pdf" => config.extraction.formats.pdf = false,
                    "docx" => config.extraction.formats.docx = false,
                    "image" | "ocr" => config.extraction.formats.image = false,
                    "csv" => config.extraction.formats.csv = false,
                    other => {
                        return Err(DistillError::Configuration(format!(
                            "Unknown format in DISTILL_DISABLE_FORMATS: {}",
                            other
                        )))
                    }
                }
            }
        }

        // Presentation and limits
        if let Some(policy) = lookup("DISTILL_MARKER_POLICY") {
            config.marker_policy = policy.parse()?;
        }
        if let Some(bytes) = lookup("DISTILL_MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = parse_var("DISTILL_MAX_UPLOAD_BYTES", &bytes)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> DistillConfigBuilder {
        DistillConfigBuilder::default()
    }

    /// Check value ranges.
    pub fn validate(&self) -> DistillResult<()> {
        if self.max_upload_bytes == 0 {
            return Err(DistillError::Configuration(
                "max_upload_bytes must be greater than zero".to_string(),
            ));
        }
        if let Some(task) = Task::all().iter().find(|t| self.budgets.for_task(**t) == 0) {
            return Err(DistillError::Configuration(format!(
                "Token budget for {} must be greater than zero",
                task
            )));
        }
        if let Some(temperature) = self.completion.config.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(DistillError::Configuration(format!(
                    "temperature must be between 0.0 and 2.0, got {}",
                    temperature
                )));
            }
        }
        Ok(())
    }
}

/// `DISTILL_API_KEY`, else the provider's own key variable.
fn api_key_from(
    lookup: &impl Fn(&str) -> Option<String>,
    provider: CompletionProvider,
) -> Option<SecretString> {
    lookup("DISTILL_API_KEY")
        .or_else(|| lookup(provider.api_key_env()))
        .map(SecretString::new)
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> DistillResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| DistillError::Configuration(format!("Invalid value for {}: {}", name, value)))
}

/// Builder for DistillConfig.
#[derive(Default)]
pub struct DistillConfigBuilder {
    config: DistillConfig,
}

impl DistillConfigBuilder {
    /// Set completion provider configuration.
    pub fn completion(mut self, config: CompletionProviderConfig) -> Self {
        self.config.completion = config;
        self
    }

    /// Set extraction configuration.
    pub fn extraction(mut self, config: ExtractorConfig) -> Self {
        self.config.extraction = config;
        self
    }

    /// Override the token budget for one task.
    pub fn budget(mut self, task: Task, max_tokens: u32) -> Self {
        self.config.budgets.set(task, max_tokens);
        self
    }

    /// Set marker policy.
    pub fn marker_policy(mut self, policy: MarkerPolicy) -> Self {
        self.config.marker_policy = policy;
        self
    }

    /// Set upload size cap.
    pub fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.config.max_upload_bytes = bytes;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> DistillResult<DistillConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
