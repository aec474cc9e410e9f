//! Error types for distill operations.
//!
//! Every failure is local to one request/response cycle. Errors carry a
//! stable [`ErrorCode`] and, where useful, a user-facing suggestion. The
//! input-side variants (`InputMissing`, `Validation`, `EmptyExtraction`) are
//! warnings: they are raised before any remote call is made.

use distill_extractors::{ContentType, ExtractError};
use thiserror::Error;

/// Result type alias for distill operations.
pub type DistillResult<T> = Result<T, DistillError>;

/// Main error type for all distill operations.
#[derive(Error, Debug)]
pub enum DistillError {
    /// Required input (text, upload, job description) was not provided.
    #[error("Input missing: {message}")]
    InputMissing { message: String, code: ErrorCode },

    /// Input was provided but is out of range or malformed.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        suggestion: Option<String>,
    },

    /// Extraction succeeded but recovered no usable text.
    #[error("No text could be extracted from the {content_type} upload")]
    EmptyExtraction {
        content_type: ContentType,
        code: ErrorCode,
    },

    /// A format handler failed.
    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    /// Provider rejected the credentials.
    #[error("Authentication error: {message}")]
    Authentication {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Provider rate limit exceeded.
    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        message: String,
        code: ErrorCode,
        retry_after: Option<u64>,
    },

    /// Completion request failed or returned an unusable response.
    #[error("Completion error: {message}")]
    Completion {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Transport-level failure talking to the provider.
    #[error("Network error: {message}")]
    Network {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Provider not supported.
    #[error("Provider not supported: {provider}")]
    UnsupportedProvider { provider: String },

    /// Response did not follow the expected structure.
    #[error("Parse error: {message}")]
    Parse { message: String, code: ErrorCode },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Input (IN_xxx)
    InputMissingText,
    InputMissingUpload,
    InputMissingJobDescription,

    // Validation (VAL_xxx)
    ValInvalidInput,
    ValOutOfRange,
    ValPayloadTooLarge,

    // Extraction (EXT_xxx)
    ExtEmpty,
    ExtDecoding,
    ExtFormat,
    ExtEngineNotFound,

    // Authentication (AUTH_xxx)
    AuthInvalidKey,
    AuthMissingCredentials,

    // Rate Limit (RATE_xxx)
    RateLimitExceeded,

    // Completion (LLM_xxx)
    LlmGenerationFailed,
    LlmInvalidResponse,

    // Network (NET_xxx)
    NetTimeout,
    NetConnectionFailed,

    // Parse (PARSE_xxx)
    ParseMissingSection,
    ParseUnexpectedFormat,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InputMissingText => "IN_001",
            ErrorCode::InputMissingUpload => "IN_002",
            ErrorCode::InputMissingJobDescription => "IN_003",
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::ValOutOfRange => "VAL_002",
            ErrorCode::ValPayloadTooLarge => "VAL_003",
            ErrorCode::ExtEmpty => "EXT_001",
            ErrorCode::ExtDecoding => "EXT_002",
            ErrorCode::ExtFormat => "EXT_003",
            ErrorCode::ExtEngineNotFound => "EXT_004",
            ErrorCode::AuthInvalidKey => "AUTH_001",
            ErrorCode::AuthMissingCredentials => "AUTH_002",
            ErrorCode::RateLimitExceeded => "RATE_001",
            ErrorCode::LlmGenerationFailed => "LLM_002",
            ErrorCode::LlmInvalidResponse => "LLM_003",
            ErrorCode::NetTimeout => "NET_001",
            ErrorCode::NetConnectionFailed => "NET_002",
            ErrorCode::ParseMissingSection => "PARSE_001",
            ErrorCode::ParseUnexpectedFormat => "PARSE_002",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl DistillError {
    /// Create an input-missing warning.
    pub fn input_missing(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::InputMissing {
            message: message.into(),
            code,
        }
    }

    /// Create a validation error with code and suggestion.
    pub fn validation_with_suggestion(
        code: ErrorCode,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            code,
            suggestion: Some(suggestion.into()),
        }
    }

    /// Create an empty-extraction warning.
    pub fn empty_extraction(content_type: ContentType) -> Self {
        Self::EmptyExtraction {
            content_type,
            code: ErrorCode::ExtEmpty,
        }
    }

    /// Create a completion error.
    pub fn completion(message: impl Into<String>) -> Self {
        Self::Completion {
            message: message.into(),
            code: ErrorCode::LlmGenerationFailed,
            source: None,
        }
    }

    /// Create an invalid-response completion error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::Completion {
            message: message.into(),
            code: ErrorCode::LlmInvalidResponse,
            source: None,
        }
    }

    /// Create a network error from a transport failure.
    pub fn network(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: message.into(),
            code: ErrorCode::NetConnectionFailed,
            source: Some(Box::new(source)),
        }
    }

    /// Create a parse error for a response that is missing sections.
    pub fn missing_sections(markers: &[&str]) -> Self {
        Self::Parse {
            message: format!("Response is missing sections: {}", markers.join(", ")),
            code: ErrorCode::ParseMissingSection,
        }
    }

    /// Create a parse error for a response in an unexpected shape.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            code: ErrorCode::ParseUnexpectedFormat,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InputMissing { code, .. } => *code,
            Self::Validation { code, .. } => *code,
            Self::EmptyExtraction { code, .. } => *code,
            Self::Extraction(e) => match e {
                ExtractError::Decoding(_) => ErrorCode::ExtDecoding,
                ExtractError::EngineNotFound { .. } => ErrorCode::ExtEngineNotFound,
                _ => ErrorCode::ExtFormat,
            },
            Self::Authentication { code, .. } => *code,
            Self::RateLimit { code, .. } => *code,
            Self::Completion { code, .. } => *code,
            Self::Network { code, .. } => *code,
            Self::Parse { code, .. } => *code,
            _ => ErrorCode::Internal,
        }
    }

    /// Whether this is a non-fatal user warning raised before any remote call.
    pub fn is_user_warning(&self) -> bool {
        matches!(
            self,
            Self::InputMissing { .. } | Self::Validation { .. } | Self::EmptyExtraction { .. }
        )
    }

    /// Whether this must stop the interaction (e.g. OCR engine missing).
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Extraction(e) if e.is_fatal())
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::InputMissing { code, .. } => match code {
                ErrorCode::InputMissingJobDescription => {
                    Some("Please upload resume and job description")
                }
                ErrorCode::InputMissingUpload => Some("Please upload a file"),
                _ => Some("Please provide text or upload a file"),
            },
            Self::Validation { suggestion, .. } => suggestion.as_deref(),
            Self::EmptyExtraction { .. } => Some("Could not extract text from the file"),
            Self::Extraction(ExtractError::EngineNotFound { .. }) => {
                Some("Tesseract OCR not found. Please install Tesseract or fix the configured path")
            }
            Self::Authentication { .. } => Some("Please check your API key"),
            Self::RateLimit { .. } => Some("Please wait before making more requests"),
            Self::Completion { .. } | Self::Network { .. } => {
                Some("Please check your completion provider configuration")
            }
            _ => None,
        }
    }

    /// Attach the provider's requested backoff to a rate-limit error.
    /// Other errors are returned unchanged.
    pub fn with_retry_after(mut self, seconds: Option<u64>) -> Self {
        if let Self::RateLimit { retry_after, .. } = &mut self {
            *retry_after = seconds;
        }
        self
    }

    /// Seconds the provider asked to wait, for rate-limit errors.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Convert a non-success provider HTTP status into an error.
    pub fn from_http_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => Self::Authentication {
                message: body.to_string(),
                code: ErrorCode::AuthInvalidKey,
                source: None,
            },
            408 | 504 => Self::Network {
                message: body.to_string(),
                code: ErrorCode::NetTimeout,
                source: None,
            },
            429 => Self::RateLimit {
                message: body.to_string(),
                code: ErrorCode::RateLimitExceeded,
                retry_after: None,
            },
            _ => Self::Completion {
                message: format!("HTTP {}: {}", status, body),
                code: ErrorCode::LlmGenerationFailed,
                source: None,
            },
        }
    }
}
