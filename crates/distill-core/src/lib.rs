//! distill-core - Core library for distill.
//!
//! This crate provides the configuration, error taxonomy, task catalogue,
//! response presentation and the [`Analyzer`] workflow that ties the
//! extraction pipeline to a [`CompletionService`].
//!
//! # Example
//!
//! ```ignore
//! use distill_core::{AnalysisRequest, Analyzer, DistillConfig, Task};
//!
//! let config = DistillConfig::from_env()?;
//! let analyzer = Analyzer::new(&config, completion);
//!
//! let analysis = analyzer
//!     .analyze(AnalysisRequest::new(Task::Sentiment).with_text("I love this"))
//!     .await?;
//! println!("{}", analysis.output);
//! ```

pub mod analyzer;
pub mod config;
pub mod error;
pub mod presentation;
pub mod tasks;
pub mod traits;

// Re-export commonly used types
pub use analyzer::{Analysis, AnalysisRequest, Analyzer};
pub use config::{
    CompletionProvider, CompletionProviderConfig, DistillConfig, DistillConfigBuilder, TaskBudgets,
};
pub use error::{DistillError, DistillResult, ErrorCode};
pub use presentation::{render, MarkerPolicy, Rendered, Section, SectionParser, Sentiment};
pub use tasks::{Marker, Rendering, Task};
pub use traits::{Completion, CompletionConfig, CompletionService, TokenUsage};

pub use distill_extractors::{ContentType, ExtractionRequest};
