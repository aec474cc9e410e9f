//! Extraction pipeline: route a payload to the extractor for its declared type.

use std::sync::Arc;

use tracing::debug;

use crate::config::ExtractorConfig;
use crate::error::ExtractResult;
use crate::types::{ContentType, ExtractedText, ExtractionRequest};
use crate::Extractor;

/// Pipeline for extracting content using registered extractors.
///
/// Routing is by declared content type. A type with no registered extractor
/// (unknown, compiled out, or disabled) yields empty text, not an error:
/// callers treat empty extraction as "nothing to analyze".
pub struct ExtractionPipeline {
    extractors: Vec<Arc<dyn Extractor>>,
}

impl ExtractionPipeline {
    /// Create new empty pipeline.
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Create pipeline with every extractor the configuration enables.
    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self {
            extractors: crate::ExtractorFactory::all(config),
        }
    }

    /// Add an extractor to the pipeline.
    pub fn add_extractor(mut self, extractor: Arc<dyn Extractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    /// Extract text from a payload of the declared content type.
    pub fn extract(
        &self,
        content_type: &ContentType,
        content: &[u8],
    ) -> ExtractResult<ExtractedText> {
        match self.extractors.iter().find(|e| e.handles(content_type)) {
            Some(extractor) => {
                debug!(
                    extractor = extractor.name(),
                    content_type = %content_type,
                    bytes = content.len(),
                    "Extracting"
                );
                extractor.extract(content)
            }
            None => {
                debug!(content_type = %content_type, "No extractor for content type");
                Ok(ExtractedText::empty(content_type.clone()))
            }
        }
    }

    /// Extract text from a buffered request.
    pub fn extract_request(&self, request: &ExtractionRequest) -> ExtractResult<ExtractedText> {
        self.extract(&request.content_type, &request.payload)
    }

    /// Check if pipeline has an extractor for the content type.
    pub fn supports(&self, content_type: &ContentType) -> bool {
        self.extractors.iter().any(|e| e.handles(content_type))
    }

    /// List all supported content types.
    pub fn supported_types(&self) -> Vec<ContentType> {
        self.extractors.iter().map(|e| e.content_type()).collect()
    }

    /// Get the number of registered extractors.
    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    /// Check if the pipeline has no registered extractors.
    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

impl Default for ExtractionPipeline {
    fn default() -> Self {
        Self::from_config(&ExtractorConfig::default())
    }
}
