//! Factory for creating extractors.

use std::sync::Arc;

use crate::config::{ExtractorConfig, OcrConfig};
use crate::text::PlainTextExtractor;
use crate::types::ContentType;
use crate::Extractor;

#[cfg(feature = "pdf")]
use crate::PdfExtractor;

#[cfg(feature = "docx")]
use crate::DocxExtractor;

#[cfg(feature = "ocr")]
use crate::OcrExtractor;

#[cfg(feature = "csv")]
use crate::CsvExtractor;

/// Factory for creating content extractors.
pub struct ExtractorFactory;

impl ExtractorFactory {
    /// Create a plain-text extractor.
    pub fn text() -> Arc<dyn Extractor> {
        Arc::new(PlainTextExtractor::new())
    }

    /// Create a PDF extractor.
    #[cfg(feature = "pdf")]
    pub fn pdf() -> Arc<dyn Extractor> {
        Arc::new(PdfExtractor::new())
    }

    /// Create a DOCX extractor.
    #[cfg(feature = "docx")]
    pub fn docx() -> Arc<dyn Extractor> {
        Arc::new(DocxExtractor::new())
    }

    /// Create an OCR extractor with the given engine settings.
    #[cfg(feature = "ocr")]
    pub fn ocr(config: OcrConfig) -> Arc<dyn Extractor> {
        Arc::new(OcrExtractor::with_config(config))
    }

    /// Create a comma-delimited CSV extractor.
    #[cfg(feature = "csv")]
    pub fn csv() -> Arc<dyn Extractor> {
        Arc::new(CsvExtractor::new())
    }

    /// Create the extractor for a content type, if that format is compiled
    /// in and enabled.
    pub fn for_content_type(
        content_type: &ContentType,
        config: &ExtractorConfig,
    ) -> Option<Arc<dyn Extractor>> {
        match content_type {
            ContentType::PlainText => Some(Self::text()),

            #[cfg(feature = "pdf")]
            ContentType::Pdf if config.formats.pdf => Some(Self::pdf()),

            #[cfg(feature = "docx")]
            ContentType::WordDocument if config.formats.docx => Some(Self::docx()),

            #[cfg(feature = "ocr")]
            ContentType::Image if config.formats.image => Some(Self::ocr(config.ocr.clone())),

            #[cfg(feature = "csv")]
            ContentType::Csv if config.formats.csv => Some(Self::csv()),

            _ => None,
        }
    }

    /// Get every extractor enabled by the configuration.
    pub fn all(config: &ExtractorConfig) -> Vec<Arc<dyn Extractor>> {
        [
            ContentType::PlainText,
            ContentType::Pdf,
            ContentType::WordDocument,
            ContentType::Image,
            ContentType::Csv,
        ]
        .iter()
        .filter_map(|ct| Self::for_content_type(ct, config))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormatToggles;

    #[test]
    fn test_factory_text_always_available() {
        let config = ExtractorConfig {
            formats: FormatToggles::text_only(),
            ..Default::default()
        };
        let extractors = ExtractorFactory::all(&config);
        assert_eq!(extractors.len(), 1);
        assert!(extractors[0].handles(&ContentType::PlainText));
    }

    #[cfg(all(feature = "pdf", feature = "docx", feature = "ocr", feature = "csv"))]
    #[test]
    fn test_factory_all_extractors() {
        let extractors = ExtractorFactory::all(&ExtractorConfig::default());
        assert_eq!(extractors.len(), 5);
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_factory_respects_disabled_format() {
        let mut config = ExtractorConfig::default();
        assert!(ExtractorFactory::for_content_type(&ContentType::Pdf, &config).is_some());

        config.formats.pdf = false;
        assert!(ExtractorFactory::for_content_type(&ContentType::Pdf, &config).is_none());
    }

    #[test]
    fn test_factory_unknown_type() {
        let ct = ContentType::Unknown("video/mp4".to_string());
        assert!(ExtractorFactory::for_content_type(&ct, &ExtractorConfig::default()).is_none());
    }

    #[cfg(feature = "ocr")]
    #[test]
    fn test_factory_ocr_uses_configured_engine() {
        let extractor = ExtractorFactory::ocr(OcrConfig::with_engine_path("/opt/ocr/tesseract"));
        assert_eq!(extractor.name(), "tesseract");
        assert!(extractor.handles(&ContentType::Image));
    }
}
