//! distill-extractors - Document-to-plain-text extraction.
//!
//! Normalizes heterogeneous uploads (plain text, PDF, DOCX, images via OCR,
//! CSV) into a single text stream ready to be embedded in a prompt. Dispatch
//! is by the *declared* content type, never by sniffing the payload.
//!
//! # Features
//!
//! - `pdf` (default) - per-page text layer extraction via lopdf
//! - `docx` (default) - paragraph extraction via docx-rs
//! - `ocr` (default) - image OCR through a Tesseract binary at a configured path
//! - `csv` (default) - flattened cell extraction via csv
//!
//! A format whose feature is compiled out, or which is disabled in
//! [`ExtractorConfig`], behaves like an unrecognized type: it yields an empty
//! string rather than an error.
//!
//! # Example
//!
//! ```ignore
//! use distill_extractors::{ContentType, ExtractionPipeline, ExtractorConfig};
//!
//! let pipeline = ExtractionPipeline::from_config(&ExtractorConfig::default());
//! let extracted = pipeline.extract(&ContentType::from_mime("application/pdf"), &pdf_bytes)?;
//! println!("{}", extracted.text);
//! ```

mod config;
mod error;
mod factory;
mod pipeline;
mod text;
mod types;

#[cfg(feature = "pdf")]
mod pdf;

#[cfg(feature = "docx")]
mod docx;

#[cfg(feature = "ocr")]
mod image;

#[cfg(feature = "csv")]
mod tabular;

pub use config::{ExtractorConfig, FormatToggles, OcrConfig};
pub use error::{ExtractError, ExtractResult};
pub use factory::ExtractorFactory;
pub use pipeline::ExtractionPipeline;
pub use text::PlainTextExtractor;
pub use types::{ContentType, ExtractedText, ExtractionRequest, DOCX_MIME};

#[cfg(feature = "pdf")]
pub use pdf::PdfExtractor;

#[cfg(feature = "docx")]
pub use docx::DocxExtractor;

#[cfg(feature = "ocr")]
pub use image::OcrExtractor;

#[cfg(feature = "csv")]
pub use tabular::CsvExtractor;

/// Core Extractor trait - one implementation per supported format.
///
/// Extraction is synchronous and CPU/process bound; async callers should run
/// it on a blocking thread.
pub trait Extractor: Send + Sync {
    /// Extract text from the raw payload.
    fn extract(&self, content: &[u8]) -> ExtractResult<ExtractedText>;

    /// The declared content type this extractor handles.
    fn content_type(&self) -> ContentType;

    /// Check if this extractor handles the given content type.
    fn handles(&self, content_type: &ContentType) -> bool {
        self.content_type() == *content_type
    }

    /// Human-readable name for this extractor.
    fn name(&self) -> &str;
}
