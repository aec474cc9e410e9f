//! Core types for content extraction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// MIME type browsers send for `.docx` uploads.
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Declared content type of an uploaded artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// UTF-8 text.
    PlainText,
    /// PDF document.
    Pdf,
    /// Word-processor (DOCX) document.
    WordDocument,
    /// Raster image, recognized with OCR.
    Image,
    /// Delimited tabular data.
    Csv,
    /// Anything else; carries the original label.
    Unknown(String),
}

impl Default for ContentType {
    fn default() -> Self {
        ContentType::PlainText
    }
}

impl ContentType {
    /// Map a declared MIME label onto a content type.
    ///
    /// Matching ignores case and parameters (`text/plain; charset=utf-8`).
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "text/plain" => ContentType::PlainText,
            "application/pdf" => ContentType::Pdf,
            DOCX_MIME | "application/docx" => ContentType::WordDocument,
            "text/csv" | "application/csv" => ContentType::Csv,
            s if s.starts_with("image/") => ContentType::Image,
            _ => ContentType::Unknown(mime.trim().to_string()),
        }
    }

    /// Map a file name's extension onto a content type.
    ///
    /// Only used when an upload arrives without a declared type.
    pub fn from_file_name(name: &str) -> Self {
        let ext = std::path::Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("txt") => ContentType::PlainText,
            Some("pdf") => ContentType::Pdf,
            Some("docx") => ContentType::WordDocument,
            Some("csv") => ContentType::Csv,
            Some("png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp" | "tif" | "tiff") => {
                ContentType::Image
            }
            _ => ContentType::Unknown(name.to_string()),
        }
    }

    /// Canonical MIME label.
    pub fn as_mime(&self) -> &str {
        match self {
            ContentType::PlainText => "text/plain",
            ContentType::Pdf => "application/pdf",
            ContentType::WordDocument => DOCX_MIME,
            ContentType::Image => "image/*",
            ContentType::Csv => "text/csv",
            ContentType::Unknown(label) => label,
        }
    }

    /// Whether this is one of the five supported formats.
    pub fn is_known(&self) -> bool {
        !matches!(self, ContentType::Unknown(_))
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_mime())
    }
}

/// A single uploaded artifact, buffered once at the boundary.
///
/// Extraction only borrows the payload, so the same request can be
/// extracted repeatedly with identical results.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Declared content type.
    pub content_type: ContentType,
    /// Raw payload.
    pub payload: Vec<u8>,
}

impl ExtractionRequest {
    /// Create a request from an already classified content type.
    pub fn new(content_type: ContentType, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type,
            payload: payload.into(),
        }
    }

    /// Create a request from a declared MIME label.
    pub fn from_mime(mime: &str, payload: impl Into<Vec<u8>>) -> Self {
        Self::new(ContentType::from_mime(mime), payload)
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Text extracted from an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedText {
    /// Newline-separated logical blocks in source order.
    pub text: String,

    /// Content type the text was extracted from.
    pub content_type: ContentType,

    /// Number of source blocks (pages, paragraphs, rows) that contributed.
    pub blocks: usize,
}

impl ExtractedText {
    /// Create extracted text.
    pub fn new(text: String, content_type: ContentType, blocks: usize) -> Self {
        Self {
            text,
            content_type,
            blocks,
        }
    }

    /// Nothing recoverable for this content type.
    pub fn empty(content_type: ContentType) -> Self {
        Self::new(String::new(), content_type, 0)
    }

    /// Check if extraction produced no usable text.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Get content length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Consume into the bare text.
    pub fn into_string(self) -> String {
        self.text
    }
}
