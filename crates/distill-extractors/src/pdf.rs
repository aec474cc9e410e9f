//! PDF text-layer extraction using lopdf.

use lopdf::Document;
use tracing::{debug, warn};

use crate::error::{ExtractError, ExtractResult};
use crate::types::{ContentType, ExtractedText};
use crate::Extractor;

/// PDF content extractor.
///
/// Walks pages in order and reads each page's embedded text layer. Pages
/// with no text (image-only scans, blank pages, or pages whose content
/// stream cannot be decoded) contribute nothing; no placeholder is inserted.
/// There is no OCR fallback for image-only pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Text of every page in page order; `None` for pages without text.
    /// Whitespace-only text still counts as text.
    fn page_texts(doc: &Document) -> Vec<Option<String>> {
        doc.get_pages()
            .into_keys()
            .map(|page_num| match doc.extract_text(&[page_num]) {
                Ok(text) => {
                    let text = text.trim_end_matches(['\r', '\n']);
                    if text.is_empty() {
                        None
                    } else {
                        Some(text.to_string())
                    }
                }
                Err(e) => {
                    warn!(page = page_num, error = %e, "No text layer recovered from page");
                    None
                }
            })
            .collect()
    }
}

impl Extractor for PdfExtractor {
    fn extract(&self, content: &[u8]) -> ExtractResult<ExtractedText> {
        let doc = Document::load_mem(content)
            .map_err(|e| ExtractError::Pdf(format!("Failed to open PDF: {}", e)))?;

        let pages = Self::page_texts(&doc);
        let page_count = pages.len();
        let contributions: Vec<String> = pages.into_iter().flatten().collect();

        debug!(
            page_count,
            pages_with_text = contributions.len(),
            "Extracted PDF text layer"
        );

        let blocks = contributions.len();
        Ok(ExtractedText::new(
            contributions.join("\n"),
            ContentType::Pdf,
            blocks,
        ))
    }

    fn content_type(&self) -> ContentType {
        ContentType::Pdf
    }

    fn name(&self) -> &str {
        "lopdf"
    }
}
