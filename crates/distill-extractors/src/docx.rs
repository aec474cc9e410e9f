//! DOCX paragraph extraction using docx-rs.

use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use tracing::debug;

use crate::error::{ExtractError, ExtractResult};
use crate::types::{ContentType, ExtractedText};
use crate::Extractor;

/// DOCX content extractor.
///
/// Emits the body paragraphs in document order, one per line. Tables,
/// headers and footers are not walked. Empty paragraphs are kept as empty
/// lines, exactly as the document reports them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract text from a paragraph.
    fn paragraph_text(p: &docx_rs::Paragraph) -> String {
        let mut text = String::new();

        for child in &p.children {
            match child {
                ParagraphChild::Run(r) => Self::push_run(&mut text, r),
                ParagraphChild::Hyperlink(h) => {
                    // Hyperlink children are ParagraphChild, so only runs matter
                    for child in &h.children {
                        if let ParagraphChild::Run(r) = child {
                            Self::push_run(&mut text, r);
                        }
                    }
                }
                _ => {}
            }
        }

        text
    }

    fn push_run(text: &mut String, run: &docx_rs::Run) {
        for run_child in &run.children {
            match run_child {
                RunChild::Text(t) => text.push_str(&t.text),
                RunChild::Tab(_) => text.push('\t'),
                RunChild::Break(_) => text.push('\n'),
                _ => {}
            }
        }
    }
}

impl Extractor for DocxExtractor {
    fn extract(&self, content: &[u8]) -> ExtractResult<ExtractedText> {
        let docx = docx_rs::read_docx(content)
            .map_err(|e| ExtractError::Docx(format!("Failed to parse DOCX: {}", e)))?;

        let paragraphs: Vec<String> = docx
            .document
            .children
            .iter()
            .filter_map(|child| match child {
                DocumentChild::Paragraph(p) => Some(Self::paragraph_text(p)),
                _ => None,
            })
            .collect();

        debug!(paragraphs = paragraphs.len(), "Extracted DOCX paragraphs");

        let blocks = paragraphs.len();
        Ok(ExtractedText::new(
            paragraphs.join("\n"),
            ContentType::WordDocument,
            blocks,
        ))
    }

    fn content_type(&self) -> ContentType {
        ContentType::WordDocument
    }

    fn name(&self) -> &str {
        "docx-rs"
    }
}
