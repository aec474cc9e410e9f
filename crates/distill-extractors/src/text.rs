//! Plain-text extraction.

use crate::error::ExtractResult;
use crate::types::{ContentType, ExtractedText};
use crate::Extractor;

/// Decodes the payload as UTF-8, verbatim.
///
/// Invalid UTF-8 is an error; bytes are never lossily substituted.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for PlainTextExtractor {
    fn extract(&self, content: &[u8]) -> ExtractResult<ExtractedText> {
        let text = String::from_utf8(content.to_vec())?;
        let blocks = text.lines().count();
        Ok(ExtractedText::new(text, ContentType::PlainText, blocks))
    }

    fn content_type(&self) -> ContentType {
        ContentType::PlainText
    }

    fn name(&self) -> &str {
        "utf8"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExtractError;

    #[test]
    fn test_hello_world_verbatim() {
        let extracted = PlainTextExtractor::new().extract(b"Hello world").unwrap();
        assert_eq!(extracted.text, "Hello world");
        assert_eq!(extracted.content_type, ContentType::PlainText);
    }

    #[test]
    fn test_whitespace_and_newlines_preserved() {
        let input = "  line one\r\nline two\n\n";
        let extracted = PlainTextExtractor::new().extract(input.as_bytes()).unwrap();
        assert_eq!(extracted.text, input);
    }

    #[test]
    fn test_multibyte_utf8() {
        let input = "naïve café → 日本語";
        let extracted = PlainTextExtractor::new().extract(input.as_bytes()).unwrap();
        assert_eq!(extracted.text, input);
    }

    #[test]
    fn test_invalid_utf8_is_decoding_error() {
        let result = PlainTextExtractor::new().extract(&[0x48, 0x69, 0xFF, 0xFE]);
        assert!(matches!(result, Err(ExtractError::Decoding(_))));
    }

    #[test]
    fn test_empty_payload_is_empty_text() {
        let extracted = PlainTextExtractor::new().extract(&[]).unwrap();
        assert_eq!(extracted.text, "");
        assert_eq!(extracted.blocks, 0);
    }
}
