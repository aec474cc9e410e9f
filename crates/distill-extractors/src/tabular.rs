//! CSV extraction: flatten every cell into one space-joined string.

use tracing::debug;

use crate::error::{ExtractError, ExtractResult};
use crate::types::{ContentType, ExtractedText};
use crate::Extractor;

/// CSV content extractor.
///
/// Parses the payload as a grid (the first row is data, not a header),
/// stringifies every cell and joins them in row-major order with a single
/// space. Row and column boundaries are intentionally discarded.
#[derive(Debug, Clone, Copy)]
pub struct CsvExtractor {
    delimiter: u8,
}

impl Default for CsvExtractor {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different field delimiter (e.g. `b';'` or `b'\t'`).
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl Extractor for CsvExtractor {
    fn extract(&self, content: &[u8]) -> ExtractResult<ExtractedText> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(content);

        let mut cells: Vec<String> = Vec::new();
        let mut rows = 0usize;
        for record in reader.records() {
            let record = record.map_err(|e| ExtractError::Csv(e.to_string()))?;
            cells.extend(record.iter().map(str::to_string));
            rows += 1;
        }

        debug!(rows, cells = cells.len(), "Flattened CSV");

        Ok(ExtractedText::new(cells.join(" "), ContentType::Csv, rows))
    }

    fn content_type(&self) -> ContentType {
        ContentType::Csv
    }

    fn name(&self) -> &str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_space_join() {
        let data = b"name,score\nalice,90\nbob,75\n";
        let extracted = CsvExtractor::new().extract(data).unwrap();
        assert_eq!(extracted.text, "name score alice 90 bob 75");
        assert_eq!(extracted.blocks, 3);
    }

    #[test]
    fn test_quoted_cells_unquoted() {
        let data = b"\"Doe, Jane\",\"said \"\"hi\"\"\"\n";
        let extracted = CsvExtractor::new().extract(data).unwrap();
        assert_eq!(extracted.text, "Doe, Jane said \"hi\"");
    }

    #[test]
    fn test_ragged_rows_allowed() {
        let data = b"a,b,c\nd\ne,f\n";
        let extracted = CsvExtractor::new().extract(data).unwrap();
        assert_eq!(extracted.text, "a b c d e f");
    }

    #[test]
    fn test_custom_delimiter() {
        let data = b"x;y\n1;2\n";
        let extracted = CsvExtractor::new().with_delimiter(b';').extract(data).unwrap();
        assert_eq!(extracted.text, "x y 1 2");
    }

    #[test]
    fn test_empty_csv_is_empty_text() {
        let extracted = CsvExtractor::new().extract(b"").unwrap();
        assert_eq!(extracted.text, "");
        assert_eq!(extracted.blocks, 0);
    }

    #[test]
    fn test_invalid_utf8_cell_is_csv_error() {
        let result = CsvExtractor::new().extract(&[b'a', b',', 0xFF, b'\n']);
        assert!(matches!(result, Err(ExtractError::Csv(_))));
    }
}
