//! Extractor configuration: per-format capability flags and OCR engine.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Extraction configuration passed to the pipeline at construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Which formats are enabled.
    pub formats: FormatToggles,
    /// OCR engine settings.
    pub ocr: OcrConfig,
}

/// Capability flag per optional format.
///
/// Plain text is always enabled. A disabled format is treated exactly like
/// an unrecognized content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatToggles {
    pub pdf: bool,
    pub docx: bool,
    pub image: bool,
    pub csv: bool,
}

impl Default for FormatToggles {
    fn default() -> Self {
        Self {
            pdf: true,
            docx: true,
            image: true,
            csv: true,
        }
    }
}

impl FormatToggles {
    /// Plain text only.
    pub fn text_only() -> Self {
        Self {
            pdf: false,
            docx: false,
            image: false,
            csv: false,
        }
    }
}

/// Tesseract OCR engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Absolute path to the `tesseract` executable.
    pub engine_path: PathBuf,
    /// Tesseract language code(s), e.g. `eng` or `eng+deu`.
    pub language: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            engine_path: default_engine_path(),
            language: "eng".to_string(),
        }
    }
}

impl OcrConfig {
    /// Config pointing at a specific engine binary.
    pub fn with_engine_path(path: impl Into<PathBuf>) -> Self {
        Self {
            engine_path: path.into(),
            ..Default::default()
        }
    }
}

#[cfg(windows)]
fn default_engine_path() -> PathBuf {
    PathBuf::from(r"C:\Program Files\Tesseract-OCR\tesseract.exe")
}

#[cfg(not(windows))]
fn default_engine_path() -> PathBuf {
    PathBuf::from("/usr/bin/tesseract")
}
