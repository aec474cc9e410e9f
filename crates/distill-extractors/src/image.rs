//! Image OCR via a Tesseract executable at a configured path.
//!
//! The payload is decoded into a raster with `image`, re-encoded as PNG and
//! piped through `tesseract stdin stdout`. Recognized text is returned
//! verbatim, engine artifacts included.

use std::io::{Cursor, ErrorKind, Write};
use std::process::{Command, Stdio};

use image::ImageFormat;
use tracing::debug;

use crate::config::OcrConfig;
use crate::error::{ExtractError, ExtractResult};
use crate::types::{ContentType, ExtractedText};
use crate::Extractor;

/// OCR extractor for raster images.
#[derive(Debug, Clone, Default)]
pub struct OcrExtractor {
    config: OcrConfig,
}

impl OcrExtractor {
    /// Create OCR extractor with default engine location.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create OCR extractor with custom engine settings.
    pub fn with_config(config: OcrConfig) -> Self {
        Self { config }
    }

    /// Engine settings in use.
    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    /// Fail fast when the engine binary is not where it was configured.
    ///
    /// Checked on every call, before any decoding or recognition.
    pub fn ensure_engine(&self) -> ExtractResult<()> {
        if self.config.engine_path.is_file() {
            Ok(())
        } else {
            Err(ExtractError::EngineNotFound {
                path: self.config.engine_path.clone(),
            })
        }
    }

    /// Decode the payload and re-encode it as PNG for the engine.
    fn to_png(content: &[u8]) -> ExtractResult<Vec<u8>> {
        let img = image::load_from_memory(content)
            .map_err(|e| ExtractError::Image(format!("Failed to decode image: {}", e)))?;

        let mut png = Cursor::new(Vec::new());
        img.write_to(&mut png, ImageFormat::Png)
            .map_err(|e| ExtractError::Image(format!("Failed to encode raster: {}", e)))?;
        Ok(png.into_inner())
    }

    fn recognize(&self, png: &[u8]) -> ExtractResult<String> {
        let mut child = Command::new(&self.config.engine_path)
            .args(["stdin", "stdout", "-l", &self.config.language])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        {
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| ExtractError::Ocr("Engine stdin unavailable".to_string()))?;
            match stdin.write_all(png) {
                Ok(()) => {}
                // Engine quit before reading the image; its exit status says why
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                    debug!("OCR engine closed stdin early");
                }
                Err(e) => return Err(e.into()),
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(ExtractError::Ocr(format!(
                "Engine exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| ExtractError::Ocr(format!("Engine produced invalid UTF-8: {}", e)))
    }
}

impl Extractor for OcrExtractor {
    fn extract(&self, content: &[u8]) -> ExtractResult<ExtractedText> {
        self.ensure_engine()?;

        let png = Self::to_png(content)?;
        let text = self.recognize(&png)?;

        debug!(
            engine = %self.config.engine_path.display(),
            chars = text.len(),
            "OCR complete"
        );

        let blocks = text.lines().filter(|l| !l.trim().is_empty()).count();
        Ok(ExtractedText::new(text, ContentType::Image, blocks))
    }

    fn content_type(&self) -> ContentType {
        ContentType::Image
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_engine() -> OcrExtractor {
        OcrExtractor::with_config(OcrConfig::with_engine_path(
            "/nonexistent/distill/tesseract",
        ))
    }

    #[test]
    fn test_extractor_identity() {
        let extractor = OcrExtractor::new();
        assert_eq!(extractor.name(), "tesseract");
        assert!(extractor.handles(&ContentType::Image));
        assert!(!extractor.handles(&ContentType::Pdf));
    }

    #[test]
    fn test_missing_engine_fails_fast() {
        let result = missing_engine().extract(&[0x89, 0x50, 0x4E, 0x47]);
        assert!(matches!(result, Err(ExtractError::EngineNotFound { .. })));
    }

    #[test]
    fn test_engine_checked_before_decoding() {
        // Undecodable payload still reports the engine, not the image
        let result = missing_engine().extract(b"not an image at all");
        match result {
            Err(ExtractError::EngineNotFound { path }) => {
                assert_eq!(path, std::path::PathBuf::from("/nonexistent/distill/tesseract"));
            }
            other => panic!("expected EngineNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_directory_is_not_an_engine() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = OcrExtractor::with_config(OcrConfig::with_engine_path(dir.path()));
        assert!(matches!(
            extractor.ensure_engine(),
            Err(ExtractError::EngineNotFound { .. })
        ));
    }

    #[test]
    fn test_undecodable_image_with_engine_present() {
        // Any existing file satisfies the precondition; decoding fails next
        let file = tempfile::NamedTempFile::new().unwrap();
        let extractor = OcrExtractor::with_config(OcrConfig::with_engine_path(file.path()));
        let result = extractor.extract(b"not an image at all");
        assert!(matches!(result, Err(ExtractError::Image(_))));
    }

    /// Serializes tests that write and run engine scripts, so no other test
    /// forks while a script is still open for writing.
    #[cfg(unix)]
    static ENGINE_SCRIPTS: std::sync::Mutex<()> = std::sync::Mutex::new(());

    #[cfg(unix)]
    fn script_engine(dir: &std::path::Path, body: &str) -> OcrExtractor {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("tesseract");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        OcrExtractor::with_config(OcrConfig::with_engine_path(path))
    }

    fn png_bytes(width: u32, height: u32, noisy: bool) -> Vec<u8> {
        let mut seed: u32 = 0x2545_F491;
        let img = image::RgbImage::from_fn(width, height, |_, _| {
            if noisy {
                seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                let [r, g, b, _] = seed.to_le_bytes();
                image::Rgb([r, g, b])
            } else {
                image::Rgb([255, 255, 255])
            }
        });
        let mut bytes = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut bytes, ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    #[cfg(unix)]
    #[test]
    fn test_engine_output_returned_verbatim() {
        let _guard = ENGINE_SCRIPTS.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let extractor = script_engine(
            dir.path(),
            "cat > /dev/null\nprintf 'Hel1o w0rld\\n\\f'",
        );

        let extracted = extractor.extract(&png_bytes(8, 8, false)).unwrap();
        assert_eq!(extracted.text, "Hel1o w0rld\n\u{c}");
        assert_eq!(extracted.content_type, ContentType::Image);
        assert_eq!(extracted.blocks, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_engine_failure_reports_stderr() {
        let _guard = ENGINE_SCRIPTS.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        // Exits without reading stdin; the image is larger than a pipe buffer
        let extractor = script_engine(
            dir.path(),
            "echo \"Failed loading language 'xyz'\" >&2\nexit 1",
        );

        match extractor.extract(&png_bytes(600, 600, true)) {
            Err(ExtractError::Ocr(message)) => {
                assert!(message.contains("Failed loading language 'xyz'"), "{}", message);
            }
            other => panic!("expected Ocr error, got {:?}", other),
        }
    }

    #[test]
    fn test_png_roundtrip_for_engine() {
        let png = OcrExtractor::to_png(&png_bytes(4, 4, false)).unwrap();
        assert!(png.starts_with(&[0x89, 0x50, 0x4E, 0x47]));
    }
}
