//! Tesseract-based text extractor.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::config::OcrConfig;

use super::error::ExtractorError;
use super::traits::TextExtractor;

/// Extracts text by shelling out to the tesseract CLI.
pub struct TesseractExtractor {
    config: OcrConfig,
}

impl TesseractExtractor {
    /// Creates a new extractor with the given configuration.
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    /// Creates an extractor with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(OcrConfig::default())
    }

    fn build_args(&self, image_path: &Path) -> Vec<String> {
        vec![
            image_path.to_string_lossy().to_string(),
            // "stdout" makes tesseract print recognized text instead of
            // writing an output file
            "stdout".to_string(),
            "-l".to_string(),
            self.config.language.clone(),
        ]
    }
}

impl TextExtractor for TesseractExtractor {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn extract(&self, image_path: &Path) -> Result<String, ExtractorError> {
        if !image_path.exists() {
            return Err(ExtractorError::InputNotFound {
                path: image_path.to_path_buf(),
            });
        }

        let args = self.build_args(image_path);
        debug!("Running {} {:?}", self.config.tesseract_path, args);

        let output = Command::new(&self.config.tesseract_path)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ExtractorError::BinaryNotFound {
                        path: self.config.tesseract_path.clone(),
                    }
                } else {
                    ExtractorError::Io(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(ExtractorError::extraction_failed(
                format!("tesseract exited with code: {:?}", output.status.code()),
                if stderr.is_empty() {
                    None
                } else {
                    Some(stderr)
                },
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args() {
        let extractor = TesseractExtractor::new(OcrConfig {
            tesseract_path: "tesseract".to_string(),
            language: "eng+deu".to_string(),
        });

        let args = extractor.build_args(Path::new("/tmp/shot.png"));
        assert_eq!(args[0], "/tmp/shot.png");
        assert_eq!(args[1], "stdout");
        assert!(args.contains(&"-l".to_string()));
        assert!(args.contains(&"eng+deu".to_string()));
    }

    #[test]
    fn test_extract_missing_input() {
        let extractor = TesseractExtractor::with_defaults();
        let result = extractor.extract(Path::new("/nonexistent/image.png"));
        assert!(matches!(result, Err(ExtractorError::InputNotFound { .. })));
    }
}
