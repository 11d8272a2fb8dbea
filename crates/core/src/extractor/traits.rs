use std::path::Path;

use super::error::ExtractorError;

/// Turns an image into recognized UTF-8 text.
///
/// Blocking: implementations run on the job manager's worker thread.
pub trait TextExtractor: Send + Sync {
    /// Implementation name for logging.
    fn name(&self) -> &str;

    /// Extract the text visible in the image at `image_path`.
    fn extract(&self, image_path: &Path) -> Result<String, ExtractorError>;
}
