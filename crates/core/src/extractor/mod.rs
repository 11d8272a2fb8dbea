//! Text extraction (OCR) capability.

mod error;
mod tesseract;
mod traits;

pub use error::ExtractorError;
pub use tesseract::TesseractExtractor;
pub use traits::TextExtractor;
