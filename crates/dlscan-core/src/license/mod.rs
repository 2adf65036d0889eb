//! Driver's license field extraction.

mod extractor;
pub mod rules;
mod scanner;

pub use extractor::RuleBasedExtractor;
pub use scanner::{decode_payload, LicenseScanner};

use crate::models::license::LicenseInfo;
use crate::ocr::TextDocument;

/// Trait for license field extractors.
///
/// Extraction never fails: fields that cannot be found are left empty.
pub trait LicenseExtractor {
    /// Extract license fields from recognized text lines.
    fn extract(&self, document: &TextDocument) -> LicenseInfo;

    /// Extract license fields from plain text.
    fn extract_from_text(&self, text: &str) -> LicenseInfo {
        self.extract(&TextDocument::from_text(text))
    }
}
