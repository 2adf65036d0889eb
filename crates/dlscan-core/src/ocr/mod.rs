//! OCR collaborator interface and the native engine.

#[cfg(feature = "native")]
mod pure_engine;

#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;

use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// Recognizes text lines in an image.
///
/// Implementations must report undecodable input as [`OcrError::Document`]
/// and a missing client or models as [`OcrError::Unavailable`].
pub trait OcrProvider: Send + Sync {
    /// Short engine name for logging.
    fn name(&self) -> &str;

    /// Recognize the text lines of an encoded image, in reading order.
    fn recognize(&self, image: &[u8]) -> Result<TextDocument, OcrError>;
}

/// Text lines recovered from a document, in reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextDocument {
    pub lines: Vec<String>,
}

impl TextDocument {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Split already-recognized text into lines.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// Lines joined with newlines.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Upper-cased copy of [`TextDocument::text`].
    pub fn upper(&self) -> String {
        self.text().to_uppercase()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }
}

/// A recognized text region with its axis-aligned bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRegion {
    /// Bounding rectangle (min_x, min_y, max_x, max_y).
    pub rect: (f32, f32, f32, f32),

    /// Recognized text content.
    pub text: String,

    /// Recognition confidence (0.0 - 1.0).
    pub confidence: f32,
}

/// Sort regions by reading order (top-to-bottom, left-to-right).
pub fn sort_by_reading_order(regions: &mut [TextRegion]) {
    regions.sort_by(|a, b| {
        // Group by approximate vertical position (within 20 pixels)
        let row_a = (a.rect.1 / 20.0) as i32;
        let row_b = (b.rect.1 / 20.0) as i32;

        if row_a != row_b {
            row_a.cmp(&row_b)
        } else {
            a.rect
                .0
                .partial_cmp(&b.rect.0)
                .unwrap_or(std::cmp::Ordering::Equal)
        }
    });
}
