//! OCR domain — engine boundary and slip field extraction.
//!
//! The recognition engine is a black box (PNG bytes in, text out) behind
//! the [`OcrEngine`] trait. External code should only use the items
//! re-exported here.

pub mod fields;
mod tesseract;

pub use fields::{extract_fields, ExtractedFields, MISSING_CODE, UNKNOWN_NAME};
pub use tesseract::TesseractEngine;

use crate::error::Result;
use async_trait::async_trait;

/// Combined Arabic + English recognition, the mix printed on slips.
pub const DEFAULT_LANGUAGE: &str = "ara+eng";

/// Text recognition engine.
///
/// Implementations receive an encoded PNG and a language hint in the
/// engine's own notation. A failure is terminal for that request.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(&self, png_bytes: &[u8], language: &str) -> Result<OcrOutput>;

    /// Short identifier used in log lines.
    fn name(&self) -> &str;
}

/// Result of a recognition request.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrOutput {
    pub text: String,
    pub latency_ms: u128,
}

impl OcrOutput {
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Language hint for recognition: `OCR_LANG` if set, else [`DEFAULT_LANGUAGE`].
pub fn language_hint() -> String {
    match std::env::var("OCR_LANG") {
        Ok(lang) if !lang.trim().is_empty() => lang.trim().to_string(),
        _ => DEFAULT_LANGUAGE.to_string(),
    }
}
