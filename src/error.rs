//! Crate-wide error type.
//!
//! Every fallible operation in the library returns `Result<T>`. The CLI
//! turns these into a single `error: ...` line on stderr.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The recipient/delegate annotation was empty or whitespace only.
    #[error("Please enter the recipient or delegate")]
    EmptyRecipient,

    /// A recognition request is already in flight for this session.
    #[error("Processing already in progress")]
    Busy,

    /// Nothing has been composed yet, so there is nothing to copy.
    #[error("No result available — process an image first")]
    NoResult,

    #[error("Failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    #[error("Clipboard does not contain an image")]
    NoClipboardImage,

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("OCR engine not available: {0}")]
    OcrUnavailable(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
