//! Slip processing pipeline.
//!
//! image → PNG encode → OCR → extract fields → sample status pixel →
//! compose. [`SlipSession`] holds the state one operator works with: the
//! current image, the current result and the in-flight flag.

use crate::capture::SlipImage;
use crate::clipboard::Clipboard;
use crate::error::{Error, Result};
use crate::ocr::{self, OcrEngine};
use crate::result::{compose, ResultText};
use crate::status;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Per-operator state. Shareable across tasks behind an `Arc`.
pub struct SlipSession {
    image: Mutex<Option<SlipImage>>,
    result: Mutex<ResultText>,
    processing: AtomicBool,
    language: String,
}

/// Clears the processing flag on every exit path.
struct ProcessingGuard<'a>(&'a AtomicBool);

impl<'a> ProcessingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::Busy)?;
        Ok(Self(flag))
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Default for SlipSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SlipSession {
    /// Session using the language hint from the environment.
    pub fn new() -> Self {
        Self::with_language(ocr::language_hint())
    }

    pub fn with_language(language: impl Into<String>) -> Self {
        Self {
            image: Mutex::new(None),
            result: Mutex::new(ResultText::default()),
            processing: AtomicBool::new(false),
            language: language.into(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Replace the current image.
    pub fn load_image(&self, image: SlipImage) {
        log::info!(
            "[PIPELINE] Image loaded: {}x{}",
            image.width(),
            image.height()
        );
        *lock(&self.image) = Some(image);
    }

    pub fn has_image(&self) -> bool {
        lock(&self.image).is_some()
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    pub fn result(&self) -> ResultText {
        lock(&self.result).clone()
    }

    /// Run the full pipeline on the current image.
    ///
    /// Returns `Ok(None)` when no image is loaded and `Err(Busy)` while
    /// another call is still waiting on the engine. An OCR failure is
    /// returned as-is and leaves the previous result untouched.
    pub async fn process(&self, engine: &dyn OcrEngine) -> Result<Option<ResultText>> {
        let current = lock(&self.image).clone();
        let image = match current {
            Some(image) => image,
            None => {
                log::info!("[PIPELINE] No image loaded — nothing to process");
                return Ok(None);
            }
        };

        let _guard = ProcessingGuard::acquire(&self.processing)?;
        let pipeline_start = std::time::Instant::now();

        let png_bytes = image.to_png_bytes()?;
        log::info!("[PIPELINE] PNG encode: {} bytes", png_bytes.len());

        let ocr_output = engine.recognize(&png_bytes, &self.language).await.map_err(|e| {
            log::error!("[OCR] {} failed: {}", engine.name(), e);
            e
        })?;
        log::info!(
            "[OCR] {} extracted {} chars in {}ms",
            engine.name(),
            ocr_output.char_count(),
            ocr_output.latency_ms
        );

        let fields = ocr::extract_fields(&ocr_output.text);
        let status = status::classify_image(Some(&image));
        let composed = compose(&fields, status);

        *lock(&self.result) = composed.clone();
        log::info!(
            "[PIPELINE] Total: {}ms",
            pipeline_start.elapsed().as_millis()
        );
        Ok(Some(composed))
    }

    /// Append a recipient line to the current result.
    pub fn append_recipient(&self, recipient: &str) -> Result<ResultText> {
        let mut result = lock(&self.result);
        result.append_recipient(recipient)?;
        Ok(result.clone())
    }

    /// Copy the current result to `clipboard` and confirm it by reading it
    /// back. Returns the copied text.
    pub fn copy_result(&self, clipboard: &mut dyn Clipboard) -> Result<ResultText> {
        let result = self.result();
        if result.is_empty() {
            return Err(Error::NoResult);
        }
        clipboard.set_text(result.as_str())?;

        let read_back = clipboard.get_text()?;
        if read_back != result.as_str() {
            log::error!(
                "[CLIPBOARD] Read-back mismatch: wrote {} chars, found {}",
                result.as_str().chars().count(),
                read_back.chars().count()
            );
            return Err(Error::Clipboard(
                "clipboard content does not match the copied result".to_string(),
            ));
        }
        Ok(result)
    }
}
