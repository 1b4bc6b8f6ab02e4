//! Tesseract CLI engine.
//!
//! Spawns `tesseract stdin stdout -l <lang>`, feeds the PNG over stdin and
//! reads the recognized text from stdout. No temp files.

use super::{OcrEngine, OcrOutput};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;

pub struct TesseractEngine {
    binary: PathBuf,
}

impl TesseractEngine {
    /// Locate the Tesseract binary.
    ///
    /// `TESSERACT_PATH` wins when set; otherwise the binary is looked up on
    /// `PATH`.
    pub fn discover() -> Result<Self> {
        if let Ok(explicit) = std::env::var("TESSERACT_PATH") {
            if !explicit.trim().is_empty() {
                let path = PathBuf::from(explicit.trim());
                if !path.exists() {
                    return Err(Error::OcrUnavailable(format!(
                        "TESSERACT_PATH points to a missing file: {}",
                        path.display()
                    )));
                }
                return Ok(Self::with_binary(path));
            }
        }

        let binary = which::which("tesseract")
            .map_err(|e| Error::OcrUnavailable(format!("tesseract not found on PATH: {}", e)))?;
        Ok(Self::with_binary(binary))
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn recognize(&self, png_bytes: &[u8], language: &str) -> Result<OcrOutput> {
        let start = std::time::Instant::now();

        let mut child = tokio::process::Command::new(&self.binary)
            .args(["stdin", "stdout", "-l", language])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                Error::OcrUnavailable(format!("Failed to spawn {}: {}", self.binary.display(), e))
            })?;

        // A tesseract that bails out early (missing traineddata, bad args)
        // closes stdin first; its stderr is the useful diagnostic.
        let mut write_error = None;
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(png_bytes).await {
                log::warn!("[OCR] Writing image to tesseract failed: {}", e);
                write_error = Some(e);
            }
            // Dropping stdin closes the pipe so tesseract sees EOF.
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| Error::Ocr(format!("Failed to read tesseract output: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Ocr(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        if let Some(e) = write_error {
            return Err(Error::Ocr(format!(
                "Failed to write image to tesseract: {}",
                e
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        let latency_ms = start.elapsed().as_millis();
        log::info!(
            "[OCR] tesseract ({}) returned {} chars in {}ms",
            language,
            text.chars().count(),
            latency_ms
        );

        Ok(OcrOutput { text, latency_ms })
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}
