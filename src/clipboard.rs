//! System clipboard access.
//!
//! Uses arboard for native clipboard access. The [`Clipboard`] trait is the
//! seam the session writes through, so a headless caller can swap in its
//! own implementation.

use crate::capture::SlipImage;
use crate::error::{Error, Result};
use image::RgbaImage;

/// Text clipboard the final result is copied to.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<()>;
    fn get_text(&mut self) -> Result<String>;
}

/// Native OS clipboard.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self> {
        let inner = arboard::Clipboard::new().map_err(|e| Error::Clipboard(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Read a pasted image bitmap.
    pub fn read_image(&mut self) -> Result<SlipImage> {
        let data = self.inner.get_image().map_err(|e| match e {
            arboard::Error::ContentNotAvailable => Error::NoClipboardImage,
            other => Error::Clipboard(other.to_string()),
        })?;

        let bitmap = rgba_from_clipboard(data.width, data.height, data.bytes.into_owned())?;
        log::info!(
            "[CLIPBOARD] Pasted {}x{} image",
            bitmap.width(),
            bitmap.height()
        );
        Ok(SlipImage::from_rgba(bitmap))
    }

    /// Keep serving `text` until another application owns the clipboard.
    ///
    /// X11 and Wayland selections belong to the process that set them, so a
    /// short-lived CLI must not exit before a clipboard manager (or the next
    /// copy) takes over. Blocks until then.
    #[cfg(target_os = "linux")]
    pub fn hold_until_replaced(&mut self, text: &str) -> Result<()> {
        use arboard::SetExtLinux;

        log::info!("[CLIPBOARD] Holding selection until another owner takes it");
        self.inner
            .set()
            .wait()
            .text(text)
            .map_err(|e| Error::Clipboard(e.to_string()))
    }

    /// Other platforms keep clipboard contents after the process exits.
    #[cfg(not(target_os = "linux"))]
    pub fn hold_until_replaced(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.inner
            .set_text(text)
            .map_err(|e| Error::Clipboard(e.to_string()))?;
        log::info!("[CLIPBOARD] Copied {} chars", text.chars().count());
        Ok(())
    }

    fn get_text(&mut self) -> Result<String> {
        self.inner
            .get_text()
            .map_err(|e| Error::Clipboard(e.to_string()))
    }
}

/// Build an RGBA bitmap from clipboard dimensions and raw bytes.
fn rgba_from_clipboard(width: usize, height: usize, bytes: Vec<u8>) -> Result<RgbaImage> {
    let w = u32::try_from(width)
        .map_err(|_| Error::Clipboard(format!("clipboard image too wide: {}", width)))?;
    let h = u32::try_from(height)
        .map_err(|_| Error::Clipboard(format!("clipboard image too tall: {}", height)))?;
    RgbaImage::from_raw(w, h, bytes).ok_or_else(|| {
        Error::Clipboard(format!(
            "clipboard image buffer does not match {}x{} RGBA",
            w, h
        ))
    })
}
