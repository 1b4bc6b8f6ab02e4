//! Image source domain — public API.
//!
//! Slip images arrive as a file, a `data:` URL, raw encoded bytes, or a
//! clipboard bitmap. All of them normalize to [`SlipImage`], a decoded
//! RGBA bitmap, before classification or OCR.

mod data_url;

pub use data_url::decode_data_url;

use crate::error::{Error, Result};
use image::{DynamicImage, ImageDecoder, ImageReader, RgbaImage};
use std::io::Cursor;
use std::path::Path;

/// Decoded slip image.
#[derive(Debug, Clone)]
pub struct SlipImage {
    bitmap: RgbaImage,
}

impl SlipImage {
    pub fn from_rgba(bitmap: RgbaImage) -> Self {
        Self { bitmap }
    }

    /// Decode encoded image bytes (PNG, JPEG, ...). Format is sniffed.
    ///
    /// The EXIF orientation tag is applied, so the bitmap is upright the
    /// way a viewer would show it.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut decoder = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .into_decoder()?;
        let orientation = decoder.orientation()?;
        let mut decoded = DynamicImage::from_decoder(decoder)?;
        decoded.apply_orientation(orientation);
        Ok(Self::from_dynamic(decoded))
    }

    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self {
            bitmap: image.to_rgba8(),
        }
    }

    /// Decode a `data:image/...;base64,...` URL.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let bytes = decode_data_url(url)?;
        Self::from_bytes(&bytes)
    }

    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }

    pub fn bitmap(&self) -> &RgbaImage {
        &self.bitmap
    }

    /// Encode to PNG in memory for the OCR engine.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut png_bytes = Vec::new();
        self.bitmap.write_to(
            &mut Cursor::new(&mut png_bytes),
            image::ImageFormat::Png,
        )?;
        Ok(png_bytes)
    }
}

/// Where a slip image is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Path on disk.
    File(std::path::PathBuf),
    /// `data:` URL as produced by a file picker.
    DataUrl(String),
}

impl ImageSource {
    /// Interpret a CLI argument: anything starting with `data:` is a URL,
    /// everything else a path.
    pub fn parse(arg: &str) -> Self {
        if arg.starts_with("data:") {
            ImageSource::DataUrl(arg.to_string())
        } else {
            ImageSource::File(arg.into())
        }
    }
}

/// Load and decode an image off the async executor.
///
/// Resolves once with the decoded bitmap or the decode error.
pub async fn load(source: ImageSource) -> Result<SlipImage> {
    let start = std::time::Instant::now();
    let image = tokio::task::spawn_blocking(move || match source {
        ImageSource::File(path) => load_file(&path),
        ImageSource::DataUrl(url) => SlipImage::from_data_url(&url),
    })
    .await
    .map_err(|e| Error::Io(std::io::Error::other(format!("Decode task failed: {}", e))))??;

    log::info!(
        "[CAPTURE] Decoded {}x{} image in {}ms",
        image.width(),
        image.height(),
        start.elapsed().as_millis()
    );
    Ok(image)
}

fn load_file(path: &Path) -> Result<SlipImage> {
    let bytes = std::fs::read(path)?;
    SlipImage::from_bytes(&bytes)
}
