//! Status classification from a single sampled pixel.
//!
//! Slips carry a colored status stamp in the top-left corner. One pixel at
//! [`SAMPLE_POINT`] is read and run through fixed threshold rules.

use crate::capture::SlipImage;
use std::fmt;

/// Pixel read for classification, regardless of image size.
pub const SAMPLE_POINT: (u32, u32) = (10, 10);

/// RGBA reading, one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorSample {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl ColorSample {
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 255,
        }
    }

    /// What an undrawn surface yields: fully transparent black.
    pub const fn transparent() -> Self {
        Self {
            red: 0,
            green: 0,
            blue: 0,
            alpha: 0,
        }
    }
}

impl From<image::Rgba<u8>> for ColorSample {
    fn from(px: image::Rgba<u8>) -> Self {
        let [red, green, blue, alpha] = px.0;
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }
}

/// Operational status shown on the slip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusLabel {
    OutOfService,
    InTheField,
    InTheFieldBusy,
    Undetermined,
}

impl StatusLabel {
    pub const ALL: [StatusLabel; 4] = [
        StatusLabel::OutOfService,
        StatusLabel::InTheField,
        StatusLabel::InTheFieldBusy,
        StatusLabel::Undetermined,
    ];

    /// Display text used in the composed result.
    pub fn as_str(self) -> &'static str {
        match self {
            StatusLabel::OutOfService => "خارج الخدمة",
            StatusLabel::InTheField => "في الميدان",
            StatusLabel::InTheFieldBusy => "في الميدان (مشغول)",
            StatusLabel::Undetermined => "غير محدد",
        }
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a pixel. Rules are evaluated in order; first match wins.
/// Alpha is not consulted.
pub fn classify(sample: ColorSample) -> StatusLabel {
    let ColorSample {
        red, green, blue, ..
    } = sample;

    // red
    if red > 200 && green < 80 && blue < 80 {
        StatusLabel::OutOfService
    // green
    } else if green > 150 && red < 100 {
        StatusLabel::InTheField
    // purple
    } else if red > 100 && blue > 100 {
        StatusLabel::InTheFieldBusy
    } else {
        StatusLabel::Undetermined
    }
}

/// Read the pixel at [`SAMPLE_POINT`]. Out-of-bounds reads are transparent.
pub fn sample_pixel(image: &SlipImage) -> ColorSample {
    let (x, y) = SAMPLE_POINT;
    let bitmap = image.bitmap();
    if x < bitmap.width() && y < bitmap.height() {
        ColorSample::from(*bitmap.get_pixel(x, y))
    } else {
        log::debug!(
            "[STATUS] Image {}x{} has no pixel at ({}, {}) — sampling transparent",
            bitmap.width(),
            bitmap.height(),
            x,
            y
        );
        ColorSample::transparent()
    }
}

/// Classify the loaded image, or [`StatusLabel::Undetermined`] when there is none.
pub fn classify_image(image: Option<&SlipImage>) -> StatusLabel {
    match image {
        Some(image) => {
            let sample = sample_pixel(image);
            let label = classify(sample);
            log::info!(
                "[STATUS] Sample rgba({}, {}, {}, {}) → {:?}",
                sample.red,
                sample.green,
                sample.blue,
                sample.alpha,
                label
            );
            label
        }
        None => StatusLabel::Undetermined,
    }
}
