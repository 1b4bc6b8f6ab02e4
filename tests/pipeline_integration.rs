//! Integration tests for the slip pipeline.
//!
//! Drives `SlipSession` end to end with a scripted OCR engine and an
//! in-memory clipboard, so no Tesseract install or display is needed.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{Rgba, RgbaImage};
use ops_slip_lib::capture::{self, ImageSource, SlipImage};
use ops_slip_lib::clipboard::Clipboard;
use ops_slip_lib::ocr::{extract_fields, OcrEngine, OcrOutput};
use ops_slip_lib::pipeline::SlipSession;
use ops_slip_lib::result::compose;
use ops_slip_lib::status::{classify, classify_image, ColorSample, StatusLabel};
use ops_slip_lib::Error;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Returns fixed text and records what it was asked.
struct ScriptedEngine {
    text: String,
    calls: Mutex<Vec<(usize, String)>>,
}

impl ScriptedEngine {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl OcrEngine for ScriptedEngine {
    async fn recognize(&self, png_bytes: &[u8], language: &str) -> ops_slip_lib::Result<OcrOutput> {
        self.calls
            .lock()
            .unwrap()
            .push((png_bytes.len(), language.to_string()));
        Ok(OcrOutput {
            text: self.text.clone(),
            latency_ms: 1,
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

struct FailingEngine;

#[async_trait]
impl OcrEngine for FailingEngine {
    async fn recognize(&self, _png_bytes: &[u8], _language: &str) -> ops_slip_lib::Result<OcrOutput> {
        Err(Error::Ocr("engine crashed".to_string()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Blocks until released, to hold a request in flight.
struct GatedEngine {
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl OcrEngine for GatedEngine {
    async fn recognize(&self, _png_bytes: &[u8], _language: &str) -> ops_slip_lib::Result<OcrOutput> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(OcrOutput {
            text: "Gated\n42".to_string(),
            latency_ms: 0,
        })
    }

    fn name(&self) -> &str {
        "gated"
    }
}

#[derive(Default)]
struct MemoryClipboard {
    text: Option<String>,
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> ops_slip_lib::Result<()> {
        self.text = Some(text.to_string());
        Ok(())
    }

    fn get_text(&mut self) -> ops_slip_lib::Result<String> {
        self.text
            .clone()
            .ok_or_else(|| Error::Clipboard("empty".to_string()))
    }
}

/// Accepts writes but something else owns the clipboard by the time it is read.
struct ForgetfulClipboard;

impl Clipboard for ForgetfulClipboard {
    fn set_text(&mut self, _text: &str) -> ops_slip_lib::Result<()> {
        Ok(())
    }

    fn get_text(&mut self) -> ops_slip_lib::Result<String> {
        Ok("something else".to_string())
    }
}

struct BrokenClipboard;

impl Clipboard for BrokenClipboard {
    fn set_text(&mut self, _text: &str) -> ops_slip_lib::Result<()> {
        Err(Error::Clipboard("no display".to_string()))
    }

    fn get_text(&mut self) -> ops_slip_lib::Result<String> {
        Err(Error::Clipboard("no display".to_string()))
    }
}

/// Slip with a colored stamp covering the sample point.
fn stamped_slip(stamp: [u8; 3]) -> SlipImage {
    let mut bitmap = RgbaImage::from_pixel(64, 48, Rgba([255, 255, 255, 255]));
    for y in 0..20 {
        for x in 0..20 {
            bitmap.put_pixel(x, y, Rgba([stamp[0], stamp[1], stamp[2], 255]));
        }
    }
    SlipImage::from_rgba(bitmap)
}

#[tokio::test]
async fn process_composes_fields_and_status() {
    let session = SlipSession::with_language("ara+eng");
    session.load_image(stamped_slip([255, 0, 0]));
    let engine = ScriptedEngine::new("  Ali  \n\n  123 \n extra");

    let result = session.process(&engine).await.unwrap().unwrap();

    assert_eq!(
        result.as_str(),
        "الاسم: Ali\nالكود: 123\nالحالة: خارج الخدمة"
    );
    assert_eq!(session.result(), result);

    let calls = engine.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].0 > 0, "engine should receive PNG bytes");
    assert_eq!(calls[0].1, "ara+eng");
}

#[tokio::test]
async fn png_handed_to_engine_decodes_back_to_the_slip() {
    struct Capturing(Mutex<Option<Vec<u8>>>);

    #[async_trait]
    impl OcrEngine for Capturing {
        async fn recognize(&self, png_bytes: &[u8], _language: &str) -> ops_slip_lib::Result<OcrOutput> {
            *self.0.lock().unwrap() = Some(png_bytes.to_vec());
            Ok(OcrOutput {
                text: String::new(),
                latency_ms: 0,
            })
        }

        fn name(&self) -> &str {
            "capturing"
        }
    }

    let session = SlipSession::with_language("eng");
    session.load_image(stamped_slip([0, 200, 0]));
    let engine = Capturing(Mutex::new(None));
    session.process(&engine).await.unwrap();

    let png = engine.0.lock().unwrap().clone().unwrap();
    let decoded = SlipImage::from_bytes(&png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (64, 48));
    assert_eq!(decoded.bitmap().get_pixel(10, 10), &Rgba([0, 200, 0, 255]));
}

#[tokio::test]
async fn empty_recognition_uses_fallbacks() {
    let session = SlipSession::with_language("eng");
    session.load_image(stamped_slip([50, 50, 50]));

    let result = session
        .process(&ScriptedEngine::new("\n   \n"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        result.as_str(),
        "الاسم: غير معروف\nالكود: ---\nالحالة: غير محدد"
    );
}

#[tokio::test]
async fn process_without_image_is_a_no_op() {
    let session = SlipSession::with_language("eng");
    let engine = ScriptedEngine::new("Ali\n123");

    let result = session.process(&engine).await.unwrap();

    assert!(result.is_none());
    assert!(engine.calls.lock().unwrap().is_empty());
    assert!(!session.is_processing());
    assert!(session.result().is_empty());
}

#[tokio::test]
async fn ocr_failure_surfaces_and_releases_processing() {
    let session = SlipSession::with_language("eng");
    session.load_image(stamped_slip([0, 200, 0]));

    let err = session.process(&FailingEngine).await.unwrap_err();
    assert!(matches!(err, Error::Ocr(_)), "got {:?}", err);
    assert!(!session.is_processing());

    // Input is usable again after the failure.
    let result = session
        .process(&ScriptedEngine::new("Omar\n9"))
        .await
        .unwrap()
        .unwrap();
    assert!(result.as_str().ends_with("في الميدان"));
}

#[tokio::test]
async fn failure_keeps_previous_result() {
    let session = SlipSession::with_language("eng");
    session.load_image(stamped_slip([150, 0, 150]));
    let first = session
        .process(&ScriptedEngine::new("Omar\n9"))
        .await
        .unwrap()
        .unwrap();

    assert!(session.process(&FailingEngine).await.is_err());
    assert_eq!(session.result(), first);
}

#[tokio::test]
async fn second_request_while_in_flight_is_rejected() {
    let session = Arc::new(SlipSession::with_language("eng"));
    session.load_image(stamped_slip([150, 0, 150]));
    let engine = Arc::new(GatedEngine {
        entered: Notify::new(),
        release: Notify::new(),
    });

    let first = {
        let session = Arc::clone(&session);
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { session.process(engine.as_ref()).await })
    };

    engine.entered.notified().await;
    assert!(session.is_processing());

    let err = session
        .process(&ScriptedEngine::new("Other\n1"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Busy), "got {:?}", err);

    engine.release.notify_one();
    let result = first.await.unwrap().unwrap().unwrap();
    assert_eq!(
        result.as_str(),
        "الاسم: Gated\nالكود: 42\nالحالة: في الميدان (مشغول)"
    );
    assert!(!session.is_processing());
}

#[tokio::test]
async fn recipients_append_one_line_each() {
    let session = SlipSession::with_language("eng");
    session.load_image(stamped_slip([255, 0, 0]));
    session
        .process(&ScriptedEngine::new("Ali\n123"))
        .await
        .unwrap();

    session.append_recipient("Noor").unwrap();
    let annotated = session.append_recipient("Noor").unwrap();

    assert_eq!(
        annotated.as_str(),
        "الاسم: Ali\nالكود: 123\nالحالة: خارج الخدمة\nالمستلم/النائب: Noor\nالمستلم/النائب: Noor"
    );
}

#[tokio::test]
async fn blank_recipient_is_rejected_and_result_unchanged() {
    let session = SlipSession::with_language("eng");
    session.load_image(stamped_slip([255, 0, 0]));
    let composed = session
        .process(&ScriptedEngine::new("Ali\n123"))
        .await
        .unwrap()
        .unwrap();

    let err = session.append_recipient("   ").unwrap_err();
    assert!(matches!(err, Error::EmptyRecipient));
    assert_eq!(session.result(), composed);
}

#[tokio::test]
async fn copied_result_reads_back_byte_for_byte() {
    let session = SlipSession::with_language("eng");
    session.load_image(stamped_slip([0, 200, 0]));
    let text = "محمد\nA-7";
    session
        .process(&ScriptedEngine::new(text))
        .await
        .unwrap();

    let mut clipboard = MemoryClipboard::default();
    let copied = session.copy_result(&mut clipboard).unwrap();
    assert_eq!(copied, session.result());

    let expected = compose(&extract_fields(text), classify(ColorSample::rgb(0, 200, 0)));
    assert_eq!(expected.as_str().as_bytes(), clipboard.get_text().unwrap().as_bytes());
    assert_eq!(session.result(), expected);
}

#[test]
fn copy_without_result_is_rejected() {
    let session = SlipSession::with_language("eng");
    let mut clipboard = MemoryClipboard::default();

    let err = session.copy_result(&mut clipboard).unwrap_err();
    assert!(matches!(err, Error::NoResult));
    assert!(clipboard.text.is_none());
}

#[tokio::test]
async fn clipboard_failure_is_surfaced() {
    let session = SlipSession::with_language("eng");
    session.load_image(stamped_slip([0, 200, 0]));
    session
        .process(&ScriptedEngine::new("Ali\n1"))
        .await
        .unwrap();

    let err = session.copy_result(&mut BrokenClipboard).unwrap_err();
    assert!(matches!(err, Error::Clipboard(_)));
}

#[tokio::test]
async fn copy_that_does_not_read_back_is_a_failure() {
    let session = SlipSession::with_language("eng");
    session.load_image(stamped_slip([0, 200, 0]));
    session
        .process(&ScriptedEngine::new("Ali\n1"))
        .await
        .unwrap();

    let err = session.copy_result(&mut ForgetfulClipboard).unwrap_err();
    assert!(matches!(err, Error::Clipboard(_)), "got {:?}", err);
}

#[tokio::test]
async fn data_url_slip_decodes_and_processes() {
    let mut bitmap = RgbaImage::from_pixel(40, 30, Rgba([255, 255, 255, 255]));
    for y in 0..20 {
        for x in 0..20 {
            bitmap.put_pixel(x, y, Rgba([0, 200, 0, 255]));
        }
    }
    let png = SlipImage::from_rgba(bitmap).to_png_bytes().unwrap();
    let url = format!("data:image/png;base64,{}", STANDARD.encode(&png));

    let slip = capture::load(ImageSource::parse(&url)).await.unwrap();
    assert_eq!((slip.width(), slip.height()), (40, 30));
    assert_eq!(slip.bitmap().get_pixel(10, 10), &Rgba([0, 200, 0, 255]));

    let session = SlipSession::with_language("eng");
    session.load_image(slip);
    let result = session
        .process(&ScriptedEngine::new("Omar\n9"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        result.as_str(),
        "الاسم: Omar\nالكود: 9\nالحالة: في الميدان"
    );
}

#[test]
fn data_url_with_line_breaks_decodes() {
    let png = SlipImage::from_rgba(RgbaImage::from_pixel(12, 12, Rgba([255, 0, 0, 255])))
        .to_png_bytes()
        .unwrap();
    let encoded = STANDARD.encode(&png);
    let (head, tail) = encoded.split_at(encoded.len() / 2);
    let url = format!("data:image/png;base64,{}\n{}", head, tail);

    let slip = SlipImage::from_data_url(&url).unwrap();
    assert_eq!(
        classify_image(Some(&slip)),
        StatusLabel::OutOfService
    );
}

#[tokio::test]
async fn reloading_image_changes_status() {
    let session = SlipSession::with_language("eng");
    let engine = ScriptedEngine::new("Ali\n123");

    session.load_image(stamped_slip([255, 0, 0]));
    let red = session.process(&engine).await.unwrap().unwrap();
    assert!(red.as_str().ends_with(StatusLabel::OutOfService.as_str()));

    session.load_image(stamped_slip([0, 200, 0]));
    let green = session.process(&engine).await.unwrap().unwrap();
    assert!(green.as_str().ends_with(StatusLabel::InTheField.as_str()));
}
