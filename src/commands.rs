//! Command handlers.
//!
//! Thin wrappers that bridge CLI invocations to the library. Each handler
//! does one job and reports through stdout; errors bubble up to `run()`.

use crate::capture::{self, ImageSource};
use crate::clipboard::SystemClipboard;
use crate::error::Result;
use crate::ocr::TesseractEngine;
use crate::pipeline::SlipSession;
use crate::settings::SettingsStore;
use crate::status;

/// OCR a slip and print the composed result, optionally annotated and copied.
pub async fn extract(
    image: Option<String>,
    paste: bool,
    recipients: &[String],
    copy: bool,
) -> Result<()> {
    let session = SlipSession::new();

    let slip = if paste {
        SystemClipboard::new()?.read_image()?
    } else {
        match image {
            Some(arg) => capture::load(ImageSource::parse(&arg)).await?,
            None => {
                log::warn!("[ACTION] No image given — nothing to do");
                return Ok(());
            }
        }
    };
    session.load_image(slip);

    let engine = TesseractEngine::discover()?;
    log::info!("[OCR] Using {}", engine.binary().display());

    if session.process(&engine).await?.is_none() {
        return Ok(());
    }

    for recipient in recipients {
        session.append_recipient(recipient)?;
    }

    println!("{}", session.result());

    if copy {
        let mut clipboard = SystemClipboard::new()?;
        let copied = session.copy_result(&mut clipboard)?;
        eprintln!("Copied to clipboard");
        if cfg!(target_os = "linux") {
            eprintln!("Keeping the clipboard until another application takes it (Ctrl+C to stop)");
        }
        tokio::task::block_in_place(|| clipboard.hold_until_replaced(copied.as_str()))?;
    }
    Ok(())
}

/// Print the status label for a slip image.
pub async fn classify(image: String) -> Result<()> {
    let slip = capture::load(ImageSource::parse(&image)).await?;
    let label = status::classify_image(Some(&slip));
    println!("{}", label);
    Ok(())
}

/// Print the current theme, or toggle and persist it.
pub fn theme(settings: &mut SettingsStore, toggle: bool) -> Result<()> {
    let theme = if toggle {
        settings.toggle_theme()?
    } else {
        settings.theme()
    };
    println!("{}", theme);
    Ok(())
}
